//! Signing module for Reya orders.
//!
//! Builds EIP-712 typed data for market and conditional orders, EIP-191
//! messages for cancellations, and signs them with a local secp256k1 key.
//!
//! # Architecture
//!
//! ```text
//! OrderIntent
//!       │
//!       ▼
//! TypedDataBuilder ── scaling + InputEncoder ──► SignatureMaterial
//!                                                       │
//!                                                       ▼
//!                                                 OrderSigner
//!                                                       │
//!                                                       ▼
//! OrderRequestAssembler ── nonce + deadline ──► wire request body
//! ```
//!
//! # Example
//!
//! ```ignore
//! use reya_core::config::TradingConfig;
//! use reya_core::signing::OrderRequestAssembler;
//! use reya_core::types::MarketOrderIntent;
//!
//! let config = TradingConfig::from_env()?;
//! let assembler = OrderRequestAssembler::from_config(&config)?;
//!
//! let intent = MarketOrderIntent::new(7, 1, "-0.1", "45000", false)?;
//! let request = assembler.market_order(&intent)?;
//! let body = serde_json::to_string(&request)?;
//!
//! // Or sign for the configured ACCOUNT_ID.
//! let limit = assembler.place_limit_order(1, true, "45000", "0.1")?;
//! ```

pub mod assembler;
pub mod domain;
pub mod inputs;
pub mod material;
pub mod nonce;
pub mod order_types;
pub mod signer;

pub use assembler::OrderRequestAssembler;

pub use domain::{
    ConditionalOrdersDomain, OrdersGatewayDomain, OrdersGatewayOrderType,
    MAINNET_ORDERS_GATEWAY_ADDRESS, REYA_DEX_ID, REYA_MAINNET_CHAIN_ID, REYA_TESTNET_CHAIN_ID,
    TESTNET_ORDERS_GATEWAY_ADDRESS,
};

pub use inputs::{encode_conditional_inputs, OrderInputs};

pub use material::{typed_data_hash, SignatureMaterial, TypedDataBuilder};

pub use nonce::{
    orders_gateway_nonce, Clock, DeadlineCalculator, MonotonicNonce, NonceSource, SystemClock,
    WallClockNonce, CONDITIONAL_ORDER_DEADLINE, DEFAULT_SIGNATURE_VALIDITY_SECS,
};

pub use order_types::{ConditionalOrder, ConditionalOrderDetails, PlaceIocOrder, TypedMessage};

pub use signer::OrderSigner;
