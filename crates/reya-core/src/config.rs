//! Configuration for the Reya order signer.
//!
//! Values come from the environment (with `.env` support) or from an
//! optional config file layered under `REYA_`-prefixed environment variables.
//! Everything that depends on the chain (gateway address, pool account) is
//! derived here so the signing code only ever sees resolved values.

use crate::signing::domain::{
    MAINNET_ORDERS_GATEWAY_ADDRESS, REYA_DEX_ID, REYA_MAINNET_CHAIN_ID,
    TESTNET_ORDERS_GATEWAY_ADDRESS,
};
use crate::{Error, Result};
use alloy_primitives::Address;
use serde::Deserialize;
use std::env;

fn default_chain_id() -> u64 {
    REYA_MAINNET_CHAIN_ID
}

/// Trading configuration consumed by the signer.
#[derive(Clone, Deserialize)]
pub struct TradingConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default)]
    pub private_key: Option<String>,
    /// Overrides the per-chain orders gateway address (market orders).
    #[serde(default)]
    pub orders_gateway_address: Option<String>,
    /// Overrides the per-chain conditional orders address.
    #[serde(default)]
    pub conditional_orders_address: Option<String>,
    #[serde(default)]
    pub account_id: Option<u64>,
    #[serde(default)]
    pub wallet_address: Option<String>,
}

impl TradingConfig {
    /// Create a config for the given chain with every optional value unset.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            private_key: None,
            orders_gateway_address: None,
            conditional_orders_address: None,
            account_id: None,
            wallet_address: None,
        }
    }

    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    pub fn with_account_id(mut self, account_id: u64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_orders_gateway_address(mut self, address: impl Into<String>) -> Self {
        self.orders_gateway_address = Some(address.into());
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let chain_id = match env::var("CHAIN_ID") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                Error::config(format!("CHAIN_ID is not a valid integer: {raw:?}"))
            })?,
            Err(_) => REYA_MAINNET_CHAIN_ID,
        };

        let account_id = match env::var("ACCOUNT_ID") {
            Ok(raw) => Some(raw.trim().parse().map_err(|_| {
                Error::config(format!("ACCOUNT_ID is not a valid integer: {raw:?}"))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            chain_id,
            private_key: env::var("PRIVATE_KEY").ok(),
            orders_gateway_address: env::var("ORDERS_GATEWAY_ADDRESS").ok(),
            conditional_orders_address: env::var("CONDITIONAL_ORDERS_ADDRESS").ok(),
            account_id,
            wallet_address: env::var("WALLET_ADDRESS").ok(),
        })
    }

    /// Load configuration from an optional file, overridden by `REYA_*` variables.
    ///
    /// `REYA_PRIVATE_KEY`, `REYA_CHAIN_ID`, `REYA_ACCOUNT_ID` and so on map onto
    /// the struct fields.
    pub fn load(path: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("REYA").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Whether the configured chain is Reya mainnet.
    pub fn is_mainnet(&self) -> bool {
        self.chain_id == REYA_MAINNET_CHAIN_ID
    }

    /// Exchange id of the Reya DEX.
    pub fn dex_id(&self) -> u64 {
        REYA_DEX_ID
    }

    /// Passive pool account used as the counterparty of gateway orders.
    pub fn pool_account_id(&self) -> u64 {
        if self.is_mainnet() {
            2
        } else {
            4
        }
    }

    pub fn default_orders_gateway_address(&self) -> &'static str {
        if self.is_mainnet() {
            MAINNET_ORDERS_GATEWAY_ADDRESS
        } else {
            TESTNET_ORDERS_GATEWAY_ADDRESS
        }
    }

    /// Conditional orders are verified by the gateway proxy as well.
    pub fn default_conditional_orders_address(&self) -> &'static str {
        self.default_orders_gateway_address()
    }

    /// The verifying contract for market (IOC) orders.
    pub fn orders_gateway_address(&self) -> Result<Address> {
        let raw = self
            .orders_gateway_address
            .as_deref()
            .unwrap_or_else(|| self.default_orders_gateway_address());
        parse_address("orders gateway address", raw)
    }

    /// The verifying contract for conditional orders.
    pub fn conditional_orders_address(&self) -> Result<Address> {
        let raw = self
            .conditional_orders_address
            .as_deref()
            .unwrap_or_else(|| self.default_conditional_orders_address());
        parse_address("conditional orders address", raw)
    }

    /// Resolve every chain-dependent value the typed-data builder needs.
    pub fn venue(&self) -> Result<Venue> {
        Ok(Venue {
            chain_id: self.chain_id,
            orders_gateway: self.orders_gateway_address()?,
            conditional_orders: self.conditional_orders_address()?,
            exchange_id: self.dex_id(),
            pool_account_id: self.pool_account_id(),
        })
    }
}

fn parse_address(what: &str, raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| Error::config(format!("Invalid {what} {raw:?}: {e}")))
}

impl std::fmt::Debug for TradingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingConfig")
            .field("chain_id", &self.chain_id)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("orders_gateway_address", &self.orders_gateway_address)
            .field("conditional_orders_address", &self.conditional_orders_address)
            .field("account_id", &self.account_id)
            .field("wallet_address", &self.wallet_address)
            .finish()
    }
}

/// Chain-dependent values resolved from a [`TradingConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Venue {
    pub chain_id: u64,
    pub orders_gateway: Address,
    pub conditional_orders: Address,
    pub exchange_id: u64,
    pub pool_account_id: u64,
}
