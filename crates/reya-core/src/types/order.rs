//! Order intents: what the caller wants signed, in human-readable units.
//!
//! Intents are built per call and consumed by the typed-data builder. Sizes
//! and prices are exact decimals; scaling to fixed point happens later.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::scaling::DecimalInput;
use crate::signing::domain::OrdersGatewayOrderType;
use crate::signing::inputs::default_trigger_price_limit;
use crate::Result;

/// Anything the signer can turn into signature material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderIntent {
    /// Immediate-or-cancel order signed as `PlaceIOCOrder`.
    Market(MarketOrderIntent),
    /// Limit, stop-loss or take-profit order signed as `ConditionalOrder`.
    Conditional(ConditionalOrderIntent),
    /// Market order routed through the conditional-order schema.
    GatewayMarket(MarketOrderIntent),
    Cancellation(CancellationIntent),
}

/// Market order. Size is signed: positive buys, negative sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrderIntent {
    pub account_id: u64,
    pub market_id: u64,
    pub size: BigDecimal,
    pub price: BigDecimal,
    pub reduce_only: bool,
}

impl MarketOrderIntent {
    /// Parse `size` and `price` exactly from strings, integers, floats or decimals.
    pub fn new<S: DecimalInput, P: DecimalInput>(
        account_id: u64,
        market_id: u64,
        size: S,
        price: P,
        reduce_only: bool,
    ) -> Result<Self> {
        Ok(Self {
            account_id,
            market_id,
            size: size.to_decimal()?,
            price: price.to_decimal()?,
            reduce_only,
        })
    }

    pub fn is_buy(&self) -> bool {
        self.size > BigDecimal::default()
    }
}

/// Kinds of resting conditional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionalOrderKind {
    LimitOrder,
    StopLoss,
    TakeProfit,
}

impl ConditionalOrderKind {
    /// Discriminant signed as `orderType`.
    pub fn order_type(&self) -> OrdersGatewayOrderType {
        match self {
            ConditionalOrderKind::LimitOrder => OrdersGatewayOrderType::LimitOrder,
            ConditionalOrderKind::StopLoss => OrdersGatewayOrderType::StopLoss,
            ConditionalOrderKind::TakeProfit => OrdersGatewayOrderType::TakeProfit,
        }
    }

    pub fn is_trigger(&self) -> bool {
        !matches!(self, ConditionalOrderKind::LimitOrder)
    }
}

impl std::fmt::Display for ConditionalOrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionalOrderKind::LimitOrder => write!(f, "LimitOrder"),
            ConditionalOrderKind::StopLoss => write!(f, "StopLoss"),
            ConditionalOrderKind::TakeProfit => write!(f, "TakeProfit"),
        }
    }
}

/// Conditional order.
///
/// Limit orders need `trigger_price` (the limit price) and `size`; trigger
/// orders need `trigger_price` and `price_limit`. Missing fields surface as
/// validation errors when the inputs are encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalOrderIntent {
    pub kind: ConditionalOrderKind,
    pub account_id: u64,
    pub market_id: u64,
    pub is_buy: bool,
    pub trigger_price: Option<BigDecimal>,
    pub price_limit: Option<BigDecimal>,
    pub size: Option<BigDecimal>,
}

impl ConditionalOrderIntent {
    /// Good-til-cancelled limit order. `size` is unsigned; direction comes from `is_buy`.
    pub fn limit<P: DecimalInput, S: DecimalInput>(
        account_id: u64,
        market_id: u64,
        is_buy: bool,
        price: P,
        size: S,
    ) -> Result<Self> {
        Ok(Self {
            kind: ConditionalOrderKind::LimitOrder,
            account_id,
            market_id,
            is_buy,
            trigger_price: Some(price.to_decimal()?),
            price_limit: None,
            size: Some(size.to_decimal()?),
        })
    }

    pub fn stop_loss<T: DecimalInput>(
        account_id: u64,
        market_id: u64,
        is_buy: bool,
        trigger_price: T,
        price_limit: Option<BigDecimal>,
    ) -> Result<Self> {
        Self::trigger(
            ConditionalOrderKind::StopLoss,
            account_id,
            market_id,
            is_buy,
            trigger_price,
            price_limit,
        )
    }

    pub fn take_profit<T: DecimalInput>(
        account_id: u64,
        market_id: u64,
        is_buy: bool,
        trigger_price: T,
        price_limit: Option<BigDecimal>,
    ) -> Result<Self> {
        Self::trigger(
            ConditionalOrderKind::TakeProfit,
            account_id,
            market_id,
            is_buy,
            trigger_price,
            price_limit,
        )
    }

    fn trigger<T: DecimalInput>(
        kind: ConditionalOrderKind,
        account_id: u64,
        market_id: u64,
        is_buy: bool,
        trigger_price: T,
        price_limit: Option<BigDecimal>,
    ) -> Result<Self> {
        Ok(Self {
            kind,
            account_id,
            market_id,
            is_buy,
            trigger_price: Some(trigger_price.to_decimal()?),
            price_limit,
            size: None,
        })
    }

    /// Fill an empty price limit of a trigger order with the side's default.
    pub fn with_default_price_limit(mut self) -> Self {
        if self.kind.is_trigger() && self.price_limit.is_none() {
            self.price_limit = Some(default_trigger_price_limit(self.is_buy));
        }
        self
    }
}

/// Cancellation of a resting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationIntent {
    pub order_id: String,
}

impl CancellationIntent {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
        }
    }
}
