//! Wire payloads handed to the transport layer.
//!
//! Field names and shapes follow the trading API's JSON bodies. Numbers that
//! may exceed 53 bits (nonces) and decimal quantities are sent as strings.

use serde::{Deserialize, Serialize};

/// Time in force of a limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    Gtc,
    #[serde(rename = "IOC")]
    Ioc,
}

/// Take-profit or stop-loss marker of a trigger order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tpsl {
    #[serde(rename = "TP")]
    TakeProfit,
    #[serde(rename = "SL")]
    StopLoss,
}

/// The `type` member of an order body.
///
/// Serializes as `{"limit":{"timeInForce":"IOC"}}` or
/// `{"trigger":{"triggerPx":"42000","tpsl":"SL"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderTypeDescriptor {
    Limit {
        #[serde(rename = "timeInForce")]
        time_in_force: TimeInForce,
    },
    Trigger {
        #[serde(rename = "triggerPx")]
        trigger_px: String,
        tpsl: Tpsl,
    },
}

impl OrderTypeDescriptor {
    pub fn ioc() -> Self {
        OrderTypeDescriptor::Limit {
            time_in_force: TimeInForce::Ioc,
        }
    }

    pub fn gtc() -> Self {
        OrderTypeDescriptor::Limit {
            time_in_force: TimeInForce::Gtc,
        }
    }
}

/// Signed market order body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOrderRequest {
    pub account_id: u64,
    pub market_id: u64,
    pub exchange_id: u64,
    pub is_buy: bool,
    pub price: String,
    /// Absolute size; direction is carried by `is_buy`.
    pub size: String,
    pub reduce_only: bool,
    #[serde(rename = "type")]
    pub order_type: OrderTypeDescriptor,
    pub signature: String,
    pub nonce: String,
    pub signer_wallet: String,
    pub expires_after: u64,
}

/// Signed limit, stop-loss or take-profit body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalOrderRequest {
    pub account_id: u64,
    pub market_id: u64,
    pub exchange_id: u64,
    pub is_buy: bool,
    pub price: String,
    /// Empty for trigger orders, which close the position they protect.
    pub size: String,
    pub reduce_only: bool,
    #[serde(rename = "type")]
    pub order_type: OrderTypeDescriptor,
    pub signature: String,
    pub nonce: String,
    pub signer_wallet: String,
}

/// Signed cancellation body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub order_id: String,
    pub signature: String,
}

/// Any signed body, serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OrderRequest {
    Market(MarketOrderRequest),
    Conditional(ConditionalOrderRequest),
    Cancel(CancelOrderRequest),
}

impl OrderRequest {
    pub fn signature(&self) -> &str {
        match self {
            OrderRequest::Market(request) => &request.signature,
            OrderRequest::Conditional(request) => &request.signature,
            OrderRequest::Cancel(request) => &request.signature,
        }
    }
}
