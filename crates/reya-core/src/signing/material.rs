//! Signature material: what gets hashed and signed for each order category.

use alloy_primitives::{eip191_hash_message, keccak256, Address, B256, U256};
use std::io;

use alloy_sol_types::SolValue;
use serde::Serialize;
use serde_json::ser::Formatter;
use tracing::debug;

use super::domain::{ConditionalOrdersDomain, OrdersGatewayDomain, OrdersGatewayOrderType};
use super::inputs::{encode_conditional_inputs, OrderInputs};
use super::order_types::{ConditionalOrder, ConditionalOrderDetails, PlaceIocOrder, TypedMessage};
use crate::config::{TradingConfig, Venue};
use crate::scaling::{LegacyPriceValue, WadValue};
use crate::types::{CancellationIntent, ConditionalOrderIntent, MarketOrderIntent, OrderIntent};
use crate::{Error, Result};

/// Everything the signer needs to produce one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureMaterial {
    /// Market order under the chain-bound gateway domain.
    PlaceIocOrder {
        domain: OrdersGatewayDomain,
        message: PlaceIocOrder,
    },
    /// Conditional or gateway market order under the chainless domain.
    ConditionalOrder {
        domain: ConditionalOrdersDomain,
        message: ConditionalOrder,
    },
    /// Raw bytes signed under EIP-191.
    PersonalMessage { message: Vec<u8> },
}

impl SignatureMaterial {
    /// Primary type name, `None` for personal messages.
    pub fn primary_type(&self) -> Option<&'static str> {
        match self {
            SignatureMaterial::PlaceIocOrder { .. } => Some(PlaceIocOrder::PRIMARY_TYPE),
            SignatureMaterial::ConditionalOrder { .. } => Some(ConditionalOrder::PRIMARY_TYPE),
            SignatureMaterial::PersonalMessage { .. } => None,
        }
    }

    /// `encodeType` of the primary type, `None` for personal messages.
    pub fn type_schema(&self) -> Option<&'static str> {
        match self {
            SignatureMaterial::PlaceIocOrder { .. } => Some(PlaceIocOrder::ENCODED_TYPE),
            SignatureMaterial::ConditionalOrder { .. } => Some(ConditionalOrder::ENCODED_TYPE),
            SignatureMaterial::PersonalMessage { .. } => None,
        }
    }

    pub fn domain_separator(&self) -> Option<B256> {
        match self {
            SignatureMaterial::PlaceIocOrder { domain, .. } => Some(domain.separator()),
            SignatureMaterial::ConditionalOrder { domain, .. } => Some(domain.separator()),
            SignatureMaterial::PersonalMessage { .. } => None,
        }
    }

    /// The 32-byte digest that is signed.
    pub fn signing_hash(&self) -> B256 {
        match self {
            SignatureMaterial::PlaceIocOrder { domain, message } => {
                typed_data_hash(domain.separator(), message.struct_hash())
            }
            SignatureMaterial::ConditionalOrder { domain, message } => {
                typed_data_hash(domain.separator(), message.struct_hash())
            }
            SignatureMaterial::PersonalMessage { message } => eip191_hash_message(message),
        }
    }

    /// Label used in logs.
    pub fn kind(&self) -> &'static str {
        self.primary_type().unwrap_or("PersonalMessage")
    }
}

/// Compute the EIP-712 typed data hash.
pub fn typed_data_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let prefix = [0x19u8, 0x01u8];
    let data = (prefix, domain_separator, struct_hash).abi_encode_packed();
    keccak256(&data)
}

/// Body signed to cancel an order. Key order is part of the signed bytes.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancellationMessage<'a> {
    order_id: &'a str,
    status: &'static str,
    action_type: &'static str,
}

/// Compact JSON with every non-ASCII character written as `\uXXXX`
/// (UTF-16 units, lowercase hex), so the signed bytes are pure ASCII.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Canonical cancellation bytes:
/// `{"orderId":"<id>","status":"cancelled","actionType":"changeStatus"}`.
pub fn cancellation_message(order_id: &str) -> Result<Vec<u8>> {
    if order_id.is_empty() {
        return Err(Error::validation("orderId must not be empty"));
    }

    let message = CancellationMessage {
        order_id,
        status: "cancelled",
        action_type: "changeStatus",
    };
    let mut bytes = Vec::new();
    message.serialize(&mut serde_json::Serializer::with_formatter(&mut bytes, AsciiFormatter))?;
    Ok(bytes)
}

/// Builds signature material for one signer on one venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedDataBuilder {
    venue: Venue,
    signer: Address,
}

impl TypedDataBuilder {
    pub fn new(venue: Venue, signer: Address) -> Self {
        Self { venue, signer }
    }

    pub fn from_config(config: &TradingConfig, signer: Address) -> Result<Self> {
        Ok(Self::new(config.venue()?, signer))
    }

    pub fn venue(&self) -> &Venue {
        &self.venue
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Domain for market (IOC) orders.
    pub fn orders_gateway_domain(&self) -> OrdersGatewayDomain {
        OrdersGatewayDomain::reya(self.venue.chain_id, self.venue.orders_gateway)
    }

    /// Domain for conditional orders.
    pub fn conditional_orders_domain(&self) -> ConditionalOrdersDomain {
        ConditionalOrdersDomain::reya(self.venue.conditional_orders)
    }

    /// Build material for any intent.
    ///
    /// `nonce` and `deadline` are ignored for cancellations.
    pub fn build(&self, intent: &OrderIntent, nonce: U256, deadline: u64) -> Result<SignatureMaterial> {
        match intent {
            OrderIntent::Market(market) => self.build_market_order(market, nonce, deadline),
            OrderIntent::Conditional(conditional) => {
                self.build_conditional_order(conditional, nonce, deadline)
            }
            OrderIntent::GatewayMarket(market) => {
                self.build_gateway_market_order(market, nonce, deadline)
            }
            OrderIntent::Cancellation(cancellation) => self.build_cancellation(cancellation),
        }
    }

    /// `PlaceIOCOrder` for a market order.
    pub fn build_market_order(
        &self,
        intent: &MarketOrderIntent,
        nonce: U256,
        deadline: u64,
    ) -> Result<SignatureMaterial> {
        let size = WadValue::from_decimal(&intent.size)?;
        if size.is_zero() {
            return Err(Error::validation("Market order size must be non-zero"));
        }

        let message = PlaceIocOrder::new(
            self.signer,
            narrow_u32("accountId", intent.account_id)?,
            narrow_u32("marketId", intent.market_id)?,
            size,
            LegacyPriceValue::from_decimal(&intent.price)?,
            intent.reduce_only,
            u32::try_from(nonce).map_err(|_| {
                Error::validation(format!("nonce {nonce} is out of range for uint32"))
            })?,
            deadline,
        )?;

        debug!(
            signer = %self.signer,
            account_id = message.account_id,
            market_id = message.market_id,
            nonce = message.nonce,
            "Built PlaceIOCOrder"
        );

        Ok(SignatureMaterial::PlaceIocOrder {
            domain: self.orders_gateway_domain(),
            message,
        })
    }

    /// `ConditionalOrder` for a limit, stop-loss or take-profit order.
    pub fn build_conditional_order(
        &self,
        intent: &ConditionalOrderIntent,
        nonce: U256,
        deadline: u64,
    ) -> Result<SignatureMaterial> {
        let inputs = encode_conditional_inputs(intent)?;
        let order_type = intent.kind.order_type();

        debug!(
            signer = %self.signer,
            order_type = %order_type,
            account_id = intent.account_id,
            market_id = intent.market_id,
            %nonce,
            "Built ConditionalOrder"
        );

        Ok(self.conditional_material(
            intent.account_id,
            intent.market_id,
            order_type,
            inputs,
            nonce,
            deadline,
        ))
    }

    /// `ConditionalOrder` carrying a market order against the pool account.
    pub fn build_gateway_market_order(
        &self,
        intent: &MarketOrderIntent,
        nonce: U256,
        deadline: u64,
    ) -> Result<SignatureMaterial> {
        let order_type = if intent.reduce_only {
            OrdersGatewayOrderType::ReduceOnlyMarketOrder
        } else {
            OrdersGatewayOrderType::MarketOrder
        };
        let inputs = OrderInputs::from_market(intent)?.encode(order_type)?;

        debug!(
            signer = %self.signer,
            order_type = %order_type,
            account_id = intent.account_id,
            market_id = intent.market_id,
            %nonce,
            "Built gateway market order"
        );

        Ok(self.conditional_material(
            intent.account_id,
            intent.market_id,
            order_type,
            inputs,
            nonce,
            deadline,
        ))
    }

    /// Personal message cancelling `intent.order_id`.
    pub fn build_cancellation(&self, intent: &CancellationIntent) -> Result<SignatureMaterial> {
        Ok(SignatureMaterial::PersonalMessage {
            message: cancellation_message(&intent.order_id)?,
        })
    }

    fn conditional_material(
        &self,
        account_id: u64,
        market_id: u64,
        order_type: OrdersGatewayOrderType,
        inputs: alloy_primitives::Bytes,
        nonce: U256,
        deadline: u64,
    ) -> SignatureMaterial {
        let message = ConditionalOrder {
            verifying_chain_id: U256::from(self.venue.chain_id),
            deadline: U256::from(deadline),
            order: ConditionalOrderDetails {
                account_id: u128::from(account_id),
                market_id: u128::from(market_id),
                exchange_id: u128::from(self.venue.exchange_id),
                counterparty_account_ids: vec![u128::from(self.venue.pool_account_id)],
                order_type,
                inputs,
                signer: self.signer,
                nonce,
            },
        };

        SignatureMaterial::ConditionalOrder {
            domain: self.conditional_orders_domain(),
            message,
        }
    }
}

fn narrow_u32(field: &str, value: u64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::validation(format!("{field} {value} is out of range for uint32")))
}
