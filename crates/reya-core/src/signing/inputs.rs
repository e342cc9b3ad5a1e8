//! ABI encoding of the order-type specific `inputs` blob.
//!
//! The byte layout is part of the contract with the orders gateway:
//!
//! | order type                               | tuple                         | bytes |
//! |------------------------------------------|-------------------------------|-------|
//! | LimitOrder, MarketOrder, ReduceOnlyMarket| `(int256 size, uint256 price)`| 64    |
//! | StopLoss, TakeProfit                     | `(bool isBuy, uint256 trigger, uint256 limit)` | 96 |
//!
//! Every value is scaled at 18 decimals.

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolValue;
use bigdecimal::BigDecimal;

use super::domain::OrdersGatewayOrderType;
use crate::scaling::WadValue;
use crate::types::{ConditionalOrderIntent, ConditionalOrderKind, MarketOrderIntent};
use crate::{Error, Result};

/// Encoded length of a sized (limit / market) input tuple.
pub const SIZED_INPUTS_LEN: usize = 64;

/// Encoded length of a trigger (stop-loss / take-profit) input tuple.
pub const TRIGGER_INPUTS_LEN: usize = 96;

/// Price limit used for buy-side trigger orders when the caller sets none.
pub const BUY_TRIGGER_ORDER_PRICE_LIMIT: u128 = 100_000_000_000_000_000_000;

/// Scaled inputs, shaped per order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderInputs {
    /// Limit and gateway market orders.
    Sized {
        /// Signed base size, negative for sells.
        size: WadValue,
        price: WadValue,
    },
    /// Stop-loss and take-profit orders.
    Trigger {
        is_buy: bool,
        trigger_price: WadValue,
        price_limit: WadValue,
    },
}

impl OrderInputs {
    /// Collect the inputs of a conditional order, checking required fields.
    pub fn from_conditional(intent: &ConditionalOrderIntent) -> Result<Self> {
        let trigger_price = intent
            .trigger_price
            .as_ref()
            .ok_or_else(|| missing(intent.kind, "trigger_price"))?;

        match intent.kind {
            ConditionalOrderKind::LimitOrder => {
                let size = intent
                    .size
                    .as_ref()
                    .ok_or_else(|| missing(intent.kind, "size"))?;
                let magnitude = WadValue::from_decimal(size)?.abs();
                if magnitude.is_zero() {
                    return Err(Error::validation("LimitOrder size must be non-zero"));
                }
                Ok(OrderInputs::Sized {
                    size: if intent.is_buy {
                        magnitude
                    } else {
                        magnitude.negated()
                    },
                    price: WadValue::from_decimal(trigger_price)?,
                })
            }
            ConditionalOrderKind::StopLoss | ConditionalOrderKind::TakeProfit => {
                let price_limit = intent
                    .price_limit
                    .as_ref()
                    .ok_or_else(|| missing(intent.kind, "price_limit"))?;
                Ok(OrderInputs::Trigger {
                    is_buy: intent.is_buy,
                    trigger_price: WadValue::from_decimal(trigger_price)?,
                    price_limit: WadValue::from_decimal(price_limit)?,
                })
            }
        }
    }

    /// Inputs of a market order routed through the conditional-order schema.
    pub fn from_market(intent: &MarketOrderIntent) -> Result<Self> {
        let size = WadValue::from_decimal(&intent.size)?;
        if size.is_zero() {
            return Err(Error::validation("Market order size must be non-zero"));
        }
        Ok(OrderInputs::Sized {
            size,
            price: WadValue::from_decimal(&intent.price)?,
        })
    }

    /// ABI-encode for `order_type`.
    ///
    /// Fails with an encoding error when the shape of `self` does not belong
    /// to `order_type`, and with a validation error when a value does not fit
    /// its slot.
    pub fn encode(&self, order_type: OrdersGatewayOrderType) -> Result<Bytes> {
        use OrdersGatewayOrderType::*;

        let (encoded, expected_len) = match (order_type, self) {
            (LimitOrder | MarketOrder | ReduceOnlyMarketOrder, OrderInputs::Sized { size, price }) => (
                (size.to_int256("size")?, price.to_uint256("price")?).abi_encode_params(),
                SIZED_INPUTS_LEN,
            ),
            (
                StopLoss | TakeProfit,
                OrderInputs::Trigger {
                    is_buy,
                    trigger_price,
                    price_limit,
                },
            ) => (
                (
                    *is_buy,
                    trigger_price.to_uint256("trigger_price")?,
                    price_limit.to_uint256("price_limit")?,
                )
                    .abi_encode_params(),
                TRIGGER_INPUTS_LEN,
            ),
            (order_type, inputs) => {
                return Err(Error::encoding(format!(
                    "{order_type} cannot encode {} inputs",
                    inputs.shape()
                )))
            }
        };

        if encoded.len() != expected_len {
            return Err(Error::encoding(format!(
                "{order_type} inputs encoded to {} bytes, expected {expected_len}",
                encoded.len()
            )));
        }

        Ok(Bytes::from(encoded))
    }

    fn shape(&self) -> &'static str {
        match self {
            OrderInputs::Sized { .. } => "sized",
            OrderInputs::Trigger { .. } => "trigger",
        }
    }
}

/// Encode the inputs of a conditional order intent.
pub fn encode_conditional_inputs(intent: &ConditionalOrderIntent) -> Result<Bytes> {
    OrderInputs::from_conditional(intent)?.encode(intent.kind.order_type())
}

/// Default trigger price limit: effectively unbounded for buys, zero for sells.
pub fn default_trigger_price_limit(is_buy: bool) -> BigDecimal {
    if is_buy {
        BigDecimal::new(BUY_TRIGGER_ORDER_PRICE_LIMIT.into(), 0)
    } else {
        BigDecimal::default()
    }
}

fn missing(kind: ConditionalOrderKind, field: &str) -> Error {
    Error::validation(format!("{kind} order requires {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::I256;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn limit(is_buy: bool, size: &str, price: &str) -> ConditionalOrderIntent {
        ConditionalOrderIntent {
            kind: ConditionalOrderKind::LimitOrder,
            account_id: 7,
            market_id: 1,
            is_buy,
            trigger_price: Some(dec(price)),
            price_limit: None,
            size: Some(dec(size)),
        }
    }

    fn trigger(kind: ConditionalOrderKind, is_buy: bool) -> ConditionalOrderIntent {
        ConditionalOrderIntent {
            kind,
            account_id: 7,
            market_id: 1,
            is_buy,
            trigger_price: Some(dec("42000")),
            price_limit: Some(dec("41000")),
            size: None,
        }
    }

    fn word(bytes: &[u8], index: usize) -> &[u8] {
        &bytes[index * 32..(index + 1) * 32]
    }

    #[test]
    fn test_limit_order_layout() {
        let encoded = encode_conditional_inputs(&limit(true, "0.1", "45000")).unwrap();
        assert_eq!(encoded.len(), SIZED_INPUTS_LEN);

        let size = U256::from_be_slice(word(&encoded, 0));
        let price = U256::from_be_slice(word(&encoded, 1));
        assert_eq!(size, U256::from(100_000_000_000_000_000u128));
        assert_eq!(price, U256::from(45_000_000_000_000_000_000_000u128));
    }

    #[test]
    fn test_limit_sell_is_negative_size() {
        let encoded = encode_conditional_inputs(&limit(false, "0.1", "45000")).unwrap();
        assert_eq!(encoded.len(), SIZED_INPUTS_LEN);

        let size = I256::from_raw(U256::from_be_slice(word(&encoded, 0)));
        assert_eq!(
            size,
            I256::try_from(-100_000_000_000_000_000i128).unwrap()
        );
        // Sign-extended into the full slot.
        assert!(word(&encoded, 0)[..16].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn test_trigger_order_layout() {
        for kind in [ConditionalOrderKind::StopLoss, ConditionalOrderKind::TakeProfit] {
            let encoded = encode_conditional_inputs(&trigger(kind, true)).unwrap();
            assert_eq!(encoded.len(), TRIGGER_INPUTS_LEN);

            // The bool takes a whole word.
            assert!(word(&encoded, 0)[..31].iter().all(|b| *b == 0));
            assert_eq!(word(&encoded, 0)[31], 1);
            assert_eq!(
                U256::from_be_slice(word(&encoded, 1)),
                U256::from(42_000u128) * U256::from(10u128.pow(18))
            );
            assert_eq!(
                U256::from_be_slice(word(&encoded, 2)),
                U256::from(41_000u128) * U256::from(10u128.pow(18))
            );
        }

        let sell = encode_conditional_inputs(&trigger(ConditionalOrderKind::StopLoss, false)).unwrap();
        assert_eq!(word(&sell, 0)[31], 0);
    }

    #[test]
    fn test_lengths_fixed_across_magnitudes() {
        for (size, price) in [("0.000000000000000001", "0"), ("1000000000", "99999999.5"), ("3", "1")] {
            for is_buy in [true, false] {
                let encoded = encode_conditional_inputs(&limit(is_buy, size, price)).unwrap();
                assert_eq!(encoded.len(), SIZED_INPUTS_LEN);
            }
        }
    }

    #[test]
    fn test_wide_price_fills_uint256_slot() {
        // Beyond uint128 once scaled, still a valid uint256.
        let encoded = encode_conditional_inputs(&limit(true, "1", "1000000000000000000000000")).unwrap();
        assert_eq!(
            U256::from_be_slice(word(&encoded, 1)),
            U256::from(10u64).pow(U256::from(42u64))
        );

        let mut intent = trigger(ConditionalOrderKind::TakeProfit, true);
        intent.price_limit = Some(dec("1e60"));
        assert!(matches!(
            encode_conditional_inputs(&intent),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_missing_trigger_price() {
        let mut intent = trigger(ConditionalOrderKind::StopLoss, false);
        intent.trigger_price = None;
        let err = encode_conditional_inputs(&intent).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.to_string().contains("trigger_price"));
    }

    #[test]
    fn test_missing_price_limit() {
        let mut intent = trigger(ConditionalOrderKind::TakeProfit, true);
        intent.price_limit = None;
        assert!(matches!(
            encode_conditional_inputs(&intent),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_missing_limit_size() {
        let mut intent = limit(true, "1", "100");
        intent.size = None;
        assert!(matches!(
            encode_conditional_inputs(&intent),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_negative_trigger_price_rejected() {
        let mut intent = trigger(ConditionalOrderKind::StopLoss, true);
        intent.trigger_price = Some(dec("-1"));
        assert!(matches!(
            encode_conditional_inputs(&intent),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_shape_mismatch_is_encoding_error() {
        let inputs = OrderInputs::from_conditional(&limit(true, "1", "100")).unwrap();
        assert!(matches!(
            inputs.encode(OrdersGatewayOrderType::StopLoss),
            Err(Error::Encoding { .. })
        ));

        let inputs =
            OrderInputs::from_conditional(&trigger(ConditionalOrderKind::TakeProfit, true)).unwrap();
        assert!(matches!(
            inputs.encode(OrdersGatewayOrderType::MarketOrder),
            Err(Error::Encoding { .. })
        ));
    }

    #[test]
    fn test_market_inputs_use_signed_size() {
        let intent = MarketOrderIntent {
            account_id: 7,
            market_id: 1,
            size: dec("-2"),
            price: dec("45000"),
            reduce_only: true,
        };
        let encoded = OrderInputs::from_market(&intent)
            .unwrap()
            .encode(OrdersGatewayOrderType::ReduceOnlyMarketOrder)
            .unwrap();
        let size = I256::from_raw(U256::from_be_slice(word(&encoded, 0)));
        assert!(size.is_negative());
    }

    #[test]
    fn test_default_trigger_price_limit() {
        assert_eq!(default_trigger_price_limit(false), dec("0"));
        assert_eq!(
            default_trigger_price_limit(true),
            dec("100000000000000000000")
        );
    }
}
