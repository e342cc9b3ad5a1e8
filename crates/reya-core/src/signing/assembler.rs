//! Combines signatures, nonces and plain order fields into wire payloads.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use bigdecimal::BigDecimal;
use tracing::{debug, warn};

use super::material::TypedDataBuilder;
use super::nonce::{
    orders_gateway_nonce, DeadlineCalculator, MonotonicNonce, NonceSource,
    CONDITIONAL_ORDER_DEADLINE,
};
use super::signer::OrderSigner;
use crate::config::TradingConfig;
use crate::scaling::DecimalInput;
use crate::types::{
    CancelOrderRequest, CancellationIntent, ConditionalOrderIntent, ConditionalOrderKind,
    ConditionalOrderRequest, MarketOrderIntent, MarketOrderRequest, OrderIntent, OrderRequest,
    OrderTypeDescriptor, Tpsl,
};
use crate::{Error, Result};

/// Produces signed request bodies ready for the transport layer.
pub struct OrderRequestAssembler {
    builder: TypedDataBuilder,
    signer: OrderSigner,
    nonces: Arc<dyn NonceSource>,
    deadlines: DeadlineCalculator,
    account_id: Option<u64>,
}

impl OrderRequestAssembler {
    pub fn new(
        builder: TypedDataBuilder,
        signer: OrderSigner,
        nonces: Arc<dyn NonceSource>,
        deadlines: DeadlineCalculator,
    ) -> Self {
        Self {
            builder,
            signer,
            nonces,
            deadlines,
            account_id: None,
        }
    }

    /// Account used by the `place_*` helpers.
    pub fn with_account_id(mut self, account_id: u64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Signer, venue and defaults from configuration.
    ///
    /// Fails when the private key is missing or an address does not parse.
    pub fn from_config(config: &TradingConfig) -> Result<Self> {
        let signer = OrderSigner::from_config(config)?;
        let builder = TypedDataBuilder::from_config(config, signer.address())?;

        if let Some(wallet) = config.wallet_address.as_deref() {
            if wallet.parse::<Address>().ok() != Some(signer.address()) {
                warn!(
                    wallet,
                    signer = %signer.address(),
                    "Configured wallet address differs from the signing key"
                );
            }
        }

        let assembler = Self::new(
            builder,
            signer,
            Arc::new(MonotonicNonce::default()),
            DeadlineCalculator::default(),
        );
        Ok(match config.account_id {
            Some(account_id) => assembler.with_account_id(account_id),
            None => assembler,
        })
    }

    /// The configured trading account.
    pub fn account_id(&self) -> Result<u64> {
        self.account_id
            .ok_or_else(|| Error::config("ACCOUNT_ID is required to place orders for the configured account"))
    }

    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }

    pub fn builder(&self) -> &TypedDataBuilder {
        &self.builder
    }

    pub fn signer(&self) -> &OrderSigner {
        &self.signer
    }

    /// Sign any intent with an explicit nonce and deadline.
    ///
    /// Market intents use `deadline` as `expiresAfter`; conditional intents
    /// sign it into the message only.
    pub fn assemble(&self, intent: &OrderIntent, nonce: U256, deadline: u64) -> Result<OrderRequest> {
        Ok(match intent {
            OrderIntent::Market(market) => {
                OrderRequest::Market(self.ioc_order(market, nonce, deadline)?)
            }
            OrderIntent::Conditional(conditional) => OrderRequest::Conditional(
                self.conditional_order_with(conditional, nonce, deadline)?,
            ),
            OrderIntent::GatewayMarket(market) => {
                OrderRequest::Market(self.market_order_with(market, nonce, deadline)?)
            }
            OrderIntent::Cancellation(cancellation) => {
                OrderRequest::Cancel(self.cancel(cancellation)?)
            }
        })
    }

    /// Market order signed as `PlaceIOCOrder`. `nonce` must fit in uint32.
    pub fn ioc_order(
        &self,
        intent: &MarketOrderIntent,
        nonce: U256,
        deadline: u64,
    ) -> Result<MarketOrderRequest> {
        let material = self.builder.build_market_order(intent, nonce, deadline)?;
        let signature = self.signer.sign(&material)?;
        Ok(self.market_request(intent, signature, nonce, deadline))
    }

    /// Market order through the gateway schema, with a packed nonce and the
    /// default validity window.
    pub fn market_order(&self, intent: &MarketOrderIntent) -> Result<MarketOrderRequest> {
        let nonce = orders_gateway_nonce(
            u128::from(intent.account_id),
            intent.market_id,
            self.nonces.next_nonce(),
        )?;
        self.market_order_with(intent, nonce, self.deadlines.default_deadline()?)
    }

    pub fn market_order_with(
        &self,
        intent: &MarketOrderIntent,
        nonce: U256,
        deadline: u64,
    ) -> Result<MarketOrderRequest> {
        let material = self
            .builder
            .build_gateway_market_order(intent, nonce, deadline)?;
        let signature = self.signer.sign(&material)?;
        Ok(self.market_request(intent, signature, nonce, deadline))
    }

    /// Resting order with a fresh nonce and the non-expiring deadline.
    pub fn conditional_order(
        &self,
        intent: &ConditionalOrderIntent,
    ) -> Result<ConditionalOrderRequest> {
        let nonce = U256::from(self.nonces.next_nonce());
        self.conditional_order_with(intent, nonce, CONDITIONAL_ORDER_DEADLINE)
    }

    pub fn conditional_order_with(
        &self,
        intent: &ConditionalOrderIntent,
        nonce: U256,
        deadline: u64,
    ) -> Result<ConditionalOrderRequest> {
        let material = self
            .builder
            .build_conditional_order(intent, nonce, deadline)?;
        let signature = self.signer.sign(&material)?;

        let (price, size, order_type) = match intent.kind {
            ConditionalOrderKind::LimitOrder => (
                display(required(intent.trigger_price.as_ref(), intent.kind, "trigger_price")?),
                display(&required(intent.size.as_ref(), intent.kind, "size")?.abs()),
                OrderTypeDescriptor::gtc(),
            ),
            ConditionalOrderKind::StopLoss | ConditionalOrderKind::TakeProfit => (
                display(required(intent.price_limit.as_ref(), intent.kind, "price_limit")?),
                String::new(),
                OrderTypeDescriptor::Trigger {
                    trigger_px: display(required(
                        intent.trigger_price.as_ref(),
                        intent.kind,
                        "trigger_price",
                    )?),
                    tpsl: if intent.kind == ConditionalOrderKind::TakeProfit {
                        Tpsl::TakeProfit
                    } else {
                        Tpsl::StopLoss
                    },
                },
            ),
        };

        debug!(kind = %intent.kind, %nonce, "Assembled conditional order request");

        Ok(ConditionalOrderRequest {
            account_id: intent.account_id,
            market_id: intent.market_id,
            exchange_id: self.builder.venue().exchange_id,
            is_buy: intent.is_buy,
            price,
            size,
            reduce_only: false,
            order_type,
            signature,
            nonce: nonce.to_string(),
            signer_wallet: self.signer.address().to_checksum(None),
        })
    }

    /// Market order for the configured account.
    pub fn place_market_order<S: DecimalInput, P: DecimalInput>(
        &self,
        market_id: u64,
        size: S,
        price: P,
        reduce_only: bool,
    ) -> Result<MarketOrderRequest> {
        let intent = MarketOrderIntent::new(self.account_id()?, market_id, size, price, reduce_only)?;
        self.market_order(&intent)
    }

    /// GTC limit order for the configured account.
    pub fn place_limit_order<P: DecimalInput, S: DecimalInput>(
        &self,
        market_id: u64,
        is_buy: bool,
        price: P,
        size: S,
    ) -> Result<ConditionalOrderRequest> {
        let intent = ConditionalOrderIntent::limit(self.account_id()?, market_id, is_buy, price, size)?;
        self.conditional_order(&intent)
    }

    /// Stop-loss or take-profit for the configured account. An empty
    /// `price_limit` takes the side's default.
    pub fn place_trigger_order<T: DecimalInput>(
        &self,
        kind: ConditionalOrderKind,
        market_id: u64,
        is_buy: bool,
        trigger_price: T,
        price_limit: Option<BigDecimal>,
    ) -> Result<ConditionalOrderRequest> {
        let account_id = self.account_id()?;
        let intent = match kind {
            ConditionalOrderKind::StopLoss => {
                ConditionalOrderIntent::stop_loss(account_id, market_id, is_buy, trigger_price, price_limit)?
            }
            ConditionalOrderKind::TakeProfit => {
                ConditionalOrderIntent::take_profit(account_id, market_id, is_buy, trigger_price, price_limit)?
            }
            ConditionalOrderKind::LimitOrder => {
                return Err(Error::validation("LimitOrder is not a trigger order"))
            }
        };
        self.conditional_order(&intent.with_default_price_limit())
    }

    pub fn cancel_order(&self, order_id: &str) -> Result<CancelOrderRequest> {
        self.cancel(&CancellationIntent::new(order_id))
    }

    fn cancel(&self, intent: &CancellationIntent) -> Result<CancelOrderRequest> {
        let material = self.builder.build_cancellation(intent)?;
        let signature = self.signer.sign(&material)?;

        debug!(order_id = %intent.order_id, "Assembled cancellation request");

        Ok(CancelOrderRequest {
            order_id: intent.order_id.clone(),
            signature,
        })
    }

    fn market_request(
        &self,
        intent: &MarketOrderIntent,
        signature: String,
        nonce: U256,
        deadline: u64,
    ) -> MarketOrderRequest {
        debug!(
            account_id = intent.account_id,
            market_id = intent.market_id,
            %nonce,
            "Assembled market order request"
        );

        MarketOrderRequest {
            account_id: intent.account_id,
            market_id: intent.market_id,
            exchange_id: self.builder.venue().exchange_id,
            is_buy: intent.is_buy(),
            price: display(&intent.price),
            size: display(&intent.size.abs()),
            reduce_only: intent.reduce_only,
            order_type: OrderTypeDescriptor::ioc(),
            signature,
            nonce: nonce.to_string(),
            signer_wallet: self.signer.address().to_checksum(None),
            expires_after: deadline,
        }
    }
}

impl std::fmt::Debug for OrderRequestAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderRequestAssembler")
            .field("builder", &self.builder)
            .field("signer", &self.signer)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

fn required<'a>(
    value: Option<&'a BigDecimal>,
    kind: ConditionalOrderKind,
    field: &str,
) -> Result<&'a BigDecimal> {
    value.ok_or_else(|| Error::validation(format!("{kind} order requires {field}")))
}

fn display(value: &BigDecimal) -> String {
    value.normalized().to_plain_string()
}
