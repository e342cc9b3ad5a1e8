//! Typed messages signed under EIP-712.
//!
//! Field order and declared widths match the structs the orders gateway
//! verifies. Values are stored at their declared Solidity width so a value
//! that does not fit is rejected when the message is built, not silently
//! truncated on the wire.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;

use super::domain::OrdersGatewayOrderType;
use crate::scaling::{LegacyPriceValue, WadValue};
use crate::Result;

/// A struct that can be hashed under EIP-712 `hashStruct`.
pub trait TypedMessage {
    /// Name of the primary type.
    const PRIMARY_TYPE: &'static str;

    /// `encodeType` of the primary type, referenced types appended.
    const ENCODED_TYPE: &'static str;

    fn type_hash() -> B256 {
        keccak256(Self::ENCODED_TYPE.as_bytes())
    }

    fn struct_hash(&self) -> B256;
}

/// Market (immediate-or-cancel) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceIocOrder {
    pub sender: Address,
    pub account_id: u32,
    pub market_id: u32,
    /// Base size at 18 decimals, negative for sells.
    pub size: i128,
    /// Limit price at the legacy 6-decimal scale.
    pub price: u128,
    pub reduce_only: bool,
    pub nonce: u32,
    pub deadline: u64,
}

impl PlaceIocOrder {
    /// Build the message from scaled values.
    ///
    /// The scale of each numeric field is fixed by its type: `size` must be an
    /// 18-decimal value and `price` a 6-decimal one.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sender: Address,
        account_id: u32,
        market_id: u32,
        size: WadValue,
        price: LegacyPriceValue,
        reduce_only: bool,
        nonce: u32,
        deadline: u64,
    ) -> Result<Self> {
        Ok(Self {
            sender,
            account_id,
            market_id,
            size: size.to_int128("size")?,
            price: price.to_uint128("price")?,
            reduce_only,
            nonce,
            deadline,
        })
    }
}

impl TypedMessage for PlaceIocOrder {
    const PRIMARY_TYPE: &'static str = "PlaceIOCOrder";
    const ENCODED_TYPE: &'static str = "PlaceIOCOrder(address sender,uint32 accountId,uint32 marketId,int128 size,uint128 price,bool reduceOnly,uint32 nonce,uint64 deadline)";

    fn struct_hash(&self) -> B256 {
        // EIP-712 encodeData: every value occupies a 32-byte word.
        let sender_padded = B256::left_padding_from(self.sender.as_slice());

        let encoded = (
            Self::type_hash(),
            sender_padded,
            U256::from(self.account_id),
            U256::from(self.market_id),
            int128_word(self.size),
            U256::from(self.price),
            U256::from(self.reduce_only as u8),
            U256::from(self.nonce),
            U256::from(self.deadline),
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }
}

/// The order carried inside a [`ConditionalOrder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalOrderDetails {
    pub account_id: u128,
    pub market_id: u128,
    pub exchange_id: u128,
    pub counterparty_account_ids: Vec<u128>,
    pub order_type: OrdersGatewayOrderType,
    /// ABI-encoded order inputs, layout fixed by `order_type`.
    pub inputs: Bytes,
    pub signer: Address,
    pub nonce: U256,
}

impl ConditionalOrderDetails {
    pub const ENCODED_TYPE: &'static str = "ConditionalOrderDetails(uint128 accountId,uint128 marketId,uint128 exchangeId,uint128[] counterpartyAccountIds,uint8 orderType,bytes inputs,address signer,uint256 nonce)";

    pub fn struct_hash(&self) -> B256 {
        let type_hash = keccak256(Self::ENCODED_TYPE.as_bytes());

        // Dynamic members are replaced by the hash of their contents.
        let mut counterparties = Vec::with_capacity(self.counterparty_account_ids.len() * 32);
        for id in &self.counterparty_account_ids {
            counterparties.extend_from_slice(&U256::from(*id).to_be_bytes::<32>());
        }
        let counterparties_hash = keccak256(&counterparties);
        let inputs_hash = keccak256(&self.inputs);
        let signer_padded = B256::left_padding_from(self.signer.as_slice());

        let encoded = (
            type_hash,
            U256::from(self.account_id),
            U256::from(self.market_id),
            U256::from(self.exchange_id),
            counterparties_hash,
            U256::from(self.order_type.as_u8()),
            inputs_hash,
            signer_padded,
            self.nonce,
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }
}

/// Conditional order envelope (limit, stop-loss, take-profit, gateway market).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalOrder {
    /// Chain id, carried in the message because the domain omits it.
    pub verifying_chain_id: U256,
    pub deadline: U256,
    pub order: ConditionalOrderDetails,
}

impl TypedMessage for ConditionalOrder {
    const PRIMARY_TYPE: &'static str = "ConditionalOrder";
    const ENCODED_TYPE: &'static str = "ConditionalOrder(uint256 verifyingChainId,uint256 deadline,ConditionalOrderDetails order)ConditionalOrderDetails(uint128 accountId,uint128 marketId,uint128 exchangeId,uint128[] counterpartyAccountIds,uint8 orderType,bytes inputs,address signer,uint256 nonce)";

    fn struct_hash(&self) -> B256 {
        let encoded = (
            Self::type_hash(),
            self.verifying_chain_id,
            self.deadline,
            self.order.struct_hash(),
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }
}

/// Two's-complement, sign-extended 32-byte word.
fn int128_word(value: i128) -> B256 {
    let mut word = if value < 0 { [0xff; 32] } else { [0u8; 32] };
    word[16..].copy_from_slice(&value.to_be_bytes());
    B256::from(word)
}
