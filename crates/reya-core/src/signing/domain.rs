//! EIP-712 domain separators for the Reya orders gateway.
//!
//! Market (IOC) orders and conditional orders are verified under different
//! domains. The market-order domain carries `chainId`; the conditional-order
//! domain leaves it out and the chain id travels inside the message as
//! `verifyingChainId` instead. The two are separate types so one can never
//! be passed where the other is expected.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;

/// Chain ID for Reya Network mainnet.
pub const REYA_MAINNET_CHAIN_ID: u64 = 1729;

/// Chain ID for the Reya Cronos testnet.
pub const REYA_TESTNET_CHAIN_ID: u64 = 89346162;

/// Exchange id of the Reya DEX.
pub const REYA_DEX_ID: u64 = 2;

/// Orders gateway proxy on mainnet.
pub const MAINNET_ORDERS_GATEWAY_ADDRESS: &str = "0xfc8c96be87da63cecddbf54abfa7b13ee8044739";

/// Orders gateway proxy on the testnet.
pub const TESTNET_ORDERS_GATEWAY_ADDRESS: &str = "0x5a0ac2f89e0bdeafc5c549e354842210a3e87ca5";

pub const DOMAIN_NAME: &str = "Reya";
pub const DOMAIN_VERSION: &str = "1";

/// Domain for market (IOC) orders: name, version, chainId, verifyingContract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersGatewayDomain {
    pub name: String,
    pub version: String,
    pub chain_id: U256,
    pub verifying_contract: Address,
}

impl OrdersGatewayDomain {
    pub const ENCODED_TYPE: &'static str =
        "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

    /// The Reya domain on `chain_id`, verified by `verifying_contract`.
    pub fn reya(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: DOMAIN_NAME.to_string(),
            version: DOMAIN_VERSION.to_string(),
            chain_id: U256::from(chain_id),
            verifying_contract,
        }
    }

    /// Compute the EIP-712 domain separator hash.
    pub fn separator(&self) -> B256 {
        let domain_type_hash = keccak256(Self::ENCODED_TYPE.as_bytes());

        let name_hash = keccak256(self.name.as_bytes());
        let version_hash = keccak256(self.version.as_bytes());
        let contract_padded = B256::left_padding_from(self.verifying_contract.as_slice());

        let encoded = (
            domain_type_hash,
            name_hash,
            version_hash,
            self.chain_id,
            contract_padded,
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }
}

/// Domain for conditional orders: name, version, verifyingContract (no chainId).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalOrdersDomain {
    pub name: String,
    pub version: String,
    pub verifying_contract: Address,
}

impl ConditionalOrdersDomain {
    pub const ENCODED_TYPE: &'static str =
        "EIP712Domain(string name,string version,address verifyingContract)";

    pub fn reya(verifying_contract: Address) -> Self {
        Self {
            name: DOMAIN_NAME.to_string(),
            version: DOMAIN_VERSION.to_string(),
            verifying_contract,
        }
    }

    /// Compute the EIP-712 domain separator hash.
    pub fn separator(&self) -> B256 {
        let domain_type_hash = keccak256(Self::ENCODED_TYPE.as_bytes());

        let name_hash = keccak256(self.name.as_bytes());
        let version_hash = keccak256(self.version.as_bytes());
        let contract_padded = B256::left_padding_from(self.verifying_contract.as_slice());

        let encoded = (domain_type_hash, name_hash, version_hash, contract_padded).abi_encode_packed();

        keccak256(&encoded)
    }
}

/// Order type discriminant signed as `orderType` (uint8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrdersGatewayOrderType {
    StopLoss = 0,
    TakeProfit = 1,
    LimitOrder = 2,
    MarketOrder = 3,
    ReduceOnlyMarketOrder = 4,
}

impl OrdersGatewayOrderType {
    /// Get the numeric value for signing.
    pub fn as_u8(&self) -> u8 {
        match self {
            OrdersGatewayOrderType::StopLoss => 0,
            OrdersGatewayOrderType::TakeProfit => 1,
            OrdersGatewayOrderType::LimitOrder => 2,
            OrdersGatewayOrderType::MarketOrder => 3,
            OrdersGatewayOrderType::ReduceOnlyMarketOrder => 4,
        }
    }
}

impl std::fmt::Display for OrdersGatewayOrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrdersGatewayOrderType::StopLoss => write!(f, "STOP_LOSS"),
            OrdersGatewayOrderType::TakeProfit => write!(f, "TAKE_PROFIT"),
            OrdersGatewayOrderType::LimitOrder => write!(f, "LIMIT_ORDER"),
            OrdersGatewayOrderType::MarketOrder => write!(f, "MARKET_ORDER"),
            OrdersGatewayOrderType::ReduceOnlyMarketOrder => write!(f, "REDUCE_ONLY_MARKET_ORDER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::eip712_domain;

    fn gateway() -> Address {
        MAINNET_ORDERS_GATEWAY_ADDRESS.parse().unwrap()
    }

    #[test]
    fn test_reya_domains() {
        let domain = OrdersGatewayDomain::reya(REYA_MAINNET_CHAIN_ID, gateway());
        assert_eq!(domain.name, "Reya");
        assert_eq!(domain.version, "1");
        assert_eq!(domain.chain_id, U256::from(1729u64));

        let conditional = ConditionalOrdersDomain::reya(gateway());
        assert_eq!(conditional.verifying_contract, gateway());
    }

    #[test]
    fn test_gateway_separator_matches_alloy() {
        let domain = OrdersGatewayDomain::reya(REYA_MAINNET_CHAIN_ID, gateway());
        let reference = eip712_domain! {
            name: "Reya",
            version: "1",
            chain_id: REYA_MAINNET_CHAIN_ID,
            verifying_contract: gateway(),
        };
        assert_eq!(domain.separator(), reference.separator());
    }

    #[test]
    fn test_conditional_separator_matches_alloy() {
        let domain = ConditionalOrdersDomain::reya(gateway());
        let reference = eip712_domain! {
            name: "Reya",
            version: "1",
            verifying_contract: gateway(),
        };
        assert_eq!(domain.separator(), reference.separator());
    }

    #[test]
    fn test_domains_differ() {
        // Same contract, but one domain binds the chain id and the other doesn't.
        let with_chain = OrdersGatewayDomain::reya(REYA_MAINNET_CHAIN_ID, gateway());
        let without_chain = ConditionalOrdersDomain::reya(gateway());
        assert_ne!(with_chain.separator(), without_chain.separator());

        let testnet = OrdersGatewayDomain::reya(REYA_TESTNET_CHAIN_ID, gateway());
        assert_ne!(with_chain.separator(), testnet.separator());
    }

    #[test]
    fn test_separator_deterministic() {
        let domain1 = OrdersGatewayDomain::reya(REYA_MAINNET_CHAIN_ID, gateway());
        let domain2 = OrdersGatewayDomain::reya(REYA_MAINNET_CHAIN_ID, gateway());
        assert_eq!(domain1.separator(), domain2.separator());
    }

    #[test]
    fn test_order_type_discriminants() {
        assert_eq!(OrdersGatewayOrderType::StopLoss.as_u8(), 0);
        assert_eq!(OrdersGatewayOrderType::TakeProfit.as_u8(), 1);
        assert_eq!(OrdersGatewayOrderType::LimitOrder.as_u8(), 2);
        assert_eq!(OrdersGatewayOrderType::MarketOrder.as_u8(), 3);
        assert_eq!(OrdersGatewayOrderType::ReduceOnlyMarketOrder.as_u8(), 4);
        assert_eq!(format!("{}", OrdersGatewayOrderType::TakeProfit), "TAKE_PROFIT");
    }
}
