//! Order signer for the Reya orders gateway.
//!
//! Signs [`SignatureMaterial`] with secp256k1 (RFC 6979 deterministic nonces)
//! and returns the 65-byte `r || s || v` signature, `v` in {27, 28}, as
//! `0x`-prefixed hex.

use std::str::FromStr;

use alloy_primitives::{Address, Signature};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use tracing::debug;

use super::material::SignatureMaterial;
use crate::config::TradingConfig;
use crate::{Error, Result};

/// Holds the private key and signs order material.
#[derive(Clone)]
pub struct OrderSigner {
    signer: PrivateKeySigner,
}

impl OrderSigner {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    /// Parse a hex private key, with or without `0x`.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let signer = PrivateKeySigner::from_str(private_key.trim())
            .map_err(|_| Error::config("Invalid private key"))?;
        Ok(Self::new(signer))
    }

    /// Build the signer from the configured private key.
    pub fn from_config(config: &TradingConfig) -> Result<Self> {
        let private_key = config
            .private_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::config("Private key is required for signing"))?;
        Self::from_private_key(private_key)
    }

    /// Get the signer's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign `material` and return the hex-encoded signature.
    pub fn sign(&self, material: &SignatureMaterial) -> Result<String> {
        let digest = material.signing_hash();

        let signature = self
            .signer
            .sign_hash_sync(&digest)
            .map_err(|e| Error::signing(format!("Failed to sign {}: {e}", material.kind())))?;

        debug!(
            signer = %self.address(),
            kind = material.kind(),
            digest = %digest,
            "Signed order material"
        );

        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }

    /// Recover the address that produced `signature` over `material`.
    pub fn recover(material: &SignatureMaterial, signature: &str) -> Result<Address> {
        let raw = signature.strip_prefix("0x").unwrap_or(signature);
        let bytes = hex::decode(raw)
            .map_err(|e| Error::signing(format!("Signature is not valid hex: {e}")))?;
        let signature = Signature::try_from(bytes.as_slice())
            .map_err(|e| Error::signing(format!("Malformed signature: {e}")))?;

        signature
            .recover_address_from_prehash(&material.signing_hash())
            .map_err(|e| Error::signing(format!("Failed to recover signer: {e}")))
    }

    /// Whether `signature` over `material` was produced by this signer.
    pub fn verify(&self, material: &SignatureMaterial, signature: &str) -> Result<bool> {
        Ok(Self::recover(material, signature)? == self.address())
    }
}

impl std::fmt::Debug for OrderSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSigner")
            .field("address", &format!("{:?}", self.address()))
            .finish()
    }
}
