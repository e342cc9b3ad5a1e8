//! Reya Core Library
//!
//! Order intents, fixed-point scaling, typed-data construction and signing
//! for the Reya orders gateway. No network I/O happens here; the signed
//! request bodies are handed to whatever transport the caller uses.

pub mod config;
pub mod error;
pub mod scaling;
pub mod signing;
pub mod types;

pub use error::{Error, Result};
