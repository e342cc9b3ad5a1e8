//! Order intents and the wire payloads built from them.

pub mod order;
pub mod request;

pub use order::*;
pub use request::*;
