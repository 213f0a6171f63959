//! Framework-free building blocks shared by the gigmart service crates.
//!
//! Nothing in here knows about HTTP. Handlers translate these types into
//! response envelopes in `gigmart-api`.

pub mod error;
pub mod validation;
