//! Core types: protocol envelopes and the gateway-wide error model.

pub mod error;
pub mod mcp;
