//! PubMed MCP gateway: literature-search tools for MCP host applications,
//! plus the operational tooling (`doctor`, `smoke`) used to troubleshoot a
//! deployment.

pub mod api;
pub mod cli;
pub mod clients;
pub mod core;
pub mod diagnostics;
pub mod domain;
pub mod infra;
pub mod smoke;
pub mod tools;
