// src/config/mod.rs
pub mod oracle;

pub use oracle::{HostedConfig, LocalConfig, OracleConfig};
