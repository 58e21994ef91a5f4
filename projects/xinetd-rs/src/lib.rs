#![allow(clippy::result_large_err)]

//! `xinetd_rs` holds the attribute layer of the xinetd super-server
//! configuration: one validator per service keyword (`port`, `user`,
//! `log_type`, `only_from`, ...), each of which checks the raw value tokens
//! of a configuration line and writes the typed result into a
//! [`ServiceConfig`](service_config::ServiceConfig).
//!
//! It contains:
//! - The keyword table and the validators themselves (`attributes`)
//! - The name/value tables for enumerated settings (`nvlists`)
//! - The per-service configuration record (`service_config`)
//! - Address lists and access-time intervals used by access control
//! - Platform lookups (passwd/group/protocol/service databases, getaddrinfo)
//! - Configuration loading and logging setup

pub mod addrlist;
pub mod attributes;
pub mod config;
pub mod logging;
pub mod nvlists;
pub mod platform;
pub mod service_config;
pub mod timex;

#[cfg(test)]
mod tests;
