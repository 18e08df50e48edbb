//! Inbound adapters (driving side).
//!
//! Purpose: translate external requests into calls on domain ports.

pub mod http;
