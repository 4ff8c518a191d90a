//! Base types and error handling.
//!
//! Provides foundational types shared by the transport and RPC layers:
//! - [`NetError`](neterror::NetError): error codes with Chromium-style
//!   numeric values
//! - [`ConnectionState`](state::ConnectionState): connection lifecycle states

pub mod neterror;
pub mod state;

#[cfg(test)]
mod tests;
