//! MainsDesk payments API
//!
//! Exposed as a library so integration tests can build the router over fake
//! stores and a fake gateway.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
