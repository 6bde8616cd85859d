//! Inbound payment gateway webhooks

pub mod signature;

pub use signature::{compute_signature, verify_signature, SignatureError};
