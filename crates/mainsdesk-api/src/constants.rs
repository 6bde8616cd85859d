//! API constants

/// Current API version
pub const API_VERSION: &str = "v0";

/// Versioned prefix used by all business routes
pub const API_PREFIX: &str = "/api/v0";
