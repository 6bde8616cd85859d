//! Session authentication for student, faculty, and admin requests.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::SessionVerifier;
pub use middleware::{auth_middleware, AuthState};
pub use models::{AppMetadata, SessionClaims, UserContext, UserRole};
