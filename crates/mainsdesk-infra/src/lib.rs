//! MainsDesk Infrastructure Library
//!
//! Shared infrastructure for the payments service:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - Webhook signature verification
//! - Payment gateway client

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "webhook")]
pub mod webhook;

#[cfg(feature = "gateway")]
pub mod gateway;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

#[cfg(feature = "webhook")]
pub use webhook::{compute_signature, verify_signature, SignatureError};

#[cfg(feature = "gateway")]
pub use gateway::{
    to_minor_units, CreateOrderRequest, CreatePlanRequest, CreateSubscriptionRequest,
    GatewayError, GatewayOrder, GatewayPlan, GatewaySubscription, PaymentGateway, PlanItem,
    RazorpayClient, RazorpayClientConfig,
};
