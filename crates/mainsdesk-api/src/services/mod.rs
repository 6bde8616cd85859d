pub mod reconciliation;

pub use reconciliation::{WebhookOutcome, WebhookProcessor};
