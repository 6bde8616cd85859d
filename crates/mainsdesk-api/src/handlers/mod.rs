pub mod credits;
pub mod payments;
pub mod plans;
pub mod webhooks;
