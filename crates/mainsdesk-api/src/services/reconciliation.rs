//! Webhook reconciliation.
//!
//! Turns a signed gateway webhook into at most one ledger mutation:
//! - `payment.captured` with `notes.type == "one_time"` purchases the plan
//! - `subscription.charged` provisions the subscription on the first charge
//!   and renews it on every later one
//!
//! Every other event is acknowledged without side effects. Replays are safe
//! because the ledger procedures are idempotent on the gateway ids.

use mainsdesk_core::models::webhook::{
    epoch_seconds_to_utc, GatewayEvent, PaymentEntity, SubscriptionEntity, WebhookEnvelope,
};
use mainsdesk_core::models::OrderStatus;
use mainsdesk_core::{
    AppError, LedgerStore, PurchasePlan, SubscriptionProvision, SubscriptionRenewal,
};
use mainsdesk_infra::verify_signature;
use std::sync::Arc;
use uuid::Uuid;

/// What a verified webhook did to the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    OneTimePurchased {
        order_id: Uuid,
        duplicate: bool,
    },
    /// A capture that belongs to a subscription; `subscription.charged` owns it.
    SkippedNotOneTime {
        payment_id: String,
    },
    Provisioned {
        order_id: Uuid,
        duplicate: bool,
    },
    Renewed {
        order_id: Uuid,
        subscription_id: Uuid,
        duplicate: bool,
    },
    Ignored {
        event: String,
    },
}

#[derive(Clone)]
pub struct WebhookProcessor {
    ledger: Arc<dyn LedgerStore>,
    webhook_secret: String,
}

impl WebhookProcessor {
    pub fn new(ledger: Arc<dyn LedgerStore>, webhook_secret: String) -> Self {
        Self {
            ledger,
            webhook_secret,
        }
    }

    /// Verifies the signature over the exact received bytes, then routes the event.
    #[tracing::instrument(skip(self, raw_body, signature), fields(body_len = raw_body.len()))]
    pub async fn process(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, AppError> {
        verify_signature(&self.webhook_secret, raw_body, signature).map_err(|e| {
            tracing::warn!(error = %e, "Rejected webhook with bad signature");
            AppError::from(e)
        })?;

        let envelope: WebhookEnvelope = serde_json::from_slice(raw_body)?;
        let event = GatewayEvent::from_envelope(&envelope)?;
        tracing::info!(event = event.name(), "Webhook verified");

        self.dispatch(event).await
    }

    async fn dispatch(&self, event: GatewayEvent) -> Result<WebhookOutcome, AppError> {
        match event {
            GatewayEvent::PaymentCaptured(payment) => self.handle_payment_captured(payment).await,
            GatewayEvent::SubscriptionCharged {
                subscription,
                payment,
            } => self.handle_subscription_charged(subscription, payment).await,
            GatewayEvent::Unhandled(event) => {
                tracing::debug!(event = %event, "Ignoring unhandled webhook event");
                Ok(WebhookOutcome::Ignored { event })
            }
        }
    }

    async fn handle_payment_captured(
        &self,
        payment: PaymentEntity,
    ) -> Result<WebhookOutcome, AppError> {
        if !payment.notes.is_one_time() {
            tracing::debug!(
                payment_id = %payment.id,
                note_type = ?payment.notes.kind,
                "Captured payment is not a one-time purchase"
            );
            return Ok(WebhookOutcome::SkippedNotOneTime {
                payment_id: payment.id,
            });
        }

        let user_id = payment.notes.user_id()?;
        let plan_id = payment.notes.plan_id()?;

        let outcome = self
            .ledger
            .purchase_plan(PurchasePlan {
                user_id,
                plan_id,
                order_status: OrderStatus::Succeeded,
                payment_charge_id: payment.id.clone(),
                payment_method: payment.method,
                subscription: None,
            })
            .await?;

        if outcome.duplicate {
            tracing::warn!(
                payment_id = %payment.id,
                order_id = %outcome.order_id,
                "Duplicate capture, credits already granted"
            );
        } else {
            tracing::info!(
                payment_id = %payment.id,
                order_id = %outcome.order_id,
                %user_id,
                %plan_id,
                "One-time purchase recorded"
            );
        }

        Ok(WebhookOutcome::OneTimePurchased {
            order_id: outcome.order_id,
            duplicate: outcome.duplicate,
        })
    }

    async fn handle_subscription_charged(
        &self,
        subscription: SubscriptionEntity,
        payment: PaymentEntity,
    ) -> Result<WebhookOutcome, AppError> {
        let existing = self
            .ledger
            .find_subscription_by_gateway_id(&subscription.id)
            .await?;

        match existing {
            None => self.provision(subscription, payment).await,
            Some(local) => {
                tracing::debug!(
                    subscription_id = %local.id,
                    gateway_subscription_id = %subscription.id,
                    "Subscription exists, renewing"
                );
                self.renew(subscription, payment).await
            }
        }
    }

    async fn provision(
        &self,
        subscription: SubscriptionEntity,
        payment: PaymentEntity,
    ) -> Result<WebhookOutcome, AppError> {
        let user_id = subscription.notes.user_id()?;
        let plan_id = subscription.notes.plan_id()?;
        let period_start = subscription
            .current_start
            .map(epoch_seconds_to_utc)
            .transpose()?;
        let period_end = subscription
            .current_end
            .map(epoch_seconds_to_utc)
            .transpose()?;

        // The first charge is keyed on the subscription id.
        let outcome = self
            .ledger
            .purchase_plan(PurchasePlan {
                user_id,
                plan_id,
                order_status: OrderStatus::Succeeded,
                payment_charge_id: subscription.id.clone(),
                payment_method: payment.method,
                subscription: Some(SubscriptionProvision {
                    gateway_subscription_id: subscription.id.clone(),
                    period_start,
                    period_end,
                }),
            })
            .await?;

        if outcome.duplicate {
            tracing::warn!(
                gateway_subscription_id = %subscription.id,
                "Duplicate first charge, subscription already provisioned"
            );
        } else {
            tracing::info!(
                gateway_subscription_id = %subscription.id,
                order_id = %outcome.order_id,
                %user_id,
                %plan_id,
                "Subscription provisioned"
            );
        }

        Ok(WebhookOutcome::Provisioned {
            order_id: outcome.order_id,
            duplicate: outcome.duplicate,
        })
    }

    async fn renew(
        &self,
        subscription: SubscriptionEntity,
        payment: PaymentEntity,
    ) -> Result<WebhookOutcome, AppError> {
        let new_period_start = subscription.period_start()?;
        let new_period_end = subscription.period_end()?;
        if new_period_end <= new_period_start {
            return Err(AppError::InvalidInput(format!(
                "subscription.current_end must be after current_start for {}",
                subscription.id
            )));
        }

        let outcome = self
            .ledger
            .handle_subscription_renewal(SubscriptionRenewal {
                gateway_subscription_id: subscription.id.clone(),
                gateway_payment_id: payment.id.clone(),
                payment_method: payment.method,
                new_period_start,
                new_period_end,
            })
            .await?;

        if outcome.duplicate {
            tracing::warn!(
                gateway_subscription_id = %subscription.id,
                payment_id = %payment.id,
                "Duplicate renewal charge ignored"
            );
        } else {
            tracing::info!(
                gateway_subscription_id = %subscription.id,
                payment_id = %payment.id,
                period_end = %new_period_end.to_rfc3339(),
                "Subscription renewed"
            );
        }

        Ok(WebhookOutcome::Renewed {
            order_id: outcome.order_id,
            subscription_id: outcome.subscription_id,
            duplicate: outcome.duplicate,
        })
    }
}
