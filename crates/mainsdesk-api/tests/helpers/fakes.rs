//! In-memory stand-ins for the Postgres stores and the gateway client.

use async_trait::async_trait;
use chrono::Utc;
use mainsdesk_core::models::{
    CreditBalance, Order, Plan, PlanInterval, PlanType, Subscription, SubscriptionStatus,
};
use mainsdesk_core::{
    AppError, CreditStore, HealthProbe, LedgerStore, OrderStore, PlanStore, PurchaseOutcome,
    PurchasePlan,
    RenewalOutcome, SubscriptionRenewal,
};
use mainsdesk_infra::{
    CreateOrderRequest, CreatePlanRequest, CreateSubscriptionRequest, GatewayError, GatewayOrder,
    GatewayPlan, GatewaySubscription, PaymentGateway,
};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

pub fn plan(plan_type: PlanType, price: &str) -> Plan {
    Plan {
        id: Uuid::new_v4(),
        name: "Mains Answer Writing".to_string(),
        description: Some("GS evaluation pack".to_string()),
        plan_type,
        price: Decimal::from_str(price).expect("price"),
        currency: "INR".to_string(),
        interval: match plan_type {
            PlanType::Recurring => Some(PlanInterval::Monthly),
            PlanType::OneTime => None,
        },
        general_credits: 10,
        specialized_credits: 2,
        mentorship_credits: 1,
        payment_gateway_plan_id: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct FakePlans {
    plans: Mutex<HashMap<Uuid, Plan>>,
}

impl FakePlans {
    pub fn insert(&self, plan: Plan) -> Uuid {
        let id = plan.id;
        self.plans.lock().unwrap().insert(id, plan);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<Plan> {
        self.plans.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl PlanStore for FakePlans {
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<Plan>, AppError> {
        Ok(self.get(plan_id))
    }

    async fn list_active_plans(&self) -> Result<Vec<Plan>, AppError> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect())
    }

    async fn set_gateway_plan_id(
        &self,
        plan_id: Uuid,
        gateway_plan_id: &str,
    ) -> Result<bool, AppError> {
        let mut plans = self.plans.lock().unwrap();
        match plans.get_mut(&plan_id) {
            Some(plan) if plan.payment_gateway_plan_id.is_none() => {
                plan.payment_gateway_plan_id = Some(gateway_plan_id.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Records every mutation and mimics the procedures' idempotency on charge ids.
#[derive(Default)]
pub struct FakeLedger {
    pub subscriptions: Mutex<HashMap<String, Subscription>>,
    pub purchases: Mutex<Vec<PurchasePlan>>,
    pub renewals: Mutex<Vec<SubscriptionRenewal>>,
    seen_charges: Mutex<HashSet<String>>,
    pub fail_lookup: AtomicBool,
    pub fail_mutations: AtomicBool,
}

impl FakeLedger {
    pub fn add_subscription(&self, gateway_subscription_id: &str) {
        let now = Utc::now();
        self.subscriptions.lock().unwrap().insert(
            gateway_subscription_id.to_string(),
            Subscription {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                plan_id: Uuid::new_v4(),
                payment_gateway_subscription_id: gateway_subscription_id.to_string(),
                status: SubscriptionStatus::Active,
                current_period_start: Some(now),
                current_period_end: Some(now),
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn purchase_count(&self) -> usize {
        self.purchases.lock().unwrap().len()
    }

    pub fn renewal_count(&self) -> usize {
        self.renewals.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerStore for FakeLedger {
    async fn find_subscription_by_gateway_id(
        &self,
        gateway_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError> {
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .get(gateway_subscription_id)
            .cloned())
    }

    async fn purchase_plan(&self, purchase: PurchasePlan) -> Result<PurchaseOutcome, AppError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(AppError::Ledger("plan not found".to_string()));
        }
        let duplicate = !self
            .seen_charges
            .lock()
            .unwrap()
            .insert(purchase.payment_charge_id.clone());
        if !duplicate {
            if let Some(sub) = &purchase.subscription {
                self.add_subscription(&sub.gateway_subscription_id);
            }
        }
        self.purchases.lock().unwrap().push(purchase);
        Ok(PurchaseOutcome {
            order_id: Uuid::new_v4(),
            duplicate,
        })
    }

    async fn handle_subscription_renewal(
        &self,
        renewal: SubscriptionRenewal,
    ) -> Result<RenewalOutcome, AppError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(AppError::Ledger("subscription not found".to_string()));
        }
        let duplicate = !self
            .seen_charges
            .lock()
            .unwrap()
            .insert(renewal.gateway_payment_id.clone());
        self.renewals.lock().unwrap().push(renewal);
        Ok(RenewalOutcome {
            order_id: Uuid::new_v4(),
            subscription_id: Uuid::new_v4(),
            duplicate,
        })
    }
}

#[derive(Default)]
pub struct FakeCredits {
    balances: Mutex<HashMap<Uuid, CreditBalance>>,
}

impl FakeCredits {
    pub fn set(&self, balance: CreditBalance) {
        self.balances
            .lock()
            .unwrap()
            .insert(balance.user_id, balance);
    }
}

#[async_trait]
impl CreditStore for FakeCredits {
    async fn get_balance(&self, user_id: Uuid) -> Result<Option<CreditBalance>, AppError> {
        Ok(self.balances.lock().unwrap().get(&user_id).cloned())
    }
}

#[derive(Default)]
pub struct FakeOrders {
    orders: Mutex<Vec<Order>>,
}

impl FakeOrders {
    pub fn push(&self, order: Order) {
        self.orders.lock().unwrap().push(order);
    }
}

#[async_trait]
impl OrderStore for FakeOrders {
    async fn list_orders_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Order>, AppError> {
        let mut orders: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit as usize);
        Ok(orders)
    }
}

#[derive(Default)]
pub struct FakeHealth {
    pub down: AtomicBool,
}

#[async_trait]
impl HealthProbe for FakeHealth {
    async fn ping(&self) -> Result<(), AppError> {
        if self.down.load(Ordering::SeqCst) {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

/// Records gateway calls; never touches the network.
#[derive(Default)]
pub struct FakeGateway {
    pub orders: Mutex<Vec<CreateOrderRequest>>,
    pub subscriptions: Mutex<Vec<CreateSubscriptionRequest>>,
    pub plans: Mutex<Vec<CreatePlanRequest>>,
    pub fail: AtomicBool,
}

impl FakeGateway {
    pub fn call_count(&self) -> usize {
        self.orders.lock().unwrap().len()
            + self.subscriptions.lock().unwrap().len()
            + self.plans.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), GatewayError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(GatewayError::Api {
                status: 502,
                code: Some("SERVER_ERROR".to_string()),
                message: "gateway unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        self.check()?;
        let order = GatewayOrder {
            id: "order_Test123".to_string(),
            amount: request.amount,
            currency: request.currency.clone(),
            receipt: Some(request.receipt.clone()),
            status: Some("created".to_string()),
        };
        self.orders.lock().unwrap().push(request);
        Ok(order)
    }

    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<GatewaySubscription, GatewayError> {
        self.check()?;
        let subscription = GatewaySubscription {
            id: "sub_Test123".to_string(),
            plan_id: Some(request.plan_id.clone()),
            status: Some("created".to_string()),
            short_url: None,
        };
        self.subscriptions.lock().unwrap().push(request);
        Ok(subscription)
    }

    async fn create_plan(&self, request: CreatePlanRequest) -> Result<GatewayPlan, GatewayError> {
        self.check()?;
        let plan = GatewayPlan {
            id: "plan_Test123".to_string(),
            period: Some(request.period.clone()),
            interval: Some(request.interval),
        };
        self.plans.lock().unwrap().push(request);
        Ok(plan)
    }
}
