//! Configuration module
//!
//! This module provides the configuration for the payments API: server, database,
//! session authentication, and payment gateway settings. It is built once at
//! process start and shared by `Arc`.

use std::env;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const GATEWAY_TIMEOUT_SECS: u64 = 30;
const SUBSCRIPTION_TOTAL_COUNT: u32 = 12;
const DEFAULT_GATEWAY_API_BASE: &str = "https://api.razorpay.com";
const DEFAULT_SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Server and session settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
}

/// Payment gateway credentials and behaviour
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
    pub api_base: String,
    pub signature_header: String,
    pub timeout_seconds: u64,
    /// Billing cycles requested when a subscription is created at the gateway
    pub subscription_total_count: u32,
}

#[derive(Clone, Debug)]
pub struct PaymentsConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub gateway: GatewayConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PaymentsConfig>);

impl Config {
    fn inner(&self) -> &PaymentsConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = PaymentsConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn gateway(&self) -> &GatewayConfig {
        &self.inner().gateway
    }

    pub fn webhook_secret(&self) -> &str {
        &self.inner().gateway.webhook_secret
    }

    pub fn signature_header(&self) -> &str {
        &self.inner().gateway.signature_header
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn required(name: &str) -> Result<String, anyhow::Error> {
    env::var(name).map_err(|_| anyhow::anyhow!("{} must be set", name))
}

impl PaymentsConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            environment,
        };

        let gateway = GatewayConfig {
            key_id: required("RAZORPAY_KEY_ID")?,
            key_secret: required("RAZORPAY_KEY_SECRET")?,
            webhook_secret: required("RAZORPAY_WEBHOOK_SECRET")?,
            api_base: env::var("RAZORPAY_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GATEWAY_API_BASE.to_string()),
            signature_header: env::var("WEBHOOK_SIGNATURE_HEADER")
                .unwrap_or_else(|_| DEFAULT_SIGNATURE_HEADER.to_string())
                .to_lowercase(),
            timeout_seconds: env::var("GATEWAY_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| GATEWAY_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(GATEWAY_TIMEOUT_SECS),
            subscription_total_count: env::var("SUBSCRIPTION_TOTAL_COUNT")
                .unwrap_or_else(|_| SUBSCRIPTION_TOTAL_COUNT.to_string())
                .parse()
                .unwrap_or(SUBSCRIPTION_TOTAL_COUNT),
        };

        Ok(PaymentsConfig {
            base,
            database_url: required("DATABASE_URL")?,
            gateway,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !(self.database_url.starts_with("postgresql://")
            || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.gateway.key_id.trim().is_empty() || self.gateway.key_secret.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET must not be empty"
            ));
        }

        if self.gateway.webhook_secret.is_empty() {
            return Err(anyhow::anyhow!("RAZORPAY_WEBHOOK_SECRET must not be empty"));
        }

        if !(self.gateway.api_base.starts_with("https://")
            || self.gateway.api_base.starts_with("http://"))
        {
            return Err(anyhow::anyhow!(
                "RAZORPAY_API_BASE must be an http(s) URL"
            ));
        }

        if self.gateway.signature_header.trim().is_empty() {
            return Err(anyhow::anyhow!("WEBHOOK_SIGNATURE_HEADER must not be empty"));
        }

        if self.gateway.subscription_total_count == 0 {
            return Err(anyhow::anyhow!(
                "SUBSCRIPTION_TOTAL_COUNT must be greater than zero"
            ));
        }

        Ok(())
    }
}
