use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use crate::database::models::LeaveBalance;

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub bcrypt_cost: u32,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    pub company_name: String,
    pub logo_max_bytes: usize,
    pub bootstrap_admin_email: String,
    pub bootstrap_admin_password: String,
    pub default_leave_balance: LeaveBalance,
}

pub const DEFAULT_JWT_SECRET: &str = "your-super-secret-jwt-key-change-this-in-production-12345";

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            jwt_secret: var_or("JWT_SECRET", DEFAULT_JWT_SECRET),
            jwt_expiration_days: parse_var("JWT_EXPIRATION_DAYS", 30)?,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            host: var_or("HOST", "127.0.0.1"),
            port: parse_var("PORT", 8080)?,
            environment: var_or("ENVIRONMENT", "development"),
            client_base_url: var_or("BASE_URL", "http://localhost:3000"),
            company_name: var_or("COMPANY_NAME", "Acme Corp"),
            logo_max_bytes: parse_var("LOGO_MAX_BYTES", 256 * 1024)?,
            bootstrap_admin_email: var_or("BOOTSTRAP_ADMIN_EMAIL", "admin@example.com"),
            bootstrap_admin_password: var_or("BOOTSTRAP_ADMIN_PASSWORD", "admin123"),
            default_leave_balance: LeaveBalance {
                casual: parse_var("DEFAULT_CASUAL_LEAVE", 12)?,
                sick: parse_var("DEFAULT_SICK_LEAVE", 10)?,
                earned: parse_var("DEFAULT_EARNED_LEAVE", 15)?,
            },
        })
    }

    /// Deterministic configuration for tests; cheap bcrypt so fixtures stay fast.
    pub fn test_config() -> Self {
        Config {
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            bcrypt_cost: 4,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            company_name: "Test Corp".to_string(),
            logo_max_bytes: 1024,
            bootstrap_admin_email: "admin@test.local".to_string(),
            bootstrap_admin_password: "admin-password".to_string(),
            default_leave_balance: LeaveBalance {
                casual: 12,
                sick: 10,
                earned: 15,
            },
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// The built-in signing key is only acceptable on a developer machine.
    pub fn has_insecure_jwt_secret(&self) -> bool {
        !self.is_development() && self.jwt_secret == DEFAULT_JWT_SECRET
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
