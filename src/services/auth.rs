use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::database::Store;
use crate::database::models::{AuthResponse, Employee, LoginInput, Role};
use crate::database::repositories::{employee as employee_repo, session as session_repo};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // employee id
    pub sid: Uuid, // session id
    pub role: Role,
    pub exp: usize, // expiration time
}

#[derive(Clone)]
pub struct AuthService {
    config: Config,
}

impl AuthService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        Ok(hash(password, self.config.bcrypt_cost)?)
    }

    pub async fn login(&self, store: &Store, request: LoginInput) -> Result<AuthResponse, AppError> {
        // bcrypt verification runs without holding the write lock.
        let employee = {
            let tables = store.read().await;
            employee_repo::find_by_email(&tables.employees, &request.email)
                .filter(|e| e.is_active())
                .cloned()
                .ok_or(AppError::Unauthorized)?
        };

        if !verify(&request.password, &employee.password_hash)? {
            log::warn!("Failed login attempt for {}", employee.email);
            return Err(AppError::Unauthorized);
        }

        let ttl = Duration::days(self.config.jwt_expiration_days);
        let session = store
            .transaction(|tx| {
                session_repo::purge_expired(&mut tx.sessions, Utc::now());
                Ok(session_repo::create(&mut tx.sessions, employee.id, ttl))
            })
            .await?;

        let token = self.generate_token(&employee, session.id, session.expires_at.timestamp())?;
        log::info!("Employee {} logged in", employee.id);

        Ok(AuthResponse { token, employee })
    }

    /// Ends the session behind the token; later requests with it are rejected.
    pub async fn logout(&self, store: &Store, session_id: Uuid) -> Result<(), AppError> {
        store
            .transaction(|tx| {
                if session_repo::delete(&mut tx.sessions, session_id) {
                    Ok(())
                } else {
                    Err(AppError::Unauthorized)
                }
            })
            .await
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }

    fn generate_token(
        &self,
        employee: &Employee,
        session_id: Uuid,
        expires_at: i64,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: employee.id,
            sid: session_id,
            role: employee.role,
            exp: expires_at as usize,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        Ok(token)
    }
}
