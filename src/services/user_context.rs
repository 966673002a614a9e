use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, http::header, web::Data,
};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use std::collections::HashSet;
use uuid::Uuid;

use crate::database::models::{Employee, Role};
use crate::database::repositories::{employee as employee_repo, session as session_repo};
use crate::database::{Store, Tables};
use crate::error::AppError;
use crate::middleware::RequestIdExt;
use crate::services::auth::{AuthService, Claims};
use crate::services::hierarchy;

/// The authenticated caller, resolved from the bearer token and the live
/// session table. Handlers take it as an extractor.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub employee: Employee,
    pub session_id: Uuid,
}

impl UserContext {
    pub fn new(employee: Employee, session_id: Uuid) -> Self {
        Self {
            employee,
            session_id,
        }
    }

    /// Build the context for verified claims; the session must still exist
    /// and the employee must not have exited.
    pub fn resolve(tables: &Tables, claims: &Claims) -> Result<Self, AppError> {
        let session = session_repo::find_active(&tables.sessions, claims.sid, Utc::now())
            .filter(|s| s.employee_id == claims.sub)
            .ok_or(AppError::Unauthorized)?;

        let employee = employee_repo::find_by_id(&tables.employees, session.employee_id)
            .map_err(|_| AppError::Unauthorized)?;
        if !employee.is_active() {
            return Err(AppError::Unauthorized);
        }

        Ok(Self::new(employee.clone(), session.id))
    }

    pub fn user_id(&self) -> Uuid {
        self.employee.id
    }

    pub fn role(&self) -> Role {
        self.employee.role
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    pub fn is_hr(&self) -> bool {
        self.role() == Role::Hr
    }

    pub fn is_hr_or_admin(&self) -> bool {
        self.is_hr() || self.is_admin()
    }

    pub fn requires_hr_or_admin(&self) -> Result<(), AppError> {
        if self.is_hr_or_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "HR or admin access required".to_string(),
            ))
        }
    }

    pub fn visible_ids(&self, employees: &[Employee]) -> HashSet<Uuid> {
        hierarchy::visible_employee_ids(employees, &self.employee)
    }

    pub fn requires_visibility(
        &self,
        employees: &[Employee],
        employee_id: Uuid,
    ) -> Result<(), AppError> {
        if self.user_id() == employee_id
            || self.is_hr_or_admin()
            || self.visible_ids(employees).contains(&employee_id)
        {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!(
                "Employee {} is outside your scope",
                employee_id
            )))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

impl FromRequest for UserContext {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let auth = req.app_data::<Data<AuthService>>().cloned();
        let store = req.app_data::<Data<Store>>().cloned();
        let correlation_id = req.correlation_id();

        Box::pin(async move {
            let resolved = async {
                let token = token.ok_or(AppError::Unauthorized)?;
                let (auth, store) = auth.zip(store).ok_or_else(|| {
                    AppError::internal_server_error_message("auth service or store not configured")
                })?;

                let claims = auth.verify_token(&token)?;
                let tables = store.read().await;
                let ctx = UserContext::resolve(&tables, &claims)?;

                Ok::<_, AppError>(ctx)
            }
            .await;

            resolved.map_err(|e| {
                log::debug!(
                    "Authentication failed (correlation_id: {}): {}",
                    correlation_id.as_deref().unwrap_or("-"),
                    e
                );
                ActixError::from(e)
            })
        })
    }
}
