use std::collections::VecDeque;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::Utc;
use tokio::sync::{RwLock, RwLockReadGuard};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{
    AttendanceCorrectionRequest, AttendanceRecord, CompanySettings, ConfirmationRequest,
    ConfirmationStatus, Employee, EmployeeStatus, EmploymentType, ExpenseRequest, LeaveRequest,
    Notification, PunchRecord, Role, SalaryChangeRequest, Session, TravelRequest, Workflow,
};

pub mod models;
pub mod repositories;
pub mod transaction;

/// Every table of the HR store. Lists are flat and unindexed; notifications
/// are kept newest first.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub employees: Vec<Employee>,
    pub leave_requests: Vec<LeaveRequest>,
    pub confirmation_requests: Vec<ConfirmationRequest>,
    pub salary_change_requests: Vec<SalaryChangeRequest>,
    pub attendance_corrections: Vec<AttendanceCorrectionRequest>,
    pub travel_requests: Vec<TravelRequest>,
    pub expense_requests: Vec<ExpenseRequest>,
    pub attendance: Vec<AttendanceRecord>,
    pub punches: Vec<PunchRecord>,
    pub workflows: Vec<Workflow>,
    pub notifications: VecDeque<Notification>,
    pub sessions: Vec<Session>,
    pub settings: CompanySettings,
}

/// Process-wide in-memory store shared by all workers.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Tables>>,
}

impl Store {
    pub fn new(tables: Tables) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tables)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().await
    }
}

/// Builds the initial store: company settings plus the bootstrap admin,
/// whose password hash is computed by the caller.
pub fn init_store(config: &Config, admin_password_hash: String) -> Store {
    let now = Utc::now();

    let admin = Employee {
        id: Uuid::new_v4(),
        employee_code: repositories::employee::next_employee_code(&[]),
        first_name: "System".to_string(),
        last_name: "Administrator".to_string(),
        email: config.bootstrap_admin_email.to_lowercase(),
        password_hash: admin_password_hash,
        role: Role::Admin,
        department: "HR".to_string(),
        designation: "Administrator".to_string(),
        reporting_manager_id: None,
        functional_manager_id: None,
        leave_balance: config.default_leave_balance,
        employment_type: EmploymentType::Permanent,
        confirmation_status: ConfirmationStatus::NotApplicable,
        confirmation_date: None,
        ctc: BigDecimal::from(0),
        date_of_joining: now.date_naive(),
        status: EmployeeStatus::Active,
        function_access: Role::Admin.default_function_access(),
        created_at: now,
        updated_at: now,
    };

    log::info!(
        "Seeding store with bootstrap admin {} for {}",
        admin.email,
        config.company_name
    );

    Store::new(Tables {
        employees: vec![admin],
        settings: CompanySettings {
            company_name: config.company_name.clone(),
            logo: None,
        },
        ..Tables::default()
    })
}
