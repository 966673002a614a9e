//! Builders shared by the service unit tests.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::database::Tables;
use crate::database::models::{
    ConfirmationStatus, Employee, EmployeeStatus, EmploymentType, LeaveBalance, Role,
};
use crate::services::user_context::UserContext;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn employee(name: &str, manager: Option<Uuid>) -> Employee {
    let now = Utc::now();
    Employee {
        id: Uuid::new_v4(),
        employee_code: format!("EMP-{}", name.to_uppercase()),
        first_name: name.to_string(),
        last_name: "Test".to_string(),
        email: format!("{}@test.local", name.to_lowercase()),
        password_hash: String::new(),
        role: Role::Employee,
        department: "Engineering".to_string(),
        designation: "Engineer".to_string(),
        reporting_manager_id: manager,
        functional_manager_id: None,
        leave_balance: LeaveBalance {
            casual: 12,
            sick: 10,
            earned: 15,
        },
        employment_type: EmploymentType::Permanent,
        confirmation_status: ConfirmationStatus::Confirmed,
        confirmation_date: None,
        ctc: BigDecimal::from(600_000),
        date_of_joining: date(2024, 1, 1),
        status: EmployeeStatus::Active,
        function_access: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

/// An employee holding the manager role, so their subtree is in scope.
pub fn manager(name: &str, reports_to: Option<Uuid>) -> Employee {
    let mut e = employee(name, reports_to);
    e.role = Role::Manager;
    e
}

pub fn staff(name: &str, role: Role) -> Employee {
    let mut e = employee(name, None);
    e.role = role;
    if role == Role::Hr {
        e.department = "HR".to_string();
    }
    e
}

pub fn context(employee: &Employee) -> UserContext {
    UserContext::new(employee.clone(), Uuid::new_v4())
}

pub fn tables(employees: &[&Employee]) -> Tables {
    Tables {
        employees: employees.iter().map(|e| (*e).clone()).collect(),
        ..Tables::default()
    }
}

/// Current state of an employee after a mutation.
pub fn reload(tables: &Tables, id: Uuid) -> Employee {
    tables
        .employees
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .unwrap()
}
