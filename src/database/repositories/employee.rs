use uuid::Uuid;

use crate::database::models::{Employee, EmployeeQuery, Role};
use crate::error::AppError;

pub fn find_by_id(employees: &[Employee], id: Uuid) -> Result<&Employee, AppError> {
    employees
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
}

pub fn find_by_id_mut(employees: &mut [Employee], id: Uuid) -> Result<&mut Employee, AppError> {
    employees
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
}

/// `id` when it names an employee who has not exited; requests are never
/// routed to someone who can no longer sign in.
pub fn active_manager(employees: &[Employee], id: Option<Uuid>) -> Option<Uuid> {
    id.filter(|id| employees.iter().any(|e| e.id == *id && e.is_active()))
}

/// Case-insensitive email lookup.
pub fn find_by_email<'a>(employees: &'a [Employee], email: &str) -> Option<&'a Employee> {
    let email = email.trim().to_lowercase();
    employees.iter().find(|e| e.email == email)
}

pub fn email_exists(employees: &[Employee], email: &str) -> bool {
    find_by_email(employees, email).is_some()
}

pub fn next_employee_code(employees: &[Employee]) -> String {
    format!("EMP{:04}", employees.len() + 1)
}

pub fn first_active_with_role(employees: &[Employee], role: Role) -> Option<&Employee> {
    employees
        .iter()
        .find(|e| e.is_active() && e.role == role)
}

pub fn first_active_in_department<'a>(
    employees: &'a [Employee],
    department: &str,
) -> Option<&'a Employee> {
    employees
        .iter()
        .find(|e| e.is_active() && e.department.eq_ignore_ascii_case(department))
}

pub fn filter<'a>(
    employees: &'a [Employee],
    query: &'a EmployeeQuery,
) -> impl Iterator<Item = &'a Employee> {
    employees.iter().filter(move |e| {
        query
            .department
            .as_deref()
            .is_none_or(|d| e.department.eq_ignore_ascii_case(d))
            && query.status.is_none_or(|s| e.status == s)
    })
}
