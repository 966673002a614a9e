use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::database::Tables;
use crate::database::models::{
    CreateEmployeeInput, Employee, EmployeeQuery, EmployeeStatus, EmployeeSummary, LeaveBalance,
    Role, UpdateEmployeeInput, WorkflowKind,
};
use crate::database::repositories::employee as employee_repo;
use crate::error::AppError;
use crate::services::hierarchy::{self, ManagerLink};
use crate::services::lifecycle;
use crate::services::user_context::UserContext;

fn ensure_manager(employees: &[Employee], manager_id: Option<Uuid>) -> Result<(), AppError> {
    match manager_id {
        Some(id) if employee_repo::active_manager(employees, Some(id)).is_none() => Err(
            AppError::MissingReference(format!("Manager {} does not exist", id)),
        ),
        _ => Ok(()),
    }
}

fn validate_new(input: &CreateEmployeeInput) -> Result<(), AppError> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(AppError::BadRequest("First and last name are required".to_string()));
    }
    let email = input.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if input.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if input.ctc < BigDecimal::from(0) {
        return Err(AppError::BadRequest("CTC cannot be negative".to_string()));
    }
    Ok(())
}

/// Adds an employee and starts their onboarding in the same transaction.
/// The caller hashes the password beforehand.
pub fn add_employee(
    tx: &mut Tables,
    ctx: &UserContext,
    input: CreateEmployeeInput,
    password_hash: String,
    default_balance: LeaveBalance,
) -> Result<Employee, AppError> {
    ctx.requires_hr_or_admin()?;
    validate_new(&input)?;
    if input.role == Role::Admin && !ctx.is_admin() {
        return Err(AppError::PermissionDenied(
            "Only administrators can add administrators".to_string(),
        ));
    }
    if employee_repo::email_exists(&tx.employees, &input.email) {
        return Err(AppError::Conflict(format!(
            "An employee with email {} already exists",
            input.email.trim()
        )));
    }
    ensure_manager(&tx.employees, input.reporting_manager_id)?;
    ensure_manager(&tx.employees, input.functional_manager_id)?;

    let now = Utc::now();
    let employee = Employee {
        id: Uuid::new_v4(),
        employee_code: employee_repo::next_employee_code(&tx.employees),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        email: input.email.trim().to_lowercase(),
        password_hash,
        role: input.role,
        department: input.department,
        designation: input.designation,
        reporting_manager_id: input.reporting_manager_id,
        functional_manager_id: input.functional_manager_id,
        leave_balance: input.leave_balance.unwrap_or(default_balance),
        employment_type: input.employment_type,
        confirmation_status: input.employment_type.initial_confirmation_status(),
        confirmation_date: None,
        ctc: input.ctc,
        date_of_joining: input.date_of_joining,
        status: EmployeeStatus::Active,
        function_access: input
            .function_access
            .unwrap_or_else(|| input.role.default_function_access()),
        created_at: now,
        updated_at: now,
    };
    tx.employees.push(employee.clone());

    lifecycle::generate(
        tx,
        employee.id,
        WorkflowKind::Onboarding,
        employee.date_of_joining,
        Some(ctx.user_id()),
    )?;

    log::info!(
        "Employee {} ({}) added by {}",
        employee.employee_code,
        employee.id,
        ctx.user_id()
    );
    Ok(employee)
}

pub fn get(tables: &Tables, ctx: &UserContext, id: Uuid) -> Result<Employee, AppError> {
    let employee = employee_repo::find_by_id(&tables.employees, id)?;
    ctx.requires_visibility(&tables.employees, id)?;
    Ok(employee.clone())
}

pub fn list(tables: &Tables, ctx: &UserContext, query: &EmployeeQuery) -> Vec<Employee> {
    let scope = ctx.visible_ids(&tables.employees);
    employee_repo::filter(&tables.employees, query)
        .filter(|e| scope.contains(&e.id))
        .cloned()
        .collect()
}

pub fn subordinates(
    tables: &Tables,
    ctx: &UserContext,
    id: Uuid,
) -> Result<Vec<EmployeeSummary>, AppError> {
    employee_repo::find_by_id(&tables.employees, id)?;
    ctx.requires_visibility(&tables.employees, id)?;

    let ids = hierarchy::subordinate_ids(&tables.employees, id);
    Ok(tables
        .employees
        .iter()
        .filter(|e| ids.contains(&e.id))
        .map(Employee::summary)
        .collect())
}

fn check_link(
    employees: &[Employee],
    employee_id: Uuid,
    manager_id: Option<Uuid>,
    link: ManagerLink,
) -> Result<(), AppError> {
    let Some(manager_id) = manager_id else {
        return Ok(());
    };
    ensure_manager(employees, Some(manager_id))?;
    if hierarchy::would_create_cycle(employees, employee_id, manager_id, link) {
        return Err(AppError::BadRequest(
            "Manager assignment would create a reporting cycle".to_string(),
        ));
    }
    Ok(())
}

pub fn update_employee(
    tx: &mut Tables,
    ctx: &UserContext,
    id: Uuid,
    input: UpdateEmployeeInput,
) -> Result<Employee, AppError> {
    ctx.requires_hr_or_admin()?;
    employee_repo::find_by_id(&tx.employees, id)?;

    if let Some(manager_id) = input.reporting_manager_id {
        check_link(&tx.employees, id, manager_id, ManagerLink::Reporting)?;
    }
    if let Some(manager_id) = input.functional_manager_id {
        check_link(&tx.employees, id, manager_id, ManagerLink::Functional)?;
    }
    if input.role == Some(Role::Admin) && !ctx.is_admin() {
        return Err(AppError::PermissionDenied(
            "Only administrators can grant the admin role".to_string(),
        ));
    }

    let employee = employee_repo::find_by_id_mut(&mut tx.employees, id)?;
    if let Some(manager_id) = input.reporting_manager_id {
        employee.reporting_manager_id = manager_id;
    }
    if let Some(manager_id) = input.functional_manager_id {
        employee.functional_manager_id = manager_id;
    }
    if let Some(role) = input.role {
        employee.role = role;
    }
    if let Some(department) = input.department {
        employee.department = department;
    }
    if let Some(designation) = input.designation {
        employee.designation = designation;
    }
    if let Some(function_access) = input.function_access {
        employee.function_access = function_access;
    }
    employee.updated_at = Utc::now();

    Ok(employee.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{ConfirmationStatus, EmploymentType};
    use crate::services::test_support::{context, date, employee, manager, staff, tables};
    use pretty_assertions::assert_eq;

    fn new_hire(email: &str, manager: Option<Uuid>) -> CreateEmployeeInput {
        CreateEmployeeInput {
            first_name: "Nina".to_string(),
            last_name: "Newman".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            role: Role::Employee,
            department: "Engineering".to_string(),
            designation: "Engineer".to_string(),
            reporting_manager_id: manager,
            functional_manager_id: None,
            employment_type: EmploymentType::Intern,
            ctc: BigDecimal::from(300_000),
            date_of_joining: date(2024, 2, 1),
            function_access: None,
            leave_balance: None,
        }
    }

    fn balance() -> LeaveBalance {
        LeaveBalance {
            casual: 12,
            sick: 10,
            earned: 15,
        }
    }

    #[test]
    fn role_defaults_to_employee_when_omitted() {
        let input: CreateEmployeeInput = serde_json::from_value(serde_json::json!({
            "firstName": "Nina",
            "lastName": "Newman",
            "email": "nina@example.com",
            "password": "secret123",
            "department": "Engineering",
            "designation": "Engineer",
            "reportingManagerId": null,
            "functionalManagerId": null,
            "employmentType": "intern",
            "ctc": "300000",
            "dateOfJoining": "2024-02-01",
            "functionAccess": null,
            "leaveBalance": null
        }))
        .unwrap();

        assert_eq!(input.role, Role::Employee);
        assert_eq!(Role::default(), Role::Employee);
    }

    #[test]
    fn adding_employee_starts_onboarding() {
        let hr = staff("Hana", Role::Hr);
        let manager = employee("Mona", None);
        let mut tx = tables(&[&hr, &manager]);

        let hire = add_employee(
            &mut tx,
            &context(&hr),
            new_hire("Nina@Example.com", Some(manager.id)),
            "hash".to_string(),
            balance(),
        )
        .unwrap();

        assert_eq!(hire.email, "nina@example.com");
        assert_eq!(hire.employee_code, "EMP0003");
        assert_eq!(hire.confirmation_status, ConfirmationStatus::Training);
        assert_eq!(hire.leave_balance, balance());
        assert_eq!(tx.workflows.len(), 1);
        assert_eq!(tx.workflows[0].employee_id, hire.id);
        assert_eq!(tx.workflows[0].tasks[0].due_date, date(2024, 2, 1));
    }

    #[test]
    fn duplicate_email_and_unknown_manager_are_refused() {
        let hr = staff("Hana", Role::Hr);
        let mut tx = tables(&[&hr]);

        assert!(matches!(
            add_employee(
                &mut tx,
                &context(&hr),
                new_hire("HANA@test.local", None),
                "hash".to_string(),
                balance()
            ),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            add_employee(
                &mut tx,
                &context(&hr),
                new_hire("nina@test.local", Some(Uuid::new_v4())),
                "hash".to_string(),
                balance()
            ),
            Err(AppError::MissingReference(_))
        ));
        assert_eq!(tx.employees.len(), 1);
    }

    #[test]
    fn plain_employees_cannot_add() {
        let worker = employee("Will", None);
        let mut tx = tables(&[&worker]);

        assert!(matches!(
            add_employee(
                &mut tx,
                &context(&worker),
                new_hire("x@test.local", None),
                "hash".to_string(),
                balance()
            ),
            Err(AppError::PermissionDenied(_))
        ));
    }

    #[test]
    fn update_refuses_cycles_and_clears_with_null() {
        let hr = staff("Hana", Role::Hr);
        let a = employee("Alice", None);
        let b = employee("Bob", Some(a.id));
        let mut tx = tables(&[&hr, &a, &b]);

        let cycle = UpdateEmployeeInput {
            reporting_manager_id: Some(Some(b.id)),
            ..UpdateEmployeeInput::default()
        };
        assert!(matches!(
            update_employee(&mut tx, &context(&hr), a.id, cycle),
            Err(AppError::BadRequest(_))
        ));

        let clear = UpdateEmployeeInput {
            reporting_manager_id: Some(None),
            designation: Some("Lead".to_string()),
            ..UpdateEmployeeInput::default()
        };
        let updated = update_employee(&mut tx, &context(&hr), b.id, clear).unwrap();
        assert_eq!(updated.reporting_manager_id, None);
        assert_eq!(updated.designation, "Lead");
    }

    #[test]
    fn list_and_subordinates_follow_scope() {
        let manager = manager("Mona", None);
        let report = employee("Rita", Some(manager.id));
        let deep = employee("Dora", Some(report.id));
        let outsider = employee("Otto", None);
        let tx = tables(&[&manager, &report, &deep, &outsider]);

        let visible = list(&tx, &context(&manager), &EmployeeQuery::default());
        assert_eq!(visible.len(), 3);

        let subs = subordinates(&tx, &context(&manager), manager.id).unwrap();
        assert_eq!(subs.len(), 2);

        assert!(matches!(
            get(&tx, &context(&outsider), report.id),
            Err(AppError::PermissionDenied(_))
        ));
    }
}
