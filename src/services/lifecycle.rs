//! Onboarding and offboarding checklists generated from static templates.

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::Tables;
use crate::database::models::{
    AssigneeRole, Employee, EmployeeStatus, Role, Task, TaskStatus, TaskTemplate, Workflow,
    WorkflowKind, WorkflowQuery, WorkflowStatus,
};
use crate::database::repositories::{self, employee as employee_repo};
use crate::error::AppError;
use crate::services::notifications;
use crate::services::user_context::UserContext;

const fn task(name: &'static str, assignee_role: AssigneeRole, due_in_days: i64) -> TaskTemplate {
    TaskTemplate {
        name,
        assignee_role,
        due_in_days,
    }
}

pub const ONBOARDING: &[TaskTemplate] = &[
    task("Send welcome email", AssigneeRole::Hr, 0),
    task("Prepare workstation and accounts", AssigneeRole::It, 0),
    task("Collect joining documents", AssigneeRole::Hr, 1),
    task("Assign onboarding buddy", AssigneeRole::ReportingManager, 1),
    task("Complete HR orientation", AssigneeRole::Employee, 3),
    task("Set 30-day goals", AssigneeRole::ReportingManager, 7),
];

pub const OFFBOARDING: &[TaskTemplate] = &[
    task("Conduct exit interview", AssigneeRole::Hr, 0),
    task("Knowledge transfer", AssigneeRole::ReportingManager, 3),
    task("Revoke system access", AssigneeRole::It, 7),
    task("Recover company assets", AssigneeRole::It, 7),
    task("Full and final settlement", AssigneeRole::Hr, 14),
];

pub fn template_for(kind: WorkflowKind) -> &'static [TaskTemplate] {
    match kind {
        WorkflowKind::Onboarding => ONBOARDING,
        WorkflowKind::Offboarding => OFFBOARDING,
    }
}

fn hr_holder(employees: &[Employee]) -> Option<&Employee> {
    employee_repo::first_active_with_role(employees, Role::Hr)
        .or_else(|| employee_repo::first_active_with_role(employees, Role::Admin))
}

/// Maps a template role onto a concrete employee for `target`.
pub fn resolve_assignee(
    employees: &[Employee],
    target: &Employee,
    role: AssigneeRole,
) -> Result<Uuid, AppError> {
    let holder = match role {
        AssigneeRole::Employee => Some(target.id),
        AssigneeRole::ReportingManager => {
            employee_repo::active_manager(employees, target.reporting_manager_id)
                .or_else(|| hr_holder(employees).map(|e| e.id))
        }
        AssigneeRole::Hr => hr_holder(employees).map(|e| e.id),
        AssigneeRole::It => employee_repo::first_active_in_department(employees, "IT")
            .or_else(|| hr_holder(employees))
            .map(|e| e.id),
    };

    holder.ok_or_else(|| {
        AppError::MissingReference(format!("No active employee can take the {} tasks", role))
    })
}

/// Builds the checklist for `employee_id`, due dates counted from `anchor`,
/// and notifies each task's assignee.
pub fn generate(
    tx: &mut Tables,
    employee_id: Uuid,
    kind: WorkflowKind,
    anchor: NaiveDate,
    actor_id: Option<Uuid>,
) -> Result<Workflow, AppError> {
    if tx.workflows.iter().any(|w| {
        w.employee_id == employee_id && w.kind == kind && w.status == WorkflowStatus::InProgress
    }) {
        return Err(AppError::Conflict(format!(
            "An {} workflow is already in progress for employee {}",
            kind, employee_id
        )));
    }

    let target = employee_repo::find_by_id(&tx.employees, employee_id)?;
    let tasks = template_for(kind)
        .iter()
        .map(|template| {
            Ok(Task {
                id: Uuid::new_v4(),
                name: template.name.to_string(),
                assignee_id: resolve_assignee(&tx.employees, target, template.assignee_role)?,
                assignee_role: template.assignee_role,
                due_date: anchor + Duration::days(template.due_in_days),
                status: TaskStatus::Pending,
                completed_at: None,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;
    let name = target.full_name();

    let now = Utc::now();
    let workflow = Workflow {
        id: Uuid::new_v4(),
        employee_id,
        kind,
        status: WorkflowStatus::InProgress,
        tasks,
        created_at: now,
        updated_at: now,
    };

    for task in &workflow.tasks {
        notifications::notify(
            tx,
            task.assignee_id,
            actor_id,
            format!(
                "{} task for {}: {} (due {})",
                kind, name, task.name, task.due_date
            ),
        );
    }
    tx.workflows.push(workflow.clone());

    log::info!(
        "Generated {} workflow {} with {} tasks for {}",
        kind,
        workflow.id,
        workflow.tasks.len(),
        employee_id
    );
    Ok(workflow)
}

pub fn start_offboarding(
    tx: &mut Tables,
    ctx: &UserContext,
    employee_id: Uuid,
) -> Result<Workflow, AppError> {
    ctx.requires_hr_or_admin()?;
    if employee_id == ctx.user_id() {
        return Err(AppError::BadRequest(
            "You cannot offboard yourself".to_string(),
        ));
    }

    let employee = employee_repo::find_by_id(&tx.employees, employee_id)?;
    if employee.status == EmployeeStatus::Exited {
        return Err(AppError::BadRequest(format!(
            "{} has already exited",
            employee.full_name()
        )));
    }

    let workflow = generate(
        tx,
        employee_id,
        WorkflowKind::Offboarding,
        Utc::now().date_naive(),
        Some(ctx.user_id()),
    )?;

    let employee = employee_repo::find_by_id_mut(&mut tx.employees, employee_id)?;
    employee.status = EmployeeStatus::Offboarding;
    employee.updated_at = Utc::now();

    Ok(workflow)
}

pub fn complete_task(
    tx: &mut Tables,
    ctx: &UserContext,
    workflow_id: Uuid,
    task_id: Uuid,
) -> Result<Workflow, AppError> {
    let now = Utc::now();
    let workflow = repositories::find_mut(&mut tx.workflows, workflow_id)?;
    let task = workflow
        .tasks
        .iter_mut()
        .find(|t| t.id == task_id)
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))?;

    if task.assignee_id != ctx.user_id() && !ctx.is_hr_or_admin() {
        return Err(AppError::PermissionDenied(
            "Only the assignee can complete this task".to_string(),
        ));
    }
    if task.status == TaskStatus::Completed {
        return Err(AppError::Conflict(format!(
            "Task '{}' is already completed",
            task.name
        )));
    }

    task.status = TaskStatus::Completed;
    task.completed_at = Some(now);
    workflow.updated_at = now;
    if workflow.is_complete() {
        workflow.status = WorkflowStatus::Completed;
    }
    let workflow = workflow.clone();

    if workflow.status == WorkflowStatus::Completed {
        if workflow.kind == WorkflowKind::Offboarding {
            let employee = employee_repo::find_by_id_mut(&mut tx.employees, workflow.employee_id)?;
            employee.status = EmployeeStatus::Exited;
            employee.updated_at = now;
            log::info!("Employee {} has exited", workflow.employee_id);
        }

        let recipients: Vec<Uuid> = tx
            .employees
            .iter()
            .filter(|e| e.is_active() && matches!(e.role, Role::Hr | Role::Admin))
            .map(|e| e.id)
            .chain(std::iter::once(workflow.employee_id))
            .collect();
        notifications::notify_all(
            tx,
            &recipients,
            Some(ctx.user_id()),
            &format!("{} workflow completed", workflow.kind),
        );
    }

    Ok(workflow)
}

pub fn list(tables: &Tables, ctx: &UserContext, query: &WorkflowQuery) -> Vec<Workflow> {
    let scope = ctx.visible_ids(&tables.employees);
    let me = ctx.user_id();
    let assigned = |w: &Workflow| w.tasks.iter().any(|t| t.assignee_id == me);

    tables
        .workflows
        .iter()
        .filter(|w| scope.contains(&w.employee_id) || assigned(w))
        .filter(|w| query.employee_id.is_none_or(|id| w.employee_id == id))
        .filter(|w| query.kind.is_none_or(|k| w.kind == k))
        .filter(|w| !query.assigned_to_me.unwrap_or(false) || assigned(w))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{context, date, employee, reload, staff, tables};
    use pretty_assertions::assert_eq;

    #[test]
    fn onboarding_has_one_task_per_template_entry() {
        let hr = staff("Hana", Role::Hr);
        let manager = employee("Mona", None);
        let mut it = employee("Ivan", None);
        it.department = "IT".to_string();
        let hire = employee("Nina", Some(manager.id));
        let mut tx = tables(&[&hr, &manager, &it, &hire]);

        let workflow = generate(
            &mut tx,
            hire.id,
            WorkflowKind::Onboarding,
            date(2024, 1, 1),
            None,
        )
        .unwrap();

        assert_eq!(workflow.tasks.len(), ONBOARDING.len());
        assert_eq!(workflow.status, WorkflowStatus::InProgress);
        assert_eq!(tx.notifications.len(), ONBOARDING.len());

        let assignees: Vec<Uuid> = workflow.tasks.iter().map(|t| t.assignee_id).collect();
        assert_eq!(
            assignees,
            vec![hr.id, it.id, hr.id, manager.id, hire.id, manager.id]
        );
        assert_eq!(workflow.tasks[5].due_date, date(2024, 1, 8));
    }

    #[test]
    fn assignees_fall_back_to_hr_holder() {
        let admin = staff("Ada", Role::Admin);
        let hire = employee("Nina", None);
        let employees = vec![admin.clone(), hire.clone()];

        assert_eq!(
            resolve_assignee(&employees, &hire, AssigneeRole::It).unwrap(),
            admin.id
        );
        assert_eq!(
            resolve_assignee(&employees, &hire, AssigneeRole::ReportingManager).unwrap(),
            admin.id
        );
        assert!(matches!(
            resolve_assignee(&[hire.clone()], &hire, AssigneeRole::Hr),
            Err(AppError::MissingReference(_))
        ));
    }

    #[test]
    fn workflow_completes_only_when_every_task_is_done() {
        let hr = staff("Hana", Role::Hr);
        let manager = employee("Mona", None);
        let leaver = employee("Leo", Some(manager.id));
        let mut tx = tables(&[&hr, &manager, &leaver]);

        let workflow = start_offboarding(&mut tx, &context(&hr), leaver.id).unwrap();
        assert_eq!(reload(&tx, leaver.id).status, EmployeeStatus::Offboarding);
        assert!(matches!(
            start_offboarding(&mut tx, &context(&hr), leaver.id),
            Err(AppError::Conflict(_))
        ));

        let manager_task = workflow
            .tasks
            .iter()
            .find(|t| t.assignee_role == AssigneeRole::ReportingManager)
            .unwrap();
        assert!(matches!(
            complete_task(&mut tx, &context(&leaver), workflow.id, manager_task.id),
            Err(AppError::PermissionDenied(_))
        ));

        let (last, rest) = workflow.tasks.split_last().unwrap();
        for task in rest {
            let updated = complete_task(&mut tx, &context(&hr), workflow.id, task.id).unwrap();
            assert_eq!(updated.status, WorkflowStatus::InProgress);
        }
        assert_eq!(reload(&tx, leaver.id).status, EmployeeStatus::Offboarding);

        let done = complete_task(&mut tx, &context(&hr), workflow.id, last.id).unwrap();
        assert_eq!(done.status, WorkflowStatus::Completed);
        assert!(done.is_complete());
        assert_eq!(reload(&tx, leaver.id).status, EmployeeStatus::Exited);

        assert!(matches!(
            complete_task(&mut tx, &context(&hr), workflow.id, last.id),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn listing_includes_assigned_workflows() {
        let hr = staff("Hana", Role::Hr);
        let manager = employee("Mona", None);
        let hire = employee("Nina", Some(manager.id));
        let outsider = employee("Otto", None);
        let mut tx = tables(&[&hr, &manager, &hire, &outsider]);
        generate(
            &mut tx,
            hire.id,
            WorkflowKind::Onboarding,
            date(2024, 1, 1),
            None,
        )
        .unwrap();

        let mine = WorkflowQuery {
            assigned_to_me: Some(true),
            ..WorkflowQuery::default()
        };
        assert_eq!(list(&tx, &context(&hr), &mine).len(), 1);
        assert_eq!(list(&tx, &context(&hire), &WorkflowQuery::default()).len(), 1);
        assert!(list(&tx, &context(&outsider), &WorkflowQuery::default()).is_empty());
    }
}
