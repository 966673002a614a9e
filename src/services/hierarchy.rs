//! Organizational hierarchy derived from the employee directory.
//!
//! Employees carry two independent parent links (reporting and functional
//! manager), so the directory holds two forests. Every walk keeps a visited
//! set and terminates even if a cycle slipped into the data.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{Employee, EmployeeSummary, Role};
use crate::database::repositories::employee as employee_repo;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerLink {
    Reporting,
    Functional,
}

impl ManagerLink {
    pub fn parent_of(&self, employee: &Employee) -> Option<Uuid> {
        match self {
            ManagerLink::Reporting => employee.reporting_manager_id,
            ManagerLink::Functional => employee.functional_manager_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrgNode {
    #[serde(flatten)]
    pub employee: EmployeeSummary,
    pub children: Vec<OrgNode>,
}

pub fn direct_reports(employees: &[Employee], manager_id: Uuid, link: ManagerLink) -> Vec<Uuid> {
    employees
        .iter()
        .filter(|e| link.parent_of(e) == Some(manager_id))
        .map(|e| e.id)
        .collect()
}

/// Transitive subordinates of `manager_id` along `link`, depth first. The
/// manager itself is never part of the result.
pub fn transitive_reports(employees: &[Employee], manager_id: Uuid, link: ManagerLink) -> Vec<Uuid> {
    let mut result = Vec::new();
    let mut visited = HashSet::from([manager_id]);
    let mut stack = vec![manager_id];

    while let Some(current) = stack.pop() {
        // Reverse so the first direct report is explored first.
        for child in direct_reports(employees, current, link).into_iter().rev() {
            if visited.insert(child) {
                result.push(child);
                stack.push(child);
            }
        }
    }

    result
}

pub fn subordinate_ids(employees: &[Employee], manager_id: Uuid) -> Vec<Uuid> {
    transitive_reports(employees, manager_id, ManagerLink::Reporting)
}

pub fn functional_subordinate_ids(employees: &[Employee], manager_id: Uuid) -> Vec<Uuid> {
    transitive_reports(employees, manager_id, ManagerLink::Functional)
}

/// True when making `new_manager_id` the `link` parent of `employee_id`
/// would make the employee its own ancestor.
pub fn would_create_cycle(
    employees: &[Employee],
    employee_id: Uuid,
    new_manager_id: Uuid,
    link: ManagerLink,
) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(new_manager_id);

    while let Some(id) = current {
        if id == employee_id {
            return true;
        }
        if !visited.insert(id) {
            // Pre-existing loop above us that does not include the employee.
            return false;
        }
        current = employees
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| link.parent_of(e));
    }

    false
}

/// Ids an actor may see: everyone for HR/admin, the actor plus everyone
/// below them in either forest for managers, only themselves otherwise.
/// Requests routed to an employee-role reviewer reach them through the
/// reviewer check in the approval listing, not through this scope.
pub fn visible_employee_ids(employees: &[Employee], actor: &Employee) -> HashSet<Uuid> {
    match actor.role {
        Role::Admin | Role::Hr => employees.iter().map(|e| e.id).collect(),
        Role::Manager => {
            let mut ids: HashSet<Uuid> =
                subordinate_ids(employees, actor.id).into_iter().collect();
            ids.extend(functional_subordinate_ids(employees, actor.id));
            ids.insert(actor.id);
            ids
        }
        Role::Employee => HashSet::from([actor.id]),
    }
}

/// Reporting-line tree. With `root` the tree starts at that employee,
/// otherwise at every employee without a (known) reporting manager.
pub fn org_tree(employees: &[Employee], root: Option<Uuid>) -> Result<Vec<OrgNode>, AppError> {
    let known: HashSet<Uuid> = employees.iter().map(|e| e.id).collect();
    let mut children: HashMap<Uuid, Vec<&Employee>> = HashMap::new();
    for employee in employees.iter().filter(|e| e.is_active()) {
        if let Some(manager_id) = employee.reporting_manager_id {
            children.entry(manager_id).or_default().push(employee);
        }
    }
    for list in children.values_mut() {
        list.sort_by_key(|e| e.full_name());
    }

    let mut roots: Vec<&Employee> = match root {
        Some(id) => vec![employee_repo::find_by_id(employees, id)?],
        None => employees
            .iter()
            .filter(|e| {
                e.is_active()
                    && e.reporting_manager_id
                        .is_none_or(|manager_id| !known.contains(&manager_id))
            })
            .collect(),
    };
    roots.sort_by_key(|e| e.full_name());

    let mut visited = HashSet::new();
    Ok(roots
        .into_iter()
        .filter_map(|e| build_node(e, &children, &mut visited))
        .collect())
}

fn build_node(
    employee: &Employee,
    children: &HashMap<Uuid, Vec<&Employee>>,
    visited: &mut HashSet<Uuid>,
) -> Option<OrgNode> {
    if !visited.insert(employee.id) {
        return None;
    }

    let nodes = children
        .get(&employee.id)
        .map(|list| {
            list.iter()
                .filter_map(|child| build_node(child, children, visited))
                .collect()
        })
        .unwrap_or_default();

    Some(OrgNode {
        employee: employee.summary(),
        children: nodes,
    })
}
