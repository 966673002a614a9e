use uuid::Uuid;

use crate::database::models::{
    AttendanceCorrectionRequest, ConfirmationRequest, ExpenseRequest, LeaveRequest, Notification,
    SalaryChangeRequest, TravelRequest, Workflow,
};
use crate::error::AppError;

pub mod attendance;
pub mod employee;
pub mod session;

/// A row addressable by id and owned by one employee.
pub trait Record {
    const LABEL: &'static str;

    fn id(&self) -> Uuid;

    fn owner_id(&self) -> Uuid;
}

macro_rules! record {
    ($ty:ty, $label:literal, $owner:ident) => {
        impl Record for $ty {
            const LABEL: &'static str = $label;

            fn id(&self) -> Uuid {
                self.id
            }

            fn owner_id(&self) -> Uuid {
                self.$owner
            }
        }
    };
}

record!(LeaveRequest, "Leave request", employee_id);
record!(ConfirmationRequest, "Confirmation request", employee_id);
record!(SalaryChangeRequest, "Salary change request", employee_id);
record!(AttendanceCorrectionRequest, "Attendance correction", employee_id);
record!(TravelRequest, "Travel request", employee_id);
record!(ExpenseRequest, "Expense request", employee_id);
record!(Workflow, "Workflow", employee_id);
record!(Notification, "Notification", recipient_id);

fn not_found<R: Record>(id: Uuid) -> AppError {
    AppError::NotFound(format!("{} {} not found", R::LABEL, id))
}

pub fn find<'a, R, I>(rows: I, id: Uuid) -> Result<&'a R, AppError>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    rows.into_iter()
        .find(|row| row.id() == id)
        .ok_or_else(|| not_found::<R>(id))
}

pub fn find_mut<'a, R, I>(rows: I, id: Uuid) -> Result<&'a mut R, AppError>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a mut R>,
{
    rows.into_iter()
        .find(|row| row.id() == id)
        .ok_or_else(|| not_found::<R>(id))
}

/// Rows owned by `owner`, in storage order.
pub fn owned_by<'a, R, I>(rows: I, owner: Uuid) -> impl Iterator<Item = &'a R>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    rows.into_iter().filter(move |row| row.owner_id() == owner)
}
