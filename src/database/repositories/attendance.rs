use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{AttendanceRecord, AttendanceStatus, PunchRecord};

/// Insert or overwrite the one record for `(employee_id, date)`.
pub fn upsert_status(
    records: &mut Vec<AttendanceRecord>,
    employee_id: Uuid,
    date: NaiveDate,
    status: AttendanceStatus,
    now: DateTime<Utc>,
) -> AttendanceRecord {
    match records
        .iter_mut()
        .find(|r| r.employee_id == employee_id && r.date == date)
    {
        Some(record) => {
            record.status = status;
            record.updated_at = now;
            record.clone()
        }
        None => {
            let record = AttendanceRecord {
                employee_id,
                date,
                status,
                updated_at: now,
            };
            records.push(record.clone());
            record
        }
    }
}

pub fn find_punch(punches: &[PunchRecord], employee_id: Uuid, date: NaiveDate) -> Option<&PunchRecord> {
    punches
        .iter()
        .find(|p| p.employee_id == employee_id && p.date == date)
}

pub fn upsert_punch(
    punches: &mut Vec<PunchRecord>,
    employee_id: Uuid,
    date: NaiveDate,
    punch_in: Option<DateTime<Utc>>,
    punch_out: Option<DateTime<Utc>>,
) -> PunchRecord {
    match punches
        .iter_mut()
        .find(|p| p.employee_id == employee_id && p.date == date)
    {
        Some(punch) => {
            punch.punch_in = punch_in;
            punch.punch_out = punch_out;
            punch.clone()
        }
        None => {
            let punch = PunchRecord {
                employee_id,
                date,
                punch_in,
                punch_out,
            };
            punches.push(punch.clone());
            punch
        }
    }
}

/// Records for one employee between two dates, inclusive, sorted by date.
pub fn records_between(
    records: &[AttendanceRecord],
    employee_id: Uuid,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<AttendanceRecord> {
    let mut rows: Vec<AttendanceRecord> = records
        .iter()
        .filter(|r| {
            r.employee_id == employee_id
                && from.is_none_or(|f| r.date >= f)
                && to.is_none_or(|t| r.date <= t)
        })
        .cloned()
        .collect();
    rows.sort_by_key(|r| r.date);
    rows
}
