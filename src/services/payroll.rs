//! Monthly payslips derived from CTC and the month's attendance.

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};

use crate::database::Tables;
use crate::database::models::{AttendanceRecord, AttendanceStatus, Employee, Payslip};
use crate::error::AppError;
use crate::services::user_context::UserContext;

const BASIC_PERCENT: u32 = 40;
const HRA_PERCENT_OF_BASIC: u32 = 50;
const PF_PERCENT_OF_BASIC: u32 = 12;
const PROFESSIONAL_TAX: u32 = 200;
const PROFESSIONAL_TAX_THRESHOLD: u32 = 15_000;

fn percent(value: &BigDecimal, pct: u32) -> BigDecimal {
    value.clone() * BigDecimal::from(pct) / BigDecimal::from(100)
}

fn money(value: BigDecimal) -> BigDecimal {
    value.round(2)
}

/// First and last day of the month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let invalid = || AppError::BadRequest(format!("Invalid payroll period {}-{}", year, month));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next.pred_opt().ok_or_else(invalid)?;
    Ok((first, last))
}

/// `attendance` may hold any records; only the employee's records inside the
/// month count towards loss of pay.
pub fn compute_payslip(
    employee: &Employee,
    attendance: &[AttendanceRecord],
    year: i32,
    month: u32,
) -> Result<Payslip, AppError> {
    let (first, last) = month_bounds(year, month)?;
    let working_days = last.day();

    let in_month = attendance
        .iter()
        .filter(|r| r.employee_id == employee.id && r.date >= first && r.date <= last);
    let (absent, half_days) = in_month.fold((0u32, 0u32), |(a, h), r| match r.status {
        AttendanceStatus::Absent => (a + 1, h),
        AttendanceStatus::HalfDay => (a, h + 1),
        _ => (a, h),
    });
    let loss_of_pay_days = BigDecimal::from(absent) + BigDecimal::from(half_days) / BigDecimal::from(2);

    let gross = employee.ctc.clone() / BigDecimal::from(12);
    let basic = percent(&gross, BASIC_PERCENT);
    let hra = percent(&basic, HRA_PERCENT_OF_BASIC);
    let special_allowance = gross.clone() - basic.clone() - hra.clone();
    let loss_of_pay = gross.clone() / BigDecimal::from(working_days) * loss_of_pay_days.clone();
    let provident_fund = percent(&basic, PF_PERCENT_OF_BASIC);
    let professional_tax = if gross > BigDecimal::from(PROFESSIONAL_TAX_THRESHOLD) {
        BigDecimal::from(PROFESSIONAL_TAX)
    } else {
        BigDecimal::from(0)
    };

    let gross = money(gross);
    let loss_of_pay = money(loss_of_pay);
    let provident_fund = money(provident_fund);
    let net = gross.clone() - loss_of_pay.clone() - provident_fund.clone() - professional_tax.clone();
    let net_pay = if net < BigDecimal::from(0) {
        BigDecimal::from(0)
    } else {
        net
    };

    Ok(Payslip {
        employee_id: employee.id,
        employee_name: employee.full_name(),
        year,
        month,
        working_days,
        loss_of_pay_days,
        gross,
        basic: money(basic),
        hra: money(hra),
        special_allowance: money(special_allowance),
        loss_of_pay,
        provident_fund,
        professional_tax,
        net_pay,
    })
}

/// Payslips for every active employee.
pub fn run(
    tables: &Tables,
    ctx: &UserContext,
    year: i32,
    month: u32,
) -> Result<Vec<Payslip>, AppError> {
    ctx.requires_hr_or_admin()?;

    let payslips = tables
        .employees
        .iter()
        .filter(|e| e.is_active())
        .map(|e| compute_payslip(e, &tables.attendance, year, month))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "Payroll for {}-{:02} computed for {} employees by {}",
        year,
        month,
        payslips.len(),
        ctx.user_id()
    );
    Ok(payslips)
}
