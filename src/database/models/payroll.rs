use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monthly earnings and deductions for one employee, amounts rounded to 2 dp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub year: i32,
    pub month: u32,
    pub working_days: u32,
    pub loss_of_pay_days: BigDecimal,
    pub gross: BigDecimal,
    pub basic: BigDecimal,
    pub hra: BigDecimal,
    pub special_allowance: BigDecimal,
    pub loss_of_pay: BigDecimal,
    pub provident_fund: BigDecimal,
    pub professional_tax: BigDecimal,
    pub net_pay: BigDecimal,
}
