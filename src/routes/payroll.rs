use actix_web::web;

use crate::handlers::payroll;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payroll").route("/{year}/{month}", web::get().to(payroll::run_payroll)),
    );
}
