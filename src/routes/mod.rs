use actix_web::web;

pub mod attendance;
pub mod auth;
pub mod claims;
pub mod confirmations;
pub mod employees;
pub mod hierarchy;
pub mod leave;
pub mod notifications;
pub mod payroll;
pub mod salary;
pub mod settings;
pub mod workflows;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(auth::configure)
            .configure(employees::configure)
            .configure(hierarchy::configure)
            .configure(leave::configure)
            .configure(confirmations::configure)
            .configure(salary::configure)
            .configure(attendance::configure)
            .configure(claims::configure)
            .configure(workflows::configure)
            .configure(notifications::configure)
            .configure(payroll::configure)
            .configure(settings::configure),
    );
}
