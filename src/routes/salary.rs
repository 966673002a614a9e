use actix_web::web;

use crate::handlers::salary;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/salary-changes")
            .route("", web::post().to(salary::create_salary_change))
            .route("", web::get().to(salary::get_salary_changes))
            .route("/{id}/approve", web::post().to(salary::approve_salary_change))
            .route("/{id}/reject", web::post().to(salary::reject_salary_change)),
    );
}
