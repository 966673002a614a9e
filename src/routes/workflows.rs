use actix_web::web;

use crate::handlers::workflows;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/workflows")
            .route("", web::get().to(workflows::get_workflows))
            .route("/{id}", web::get().to(workflows::get_workflow))
            .route(
                "/{id}/tasks/{task_id}/complete",
                web::post().to(workflows::complete_task),
            ),
    );
}
