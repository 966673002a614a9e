use actix_web::web;

use crate::handlers::leave;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leave")
            .route("", web::post().to(leave::create_leave_request))
            .route("", web::get().to(leave::get_leave_requests))
            .route("/{id}/approve", web::post().to(leave::approve_leave_request))
            .route("/{id}/reject", web::post().to(leave::reject_leave_request))
            .route("/{id}/cancel", web::post().to(leave::cancel_leave_request)),
    );
}
