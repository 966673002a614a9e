use actix_web::web;

use crate::handlers::attendance;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("", web::get().to(attendance::get_attendance))
            .route("/punch-in", web::post().to(attendance::punch_in))
            .route("/punch-out", web::post().to(attendance::punch_out))
            .route("/mark", web::post().to(attendance::mark_attendance)),
    )
    .service(
        web::scope("/attendance-corrections")
            .route("", web::post().to(attendance::create_correction))
            .route("", web::get().to(attendance::get_corrections))
            .route(
                "/{id}/approve",
                web::post().to(attendance::approve_correction),
            )
            .route("/{id}/reject", web::post().to(attendance::reject_correction)),
    );
}
