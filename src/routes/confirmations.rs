use actix_web::web;

use crate::handlers::confirmations;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/confirmations")
            .route(
                "",
                web::post().to(confirmations::create_confirmation_request),
            )
            .route("", web::get().to(confirmations::get_confirmation_requests))
            .route(
                "/{id}/approve",
                web::post().to(confirmations::approve_confirmation_request),
            )
            .route(
                "/{id}/reject",
                web::post().to(confirmations::reject_confirmation_request),
            ),
    );
}
