use actix_web::web;

use crate::handlers::claims;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/travel")
            .route("", web::post().to(claims::create_travel_request))
            .route("", web::get().to(claims::get_travel_requests))
            .route("/{id}/approve", web::post().to(claims::approve_travel_request))
            .route("/{id}/reject", web::post().to(claims::reject_travel_request))
            .route("/{id}/cancel", web::post().to(claims::cancel_travel_request)),
    )
    .service(
        web::scope("/expenses")
            .route("", web::post().to(claims::create_expense))
            .route("", web::get().to(claims::get_expenses))
            .route("/{id}/approve", web::post().to(claims::approve_expense))
            .route("/{id}/reject", web::post().to(claims::reject_expense))
            .route("/{id}/cancel", web::post().to(claims::cancel_expense)),
    );
}
