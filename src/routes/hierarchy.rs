use actix_web::web;

use crate::handlers::hierarchy;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/hierarchy").route("/tree", web::get().to(hierarchy::get_org_tree)));
}
