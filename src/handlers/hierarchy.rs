use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::Store;
use crate::handlers::shared::ApiResponse;
use crate::services::{UserContext, hierarchy};

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    pub root: Option<Uuid>,
}

/// Org chart. HR/admin get the whole forest by default; everyone else gets
/// the tree under themselves.
pub async fn get_org_tree(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<TreeQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;

    let root = if ctx.is_hr_or_admin() {
        query.root
    } else {
        let root = query.root.unwrap_or(ctx.user_id());
        ctx.requires_visibility(&tables.employees, root)?;
        Some(root)
    };
    let tree = hierarchy::org_tree(&tables.employees, root)?;

    Ok(ApiResponse::success(tree))
}
