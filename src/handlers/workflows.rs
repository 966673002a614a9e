use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::Store;
use crate::database::models::WorkflowQuery;
use crate::database::repositories::{self, Record};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{UserContext, lifecycle};

pub async fn get_workflows(
    ctx: UserContext,
    store: web::Data<Store>,
    query: web::Query<WorkflowQuery>,
) -> Result<HttpResponse> {
    let tables = store.read().await;

    Ok(ApiResponse::success(lifecycle::list(&tables, &ctx, &query)))
}

pub async fn get_workflow(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tables = store.read().await;
    let workflow = repositories::find(&tables.workflows, path.into_inner())?;

    let assigned = workflow.tasks.iter().any(|t| t.assignee_id == ctx.user_id());
    if !assigned {
        ctx.requires_visibility(&tables.employees, workflow.owner_id())
            .map_err(|_| AppError::PermissionDenied("Workflow is outside your scope".to_string()))?;
    }

    Ok(ApiResponse::success(workflow.clone()))
}

/// Mark one checklist task done
pub async fn complete_task(
    ctx: UserContext,
    store: web::Data<Store>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (workflow_id, task_id) = path.into_inner();
    let workflow = store
        .transaction(|tx| lifecycle::complete_task(tx, &ctx, workflow_id, task_id))
        .await?;

    Ok(ApiResponse::success(workflow))
}
