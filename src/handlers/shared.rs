use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::database::models::ReviewInput;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    // 200 with data
    pub fn success(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    // 201 with data
    pub fn created(data: T) -> HttpResponse {
        HttpResponse::Created().json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    // 200 with data and message
    pub fn success_with_message(data: Option<T>, message: &str) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            data,
            message: Some(message.to_string()),
        })
    }
}

impl ApiResponse<()> {
    // Error response (no data)
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

/// Optional reviewer remarks from an approve/reject body; a missing or
/// malformed body means no remarks.
pub fn remarks(body: Option<web::Json<ReviewInput>>) -> Option<String> {
    body.and_then(|b| b.into_inner().remarks)
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}
