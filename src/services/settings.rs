use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::database::Tables;
use crate::database::models::CompanySettings;
use crate::error::AppError;
use crate::services::user_context::UserContext;

const ALLOWED_IMAGE_TYPES: &[&str] = &["png", "jpeg", "svg+xml", "gif", "webp"];

/// Accepts `data:image/<type>;base64,<payload>` whose decoded payload is
/// at most `max_bytes`.
pub fn validate_logo(logo: &str, max_bytes: usize) -> Result<(), AppError> {
    let invalid = |reason: &str| AppError::BadRequest(format!("Invalid logo: {}", reason));

    let rest = logo
        .strip_prefix("data:image/")
        .ok_or_else(|| invalid("expected a data:image URL"))?;
    let (image_type, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| invalid("expected base64 encoding"))?;

    if !ALLOWED_IMAGE_TYPES.contains(&image_type) {
        return Err(invalid(&format!("unsupported image type {}", image_type)));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| invalid("payload is not valid base64"))?;
    if bytes.is_empty() {
        return Err(invalid("image is empty"));
    }
    if bytes.len() > max_bytes {
        return Err(invalid(&format!(
            "image is {} bytes, the limit is {}",
            bytes.len(),
            max_bytes
        )));
    }

    Ok(())
}

pub fn set_logo(
    tx: &mut Tables,
    ctx: &UserContext,
    logo: String,
    max_bytes: usize,
) -> Result<CompanySettings, AppError> {
    ctx.requires_hr_or_admin()?;
    validate_logo(&logo, max_bytes)?;

    tx.settings.logo = Some(logo);
    log::info!("Company logo updated by {}", ctx.user_id());
    Ok(tx.settings.clone())
}

pub fn clear_logo(tx: &mut Tables, ctx: &UserContext) -> Result<CompanySettings, AppError> {
    ctx.requires_hr_or_admin()?;

    tx.settings.logo = None;
    Ok(tx.settings.clone())
}
