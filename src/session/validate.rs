use crate::error::{AppError, AppResult};

use super::{GenerateRequest, ImproveRequest, SeoRequest, TranslateRequest};

pub const MIN_VARIANTS: u8 = 1;
pub const MAX_VARIANTS: u8 = 3;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_generate(req: &GenerateRequest) -> AppResult<()> {
    if is_blank(&req.product_name) {
        return Err(AppError::Validation("please enter a product name".into()));
    }
    if !(MIN_VARIANTS..=MAX_VARIANTS).contains(&req.num_variants) {
        return Err(AppError::Validation(format!(
            "number of variants must be between {MIN_VARIANTS} and {MAX_VARIANTS}"
        )));
    }
    Ok(())
}

pub fn validate_improve(req: &ImproveRequest) -> AppResult<()> {
    if is_blank(&req.original_description) {
        return Err(AppError::Validation(
            "please enter a description to improve".into(),
        ));
    }
    Ok(())
}

pub fn validate_seo(req: &SeoRequest) -> AppResult<()> {
    if is_blank(&req.product_name) && is_blank(&req.description) {
        return Err(AppError::Validation(
            "please enter a product name or a description".into(),
        ));
    }
    Ok(())
}

/// The identical-languages rule is a business check and runs after the
/// blank check.
pub fn validate_translate(req: &TranslateRequest) -> AppResult<()> {
    if is_blank(&req.description) {
        return Err(AppError::Validation(
            "please enter a description to translate".into(),
        ));
    }
    if req.source_language == req.target_language {
        return Err(AppError::IdenticalLanguages);
    }
    Ok(())
}
