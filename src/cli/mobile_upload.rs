//! `mobile-upload` command: upload an app build to a site environment.

use std::path::Path;

use crate::cli::context::CommandContext;
use crate::cli::dispatch::{Services, required_positional};
use crate::core::models::MobileAppConfirmation;
use crate::error::{RainforestError, Result};

/// Valid app slots.
pub const APP_SLOTS: std::ops::RangeInclusive<i64> = 1..=5;

/// Execute the mobile-upload command.
///
/// # Errors
///
/// Returns `InvalidArgument` for missing ids or an out-of-range slot,
/// `NotFound` if the app file is missing, or the first API error.
pub async fn execute(ctx: &dyn CommandContext, services: &Services) -> Result<String> {
    let file = required_positional(ctx, "app file")?;
    let site_id = ctx
        .int_option("site_id")
        .ok_or_else(|| RainforestError::InvalidArgument("--site-id is required".to_string()))?;
    let environment_id = ctx.int_option("environment_id").ok_or_else(|| {
        RainforestError::InvalidArgument("--environment-id is required".to_string())
    })?;
    let app_slot = ctx.int_option("app_slot").unwrap_or(1);
    if !APP_SLOTS.contains(&app_slot) {
        return Err(RainforestError::InvalidArgument(format!(
            "--app-slot must be between 1 and 5, got {app_slot}"
        )));
    }

    let path = Path::new(&file);
    if !path.is_file() {
        return Err(RainforestError::NotFound(file.clone()));
    }

    let api = services.api()?;
    let presign = api
        .mobile_presign(site_id, environment_id, app_slot)
        .await?;
    api.upload_to_presigned(&presign.url, path).await?;
    api.confirm_mobile_app(
        site_id,
        environment_id,
        &MobileAppConfirmation {
            app_slot,
            mobile_app_url: presign.mobile_app_url,
        },
    )
    .await?;
    tracing::info!(site_id, environment_id, app_slot, "uploaded mobile app");

    Ok(format!(
        "Uploaded {file} to site {site_id}, environment {environment_id}, app slot {app_slot}\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeContext, test_services};

    fn services() -> Services {
        test_services(Some("tok"), "http://127.0.0.1:1")
    }

    #[tokio::test]
    async fn slot_out_of_range_is_rejected() {
        let ctx = FakeContext::new()
            .with_args(["app.apk"])
            .with_int("site_id", 1)
            .with_int("environment_id", 2)
            .with_int("app_slot", 6);
        let err = execute(&ctx, &services()).await.unwrap_err();
        assert!(err.to_string().contains("--app-slot"), "{err}");
    }

    #[tokio::test]
    async fn missing_ids_are_rejected() {
        let ctx = FakeContext::new().with_args(["app.apk"]).with_int("site_id", 1);
        let err = execute(&ctx, &services()).await.unwrap_err();
        assert!(err.to_string().contains("--environment-id"), "{err}");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let ctx = FakeContext::new()
            .with_args(["/no/such/app.apk"])
            .with_int("site_id", 1)
            .with_int("environment_id", 2);
        let err = execute(&ctx, &services()).await.unwrap_err();
        assert!(matches!(err, RainforestError::NotFound(_)));
    }
}
