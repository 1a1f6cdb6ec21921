use tauri::{command, AppHandle, Runtime};

use crate::gesture::TouchInput;
use crate::models::*;
use crate::CameraKitExt;
use crate::Result;

#[command]
pub(crate) async fn request_device_camera_authorization<R: Runtime>(
    app: AppHandle<R>,
) -> Result<PermissionAnswer> {
    app.camera_kit().request_device_camera_authorization().await
}

#[command]
pub(crate) async fn check_device_camera_authorization_status<R: Runtime>(
    app: AppHandle<R>,
) -> Result<PermissionStatus> {
    app.camera_kit()
        .check_device_camera_authorization_status()
        .await
}

#[command]
pub(crate) async fn has_camera_permission<R: Runtime>(app: AppHandle<R>) -> Result<bool> {
    app.camera_kit().has_camera_permission().await
}

/// Take a picture; resolves to the temporary file path
#[command]
pub(crate) async fn capture<R: Runtime>(
    app: AppHandle<R>,
    save_to_camera_roll: Option<bool>,
) -> Result<String> {
    app.camera_kit().capture(save_to_camera_roll).await
}

#[command]
pub(crate) async fn change_camera<R: Runtime>(app: AppHandle<R>) -> Result<bool> {
    app.camera_kit().change_camera().await
}

#[command]
pub(crate) async fn set_flash_mode<R: Runtime>(
    app: AppHandle<R>,
    flash_mode: Option<FlashMode>,
) -> Result<bool> {
    app.camera_kit().set_flash_mode(flash_mode).await
}

/// Feed a touch on the preview surface to the gesture tracker
#[command]
pub(crate) async fn dispatch_touch<R: Runtime>(
    app: AppHandle<R>,
    touch: TouchInput,
) -> Result<()> {
    app.camera_kit().dispatch_touch(touch).await
}
