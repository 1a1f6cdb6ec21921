use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FlashMode, FocusRect, PermissionAnswer, PermissionStatus};
use crate::props::NativeProps;

/// Request/response bridge to the native camera module.
///
/// Every call crosses the boundary and may fail; failures are handed back to
/// the caller as-is. Mode changes the device cannot honour come back as
/// `Ok(false)` rather than an error.
#[async_trait]
pub trait NativeGateway: Send + Sync {
    async fn request_device_camera_authorization(&self) -> Result<PermissionAnswer>;

    async fn check_device_camera_authorization_status(&self) -> Result<PermissionStatus>;

    async fn has_camera_permission(&self) -> Result<bool>;

    /// Takes a still picture and returns the path of the temporary file.
    async fn capture(&self, save_to_camera_roll: bool) -> Result<String>;

    async fn change_camera(&self) -> Result<bool>;

    async fn set_flash_mode(&self, mode: FlashMode) -> Result<bool>;

    /// Highest zoom level the active camera accepts; `0` when it cannot zoom.
    async fn max_zoom(&self) -> Result<u32>;

    async fn set_zoom(&self, zoom: u32) -> Result<bool>;

    async fn auto_focus(&self, bounds: FocusRect) -> Result<bool>;

    async fn update_view(&self, props: NativeProps) -> Result<()>;
}
