use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tauri::{
    plugin::{PluginApi, PluginHandle},
    AppHandle, Runtime,
};

use crate::error::Result;
use crate::gateway::NativeGateway;
use crate::models::*;
use crate::props::NativeProps;

#[cfg(target_os = "ios")]
tauri::ios_plugin_binding!(init_plugin_camera_kit);

// initializes the Kotlin or Swift plugin classes
pub fn init<R: Runtime, C: DeserializeOwned>(
    _app: &AppHandle<R>,
    api: PluginApi<R, C>,
) -> Result<MobileGateway<R>> {
    #[cfg(target_os = "android")]
    let handle = api.register_android_plugin("com.plugin.camerakit", "CameraKitPlugin")?;
    #[cfg(target_os = "ios")]
    let handle = api.register_ios_plugin(init_plugin_camera_kit)?;
    Ok(MobileGateway(handle))
}

/// Forwards every call to the native camera module.
pub struct MobileGateway<R: Runtime>(PluginHandle<R>);

#[derive(Serialize)]
struct Empty {}

impl<R: Runtime> MobileGateway<R> {
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: impl Serialize + Send,
    ) -> Result<T> {
        log::debug!("camera-kit native call {}", method);
        self.0
            .run_mobile_plugin_async(method, payload)
            .await
            .map_err(Into::into)
    }

    async fn value<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: impl Serialize + Send,
    ) -> Result<T> {
        let response: ValueResponse<T> = self.call(method, payload).await?;
        Ok(response.value)
    }
}

#[async_trait]
impl<R: Runtime> NativeGateway for MobileGateway<R> {
    async fn request_device_camera_authorization(&self) -> Result<PermissionAnswer> {
        self.value("requestDeviceCameraAuthorization", Empty {}).await
    }

    async fn check_device_camera_authorization_status(&self) -> Result<PermissionStatus> {
        self.value("checkDeviceCameraAuthorizationStatus", Empty {})
            .await
    }

    async fn has_camera_permission(&self) -> Result<bool> {
        self.value("hasCameraPermission", Empty {}).await
    }

    async fn capture(&self, save_to_camera_roll: bool) -> Result<String> {
        self.value("capture", CaptureRequest { save_to_camera_roll })
            .await
    }

    async fn change_camera(&self) -> Result<bool> {
        self.value("changeCamera", Empty {}).await
    }

    async fn set_flash_mode(&self, flash_mode: FlashMode) -> Result<bool> {
        self.value("setFlashMode", FlashModeRequest { flash_mode })
            .await
    }

    async fn max_zoom(&self) -> Result<u32> {
        self.value("getMaxZoom", Empty {}).await
    }

    async fn set_zoom(&self, zoom: u32) -> Result<bool> {
        self.value("setZoom", ZoomRequest { zoom }).await
    }

    async fn auto_focus(&self, bounds: FocusRect) -> Result<bool> {
        self.value("autoFocus", FocusRequest { bounds }).await
    }

    async fn update_view(&self, props: NativeProps) -> Result<()> {
        let _: serde_json::Value = self.call("setViewProps", props).await?;
        Ok(())
    }
}
