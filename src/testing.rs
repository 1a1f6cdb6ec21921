//! Scripted gateway for unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::gateway::NativeGateway;
use crate::models::{FlashMode, FocusRect, PermissionAnswer, PermissionStatus};
use crate::props::NativeProps;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    RequestAuthorization,
    CheckStatus,
    HasPermission,
    Capture(bool),
    ChangeCamera,
    SetFlashMode(FlashMode),
    MaxZoom,
    SetZoom(u32),
    AutoFocus(FocusRect),
    UpdateView(NativeProps),
}

pub(crate) struct FakeGateway {
    pub answer: PermissionAnswer,
    pub status: PermissionStatus,
    pub capture_error: Mutex<Option<Error>>,
    pub has_alternate_camera: bool,
    pub supported_flash: Vec<FlashMode>,
    pub focus_succeeds: bool,
    pub focus_error: Mutex<Option<Error>>,
    pub max_zoom: u32,
    pub calls: Mutex<Vec<Call>>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            answer: PermissionAnswer::Granted,
            status: PermissionStatus::Authorized,
            capture_error: Mutex::new(None),
            has_alternate_camera: true,
            supported_flash: vec![FlashMode::Auto, FlashMode::On, FlashMode::Off],
            focus_succeeds: true,
            focus_error: Mutex::new(None),
            max_zoom: 0,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeGateway {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl NativeGateway for FakeGateway {
    async fn request_device_camera_authorization(&self) -> Result<PermissionAnswer> {
        self.record(Call::RequestAuthorization);
        Ok(self.answer)
    }

    async fn check_device_camera_authorization_status(&self) -> Result<PermissionStatus> {
        self.record(Call::CheckStatus);
        Ok(self.status)
    }

    async fn has_camera_permission(&self) -> Result<bool> {
        self.record(Call::HasPermission);
        Ok(self.status == PermissionStatus::Authorized)
    }

    async fn capture(&self, save_to_camera_roll: bool) -> Result<String> {
        self.record(Call::Capture(save_to_camera_roll));
        match self.capture_error.lock().take() {
            Some(err) => Err(err),
            None => Ok("/tmp/capture-test.png".to_string()),
        }
    }

    async fn change_camera(&self) -> Result<bool> {
        self.record(Call::ChangeCamera);
        Ok(self.has_alternate_camera)
    }

    async fn set_flash_mode(&self, mode: FlashMode) -> Result<bool> {
        self.record(Call::SetFlashMode(mode));
        Ok(self.supported_flash.contains(&mode))
    }

    async fn max_zoom(&self) -> Result<u32> {
        self.record(Call::MaxZoom);
        Ok(self.max_zoom)
    }

    async fn set_zoom(&self, zoom: u32) -> Result<bool> {
        self.record(Call::SetZoom(zoom));
        Ok(true)
    }

    async fn auto_focus(&self, bounds: FocusRect) -> Result<bool> {
        self.record(Call::AutoFocus(bounds));
        match self.focus_error.lock().take() {
            Some(err) => Err(err),
            None => Ok(self.focus_succeeds),
        }
    }

    async fn update_view(&self, props: NativeProps) -> Result<()> {
        self.record(Call::UpdateView(props));
        Ok(())
    }
}
