use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::NativeGateway;
use crate::models::{FlashMode, FocusRect, PermissionAnswer, PermissionStatus};
use crate::props::NativeProps;
use crate::utils::{frame_to_rgb, write_png};
use async_trait::async_trait;
use crabcamera::init::initialize_camera_system;
use crabcamera::{
    get_available_cameras, get_recommended_format, request_camera_permission, set_callback,
    start_camera_preview,
};
use parking_lot::{const_mutex, Mutex};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use tauri::{plugin::PluginApi, AppHandle, Manager, Runtime};
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::{sleep, Duration, Instant};

const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub fn init<R: Runtime, C: DeserializeOwned>(
    app: &AppHandle<R>,
    _api: PluginApi<R, C>,
    config: Config,
) -> Result<DesktopGateway<R>> {
    Ok(DesktopGateway {
        app: app.clone(),
        config,
        state: AsyncMutex::new(DesktopState {
            initialized: false,
            permission: PermissionStatus::NotDetermined,
            selected: None,
            previewing: None,
        }),
    })
}

#[derive(Debug, PartialEq)]
struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: String,
}

/// Single-frame mailbox filled by the preview callback.
struct FrameSlot(Mutex<Option<Frame>>);

impl FrameSlot {
    const fn new() -> Self {
        Self(const_mutex(None))
    }

    fn put(&self, frame: Frame) {
        *self.0.lock() = Some(frame);
    }

    fn clear(&self) {
        self.0.lock().take();
    }

    /// Waits for a frame delivered after the call started.
    async fn wait(&self, timeout: Duration) -> Option<Frame> {
        self.clear();
        let deadline = Instant::now() + timeout;
        loop {
            let frame = self.0.lock().take();
            if frame.is_some() {
                return frame;
            }
            if Instant::now() >= deadline {
                return None;
            }
            sleep(FRAME_POLL_INTERVAL).await;
        }
    }
}

// The capture backend only takes plain fn callbacks.
static LATEST_FRAME: FrameSlot = FrameSlot::new();

fn store_frame(frame: crabcamera::CameraFrame) {
    LATEST_FRAME.put(Frame {
        data: frame.data,
        width: frame.width,
        height: frame.height,
        format: frame.format,
    });
}

fn discard_frame(_frame: crabcamera::CameraFrame) {}

/// What `ensure_preview` has to do to get frames from `device`.
#[derive(Debug, PartialEq)]
enum PreviewChange {
    Keep,
    Start { retire: Option<String> },
}

fn preview_change(previewing: Option<&str>, device: &str) -> PreviewChange {
    match previewing {
        Some(current) if current == device => PreviewChange::Keep,
        current => PreviewChange::Start {
            retire: current.map(str::to_string),
        },
    }
}

/// Reads the outcome of a permission request. Accepts a `status` string in
/// any case, or a `granted` flag.
fn permission_from(info: &Value) -> PermissionStatus {
    if let Some(granted) = info.get("granted").and_then(Value::as_bool) {
        return if granted {
            PermissionStatus::Authorized
        } else {
            PermissionStatus::Denied
        };
    }
    let status = info
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_ascii_lowercase();
    match status.as_str() {
        "granted" | "authorized" => PermissionStatus::Authorized,
        "denied" => PermissionStatus::Denied,
        "restricted" => PermissionStatus::Restricted,
        _ => PermissionStatus::NotDetermined,
    }
}

struct DesktopState {
    initialized: bool,
    permission: PermissionStatus,
    selected: Option<String>,
    previewing: Option<String>,
}

/// Local camera for desktop hosts, backed by crabcamera.
pub struct DesktopGateway<R: Runtime> {
    app: AppHandle<R>,
    config: Config,
    state: AsyncMutex<DesktopState>,
}

impl<R: Runtime> DesktopGateway<R> {
    /// Starts the preview on the selected camera unless it is already running
    async fn ensure_preview(&self, state: &mut DesktopState) -> Result<String> {
        if !state.initialized {
            initialize_camera_system().await.map_err(|e| {
                Error::CameraError(format!("Failed to initialize camera system: {}", e))
            })?;
            state.initialized = true;
        }

        let device_id = match state.selected.clone() {
            Some(id) => id,
            None => {
                let devices = get_available_cameras()
                    .await
                    .map_err(|e| Error::CameraError(format!("Failed to list devices: {}", e)))?;
                devices
                    .first()
                    .map(|camera| camera.id.clone())
                    .ok_or_else(|| Error::DeviceNotFound("no camera connected".to_string()))?
            }
        };
        state.selected = Some(device_id.clone());

        if let PreviewChange::Start { retire } =
            preview_change(state.previewing.as_deref(), &device_id)
        {
            if let Some(previous) = retire {
                // Frames from the camera we switched away from must not be captured.
                set_callback(previous.clone(), discard_frame)
                    .await
                    .map_err(|e| Error::CameraError(format!("Failed to set callback: {}", e)))?;
                LATEST_FRAME.clear();
                log::info!("Camera preview on {} retired", previous);
            }
            let format = get_recommended_format().await.map_err(|e| {
                Error::CameraError(format!("Failed to get recommended format : {}", e))
            })?;
            start_camera_preview(device_id.clone(), Some(format))
                .await
                .map_err(|e| {
                    Error::CameraError(format!("Failed to start camera preview: {}", e))
                })?;
            set_callback(device_id.clone(), store_frame)
                .await
                .map_err(|e| Error::CameraError(format!("Failed to set callback: {}", e)))?;
            log::info!("Camera preview started on {}", device_id);
            state.previewing = Some(device_id.clone());
        }
        Ok(device_id)
    }

    fn copy_to_pictures(&self, path: &Path) -> Result<()> {
        let pictures = self.app.path().picture_dir()?;
        std::fs::create_dir_all(&pictures)?;
        if let Some(name) = path.file_name() {
            std::fs::copy(path, pictures.join(name))?;
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Runtime> NativeGateway for DesktopGateway<R> {
    async fn request_device_camera_authorization(&self) -> Result<PermissionAnswer> {
        let status = match request_camera_permission().await {
            Ok(info) => match serde_json::to_value(&info) {
                Ok(info) => permission_from(&info),
                Err(e) => {
                    log::warn!("Unreadable camera permission info: {}", e);
                    PermissionStatus::NotDetermined
                }
            },
            Err(e) => {
                log::warn!("Camera permission not granted: {}", e);
                PermissionStatus::Denied
            }
        };
        self.state.lock().await.permission = status;
        Ok(if status == PermissionStatus::Authorized {
            PermissionAnswer::Granted
        } else {
            PermissionAnswer::Denied
        })
    }

    async fn check_device_camera_authorization_status(&self) -> Result<PermissionStatus> {
        Ok(self.state.lock().await.permission)
    }

    async fn has_camera_permission(&self) -> Result<bool> {
        Ok(self.state.lock().await.permission == PermissionStatus::Authorized)
    }

    async fn capture(&self, save_to_camera_roll: bool) -> Result<String> {
        // Held until the frame is taken: one capture reads the slot at a time
        // and the camera cannot change underneath it.
        let mut state = self.state.lock().await;
        let device_id = self.ensure_preview(&mut state).await?;
        let timeout = self.config.capture_timeout();
        let frame = LATEST_FRAME.wait(timeout).await.ok_or_else(|| {
            Error::CaptureFailed(format!("no frame from {} within {:?}", device_id, timeout))
        })?;
        drop(state);

        let rgb = frame_to_rgb(&frame.format, frame.data, frame.width, frame.height)?;
        let path = write_png(&self.config.capture_dir(), &rgb, frame.width, frame.height)?;
        if save_to_camera_roll {
            self.copy_to_pictures(&path)?;
        }
        log::info!("Captured {}x{} to {}", frame.width, frame.height, path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    async fn change_camera(&self) -> Result<bool> {
        let devices = get_available_cameras()
            .await
            .map_err(|e| Error::CameraError(format!("Failed to list devices: {}", e)))?;
        if devices.len() < 2 {
            return Ok(false);
        }

        let mut state = self.state.lock().await;
        let current = state
            .selected
            .as_ref()
            .and_then(|id| devices.iter().position(|camera| &camera.id == id))
            .unwrap_or(0);
        let next = devices[(current + 1) % devices.len()].id.clone();
        log::info!("Switching camera to {}", next);
        state.selected = Some(next);
        // Only restart a preview that was already running.
        if state.previewing.is_some() {
            self.ensure_preview(&mut state).await?;
        }
        Ok(true)
    }

    async fn set_flash_mode(&self, mode: FlashMode) -> Result<bool> {
        // Webcams have no flash to drive.
        Ok(mode == FlashMode::Off)
    }

    async fn max_zoom(&self) -> Result<u32> {
        Ok(0)
    }

    async fn set_zoom(&self, _zoom: u32) -> Result<bool> {
        Ok(false)
    }

    async fn auto_focus(&self, _bounds: FocusRect) -> Result<bool> {
        Ok(false)
    }

    async fn update_view(&self, props: NativeProps) -> Result<()> {
        // The preview is drawn by the webview; nothing to apply natively.
        log::debug!("Camera view props: {:?}", props);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(width: u32) -> Frame {
        Frame {
            data: vec![0; 3],
            width,
            height: 1,
            format: "RGB8".to_string(),
        }
    }

    #[test]
    fn granted_status_authorizes() {
        assert_eq!(permission_from(&json!({ "status": "Granted" })), PermissionStatus::Authorized);
        assert_eq!(permission_from(&json!({ "status": "authorized" })), PermissionStatus::Authorized);
        assert_eq!(permission_from(&json!({ "granted": true })), PermissionStatus::Authorized);
    }

    #[test]
    fn denial_in_a_successful_request_is_not_a_grant() {
        assert_eq!(
            permission_from(&json!({ "status": "Denied", "message": "blocked by user" })),
            PermissionStatus::Denied
        );
        assert_eq!(permission_from(&json!({ "granted": false })), PermissionStatus::Denied);
        assert_eq!(
            permission_from(&json!({ "status": "Restricted" })),
            PermissionStatus::Restricted
        );
    }

    #[test]
    fn unknown_permission_info_is_undetermined() {
        assert_eq!(permission_from(&json!({})), PermissionStatus::NotDetermined);
        assert_eq!(
            permission_from(&json!({ "status": "NotDetermined" })),
            PermissionStatus::NotDetermined
        );
    }

    #[test]
    fn switching_device_retires_the_old_preview() {
        assert_eq!(preview_change(Some("cam0"), "cam0"), PreviewChange::Keep);
        assert_eq!(
            preview_change(Some("cam0"), "cam1"),
            PreviewChange::Start { retire: Some("cam0".to_string()) }
        );
        assert_eq!(preview_change(None, "cam0"), PreviewChange::Start { retire: None });
    }

    #[tokio::test(start_paused = true)]
    async fn wait_skips_frames_older_than_the_call() {
        let slot = FrameSlot::new();
        slot.put(frame(1));
        assert_eq!(slot.wait(Duration::from_millis(50)).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_returns_a_frame_delivered_later() {
        let slot = std::sync::Arc::new(FrameSlot::new());
        let writer = std::sync::Arc::clone(&slot);
        tokio::spawn(async move {
            sleep(Duration::from_millis(30)).await;
            writer.put(frame(2));
        });
        assert_eq!(slot.wait(Duration::from_millis(100)).await, Some(frame(2)));
        assert_eq!(slot.0.lock().take(), None);
    }
}
