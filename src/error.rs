use serde::{ser::Serializer, Serialize};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error(transparent)]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  Tauri(#[from] tauri::Error),
  #[cfg(mobile)]
  #[error(transparent)]
  PluginInvoke(#[from] tauri::plugin::mobile::PluginInvokeError),
  #[cfg(desktop)]
  #[error(transparent)]
  Image(#[from] image::ImageError),
  #[error("Camera error: {0}")]
  CameraError(String),
  #[error("Capture failed: {0}")]
  CaptureFailed(String),
  #[error("Unsupported flash mode: {0}")]
  UnsupportedFlashMode(String),
  #[error("Device not found: {0}")]
  DeviceNotFound(String),
}

impl Serialize for Error {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(self.to_string().as_ref())
  }
}
