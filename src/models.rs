use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Named event bus channels published by the native camera view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    ZoomComplete,
    Message,
    OnLongPress,
    OnPress,
    OnHold,
    OnPressStart,
}

impl Channel {
    /// Channels a component subscribes to when the matching callback is set.
    pub const RECOGNIZED: [Channel; 5] = [
        Channel::ZoomComplete,
        Channel::Message,
        Channel::OnLongPress,
        Channel::OnPress,
        Channel::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::ZoomComplete => "ZoomComplete",
            Channel::Message => "Message",
            Channel::OnLongPress => "OnLongPress",
            Channel::OnPress => "OnPress",
            Channel::OnHold => "OnHold",
            Channel::OnPressStart => "OnPressStart",
        }
    }

    /// Property key of the callback listening on this channel.
    pub fn callback_key(&self) -> Option<&'static str> {
        match self {
            Channel::ZoomComplete => Some("onZoom"),
            Channel::Message => Some("onMessage"),
            Channel::OnLongPress => Some("onLongPress"),
            Channel::OnPress => Some("onPress"),
            Channel::OnHold => Some("onHold"),
            Channel::OnPressStart => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// User's answer to an authorization prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionAnswer {
    Granted,
    Denied,
}

impl PermissionAnswer {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionAnswer::Granted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionStatus {
    Authorized,
    Denied,
    Restricted,
    #[serde(other)]
    NotDetermined,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    Auto,
    On,
    Off,
}

impl FlashMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashMode::Auto => "auto",
            FlashMode::On => "on",
            FlashMode::Off => "off",
        }
    }
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlashMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(FlashMode::Auto),
            "on" => Ok(FlashMode::On),
            "off" => Ok(FlashMode::Off),
            other => Err(Error::UnsupportedFlashMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Tap-to-focus area in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FocusRect {
    pub fn around(center: Point, half_size: i32) -> Self {
        let x = center.x as i32;
        let y = center.y as i32;
        Self {
            left: x - half_size,
            top: y - half_size,
            right: x + half_size,
            bottom: y + half_size,
        }
    }

    /// "left top right bottom", the form carried in focus messages.
    pub fn flatten(&self) -> String {
        format!("{} {} {} {}", self.left, self.top, self.right, self.bottom)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomState {
    pub current: u32,
    pub maximum: u32,
}

impl ZoomState {
    pub fn is_supported(&self) -> bool {
        self.maximum > 0
    }
}

// Scalar results come back from the native side wrapped in an object
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueResponse<T> {
    pub value: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    pub save_to_camera_roll: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashModeRequest {
    pub flash_mode: FlashMode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomRequest {
    pub zoom: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusRequest {
    pub bounds: FocusRect,
}
