use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::Channel;

pub type Callback = Arc<dyn Fn(Value) + Send + Sync>;

/// Keys that never reach the native view.
pub const NON_NATIVE_KEYS: [&str; 2] = ["onZoom", "onMessage"];

/// Properties of a camera component: event callbacks plus native view attributes.
#[derive(Clone, Default)]
pub struct CameraProps {
    on_zoom: Option<Callback>,
    on_message: Option<Callback>,
    on_long_press: Option<Callback>,
    on_press: Option<Callback>,
    on_hold: Option<Callback>,
    attributes: Map<String, Value>,
}

impl CameraProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_zoom(mut self, f: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.on_zoom = Some(Arc::new(f));
        self
    }

    pub fn on_message(mut self, f: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.on_message = Some(Arc::new(f));
        self
    }

    pub fn on_long_press(mut self, f: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.on_long_press = Some(Arc::new(f));
        self
    }

    pub fn on_press(mut self, f: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.on_press = Some(Arc::new(f));
        self
    }

    pub fn on_hold(mut self, f: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.on_hold = Some(Arc::new(f));
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn callback(&self, channel: Channel) -> Option<Callback> {
        let slot = match channel {
            Channel::ZoomComplete => &self.on_zoom,
            Channel::Message => &self.on_message,
            Channel::OnLongPress => &self.on_long_press,
            Channel::OnPress => &self.on_press,
            Channel::OnHold => &self.on_hold,
            Channel::OnPressStart => return None,
        };
        slot.clone()
    }

    pub fn has_callback(&self, channel: Channel) -> bool {
        self.callback(channel).is_some()
    }
}

impl fmt::Debug for CameraProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let callbacks: Vec<&str> = Channel::RECOGNIZED
            .iter()
            .filter(|channel| self.has_callback(**channel))
            .filter_map(Channel::callback_key)
            .collect();
        f.debug_struct("CameraProps")
            .field("callbacks", &callbacks)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Property set handed to the native view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NativeProps(Map<String, Value>);

impl NativeProps {
    /// Everything but the non-native keys. Callbacks that do reach the view
    /// travel as `true` flags since functions cannot cross the bridge.
    pub fn from_props(props: &CameraProps) -> Self {
        let mut map = props.attributes.clone();
        for channel in Channel::RECOGNIZED {
            if let (Some(key), true) = (channel.callback_key(), props.has_callback(channel)) {
                map.insert(key.to_string(), Value::Bool(true));
            }
        }
        for key in NON_NATIVE_KEYS {
            map.remove(key);
        }
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}
