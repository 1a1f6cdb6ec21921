use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::bus::{EventBus, Handler, Subscription};
use crate::config::Config;
use crate::error::Result;
use crate::gateway::NativeGateway;
use crate::models::{Channel, FlashMode, PermissionAnswer, PermissionStatus};
use crate::props::{CameraProps, NativeProps};
use crate::registry::ListenerRegistry;

/// A camera view embedded in a host UI tree.
///
/// Bus subscriptions follow the mount state: one per channel whose callback
/// is set while mounted, none otherwise. Callbacks are looked up when an
/// event fires, so replacing props takes effect for already-open channels.
/// Dropping the component unmounts it.
pub struct CameraComponent {
    gateway: Arc<dyn NativeGateway>,
    bus: Arc<dyn EventBus>,
    props: Arc<RwLock<CameraProps>>,
    mounted: Arc<AtomicBool>,
    listeners: Mutex<ListenerRegistry>,
    save_to_camera_roll: bool,
    flash_mode: FlashMode,
}

impl CameraComponent {
    pub fn new(gateway: Arc<dyn NativeGateway>, bus: Arc<dyn EventBus>, props: CameraProps) -> Self {
        Self {
            gateway,
            bus,
            props: Arc::new(RwLock::new(props)),
            mounted: Arc::new(AtomicBool::new(false)),
            listeners: Mutex::new(ListenerRegistry::new()),
            save_to_camera_roll: true,
            flash_mode: FlashMode::Auto,
        }
    }

    /// Takes the capture and flash defaults from the plugin config.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.save_to_camera_roll = config.save_to_camera_roll;
        self.flash_mode = config.flash_mode;
        self
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    // `mounted` only changes while `listeners` is locked, so the flag and the
    // open subscriptions cannot disagree once a call returns.
    pub fn mount(&self) {
        let mut listeners = self.listeners.lock();
        if self.mounted.swap(true, Ordering::AcqRel) {
            log::warn!("Camera component mounted twice, ignoring");
            return;
        }
        for channel in Channel::RECOGNIZED {
            self.register(&mut listeners, channel);
        }
        log::debug!("Camera component mounted with listeners {:?}", listeners.channels());
    }

    pub fn unmount(&self) {
        let mut listeners = self.listeners.lock();
        if !self.mounted.swap(false, Ordering::AcqRel) {
            return;
        }
        let count = listeners.len();
        listeners.dispose_all();
        log::debug!("Camera component unmounted, closed {} listeners", count);
    }

    /// Replaces the property set. While mounted, channels whose callback
    /// appeared or disappeared are re-registered.
    pub fn set_props(&self, props: CameraProps) {
        *self.props.write() = props;
        let mut listeners = self.listeners.lock();
        if !self.is_mounted() {
            return;
        }
        for channel in Channel::RECOGNIZED {
            let wanted = self.props.read().has_callback(channel);
            if wanted != listeners.is_registered(channel) {
                self.register(&mut listeners, channel);
            }
        }
    }

    pub fn active_listeners(&self) -> Vec<Channel> {
        self.listeners.lock().channels()
    }

    /// Properties for the native view.
    pub fn render(&self) -> NativeProps {
        NativeProps::from_props(&self.props.read())
    }

    /// Pushes the current native properties to the native view.
    pub async fn commit_render(&self) -> Result<()> {
        let props = self.render();
        self.gateway.update_view(props).await
    }

    pub async fn request_permission(&self) -> Result<PermissionAnswer> {
        self.gateway.request_device_camera_authorization().await
    }

    pub async fn check_permission_status(&self) -> Result<PermissionStatus> {
        self.gateway.check_device_camera_authorization_status().await
    }

    pub async fn has_permission(&self) -> Result<bool> {
        self.gateway.has_camera_permission().await
    }

    pub async fn capture(&self, save_to_camera_roll: Option<bool>) -> Result<String> {
        let save = save_to_camera_roll.unwrap_or(self.save_to_camera_roll);
        self.gateway.capture(save).await
    }

    pub async fn change_camera(&self) -> Result<bool> {
        self.gateway.change_camera().await
    }

    pub async fn set_flash_mode(&self, mode: Option<FlashMode>) -> Result<bool> {
        self.gateway
            .set_flash_mode(mode.unwrap_or(self.flash_mode))
            .await
    }

    fn register(&self, listeners: &mut ListenerRegistry, channel: Channel) {
        let wanted = self.props.read().has_callback(channel);
        listeners.register(channel, || wanted.then(|| self.subscribe(channel)));
    }

    fn subscribe(&self, channel: Channel) -> Subscription {
        self.bus.subscribe(channel.as_str(), self.dispatcher(channel))
    }

    fn dispatcher(&self, channel: Channel) -> Handler {
        let props: Weak<RwLock<CameraProps>> = Arc::downgrade(&self.props);
        let mounted = Arc::clone(&self.mounted);
        Arc::new(move |payload: Value| {
            if !mounted.load(Ordering::Acquire) {
                log::trace!("Dropping {} event for unmounted camera", channel);
                return;
            }
            let Some(props) = props.upgrade() else {
                return;
            };
            // Read the callback out first so it runs without the lock held.
            let callback = props.read().callback(channel);
            match callback {
                Some(callback) => callback(payload),
                None => log::trace!("Dropping {} event, no callback set", channel),
            }
        })
    }
}

impl Drop for CameraComponent {
    fn drop(&mut self) {
        self.unmount();
    }
}
