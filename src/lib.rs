use std::sync::Arc;

use tauri::{
    plugin::{Builder, TauriPlugin},
    AppHandle, Manager, Runtime,
};

pub use models::*;

#[cfg(desktop)]
mod desktop;
#[cfg(mobile)]
mod mobile;
#[cfg(desktop)]
mod utils;
#[cfg(test)]
mod testing;

mod bus;
mod commands;
mod component;
mod config;
mod emitter;
mod error;
mod gateway;
mod gesture;
mod models;
mod props;
mod registry;
mod touch;

pub use bus::{EventBus, Handler, LocalEventBus, Subscription, TauriEventBus};
pub use component::CameraComponent;
pub use config::Config;
pub use emitter::{CameraEvent, EventEmitter, FocusActivity};
pub use error::{Error, Result};
pub use gateway::NativeGateway;
pub use gesture::{FocusState, FollowUp, GestureTracker, Reaction, TouchInput, TouchKind};
pub use props::{CameraProps, Callback, NativeProps, NON_NATIVE_KEYS};
pub use registry::ListenerRegistry;
pub use touch::TouchDispatcher;

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the camera kit.
pub trait CameraKitExt<R: Runtime> {
    fn camera_kit(&self) -> &CameraKit<R>;
}

impl<R: Runtime, T: Manager<R>> crate::CameraKitExt<R> for T {
    fn camera_kit(&self) -> &CameraKit<R> {
        self.state::<CameraKit<R>>().inner()
    }
}

/// Plugin state: the native gateway, the app event bus and the preview's
/// touch dispatcher.
pub struct CameraKit<R: Runtime> {
    bus: Arc<TauriEventBus<R>>,
    gateway: Arc<dyn NativeGateway>,
    touch: TouchDispatcher,
    config: Config,
}

impl<R: Runtime> CameraKit<R> {
    fn new(app: AppHandle<R>, gateway: Arc<dyn NativeGateway>, config: Config) -> Self {
        let bus = Arc::new(TauriEventBus::new(app));
        Self {
            touch: TouchDispatcher::new(bus.clone(), gateway.clone(), &config),
            bus,
            gateway,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bus(&self) -> Arc<dyn EventBus> {
        self.bus.clone()
    }

    pub fn emitter(&self) -> EventEmitter {
        EventEmitter::new(self.bus())
    }

    /// A component wired to this app's event bus and native camera.
    pub fn component(&self, props: CameraProps) -> CameraComponent {
        CameraComponent::new(self.gateway.clone(), self.bus(), props).with_config(&self.config)
    }

    pub async fn request_device_camera_authorization(&self) -> Result<PermissionAnswer> {
        self.gateway.request_device_camera_authorization().await
    }

    pub async fn check_device_camera_authorization_status(&self) -> Result<PermissionStatus> {
        self.gateway.check_device_camera_authorization_status().await
    }

    pub async fn has_camera_permission(&self) -> Result<bool> {
        self.gateway.has_camera_permission().await
    }

    pub async fn capture(&self, save_to_camera_roll: Option<bool>) -> Result<String> {
        let save = save_to_camera_roll.unwrap_or(self.config.save_to_camera_roll);
        self.gateway.capture(save).await
    }

    pub async fn change_camera(&self) -> Result<bool> {
        self.gateway.change_camera().await
    }

    pub async fn set_flash_mode(&self, mode: Option<FlashMode>) -> Result<bool> {
        self.gateway
            .set_flash_mode(mode.unwrap_or(self.config.flash_mode))
            .await
    }

    /// Overrides the pinch zoom range until the next pinch reads it from the
    /// camera again.
    pub fn set_zoom_range(&self, maximum: u32) {
        self.touch.set_zoom_range(maximum);
    }

    /// Runs a preview touch through the gesture tracker and publishes what it
    /// recognizes.
    pub async fn dispatch_touch(&self, touch: TouchInput) -> Result<()> {
        self.touch.dispatch(touch).await
    }
}

/// Initializes the plugin.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new("camera-kit")
        .invoke_handler(tauri::generate_handler![
            commands::request_device_camera_authorization,
            commands::check_device_camera_authorization_status,
            commands::has_camera_permission,
            commands::capture,
            commands::change_camera,
            commands::set_flash_mode,
            commands::dispatch_touch,
        ])
        .setup(|app, api| {
            let config = api.config().clone().unwrap_or_default();
            #[cfg(mobile)]
            let gateway = mobile::init(app, api)?;
            #[cfg(desktop)]
            let gateway = desktop::init(app, api, config.clone())?;
            app.manage(CameraKit::new(app.clone(), Arc::new(gateway), config));
            Ok(())
        })
        .build()
}
