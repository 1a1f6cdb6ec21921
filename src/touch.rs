use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{sleep, Instant};

use crate::bus::EventBus;
use crate::config::Config;
use crate::emitter::EventEmitter;
use crate::error::Result;
use crate::gateway::NativeGateway;
use crate::gesture::{FollowUp, GestureTracker, TouchInput, TouchKind};
use crate::models::ZoomState;

/// Drives the gesture tracker for one preview: publishes what it recognizes,
/// runs the hold and focus timers, and forwards zoom and focus to the camera.
pub struct TouchDispatcher {
    emitter: EventEmitter,
    gateway: Arc<dyn NativeGateway>,
    gestures: Arc<Mutex<GestureTracker>>,
    focus_complete_delay: Duration,
}

impl TouchDispatcher {
    pub fn new(bus: Arc<dyn EventBus>, gateway: Arc<dyn NativeGateway>, config: &Config) -> Self {
        Self {
            emitter: EventEmitter::new(bus),
            gateway,
            gestures: Arc::new(Mutex::new(GestureTracker::new(config))),
            focus_complete_delay: config.focus_complete_delay(),
        }
    }

    pub fn zoom(&self) -> ZoomState {
        self.gestures.lock().zoom()
    }

    pub fn set_zoom_range(&self, maximum: u32) {
        self.gestures.lock().set_zoom_range(maximum);
    }

    pub async fn dispatch(&self, touch: TouchInput) -> Result<()> {
        if touch.kind == TouchKind::PointerDown && touch.pointer_count > 1 {
            self.refresh_zoom_range().await;
        }

        let now = Instant::now().into_std();
        let reaction = self.gestures.lock().handle(&touch, now);
        self.emitter.emit_all(&reaction.events)?;

        match reaction.follow_up {
            Some(FollowUp::CheckHold { touch, after }) => {
                let gestures = Arc::clone(&self.gestures);
                let emitter = self.emitter.clone();
                tokio::spawn(async move {
                    sleep(after).await;
                    let hold = gestures.lock().check_hold(touch);
                    if let Some(event) = hold {
                        if let Err(e) = emitter.emit(&event) {
                            log::error!("Failed to emit hold: {}", e);
                        }
                    }
                });
            }
            Some(FollowUp::ApplyZoom(level)) => {
                if !self.gateway.set_zoom(level).await? {
                    log::debug!("Zoom level {} not applied", level);
                }
            }
            Some(FollowUp::AutoFocus(bounds)) => {
                let success = self.gateway.auto_focus(bounds).await.unwrap_or_else(|e| {
                    log::warn!("Auto focus failed: {}", e);
                    false
                });
                let events = self.gestures.lock().focus_result(success);
                self.emitter.emit_all(&events)?;

                let gestures = Arc::clone(&self.gestures);
                let emitter = self.emitter.clone();
                let delay = self.focus_complete_delay;
                tokio::spawn(async move {
                    sleep(delay).await;
                    let complete = gestures.lock().focus_complete();
                    if let Err(e) = emitter.emit(&complete) {
                        log::error!("Failed to emit focus completion: {}", e);
                    }
                });
            }
            None => {}
        }
        Ok(())
    }

    // A device reporting 0 keeps the configured range.
    async fn refresh_zoom_range(&self) {
        match self.gateway.max_zoom().await {
            Ok(0) => {}
            Ok(maximum) => self.set_zoom_range(maximum),
            Err(e) => log::warn!("Failed to read zoom range: {}", e),
        }
    }
}
