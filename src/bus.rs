//! Process-wide publish/subscribe seam.
//!
//! Channel names are global: every subscriber on a channel sees every payload
//! published under it, whichever component instance opened the subscription.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;
use tauri::{AppHandle, Emitter, Listener, Runtime};

use crate::error::Result;

pub type Handler = Arc<dyn Fn(Value) + Send + Sync>;

pub trait EventBus: Send + Sync {
    fn subscribe(&self, channel: &str, handler: Handler) -> Subscription;

    fn publish(&self, channel: &str, payload: Value) -> Result<()>;
}

/// A live registration on a channel. Disposing is one-shot; dropping disposes.
pub struct Subscription {
    channel: String,
    disposer: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(channel: impl Into<String>, disposer: impl FnOnce() + Send + 'static) -> Self {
        Self {
            channel: channel.into(),
            disposer: Some(Box::new(disposer)),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn is_active(&self) -> bool {
        self.disposer.is_some()
    }

    pub fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            log::trace!("disposing subscription on {}", self.channel);
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Bus backed by the Tauri app-wide event system, shared with the webview.
pub struct TauriEventBus<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriEventBus<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> EventBus for TauriEventBus<R> {
    fn subscribe(&self, channel: &str, handler: Handler) -> Subscription {
        let name = channel.to_string();
        let id = self.app.listen_any(channel, move |event| {
            match serde_json::from_str::<Value>(event.payload()) {
                Ok(payload) => handler(payload),
                Err(e) => log::warn!("Dropping malformed {} payload: {}", name, e),
            }
        });
        let app = self.app.clone();
        Subscription::new(channel, move || app.unlisten(id))
    }

    fn publish(&self, channel: &str, payload: Value) -> Result<()> {
        self.app.emit(channel, payload)?;
        Ok(())
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    channels: HashMap<String, Vec<(u64, Handler)>>,
}

/// In-process bus for hosts without a webview.
#[derive(Clone, Default)]
pub struct LocalEventBus {
    listeners: Arc<Mutex<Listeners>>,
}

impl LocalEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self, channel: &str) -> usize {
        self.listeners
            .lock()
            .channels
            .get(channel)
            .map_or(0, Vec::len)
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.lock().channels.values().map(Vec::len).sum()
    }
}

fn remove_listener(listeners: &Weak<Mutex<Listeners>>, channel: &str, id: u64) {
    let Some(listeners) = listeners.upgrade() else {
        return;
    };
    let mut listeners = listeners.lock();
    if let Some(handlers) = listeners.channels.get_mut(channel) {
        handlers.retain(|(handler_id, _)| *handler_id != id);
        if handlers.is_empty() {
            listeners.channels.remove(channel);
        }
    }
}

impl EventBus for LocalEventBus {
    fn subscribe(&self, channel: &str, handler: Handler) -> Subscription {
        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners
                .channels
                .entry(channel.to_string())
                .or_default()
                .push((id, handler));
            id
        };
        let weak = Arc::downgrade(&self.listeners);
        let name = channel.to_string();
        Subscription::new(channel, move || remove_listener(&weak, &name, id))
    }

    fn publish(&self, channel: &str, payload: Value) -> Result<()> {
        // Handlers may subscribe or dispose, so they run without the lock held.
        let handlers: Vec<Handler> = self
            .listeners
            .lock()
            .channels
            .get(channel)
            .map(|handlers| handlers.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(payload.clone());
        }
        Ok(())
    }
}
