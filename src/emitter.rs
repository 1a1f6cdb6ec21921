use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::bus::EventBus;
use crate::error::Result;
use crate::models::{Channel, FocusRect, Point, ZoomState};

/// Progress of a tap-to-focus, carried as the `ACTIVITY` of a `Message` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusActivity {
    Active,
    Focus,
    Success,
    Failed,
    Complete,
}

impl FocusActivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusActivity::Active => "ACTIVE",
            FocusActivity::Focus => "FOCUS",
            FocusActivity::Success => "SUCCESS",
            FocusActivity::Failed => "FAILED",
            FocusActivity::Complete => "COMPLETE",
        }
    }
}

/// Something the camera view reports on the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraEvent {
    PressStart(Point),
    Press(Point),
    LongPress(Point),
    Hold(Point),
    Zoom(ZoomState),
    Focus {
        activity: FocusActivity,
        bounds: Option<FocusRect>,
    },
}

impl CameraEvent {
    pub fn channel(&self) -> Channel {
        match self {
            CameraEvent::PressStart(_) => Channel::OnPressStart,
            CameraEvent::Press(_) => Channel::OnPress,
            CameraEvent::LongPress(_) => Channel::OnLongPress,
            CameraEvent::Hold(_) => Channel::OnHold,
            CameraEvent::Zoom(_) => Channel::ZoomComplete,
            CameraEvent::Focus { .. } => Channel::Message,
        }
    }
}

/// Publishes camera events with the payload shape each channel expects.
#[derive(Clone)]
pub struct EventEmitter {
    bus: Arc<dyn EventBus>,
}

impl EventEmitter {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }

    pub fn send_event(&self, channel: Channel) -> Result<()> {
        self.send_event_with(channel, Value::Object(Map::new()))
    }

    pub fn send_event_with(&self, channel: Channel, payload: Value) -> Result<()> {
        log::trace!("emit {} {}", channel, payload);
        self.bus.publish(channel.as_str(), payload)
    }

    pub fn send_event_with_pairs(&self, channel: Channel, pairs: &[(&str, &str)]) -> Result<()> {
        let payload: Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        self.send_event_with(channel, Value::Object(payload))
    }

    pub fn send_event_with_location(&self, channel: Channel, point: Point) -> Result<()> {
        self.send_event_with(channel, json!({ "x": point.x, "y": point.y }))
    }

    pub fn emit(&self, event: &CameraEvent) -> Result<()> {
        let channel = event.channel();
        match event {
            CameraEvent::PressStart(point)
            | CameraEvent::Press(point)
            | CameraEvent::LongPress(point)
            | CameraEvent::Hold(point) => self.send_event_with_location(channel, *point),
            CameraEvent::Zoom(zoom) => self.send_event_with(
                channel,
                json!({ "current": zoom.current, "maximum": zoom.maximum }),
            ),
            CameraEvent::Focus { activity, bounds } => match bounds {
                Some(bounds) => self.send_event_with_pairs(
                    channel,
                    &[("ACTIVITY", activity.as_str()), ("BOUNDS", bounds.flatten().as_str())],
                ),
                None => self.send_event_with_pairs(channel, &[("ACTIVITY", activity.as_str())]),
            },
        }
    }

    pub fn emit_all(&self, events: &[CameraEvent]) -> Result<()> {
        for event in events {
            self.emit(event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{LocalEventBus, Subscription};
    use parking_lot::Mutex;

    type Seen = Arc<Mutex<Vec<(String, Value)>>>;

    fn recording_bus(channels: &[Channel]) -> (LocalEventBus, Seen, Vec<Subscription>) {
        let bus = LocalEventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subs = channels
            .iter()
            .map(|channel| {
                let seen = Arc::clone(&seen);
                let name = channel.as_str().to_string();
                bus.subscribe(
                    channel.as_str(),
                    Arc::new(move |payload: Value| seen.lock().push((name.clone(), payload))),
                )
            })
            .collect();
        (bus, seen, subs)
    }

    #[test]
    fn plain_event_carries_empty_object() {
        let (bus, seen, _subs) = recording_bus(&[Channel::OnHold]);
        EventEmitter::new(Arc::new(bus)).send_event(Channel::OnHold).unwrap();
        assert_eq!(*seen.lock(), vec![("OnHold".to_string(), json!({}))]);
    }

    #[test]
    fn location_events_carry_coordinates() {
        let (bus, seen, _subs) = recording_bus(&[Channel::OnPress, Channel::OnPressStart]);
        let emitter = EventEmitter::new(Arc::new(bus));
        let point = Point { x: 12.5, y: 40.0 };
        emitter
            .emit_all(&[CameraEvent::PressStart(point), CameraEvent::Press(point)])
            .unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                ("OnPressStart".to_string(), json!({ "x": 12.5, "y": 40.0 })),
                ("OnPress".to_string(), json!({ "x": 12.5, "y": 40.0 })),
            ]
        );
    }

    #[test]
    fn zoom_event_reports_current_and_maximum() {
        let (bus, seen, _subs) = recording_bus(&[Channel::ZoomComplete]);
        EventEmitter::new(Arc::new(bus))
            .emit(&CameraEvent::Zoom(ZoomState { current: 4, maximum: 30 }))
            .unwrap();
        assert_eq!(seen.lock()[0].1, json!({ "current": 4, "maximum": 30 }));
    }

    #[test]
    fn focus_messages_are_string_pairs() {
        let (bus, seen, _subs) = recording_bus(&[Channel::Message]);
        let emitter = EventEmitter::new(Arc::new(bus));
        emitter
            .emit(&CameraEvent::Focus {
                activity: FocusActivity::Active,
                bounds: Some(FocusRect { left: 0, top: 10, right: 100, bottom: 110 }),
            })
            .unwrap();
        emitter
            .emit(&CameraEvent::Focus { activity: FocusActivity::Complete, bounds: None })
            .unwrap();

        let seen = seen.lock();
        assert_eq!(seen[0].1, json!({ "ACTIVITY": "ACTIVE", "BOUNDS": "0 10 100 110" }));
        assert_eq!(seen[1].1, json!({ "ACTIVITY": "COMPLETE" }));
    }
}
