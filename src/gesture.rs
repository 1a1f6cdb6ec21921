//! Touch handling for the camera preview: press, long press, hold, pinch zoom
//! and tap-to-focus, reported as [`CameraEvent`]s.
//!
//! The tracker is pure state; timers and device calls are returned as a
//! [`FollowUp`] for the caller to run.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::emitter::{CameraEvent, FocusActivity};
use crate::models::{FocusRect, Point, ZoomState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TouchKind {
    Down,
    PointerDown,
    Move,
    PointerUp,
    Up,
}

/// One touch sample from the preview surface. `pointer_count` includes the
/// pointer going up on `pointerUp`/`up`; `spacing` is the distance between the
/// first two pointers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchInput {
    pub kind: TouchKind,
    pub x: f32,
    pub y: f32,
    #[serde(default = "single_pointer")]
    pub pointer_count: u32,
    #[serde(default)]
    pub spacing: Option<f32>,
}

fn single_pointer() -> u32 {
    1
}

impl TouchInput {
    pub fn point(&self) -> Point {
        Point { x: self.x, y: self.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Inactive,
    Active,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowUp {
    /// Call [`GestureTracker::check_hold`] with `touch` once `after` elapsed.
    CheckHold { touch: Instant, after: Duration },
    ApplyZoom(u32),
    AutoFocus(FocusRect),
}

#[derive(Debug, Default, PartialEq)]
pub struct Reaction {
    pub events: Vec<CameraEvent>,
    pub follow_up: Option<FollowUp>,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug)]
pub struct GestureTracker {
    long_press: Duration,
    focus_half_size: i32,
    touch_started: Option<Instant>,
    touch_ended: Option<Instant>,
    origin: Point,
    pointer_count: u32,
    hold_fired: bool,
    last_spacing: f32,
    zoom: ZoomState,
    focus: FocusState,
}

impl GestureTracker {
    pub fn new(config: &Config) -> Self {
        Self {
            long_press: config.long_press(),
            focus_half_size: config.focus_half_size,
            touch_started: None,
            touch_ended: None,
            origin: Point { x: 0.0, y: 0.0 },
            pointer_count: 0,
            hold_fired: false,
            last_spacing: 0.0,
            zoom: ZoomState {
                current: 0,
                maximum: config.max_zoom,
            },
            focus: FocusState::Inactive,
        }
    }

    pub fn zoom(&self) -> ZoomState {
        self.zoom
    }

    pub fn set_zoom_range(&mut self, maximum: u32) {
        self.zoom.maximum = maximum;
        self.zoom.current = self.zoom.current.min(maximum);
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus
    }

    pub fn handle(&mut self, touch: &TouchInput, now: Instant) -> Reaction {
        match touch.kind {
            TouchKind::Down => self.touch_down(touch, now),
            TouchKind::PointerDown => {
                self.pointer_count = touch.pointer_count;
                if touch.pointer_count > 1 {
                    self.last_spacing = touch.spacing.unwrap_or(0.0);
                }
                Reaction::none()
            }
            TouchKind::Move if touch.pointer_count > 1 => self.pinch(touch),
            TouchKind::Move => Reaction::none(),
            TouchKind::PointerUp => {
                self.pointer_count = touch.pointer_count.saturating_sub(1);
                Reaction::none()
            }
            TouchKind::Up => self.touch_up(touch, now),
        }
    }

    /// Fires `OnHold` if the touch that started at `touch` is still the only
    /// pointer down.
    pub fn check_hold(&mut self, touch: Instant) -> Option<CameraEvent> {
        let still_down = self.touch_started == Some(touch)
            && self.touch_ended.map_or(true, |ended| ended < touch);
        if !still_down || self.hold_fired || self.pointer_count != 1 {
            return None;
        }
        self.hold_fired = true;
        Some(CameraEvent::Hold(self.origin))
    }

    pub fn focus_result(&mut self, success: bool) -> Vec<CameraEvent> {
        let (activity, state) = if success {
            (FocusActivity::Success, FocusState::Success)
        } else {
            (FocusActivity::Failed, FocusState::Failed)
        };
        self.focus = state;
        vec![
            CameraEvent::Focus {
                activity: FocusActivity::Focus,
                bounds: None,
            },
            CameraEvent::Focus {
                activity,
                bounds: None,
            },
        ]
    }

    pub fn focus_complete(&mut self) -> CameraEvent {
        self.focus = FocusState::Inactive;
        CameraEvent::Focus {
            activity: FocusActivity::Complete,
            bounds: None,
        }
    }

    fn touch_down(&mut self, touch: &TouchInput, now: Instant) -> Reaction {
        self.touch_started = Some(now);
        self.origin = touch.point();
        self.pointer_count = touch.pointer_count.max(1);
        self.hold_fired = false;
        Reaction {
            events: vec![CameraEvent::PressStart(self.origin)],
            follow_up: Some(FollowUp::CheckHold {
                touch: now,
                after: self.long_press,
            }),
        }
    }

    fn pinch(&mut self, touch: &TouchInput) -> Reaction {
        self.pointer_count = touch.pointer_count;
        if !self.zoom.is_supported() {
            return Reaction::none();
        }
        let spacing = touch.spacing.unwrap_or(self.last_spacing);
        if spacing > self.last_spacing && self.zoom.current < self.zoom.maximum {
            self.zoom.current += 1;
        } else if spacing < self.last_spacing && self.zoom.current > 0 {
            self.zoom.current -= 1;
        }
        self.last_spacing = spacing;
        Reaction {
            events: vec![CameraEvent::Zoom(self.zoom)],
            follow_up: Some(FollowUp::ApplyZoom(self.zoom.current)),
        }
    }

    fn touch_up(&mut self, touch: &TouchInput, now: Instant) -> Reaction {
        self.touch_ended = Some(now);
        self.pointer_count = 0;
        if touch.pointer_count > 1 {
            return Reaction::none();
        }
        let Some(started) = self.touch_started else {
            return Reaction::none();
        };
        let point = touch.point();
        if now.duration_since(started) >= self.long_press {
            return Reaction {
                events: vec![CameraEvent::LongPress(point)],
                follow_up: None,
            };
        }

        let bounds = FocusRect::around(point, self.focus_half_size);
        self.focus = FocusState::Active;
        Reaction {
            events: vec![
                CameraEvent::Press(point),
                CameraEvent::Focus {
                    activity: FocusActivity::Active,
                    bounds: Some(bounds),
                },
            ],
            follow_up: Some(FollowUp::AutoFocus(bounds)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(kind: TouchKind, x: f32, y: f32) -> TouchInput {
        TouchInput {
            kind,
            x,
            y,
            pointer_count: 1,
            spacing: None,
        }
    }

    fn pinch(kind: TouchKind, spacing: f32) -> TouchInput {
        TouchInput {
            kind,
            x: 0.0,
            y: 0.0,
            pointer_count: 2,
            spacing: Some(spacing),
        }
    }

    fn tracker_with_zoom(max_zoom: u32) -> GestureTracker {
        GestureTracker::new(&Config {
            max_zoom,
            ..Config::default()
        })
    }

    #[test]
    fn down_reports_press_start_and_schedules_hold_check() {
        let mut tracker = GestureTracker::new(&Config::default());
        let now = Instant::now();
        let reaction = tracker.handle(&touch(TouchKind::Down, 10.0, 20.0), now);

        assert_eq!(
            reaction.events,
            vec![CameraEvent::PressStart(Point { x: 10.0, y: 20.0 })]
        );
        assert_eq!(
            reaction.follow_up,
            Some(FollowUp::CheckHold {
                touch: now,
                after: Duration::from_millis(750)
            })
        );
    }

    #[test]
    fn short_tap_is_a_press_with_focus() {
        let mut tracker = GestureTracker::new(&Config::default());
        let start = Instant::now();
        tracker.handle(&touch(TouchKind::Down, 100.0, 200.0), start);
        let reaction = tracker.handle(
            &touch(TouchKind::Up, 100.0, 200.0),
            start + Duration::from_millis(120),
        );

        let bounds = FocusRect { left: 50, top: 150, right: 150, bottom: 250 };
        assert_eq!(
            reaction.events,
            vec![
                CameraEvent::Press(Point { x: 100.0, y: 200.0 }),
                CameraEvent::Focus {
                    activity: FocusActivity::Active,
                    bounds: Some(bounds)
                },
            ]
        );
        assert_eq!(reaction.follow_up, Some(FollowUp::AutoFocus(bounds)));
        assert_eq!(tracker.focus_state(), FocusState::Active);
    }

    #[test]
    fn long_touch_is_a_long_press() {
        let mut tracker = GestureTracker::new(&Config::default());
        let start = Instant::now();
        tracker.handle(&touch(TouchKind::Down, 1.0, 1.0), start);
        let reaction = tracker.handle(
            &touch(TouchKind::Up, 3.0, 4.0),
            start + Duration::from_millis(750),
        );

        assert_eq!(
            reaction.events,
            vec![CameraEvent::LongPress(Point { x: 3.0, y: 4.0 })]
        );
        assert_eq!(reaction.follow_up, None);
    }

    #[test]
    fn hold_fires_once_while_still_down() {
        let mut tracker = GestureTracker::new(&Config::default());
        let start = Instant::now();
        tracker.handle(&touch(TouchKind::Down, 7.0, 8.0), start);

        assert_eq!(
            tracker.check_hold(start),
            Some(CameraEvent::Hold(Point { x: 7.0, y: 8.0 }))
        );
        assert_eq!(tracker.check_hold(start), None);
    }

    #[test]
    fn hold_does_not_fire_after_release() {
        let mut tracker = GestureTracker::new(&Config::default());
        let start = Instant::now();
        tracker.handle(&touch(TouchKind::Down, 0.0, 0.0), start);
        tracker.handle(&touch(TouchKind::Up, 0.0, 0.0), start + Duration::from_millis(50));
        assert_eq!(tracker.check_hold(start), None);
    }

    #[test]
    fn hold_does_not_fire_while_pinching() {
        let mut tracker = tracker_with_zoom(10);
        let start = Instant::now();
        tracker.handle(&touch(TouchKind::Down, 0.0, 0.0), start);
        tracker.handle(&pinch(TouchKind::PointerDown, 100.0), start);
        assert_eq!(tracker.check_hold(start), None);
    }

    #[test]
    fn stale_hold_check_is_ignored() {
        let mut tracker = GestureTracker::new(&Config::default());
        let first = Instant::now();
        tracker.handle(&touch(TouchKind::Down, 0.0, 0.0), first);
        tracker.handle(&touch(TouchKind::Up, 0.0, 0.0), first + Duration::from_millis(10));
        let second = first + Duration::from_millis(20);
        tracker.handle(&touch(TouchKind::Down, 0.0, 0.0), second);

        assert_eq!(tracker.check_hold(first), None);
        assert!(tracker.check_hold(second).is_some());
    }

    #[test]
    fn pinch_steps_zoom_within_range() {
        let mut tracker = tracker_with_zoom(2);
        tracker.handle(&pinch(TouchKind::PointerDown, 100.0), Instant::now());

        let mut levels = Vec::new();
        for spacing in [110.0, 120.0, 130.0, 120.0, 110.0, 100.0] {
            let reaction = tracker.handle(&pinch(TouchKind::Move, spacing), Instant::now());
            levels.push(tracker.zoom().current);
            assert_eq!(
                reaction.follow_up,
                Some(FollowUp::ApplyZoom(tracker.zoom().current))
            );
        }
        assert_eq!(levels, vec![1, 2, 2, 1, 0, 0]);
    }

    #[test]
    fn pinch_reports_zoom_even_when_unchanged() {
        let mut tracker = tracker_with_zoom(5);
        tracker.handle(&pinch(TouchKind::PointerDown, 50.0), Instant::now());
        let reaction = tracker.handle(&pinch(TouchKind::Move, 50.0), Instant::now());
        assert_eq!(
            reaction.events,
            vec![CameraEvent::Zoom(ZoomState { current: 0, maximum: 5 })]
        );
    }

    #[test]
    fn pinch_without_zoom_support_is_ignored() {
        let mut tracker = GestureTracker::new(&Config::default());
        tracker.handle(&pinch(TouchKind::PointerDown, 50.0), Instant::now());
        assert_eq!(
            tracker.handle(&pinch(TouchKind::Move, 80.0), Instant::now()),
            Reaction::default()
        );
    }

    #[test]
    fn shrinking_zoom_range_clamps_current() {
        let mut tracker = tracker_with_zoom(4);
        tracker.handle(&pinch(TouchKind::PointerDown, 0.0), Instant::now());
        for spacing in [1.0, 2.0, 3.0] {
            tracker.handle(&pinch(TouchKind::Move, spacing), Instant::now());
        }
        tracker.set_zoom_range(1);
        assert_eq!(tracker.zoom(), ZoomState { current: 1, maximum: 1 });
    }

    #[test]
    fn focus_result_and_completion_messages() {
        let mut tracker = GestureTracker::new(&Config::default());
        let events = tracker.focus_result(false);
        assert_eq!(
            events,
            vec![
                CameraEvent::Focus { activity: FocusActivity::Focus, bounds: None },
                CameraEvent::Focus { activity: FocusActivity::Failed, bounds: None },
            ]
        );
        assert_eq!(tracker.focus_state(), FocusState::Failed);

        tracker.focus_complete();
        assert_eq!(tracker.focus_state(), FocusState::Inactive);
    }

    #[test]
    fn touch_input_defaults_to_single_pointer() {
        let input: TouchInput =
            serde_json::from_str(r#"{ "kind": "down", "x": 1.5, "y": 2.5 }"#).unwrap();
        assert_eq!(input.pointer_count, 1);
        assert_eq!(input.spacing, None);
        assert_eq!(input.kind, TouchKind::Down);
    }
}
