//! Finger bookkeeping shared by the leaf recognizers

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use ripple_input::{Point, TouchEvent};

/// Tracks which fingers a recognizer is following.
///
/// `touch_points` remembers the DOWN sample and the latest sample of each
/// finger; `active_fingers` lists fingers whose gesture scope is still open.
#[derive(Clone, Debug, Default)]
pub struct MultiFingersState {
    fingers: usize,
    down_points: FxHashMap<i32, TouchEvent>,
    touch_points: FxHashMap<i32, TouchEvent>,
    active_fingers: SmallVec<[i32; 4]>,
    current_fingers: usize,
}

impl MultiFingersState {
    pub fn new(fingers: usize) -> Self {
        Self {
            fingers,
            ..Default::default()
        }
    }

    /// Required finger count
    pub fn fingers(&self) -> usize {
        self.fingers
    }

    /// Fingers currently pressed
    pub fn current_fingers(&self) -> usize {
        self.current_fingers
    }

    pub fn equals_to_fingers(&self) -> bool {
        self.current_fingers == self.fingers
    }

    pub fn active_fingers(&self) -> &[i32] {
        &self.active_fingers
    }

    pub fn is_active(&self, id: i32) -> bool {
        self.active_fingers.contains(&id)
    }

    pub fn touch_point(&self, id: i32) -> Option<&TouchEvent> {
        self.touch_points.get(&id)
    }

    pub fn down_point(&self, id: i32) -> Option<&TouchEvent> {
        self.down_points.get(&id)
    }

    pub fn touch_points(&self) -> impl Iterator<Item = &TouchEvent> {
        self.touch_points.values()
    }

    /// Record a finger going down. Returns false if the finger was already
    /// active, as happens on the second tap of a multi-tap.
    pub fn add_finger(&mut self, event: &TouchEvent) -> bool {
        self.down_points.insert(event.id, event.clone());
        self.touch_points.insert(event.id, event.clone());
        self.current_fingers += 1;
        if self.active_fingers.contains(&event.id) {
            return false;
        }
        self.active_fingers.push(event.id);
        true
    }

    /// Record the latest sample of a tracked finger.
    pub fn update_point(&mut self, event: &TouchEvent) {
        if let Some(point) = self.touch_points.get_mut(&event.id) {
            *point = event.clone();
        }
    }

    /// Record a finger lifting; its samples stay until the referee finishes.
    pub fn release_finger(&mut self, event: &TouchEvent) {
        self.update_point(event);
        self.current_fingers = self.current_fingers.saturating_sub(1);
    }

    /// Forget a finger whose scope closed.
    pub fn finish(&mut self, id: i32) {
        self.touch_points.remove(&id);
        self.down_points.remove(&id);
        self.active_fingers.retain(|f| *f != id);
    }

    pub fn clear(&mut self) {
        self.touch_points.clear();
        self.down_points.clear();
        self.active_fingers.clear();
        self.current_fingers = 0;
    }

    /// Centroid of the latest samples of all tracked fingers
    pub fn centroid(&self) -> Point {
        let count = self.touch_points.len();
        if count == 0 {
            return Point::default();
        }
        let (sx, sy) = self
            .touch_points
            .values()
            .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / count as f32, sy / count as f32)
    }

    /// Mean distance of the tracked fingers from their centroid
    pub fn average_deviation(&self) -> f32 {
        let count = self.touch_points.len();
        if count == 0 {
            return 0.0;
        }
        let center = self.centroid();
        let sum: f32 = self
            .touch_points
            .values()
            .map(|p| p.position().distance_to(center))
            .sum();
        sum / count as f32
    }

    /// Largest distance any finger travelled from its DOWN position
    pub fn max_travel(&self) -> f32 {
        self.touch_points
            .iter()
            .filter_map(|(id, p)| {
                self.down_points
                    .get(id)
                    .map(|down| p.position().distance_to(down.position()))
            })
            .fold(0.0, f32::max)
    }
}
