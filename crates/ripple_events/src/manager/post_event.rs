//! Injected ("post") touch events
//!
//! Events posted by the application run through their own candidate map,
//! referee and event tree so they never disturb real touches in flight.

use ripple_gesture::{GestureRecognizer, NodeId};
use ripple_input::{TouchEvent, TouchType};

use super::{recognizers_of, EventManager};
use crate::event_tree::EventTreeType;
use crate::target::TouchTestTarget;
use crate::tree::{HitTestKind, NodeTree};

impl EventManager {
    /// Hit-test for an injected DOWN. Returns whether anything was hit.
    pub fn post_event_touch_test(&mut self, event: &TouchEvent, tree: &NodeTree, root: NodeId) -> bool {
        if !tree.contains(root) {
            return false;
        }
        self.post_event_referee.check_source_type_change(event.source_type, false);
        if self.post_event_referee.query_all_done_for(event.id) {
            self.post_event_referee.clean_gesture_scope(event.id);
            if self.post_event_touch_test_results.is_empty() && self.post_event_referee.query_all_done() {
                self.post_event_referee.clean_all(false);
            }
        }

        let hits = tree.hit_test(root, event.position(), HitTestKind::Touch, Some(event));
        let results = self.collect_touch_targets(tree, &hits);
        for handle in results.iter().filter_map(TouchTestTarget::recognizer) {
            handle.borrow_mut().set_post_event_result(true);
        }
        self.index_recognizers(&results);
        tracing::debug!(finger = event.id, candidates = results.len(), "post event touch test");

        let hit = !results.is_empty();
        self.post_event_touch_test_results.insert(event.id, results);
        hit
    }

    /// Deliver an injected sample. Returns false when it has no candidates.
    pub fn post_event_dispatch_touch_event(&mut self, event: &TouchEvent) -> bool {
        self.advance_time(event.time);
        let Some(results) = self.post_event_touch_test_results.get(&event.id).cloned() else {
            return false;
        };
        self.post_event_tree.add_touch_point(event);

        if event.kind == TouchType::Down {
            self.post_event_referee
                .add_gesture_to_scope(event.id, &recognizers_of(&results));
            self.add_snapshots(EventTreeType::PostEvent, event.id, &results);
        }

        if Self::dispatch_multi_container_event(&results, event) {
            self.dispatch_touch_event_to_touch_test_result(event, &results, true, EventTreeType::PostEvent);
        }

        if matches!(event.kind, TouchType::Up | TouchType::Cancel) {
            self.post_event_referee.clean_gesture_scope(event.id);
            self.post_event_touch_test_results.shift_remove(&event.id);
            if self.post_event_touch_test_results.is_empty() {
                self.post_event_referee.clean_redundance_scope();
            }
        }
        true
    }

    /// Hit-test on DOWN, then dispatch.
    pub fn post_touch_event(&mut self, event: &TouchEvent, tree: &NodeTree, root: NodeId) -> bool {
        if event.kind == TouchType::Down && !self.post_event_touch_test(event, tree, root) {
            tracing::info!(finger = event.id, "post event hit nothing");
        }
        self.post_event_dispatch_touch_event(event)
    }

    pub fn post_event_flush_touch_event_end(&mut self, event: &TouchEvent) {
        if let Some(results) = self.post_event_touch_test_results.get(&event.id).cloned() {
            for target in results.iter().rev() {
                target.on_flush_touch_events_end();
            }
        }
        self.flush_disposals();
    }
}
