//! Event tree diagnostics
//!
//! Each event tree covers one gesture: it opens on the first DOWN after all
//! fingers were lifted and records the touch points, a snapshot of every
//! candidate recognizer per finger, and the procedures each recognizer ran.
//! Only the most recent [`MAX_EVENT_TREES`] trees are kept.

use std::collections::VecDeque;

use indexmap::IndexMap;

use ripple_gesture::GestureSnapshot;
use ripple_input::{Point, Timestamp, TouchEvent, TouchType};

pub const MAX_EVENT_TREES: usize = 5;

/// Which record a dump is taken from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EventTreeType {
    #[default]
    Touch,
    PostEvent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TouchPointRecord {
    pub id: i32,
    pub point: Point,
    pub kind: TouchType,
    pub time: Timestamp,
    pub is_falsified: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureProcedure {
    /// Snapshot id of the target that ran the procedure
    pub target: u64,
    pub procedure: String,
    pub state: &'static str,
    pub disposal: &'static str,
    pub time: Timestamp,
}

#[derive(Clone, Debug, Default)]
pub struct EventTree {
    pub touch_points: Vec<TouchPointRecord>,
    pub gesture_snapshots: IndexMap<i32, Vec<GestureSnapshot>>,
    pub procedures: Vec<GestureProcedure>,
    pub touch_down_count: i32,
}

#[derive(Clone, Debug, Default)]
pub struct EventTreeRecord {
    trees: VecDeque<EventTree>,
}

impl EventTreeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trees(&self) -> impl Iterator<Item = &EventTree> {
        self.trees.iter()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn clear(&mut self) {
        self.trees.clear();
    }

    pub fn add_touch_point(&mut self, event: &TouchEvent) {
        if event.kind == TouchType::Down {
            let needs_tree = self.trees.back().map_or(true, |t| t.touch_down_count <= 0);
            if needs_tree {
                if self.trees.len() == MAX_EVENT_TREES {
                    self.trees.pop_front();
                }
                self.trees.push_back(EventTree::default());
            }
        }
        let Some(tree) = self.trees.back_mut() else {
            return;
        };
        match event.kind {
            TouchType::Down => tree.touch_down_count += 1,
            TouchType::Up | TouchType::Cancel => tree.touch_down_count -= 1,
            _ => {}
        }
        tree.touch_points.push(TouchPointRecord {
            id: event.id,
            point: event.position(),
            kind: event.kind,
            time: event.time,
            is_falsified: event.is_falsified,
        });
    }

    pub fn add_gesture_snapshot(&mut self, finger: i32, snapshot: GestureSnapshot) {
        if let Some(tree) = self.trees.back_mut() {
            tree.gesture_snapshots.entry(finger).or_default().push(snapshot);
        }
    }

    pub fn add_gesture_procedure(
        &mut self,
        target: u64,
        procedure: impl Into<String>,
        state: &'static str,
        disposal: &'static str,
        time: Timestamp,
    ) {
        if let Some(tree) = self.trees.back_mut() {
            tree.procedures.push(GestureProcedure {
                target,
                procedure: procedure.into(),
                state,
                disposal,
                time,
            });
        }
    }

    /// `(depth, line)` pairs, at most `limit` of them
    pub fn dump(&self, start_depth: i32, limit: usize) -> Vec<(i32, String)> {
        let mut out = Vec::new();
        for (index, tree) in self.trees.iter().enumerate() {
            let mut lines = vec![(start_depth, format!("event tree_{}", index))];
            lines.push((start_depth + 1, "touch points:".to_string()));
            for point in &tree.touch_points {
                lines.push((
                    start_depth + 2,
                    format!(
                        "id: {}, point: ({:.1}, {:.1}), type: {}, timestamp: {}{}",
                        point.id,
                        point.point.x,
                        point.point.y,
                        point.kind.name(),
                        point.time.as_millis(),
                        if point.is_falsified { ", falsified" } else { "" }
                    ),
                ));
            }
            lines.push((start_depth + 1, "gesture tree:".to_string()));
            for (finger, snapshots) in &tree.gesture_snapshots {
                lines.push((start_depth + 2, format!("finger: {}", finger)));
                for snapshot in snapshots {
                    let depth = start_depth + 3 + snapshot.depth as i32;
                    lines.push((depth, format!("{}", GestureLine(snapshot))));
                    for procedure in tree.procedures.iter().filter(|p| p.target == snapshot.id) {
                        lines.push((
                            depth + 1,
                            format!(
                                "procedure: {}, state: {}, disposal: {}, timestamp: {}",
                                procedure.procedure,
                                procedure.state,
                                procedure.disposal,
                                procedure.time.as_millis()
                            ),
                        ));
                    }
                }
            }
            for line in lines {
                if out.len() >= limit {
                    tracing::warn!(limit, "event tree dump truncated");
                    return out;
                }
                out.push(line);
            }
        }
        out
    }
}

/// Snapshot without the indentation its `Display` adds
struct GestureLine<'a>(&'a GestureSnapshot);

impl std::fmt::Display for GestureLine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.0;
        write!(f, "{}#{}", snapshot.kind, snapshot.id)?;
        if let Some(parent) = snapshot.parent_id {
            write!(f, ", parent: {}", parent)?;
        }
        if !snapshot.custom_info.is_empty() {
            write!(f, ", {}", snapshot.custom_info)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ripple_gesture::RecognizerId;

    use super::*;

    fn event(id: i32, kind: TouchType, ms: u64) -> TouchEvent {
        TouchEvent::new(id, kind, 1.0, 2.0, Timestamp::from_millis(ms))
    }

    #[test]
    fn test_new_tree_starts_after_all_fingers_lifted() {
        let mut record = EventTreeRecord::new();
        record.add_touch_point(&event(0, TouchType::Down, 0));
        record.add_touch_point(&event(1, TouchType::Down, 5));
        record.add_touch_point(&event(0, TouchType::Up, 10));
        assert_eq!(record.len(), 1);
        record.add_touch_point(&event(1, TouchType::Up, 20));
        record.add_touch_point(&event(0, TouchType::Down, 30));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_keeps_last_trees_only() {
        let mut record = EventTreeRecord::new();
        for i in 0..(MAX_EVENT_TREES as u64 + 2) {
            record.add_touch_point(&event(0, TouchType::Down, i * 10));
            record.add_touch_point(&event(0, TouchType::Up, i * 10 + 5));
        }
        assert_eq!(record.len(), MAX_EVENT_TREES);
    }

    #[test]
    fn test_dump_includes_procedures_and_respects_limit() {
        let mut record = EventTreeRecord::new();
        record.add_touch_point(&event(0, TouchType::Down, 0));
        let snapshot = GestureSnapshot::new(RecognizerId::from_raw(7), None, None, "Click", String::new());
        record.add_gesture_snapshot(0, snapshot);
        record.add_gesture_procedure(7, "HandleTouchDown", "DETECTING", "NONE", Timestamp::ZERO);

        let lines = record.dump(0, usize::MAX);
        assert!(lines.iter().any(|(d, l)| *d == 3 && l == "Click#7"));
        assert!(lines
            .iter()
            .any(|(d, l)| *d == 4 && l.starts_with("procedure: HandleTouchDown, state: DETECTING")));

        assert_eq!(record.dump(0, 3).len(), 3);
    }
}
