//! Recognizer snapshots for the event tree dump

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::node::NodeId;
use crate::recognizer::RecognizerId;
use crate::state::{GestureDisposal, RefereeState};

/// Transitions kept per recognizer
pub const MAX_STATE_HISTORY: usize = 16;

/// One referee state transition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StateRecord {
    #[serde(serialize_with = "serialize_state")]
    pub state: RefereeState,
    #[serde(serialize_with = "serialize_disposal")]
    pub disposal: GestureDisposal,
}

fn serialize_state<S: serde::Serializer>(state: &RefereeState, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(state.name())
}

fn serialize_disposal<S: serde::Serializer>(disposal: &GestureDisposal, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(disposal.name())
}

/// Bounded transition log
#[derive(Clone, Debug, Default)]
pub struct StateHistory {
    records: VecDeque<StateRecord>,
}

impl StateHistory {
    pub fn push(&mut self, record: StateRecord) {
        if self.records.len() == MAX_STATE_HISTORY {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Point-in-time view of one recognizer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GestureSnapshot {
    pub id: u64,
    pub parent_id: Option<u64>,
    pub node_id: Option<u64>,
    /// Nesting depth inside groups
    pub depth: usize,
    pub kind: &'static str,
    pub custom_info: String,
    pub state_history: Vec<StateRecord>,
}

impl GestureSnapshot {
    pub fn new(
        id: RecognizerId,
        parent: Option<RecognizerId>,
        node: Option<NodeId>,
        kind: &'static str,
        custom_info: String,
    ) -> Self {
        Self {
            id: id.as_raw(),
            parent_id: parent.map(|p| p.as_raw()),
            node_id: node.map(NodeId::to_raw),
            depth: 0,
            kind,
            custom_info,
            state_history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: &StateHistory) -> Self {
        self.state_history = history.iter().copied().collect();
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Most recent state, READY if nothing was recorded
    pub fn last_state(&self) -> RefereeState {
        self.state_history
            .last()
            .map(|r| r.state)
            .unwrap_or_default()
    }
}

impl fmt::Display for GestureSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:indent$}{}#{}", "", self.kind, self.id, indent = self.depth * 2)?;
        if !self.custom_info.is_empty() {
            write!(f, " [{}]", self.custom_info)?;
        }
        let states: Vec<&str> = self.state_history.iter().map(|r| r.state.name()).collect();
        write!(f, " {}", states.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let mut history = StateHistory::default();
        for _ in 0..(MAX_STATE_HISTORY + 4) {
            history.push(StateRecord {
                state: RefereeState::Detecting,
                disposal: GestureDisposal::None,
            });
        }
        assert_eq!(history.len(), MAX_STATE_HISTORY);
    }

    #[test]
    fn test_display_lists_states() {
        let mut history = StateHistory::default();
        history.push(StateRecord {
            state: RefereeState::Detecting,
            disposal: GestureDisposal::None,
        });
        history.push(StateRecord {
            state: RefereeState::Succeed,
            disposal: GestureDisposal::Accept,
        });
        let snapshot = GestureSnapshot::new(RecognizerId::from_raw(7), None, None, "Click", String::new())
            .with_history(&history)
            .with_depth(1);
        assert_eq!(snapshot.to_string(), "  Click#7 DETECTING -> SUCCEED");
        assert_eq!(snapshot.last_state(), RefereeState::Succeed);
    }
}
