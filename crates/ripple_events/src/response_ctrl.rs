//! First-responder monopolization
//!
//! The first node to receive a DOWN may claim every later touch until the
//! controller is reset. Nodes that do not claim it leave the controller
//! open to everyone.

use ripple_gesture::NodeId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MonopolizeState {
    /// No DOWN seen since the last reset
    #[default]
    Init,
    /// The first responder monopolizes events
    On,
    /// The first responder did not ask for monopolization
    Off,
}

/// Decides which nodes may respond while a first responder is active
#[derive(Clone, Debug, Default)]
pub struct ResponseCtrl {
    state: MonopolizeState,
    first_response_node: Option<NodeId>,
}

impl ResponseCtrl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MonopolizeState {
        self.state
    }

    pub fn first_response_node(&self) -> Option<NodeId> {
        self.first_response_node
    }

    pub fn should_response(&self, node: NodeId) -> bool {
        match (self.state, self.first_response_node) {
            (MonopolizeState::On, Some(first)) => first == node,
            _ => true,
        }
    }

    /// Record the first node that responds to a DOWN
    pub fn try_set_first_response(&mut self, node: NodeId, monopolize: bool) {
        if self.state != MonopolizeState::Init {
            return;
        }
        self.first_response_node = Some(node);
        self.state = if monopolize {
            MonopolizeState::On
        } else {
            MonopolizeState::Off
        };
        tracing::trace!(?node, monopolize, "first responder set");
    }

    pub fn reset(&mut self) {
        self.state = MonopolizeState::Init;
        self.first_response_node = None;
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn two_nodes() -> (NodeId, NodeId) {
        let mut nodes: SlotMap<NodeId, ()> = SlotMap::with_key();
        (nodes.insert(()), nodes.insert(()))
    }

    #[test]
    fn test_monopolizing_first_responder() {
        let (a, b) = two_nodes();
        let mut ctrl = ResponseCtrl::new();
        assert!(ctrl.should_response(b));

        ctrl.try_set_first_response(a, true);
        ctrl.try_set_first_response(b, false);
        assert_eq!(ctrl.first_response_node(), Some(a));
        assert!(ctrl.should_response(a));
        assert!(!ctrl.should_response(b));

        ctrl.reset();
        assert_eq!(ctrl.state(), MonopolizeState::Init);
        assert!(ctrl.should_response(b));
    }

    #[test]
    fn test_non_monopolizing_first_responder() {
        let (a, b) = two_nodes();
        let mut ctrl = ResponseCtrl::new();
        ctrl.try_set_first_response(a, false);
        assert_eq!(ctrl.state(), MonopolizeState::Off);
        assert!(ctrl.should_response(b));
    }
}
