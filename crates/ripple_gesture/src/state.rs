//! Referee-visible recognizer states

/// Where a recognizer stands in arbitration.
///
/// ```text
/// READY ──▶ DETECTING ──┬──▶ SUCCEED
///                       ├──▶ FAIL
///                       ├──▶ PENDING ─────────┬──▶ SUCCEED / FAIL
///                       └──▶ (blocked) ───────┘
///                             PENDING_BLOCKED / SUCCEED_BLOCKED
/// ```
///
/// SUCCEED and FAIL are terminal until the recognizer is reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefereeState {
    #[default]
    Ready,
    Detecting,
    Pending,
    PendingBlocked,
    SucceedBlocked,
    Succeed,
    Fail,
}

impl RefereeState {
    pub fn name(&self) -> &'static str {
        match self {
            RefereeState::Ready => "READY",
            RefereeState::Detecting => "DETECTING",
            RefereeState::Pending => "PENDING",
            RefereeState::PendingBlocked => "PENDING_BLOCKED",
            RefereeState::SucceedBlocked => "SUCCEED_BLOCKED",
            RefereeState::Succeed => "SUCCEED",
            RefereeState::Fail => "FAIL",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RefereeState::Succeed | RefereeState::Fail)
    }

    /// Still contending: started detecting but not yet resolved.
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            RefereeState::Detecting
                | RefereeState::Pending
                | RefereeState::PendingBlocked
                | RefereeState::SucceedBlocked
        )
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, RefereeState::PendingBlocked | RefereeState::SucceedBlocked)
    }
}

/// What a recognizer asks the referee for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureDisposal {
    #[default]
    None,
    Accept,
    Pending,
    Reject,
}

impl GestureDisposal {
    pub fn name(&self) -> &'static str {
        match self {
            GestureDisposal::None => "NONE",
            GestureDisposal::Accept => "ACCEPT",
            GestureDisposal::Pending => "PENDING",
            GestureDisposal::Reject => "REJECT",
        }
    }
}

/// Tier a recognizer occupies inside a gesture scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePriority {
    /// Ordinary gestures; wait for unresolved high-priority gestures.
    #[default]
    Low,
    /// Gestures bound with priority; resolve before low ones.
    High,
    /// Never blocked and never rejected by another member's success.
    Parallel,
}

/// Verdict of a host-supplied gesture judge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureJudgeResult {
    #[default]
    Continue,
    Reject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_classes() {
        assert!(RefereeState::Succeed.is_terminal());
        assert!(RefereeState::Fail.is_terminal());
        assert!(!RefereeState::Ready.is_terminal());
        assert!(!RefereeState::Ready.is_unresolved());
        assert!(RefereeState::SucceedBlocked.is_unresolved());
        assert!(RefereeState::PendingBlocked.is_blocked());
        assert_eq!(RefereeState::PendingBlocked.name(), "PENDING_BLOCKED");
    }
}
