//! Built-in scenario suites

use std::cell::RefCell;
use std::rc::Rc;

use ripple_gesture::NodeId;
use ripple_input::Rect;

use crate::context::ScenarioContext;
use crate::runner::ScenarioSuite;

mod arbitration;
mod hover;
mod pinch;
mod recovery;
mod taps;

/// Shared capture for callbacks.
pub(crate) type Log<T> = Rc<RefCell<Vec<T>>>;

/// A 100x100 button in the root's top-left corner.
pub(crate) fn button(ctx: &mut ScenarioContext) -> NodeId {
    let root = ctx.root();
    ctx.node(root, "Button", Rect::new(0.0, 0.0, 100.0, 100.0))
}

pub fn all_suites() -> Vec<ScenarioSuite> {
    vec![
        arbitration::suite(),
        taps::suite(),
        pinch::suite(),
        recovery::suite(),
        hover::suite(),
    ]
}
