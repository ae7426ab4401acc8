//! Broken input streams the manager must repair

use anyhow::ensure;
use ripple_events::{Propagation, TouchEventInfo};
use ripple_gesture::NodeId;
use ripple_input::TouchType;

use super::{button, Log};
use crate::context::ScenarioContext;
use crate::runner::ScenarioSuite;

type Seen = Log<(i32, TouchType, bool)>;

fn record_touches(ctx: &mut ScenarioContext, node: NodeId) -> Seen {
    let seen = Seen::default();
    let sink = seen.clone();
    ctx.tree_mut().set_on_touch(
        node,
        std::rc::Rc::new(move |info: &TouchEventInfo| {
            sink.borrow_mut().push((info.id, info.kind, info.is_falsified));
            Propagation::Continue
        }),
    );
    seen
}

pub(super) fn suite() -> ScenarioSuite {
    let mut suite = ScenarioSuite::new("recovery");

    suite.add("duplicate_down", |ctx| {
        let node = button(ctx);
        let seen = record_touches(ctx, node);

        ctx.down(0, 10.0, 10.0);
        ctx.advance(10);
        ctx.down(0, 10.0, 10.0);

        let expected = vec![
            (0, TouchType::Down, false),
            (0, TouchType::Cancel, true),
            (0, TouchType::Down, false),
        ];
        ensure!(*seen.borrow() == expected, "seen {:?}", seen.borrow());
        ensure!(ctx.manager().down_finger_ids().len() == 1, "stale finger kept");
        Ok(())
    });

    suite.add("up_without_down", |ctx| {
        let node = button(ctx);
        let seen = record_touches(ctx, node);

        ctx.down(0, 10.0, 10.0);
        ctx.advance(20);
        let delivered = ctx.up(3, 10.0, 10.0);

        ensure!(!delivered, "orphan up was dispatched");
        let expected = vec![(0, TouchType::Down, false), (0, TouchType::Cancel, true)];
        ensure!(*seen.borrow() == expected, "seen {:?}", seen.borrow());
        ensure!(ctx.manager().down_finger_ids().is_empty(), "finger 0 still down");
        Ok(())
    });

    suite.add("two_fingers_stay_untouched", |ctx| {
        let node = button(ctx);
        let seen = record_touches(ctx, node);

        ctx.down(0, 10.0, 10.0);
        ctx.advance(50);
        ctx.down(1, 20.0, 20.0);
        ctx.advance(50);
        ctx.up(1, 20.0, 20.0);
        ctx.up(0, 10.0, 10.0);

        ensure!(
            seen.borrow().iter().all(|(_, _, falsified)| !falsified),
            "well formed stream was patched: {:?}",
            seen.borrow()
        );
        ensure!(ctx.manager().touch_test_results().is_empty(), "candidates left behind");
        Ok(())
    });

    suite
}
