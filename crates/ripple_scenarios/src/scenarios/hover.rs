//! Mouse hover and press chains

use std::rc::Rc;

use anyhow::ensure;
use ripple_events::{EventManagerConfig, MouseEventInfo, Propagation};
use ripple_gesture::NodeId;
use ripple_input::{MouseAction, MouseButton, MouseEvent};

use super::{button, Log};
use crate::context::ScenarioContext;
use crate::runner::ScenarioSuite;

fn record_hover(ctx: &mut ScenarioContext, node: NodeId, log: &Log<(NodeId, bool)>) {
    let sink = Rc::clone(log);
    ctx.tree_mut().set_on_hover(
        node,
        Rc::new(move |hovered: bool, _: &MouseEvent| {
            sink.borrow_mut().push((node, hovered));
            Propagation::Continue
        }),
    );
}

fn hover_in_and_out(ctx: &mut ScenarioContext) -> anyhow::Result<()> {
    let root = ctx.root();
    let node = button(ctx);
    let log: Log<(NodeId, bool)> = Log::default();
    record_hover(ctx, root, &log);
    record_hover(ctx, node, &log);

    ctx.hover(50.0, 50.0);
    ensure!(log.borrow().contains(&(node, true)), "no enter on button: {:?}", log.borrow());
    ensure!(log.borrow().contains(&(root, true)), "no enter on root: {:?}", log.borrow());

    log.borrow_mut().clear();
    ctx.advance(16);
    ctx.hover(300.0, 300.0);
    ensure!(*log.borrow() == vec![(node, false)], "leaving button: {:?}", log.borrow());
    Ok(())
}

pub(super) fn suite() -> ScenarioSuite {
    let mut suite = ScenarioSuite::new("hover");

    suite.add("hover_enter_exit", hover_in_and_out);
    suite.add_with_config("legacy_hover_enter_exit", EventManagerConfig::legacy(), hover_in_and_out);

    suite.add("press_follows_the_pressed_node", |ctx| {
        let node = button(ctx);
        let actions: Log<MouseAction> = Log::default();
        let sink = Rc::clone(&actions);
        ctx.tree_mut().set_on_mouse(
            node,
            Rc::new(move |info: &MouseEventInfo| {
                sink.borrow_mut().push(info.action);
                Propagation::Continue
            }),
        );

        ctx.mouse(MouseAction::Press, MouseButton::Left, 50.0, 50.0);
        ctx.advance(16);
        ctx.mouse(MouseAction::Move, MouseButton::Left, 300.0, 300.0);
        ctx.advance(16);
        ctx.mouse(MouseAction::Release, MouseButton::Left, 300.0, 300.0);

        let expected = vec![MouseAction::Press, MouseAction::Move, MouseAction::Release];
        ensure!(*actions.borrow() == expected, "button saw {:?}", actions.borrow());
        Ok(())
    });

    suite
}
