//! Click against long press on one node

use anyhow::ensure;
use ripple_gesture::{ClickRecognizer, GestureRecognizer, LongPressRecognizer, RecognizerHandle, RefereeState};

use super::{button, Log};
use crate::runner::ScenarioSuite;

pub(super) fn suite() -> ScenarioSuite {
    let mut suite = ScenarioSuite::new("arbitration");

    suite.add("quick_tap_is_a_click", |ctx| {
        let node = button(ctx);
        let gestures = ctx.gestures();
        let fired: Log<&'static str> = Log::default();
        let (click_sink, press_sink) = (fired.clone(), fired.clone());
        let click = RecognizerHandle::new(
            ClickRecognizer::tap(&gestures).on_action(move |_| click_sink.borrow_mut().push("click")),
        );
        let press = RecognizerHandle::new(
            LongPressRecognizer::standard(&gestures).on_action(move |_| press_sink.borrow_mut().push("press")),
        );
        ctx.tree_mut().add_recognizer(node, click);
        ctx.tree_mut().add_recognizer(node, press.clone());

        ctx.down(0, 20.0, 20.0);
        ctx.advance(80);
        ctx.up(0, 20.0, 20.0);
        ctx.advance(1000);

        ensure!(*fired.borrow() == vec!["click"], "fired {:?}", fired.borrow());
        ensure!(
            press.borrow().core().history().iter().any(|record| record.state == RefereeState::Fail),
            "long press was never rejected"
        );
        ensure!(ctx.manager().referee().is_scopes_empty(), "scope left behind");
        Ok(())
    });

    suite.add("held_finger_is_a_long_press", |ctx| {
        let node = button(ctx);
        let gestures = ctx.gestures();
        let fired: Log<&'static str> = Log::default();
        let (click_sink, press_sink) = (fired.clone(), fired.clone());
        let click = RecognizerHandle::new(
            ClickRecognizer::tap(&gestures).on_action(move |_| click_sink.borrow_mut().push("click")),
        );
        let press = RecognizerHandle::new(
            LongPressRecognizer::standard(&gestures).on_action(move |_| press_sink.borrow_mut().push("press")),
        );
        ctx.tree_mut().add_recognizer(node, click.clone());
        ctx.tree_mut().add_recognizer(node, press);

        ctx.down(0, 20.0, 20.0);
        ctx.advance(600);
        ensure!(click.state() == RefereeState::Fail, "click is {:?}", click.state());
        ctx.up(0, 20.0, 20.0);

        ensure!(*fired.borrow() == vec!["press"], "fired {:?}", fired.borrow());
        ensure!(ctx.manager().referee().is_scopes_empty(), "scope left behind");
        Ok(())
    });

    suite
}
