//! Two-finger and trackpad pinch

use anyhow::ensure;
use ripple_gesture::{PinchRecognizer, RecognizerHandle, RefereeState};
use ripple_input::AxisAction;

use super::Log;
use crate::runner::ScenarioSuite;

pub(super) fn suite() -> ScenarioSuite {
    let mut suite = ScenarioSuite::new("pinch");

    suite.add("two_finger_spread", |ctx| {
        let root = ctx.root();
        let scales: Log<f32> = Log::default();
        let ended: Log<()> = Log::default();
        let (start_sink, end_sink) = (scales.clone(), ended.clone());
        let pinch = PinchRecognizer::standard(&ctx.gestures())
            .on_action_start(move |info| start_sink.borrow_mut().push(info.scale))
            .on_action_end(move |_| end_sink.borrow_mut().push(()));
        let pinch = RecognizerHandle::new(pinch);
        ctx.tree_mut().add_recognizer(root, pinch.clone());

        ctx.down(0, 100.0, 100.0);
        ctx.advance(10);
        ctx.down(1, 200.0, 100.0);
        ensure!(pinch.state() == RefereeState::Detecting, "pinch is {:?}", pinch.state());

        ctx.advance(16);
        ctx.move_to(1, 260.0, 100.0);
        ensure!(pinch.state() == RefereeState::Succeed, "pinch is {:?}", pinch.state());
        ensure!(
            scales.borrow().first().is_some_and(|scale| *scale > 1.0),
            "start scale {:?}",
            scales.borrow()
        );

        ctx.advance(16);
        ctx.up(1, 260.0, 100.0);
        ctx.up(0, 100.0, 100.0);
        ensure!(ended.borrow().len() == 1, "action end fired {} times", ended.borrow().len());
        ensure!(ctx.manager().referee().is_scopes_empty(), "scope left behind");
        Ok(())
    });

    suite.add("trackpad_pinch", |ctx| {
        let root = ctx.root();
        let pinch = RecognizerHandle::new(PinchRecognizer::standard(&ctx.gestures()));
        ctx.tree_mut().add_recognizer(root, pinch.clone());

        ensure!(ctx.axis(AxisAction::Begin, 50.0, 50.0, 0.0), "begin had no candidates");
        ensure!(pinch.state() == RefereeState::Detecting, "pinch is {:?}", pinch.state());
        ctx.advance(16);
        ctx.axis(AxisAction::Update, 50.0, 50.0, 0.8);
        ensure!(pinch.state() == RefereeState::Succeed, "pinch is {:?}", pinch.state());
        ctx.advance(16);
        ctx.axis(AxisAction::End, 50.0, 50.0, 0.0);
        ensure!(ctx.manager().axis_touch_test_results().is_empty(), "axis candidates left behind");
        Ok(())
    });

    suite
}
