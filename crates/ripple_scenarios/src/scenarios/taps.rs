//! Multi-tap and long press timing

use anyhow::ensure;
use ripple_gesture::{ClickRecognizer, LongPressRecognizer, RecognizerHandle, RefereeState};

use super::{button, Log};
use crate::runner::ScenarioSuite;

pub(super) fn suite() -> ScenarioSuite {
    let mut suite = ScenarioSuite::new("taps");

    suite.add("double_tap", |ctx| {
        let node = button(ctx);
        let counts: Log<u32> = Log::default();
        let sink = counts.clone();
        let double = ClickRecognizer::new(&ctx.gestures(), 1, 2)?
            .on_action(move |info| sink.borrow_mut().push(info.count));
        let double = RecognizerHandle::new(double);
        ctx.tree_mut().add_recognizer(node, double.clone());

        ctx.down(0, 10.0, 10.0);
        ctx.advance(50);
        ctx.up(0, 10.0, 10.0);
        ensure!(double.state() == RefereeState::Pending, "after one tap: {:?}", double.state());

        ctx.advance(100);
        ctx.down(0, 12.0, 10.0);
        ctx.advance(50);
        ctx.up(0, 12.0, 10.0);
        ensure!(*counts.borrow() == vec![2], "counts {:?}", counts.borrow());
        Ok(())
    });

    suite.add("second_tap_too_late", |ctx| {
        let node = button(ctx);
        let double = RecognizerHandle::new(ClickRecognizer::new(&ctx.gestures(), 1, 2)?);
        ctx.tree_mut().add_recognizer(node, double.clone());

        ctx.down(0, 10.0, 10.0);
        ctx.advance(50);
        ctx.up(0, 10.0, 10.0);
        ctx.advance(400);
        ensure!(double.state() == RefereeState::Fail, "double tap is {:?}", double.state());
        Ok(())
    });

    suite.add("repeating_long_press", |ctx| {
        let node = button(ctx);
        let fired: Log<bool> = Log::default();
        let ended: Log<()> = Log::default();
        let (fire_sink, end_sink) = (fired.clone(), ended.clone());
        let press = LongPressRecognizer::new(&ctx.gestures(), 1, true, 500)?
            .on_action(move |info| fire_sink.borrow_mut().push(info.repeat))
            .on_action_end(move |_| end_sink.borrow_mut().push(()));
        ctx.tree_mut().add_recognizer(node, RecognizerHandle::new(press));

        ctx.down(0, 10.0, 10.0);
        ctx.advance(600);
        ensure!(*fired.borrow() == vec![false], "first firing {:?}", fired.borrow());
        ctx.advance(500);
        ensure!(*fired.borrow() == vec![false, true], "repeat firing {:?}", fired.borrow());
        ctx.up(0, 10.0, 10.0);
        ensure!(ended.borrow().len() == 1, "action end fired {} times", ended.borrow().len());
        Ok(())
    });

    suite
}
