use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ripple_gesture::{
    ClickRecognizer, GestureConfig, GestureContext, GestureRecognizer, GestureReferee,
    LongPressRecognizer, PanRecognizer, RecognizerHandle,
};
use ripple_input::{Timestamp, TouchEvent, TouchType};

fn tap_against_competitors(c: &mut Criterion) {
    let ctx = GestureContext::new(GestureConfig::standard());
    let handles = vec![
        RecognizerHandle::new(ClickRecognizer::tap(&ctx)),
        RecognizerHandle::new(LongPressRecognizer::standard(&ctx)),
        RecognizerHandle::new(PanRecognizer::standard(&ctx)),
    ];

    c.bench_function("tap_three_competitors", |b| {
        b.iter(|| {
            let mut referee = GestureReferee::new();
            referee.add_gesture_to_scope(0, &handles);
            let down = TouchEvent::new(0, TouchType::Down, 10.0, 10.0, Timestamp::ZERO);
            let up = TouchEvent::new(0, TouchType::Up, 10.0, 10.0, Timestamp::from_millis(60));
            for event in [&down, &up] {
                for handle in &handles {
                    handle.borrow_mut().handle_event(black_box(event));
                }
                while let Some(d) = ctx.take_disposal() {
                    if let Some(handle) = handles.iter().find(|h| h.id() == d.recognizer) {
                        referee.adjudicate(handle, d.disposal);
                    }
                }
            }
            referee.clean_gesture_scope(0);
            while ctx.pop_due_timer(Timestamp::from_millis(u64::MAX / 1_000_000)).is_some() {}
        })
    });
}

criterion_group!(benches, tap_against_competitors);
criterion_main!(benches);
