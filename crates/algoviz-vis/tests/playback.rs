//! Timing behavior of the playback controller, on a paused tokio clock.

use std::time::Duration;

use algoviz_trace::{generate_trace, generate_greedy_trace, Trace, TraceFamily};
use algoviz_vis::{FrameRecorder, PlaybackController, PlaybackState};
use serde_json::json;

const SPEED: u64 = 100;

async fn wait(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

fn five_steps() -> Trace {
    tokio_test::assert_ok!(generate_greedy_trace(18, &[10, 5, 1]))
}

fn setup() -> (PlaybackController, FrameRecorder) {
    let recorder = FrameRecorder::new();
    let controller = tokio_test::assert_ok!(PlaybackController::with_speed(recorder.clone(), SPEED));
    (controller, recorder)
}

#[tokio::test(start_paused = true)]
async fn five_steps_finish_within_five_ticks() {
    let (controller, _recorder) = setup();
    controller.load(five_steps());
    assert_eq!(controller.trace().len(), 5);

    controller.play();
    wait(5 * SPEED).await;

    assert_eq!(controller.state(), PlaybackState::Finished);
    assert_eq!(controller.position(), 5);
    assert!(!controller.has_pending_tick());
}

#[tokio::test(start_paused = true)]
async fn pause_at_step_two_stays_there() {
    let (controller, _recorder) = setup();
    controller.load(five_steps());
    controller.play();

    wait(SPEED + SPEED / 2).await;
    controller.pause();
    assert_eq!(controller.position(), 2);

    wait(100 * SPEED).await;
    assert_eq!(controller.position(), 2);
    assert_eq!(controller.state(), PlaybackState::Paused);
}

#[tokio::test(start_paused = true)]
async fn reset_while_playing_cancels_pending_tick() {
    let (controller, recorder) = setup();
    controller.load(five_steps());
    controller.play();

    wait(SPEED / 2).await;
    controller.reset();
    assert_eq!(controller.state(), PlaybackState::Ready);
    assert_eq!(controller.position(), 0);
    assert!(!controller.has_pending_tick());

    let frames_after_reset = recorder.len();
    wait(10 * SPEED).await;
    assert_eq!(controller.position(), 0);
    assert_eq!(recorder.len(), frames_after_reset);
    assert_eq!(recorder.last().unwrap().indicator, "Paso 1 de 5");
}

#[tokio::test(start_paused = true)]
async fn stale_tick_cannot_advance_fresh_play() {
    let (controller, _recorder) = setup();
    controller.load(five_steps());

    // old tick would fire at t=100
    controller.play();
    wait(50).await;
    controller.reset();

    // fresh play at t=50, its first tick is due at t=150
    controller.play();
    assert_eq!(controller.position(), 1);

    wait(70).await;
    assert_eq!(controller.position(), 1);

    wait(40).await;
    assert_eq!(controller.position(), 2);
}

#[tokio::test(start_paused = true)]
async fn load_replaces_trace_mid_playback() {
    let (controller, recorder) = setup();
    controller.load(five_steps());
    controller.play();
    wait(SPEED + 10).await;
    assert_eq!(controller.position(), 2);

    controller.load(generate_trace(
        TraceFamily::Recursion,
        &json!([1.0, 2.0, 3.0]),
    ));
    assert_eq!(controller.state(), PlaybackState::Ready);
    assert_eq!(controller.position(), 0);

    wait(10 * SPEED).await;
    assert_eq!(controller.position(), 0);
    assert_eq!(recorder.last().unwrap().indicator, "Paso 1 de 7");
    assert_eq!(controller.trace().len(), 7);
}

#[tokio::test(start_paused = true)]
async fn speed_change_applies_to_next_tick_only() {
    let (controller, _recorder) = setup();
    controller.load(five_steps());

    // t=0: first step shown, tick due at t=100
    controller.play();
    wait(50).await;
    controller.set_speed(3 * SPEED);

    // the in-flight tick keeps its 100 ms delay
    wait(70).await;
    assert_eq!(controller.position(), 2);

    // next tick now due at t=400
    wait(270).await;
    assert_eq!(controller.position(), 2);

    wait(20).await;
    assert_eq!(controller.position(), 3);
}

#[tokio::test(start_paused = true)]
async fn frames_follow_position_order() {
    let (controller, recorder) = setup();
    controller.load(generate_trace(
        TraceFamily::MstKruskal,
        &json!({
            "mst": [
                { "from": "A", "to": "B", "weight": 1 },
                { "from": "B", "to": "C", "weight": 2 },
                { "from": "C", "to": "D", "weight": 3 }
            ],
            "costoTotal": 6,
            "numeroAristas": 3,
            "complejidad": "O(E log E)"
        }),
    ));
    recorder.clear();

    controller.play();
    wait(10 * SPEED).await;

    let positions: Vec<usize> = recorder.frames().iter().map(|f| f.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);

    let last = recorder.last().unwrap();
    assert_eq!(last.detail("Costo acumulado").unwrap().value, "6");
}
