// End-to-end round scenarios: inbound JSON in, outbound events and punch
// lines out, driven tick by tick with a hand-set clock and a scripted pad.

use std::cell::Cell;
use std::rc::Rc;

use boxer_box::clock::ManualClock;
use boxer_box::controller::RoundController;
use boxer_box::detector::{ForceSensor, PunchDetector, SensorChannel, Thresholds};
use boxer_box::role::DeviceRole;
use boxer_box::transport::{LoopbackTransport, Transport};

const TICK_MS: u64 = 5;

#[derive(Clone, Default)]
struct Pad(Rc<Cell<i32>>);

impl ForceSensor for Pad {
    fn read_millivolts(&mut self) -> anyhow::Result<i32> {
        Ok(self.0.get())
    }
}

type App = RoundController<Pad, LoopbackTransport, ManualClock>;

struct Bench {
    pads: Vec<Pad>,
    clock: ManualClock,
    app: App,
}

impl Bench {
    fn new(role: DeviceRole) -> Self {
        let pads = vec![Pad::default(), Pad::default(), Pad::default()];
        let channels = pads
            .iter()
            .zip([4u8, 5, 6])
            .map(|(pad, pin)| SensorChannel::new(pin, pad.clone()))
            .collect();
        let clock = ManualClock::new(1_000);
        let app = RoundController::new(
            PunchDetector::new(channels, Thresholds::default()),
            LoopbackTransport::new(),
            clock.clone(),
            role,
        );
        Self { pads, clock, app }
    }

    fn send(&mut self, json: &str) {
        self.app.transport().deliver(json);
        self.step();
    }

    fn step(&mut self) {
        self.app.tick();
        self.clock.advance(TICK_MS);
    }

    /// Hold `mv` on one pad for `ms`, ticking the loop throughout.
    fn hold(&mut self, pad: usize, mv: i32, ms: u64) {
        self.pads[pad].0.set(mv);
        for _ in 0..ms / TICK_MS {
            self.step();
        }
    }

    fn sent(&mut self) -> Vec<String> {
        self.app.transport_mut().take_sent()
    }
}

#[test]
fn start_two_punches_then_end() {
    let mut bench = Bench::new(DeviceRole::RedBoxer);

    bench.send(r#"{"RoundStatusCommand":{"Command":1}}"#);
    assert_eq!(bench.sent(), vec![r#"{"RoundState":"Started","Time":"0...s"}"#]);

    // Two presses whose onsets are 300 ms apart.
    bench.hold(0, 1_200, 100);
    bench.hold(0, 0, 200);
    bench.hold(2, 950, 100);
    bench.hold(2, 0, 2_000);

    let punches = bench.sent();
    assert_eq!(punches.len(), 2);
    assert!(punches[0].starts_with("Punch Count: 1 Timestamp: 00:00:"));
    assert!(punches[0].ends_with("Device: RedBoxer | Sensor millivolts: 1200"));
    assert!(punches[1].starts_with("Punch Count: 2 Timestamp: 00:00:"));
    assert!(punches[1].ends_with("| Sensor millivolts: 950"));
    assert_eq!(bench.app.punch_count(), 2);

    let elapsed_s = bench.app.elapsed_ms() / 1000;
    bench.send(r#"{"RoundStatusCommand":{"Command":5}}"#);
    assert_eq!(
        bench.sent(),
        vec![format!(r#"{{"RoundState":"Ended","FinalTime":"{}s"}}"#, elapsed_s)]
    );
    assert_eq!(elapsed_s, 2);
    assert_eq!(bench.app.punch_count(), 0);
    assert!(!bench.app.round_active());
}

#[test]
fn presses_inside_debounce_count_once() {
    let mut bench = Bench::new(DeviceRole::BlueBoxer);
    bench.send(r#"{"RoundStatusCommand":{"Command":1}}"#);
    bench.sent();

    // Onsets 150 ms apart: the second lands inside the debounce window and,
    // released before it expires, is never counted.
    bench.hold(1, 1_000, 50);
    bench.hold(1, 0, 100);
    bench.hold(1, 1_000, 40);
    bench.hold(1, 0, 500);

    assert_eq!(bench.sent().len(), 1);
    assert_eq!(bench.app.punch_count(), 1);
}

#[test]
fn round_expires_and_keeps_count() {
    let mut bench = Bench::new(DeviceRole::Unknown);
    bench.send(
        r#"{"SensorSettings":{"FsrSensitivity":800,"FsrThreshold":200,"RoundTime":1000,"BreakTime":500}}"#,
    );
    assert_eq!(bench.sent(), vec![r#"{"RoundState":"Settings Updated"}"#]);

    bench.send(r#"{"RoundStatusCommand":{"Command":1}}"#);
    bench.hold(0, 900, 50);
    bench.hold(0, 0, 50);
    assert_eq!(bench.app.punch_count(), 1);
    bench.sent();

    // Run well past the round length with no further punches.
    bench.hold(0, 0, 1_500);
    assert_eq!(bench.sent(), vec![r#"{"RoundState":"Completed"}"#]);
    assert!(!bench.app.round_active());
    assert_eq!(bench.app.punch_count(), 1);
    assert_eq!(bench.app.elapsed_ms(), 0);
}

#[test]
fn round_expires_exactly_at_duration() {
    let mut bench = Bench::new(DeviceRole::Unknown);
    bench.app.handle_message(
        r#"{"SensorSettings":{"FsrSensitivity":800,"FsrThreshold":200,"RoundTime":1000,"BreakTime":0}}"#,
    );
    bench.app.handle_command(1);
    bench.sent();

    bench.clock.advance(999);
    bench.app.tick();
    assert!(bench.app.round_active());

    bench.clock.advance(1);
    bench.app.tick();
    assert!(!bench.app.round_active());
    assert_eq!(bench.sent(), vec![r#"{"RoundState":"Completed"}"#]);
}

#[test]
fn pause_stops_punches_and_clock() {
    let mut bench = Bench::new(DeviceRole::BlueBoxer);
    bench.send(r#"{"RoundStatusCommand":{"Command":1}}"#);
    bench.hold(0, 0, 2_000);
    bench.send(r#"{"RoundStatusCommand":{"Command":2}}"#);
    let frozen = bench.app.elapsed_ms();

    bench.hold(0, 1_500, 100);
    bench.hold(0, 0, 5_000);
    assert_eq!(bench.app.punch_count(), 0);
    assert_eq!(bench.app.elapsed_ms(), frozen);

    bench.send(r#"{"RoundStatusCommand":{"Command":3}}"#);
    let replies = bench.sent();
    assert_eq!(replies.last().map(String::as_str), Some(r#"{"RoundState":"Resumed","Time":"2...s"}"#));

    bench.hold(0, 1_500, 100);
    bench.hold(0, 0, 100);
    assert_eq!(bench.app.punch_count(), 1);
    assert!(bench.app.elapsed_ms() > frozen);
}

#[test]
fn only_latest_inbound_message_is_handled() {
    let mut bench = Bench::new(DeviceRole::BlueBoxer);
    bench.app.transport().deliver(r#"{"RoundStatusCommand":{"Command":1}}"#);
    bench.app.transport().deliver(r#"{"RoundStatusCommand":{"Command":9}}"#);
    bench.step();
    bench.step();
    assert_eq!(bench.sent(), vec![r#"{"Error":"Unknown Command"}"#]);
    assert!(!bench.app.round_active());
    assert_eq!(bench.app.transport_mut().read_message(), None);
}

#[test]
fn garbage_gets_no_reply() {
    let mut bench = Bench::new(DeviceRole::BlueBoxer);
    bench.send("hello?");
    bench.send(r#"{"RoundStatusCommand":{"Command":"start"}}"#);
    assert!(bench.sent().is_empty());
    assert!(!bench.app.round_active());
}
