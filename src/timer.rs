// Boxer Box — Round Timer
//
// Pause-able stopwatch.  Every operation takes the current monotonic time in
// milliseconds, so the timer itself holds no clock and is trivially testable.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone, Default)]
pub struct RoundTimer {
    state: TimerState,
    /// Time accrued by previous running intervals.  Only `pause` moves it.
    accumulated_ms: u64,
    /// While running, `elapsed = now - start_epoch_ms`.
    start_epoch_ms: u64,

    // Diagnostics: elapsed seconds at the last pause / resume.
    paused_at_s: u64,
    resumed_at_s: u64,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting, continuing from whatever has accumulated.  No-op if
    /// already running.
    pub fn start(&mut self, now_ms: u64) {
        if self.state != TimerState::Running {
            self.start_epoch_ms = now_ms.saturating_sub(self.accumulated_ms);
            self.state = TimerState::Running;
        }
    }

    /// Freeze the elapsed time.  No-op unless running.
    pub fn pause(&mut self, now_ms: u64) {
        if self.state == TimerState::Running {
            self.accumulated_ms = now_ms.saturating_sub(self.start_epoch_ms);
            self.paused_at_s = self.accumulated_ms / 1000;
            self.state = TimerState::Paused;
        }
    }

    /// Same mechanics as [`start`](Self::start); also records the resume point.
    pub fn resume(&mut self, now_ms: u64) {
        if self.state != TimerState::Running {
            self.resumed_at_s = self.accumulated_ms / 1000;
            self.start(now_ms);
        }
    }

    /// Zero everything and stop.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reset and immediately start counting from zero.
    pub fn restart(&mut self, now_ms: u64) {
        self.reset();
        self.start(now_ms);
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.state {
            TimerState::Running => now_ms.saturating_sub(self.start_epoch_ms),
            TimerState::Stopped | TimerState::Paused => self.accumulated_ms,
        }
    }

    /// Whole seconds, truncated.
    pub fn elapsed_seconds(&self, now_ms: u64) -> u64 {
        self.elapsed_ms(now_ms) / 1000
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn paused_at_s(&self) -> u64 {
        self.paused_at_s
    }

    pub fn resumed_at_s(&self) -> u64 {
        self.resumed_at_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_stopped_at_zero() {
        let timer = RoundTimer::new();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.elapsed_ms(12_345), 0);
    }

    #[test]
    fn running_timer_tracks_clock() {
        let mut timer = RoundTimer::new();
        timer.start(1_000);
        assert_eq!(timer.elapsed_ms(1_000), 0);
        assert_eq!(timer.elapsed_ms(3_750), 2_750);
        assert_eq!(timer.elapsed_seconds(3_750), 2);
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let mut timer = RoundTimer::new();
        timer.start(0);
        timer.start(500);
        assert_eq!(timer.elapsed_ms(1_000), 1_000);
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let mut timer = RoundTimer::new();
        timer.start(0);
        timer.pause(1_500);
        assert_eq!(timer.state(), TimerState::Paused);
        assert_eq!(timer.elapsed_ms(1_500), 1_500);
        assert_eq!(timer.elapsed_ms(9_000), 1_500);
        assert_eq!(timer.paused_at_s(), 1);

        timer.resume(10_000);
        assert_eq!(timer.elapsed_ms(10_000), 1_500);
        assert_eq!(timer.elapsed_ms(10_700), 2_200);
        assert_eq!(timer.resumed_at_s(), 1);
    }

    #[test]
    fn elapsed_is_sum_of_running_intervals() {
        let intervals = [(0, 300), (1_000, 1_450), (5_000, 5_001), (6_000, 8_000)];
        let mut timer = RoundTimer::new();
        let mut expected = 0;
        for (from, to) in intervals {
            timer.resume(from);
            timer.pause(to);
            expected += to - from;
            assert_eq!(timer.elapsed_ms(to + 10_000), expected);
        }
        assert_eq!(expected, 2_751);
    }

    #[test]
    fn pause_when_not_running_is_a_no_op() {
        let mut timer = RoundTimer::new();
        timer.pause(5_000);
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.elapsed_ms(5_000), 0);

        timer.start(0);
        timer.pause(100);
        timer.pause(900);
        assert_eq!(timer.elapsed_ms(900), 100);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut timer = RoundTimer::new();
        timer.reset();
        assert_eq!(timer.elapsed_ms(100), 0);

        timer.start(0);
        timer.pause(4_000);
        timer.reset();
        timer.reset();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.elapsed_ms(50_000), 0);
    }

    #[test]
    fn restart_counts_from_zero() {
        let mut timer = RoundTimer::new();
        timer.start(0);
        timer.pause(7_000);
        timer.restart(20_000);
        assert!(timer.is_running());
        assert_eq!(timer.elapsed_ms(20_250), 250);
    }
}
