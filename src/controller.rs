// Boxer Box — Round Controller
//
// Owns the punch detector, the round timer and the transport.  The main loop
// calls `tick()` at a fixed rate; each tick first handles at most one pending
// inbound message, then checks round progress (punches, round expiry).

use crate::clock::Clock;
use crate::config::*;
use crate::detector::{ForceSensor, PunchDetector};
use crate::events::{Inbound, RoundCommand, RoundEvent, SensorSettings};
use crate::role::DeviceRole;
use crate::timer::RoundTimer;
use crate::transport::Transport;

pub struct RoundController<S, T, C> {
    detector: PunchDetector<S>,
    timer: RoundTimer,
    transport: T,
    clock: C,
    role: DeviceRole,

    round_active: bool,
    is_paused: bool,
    round_duration_ms: u64,
    break_duration_ms: u64,
}

impl<S, T, C> RoundController<S, T, C>
where
    S: ForceSensor,
    T: Transport,
    C: Clock,
{
    pub fn new(detector: PunchDetector<S>, transport: T, clock: C, role: DeviceRole) -> Self {
        Self {
            detector,
            timer: RoundTimer::new(),
            transport,
            clock,
            role,
            round_active: false,
            is_paused: false,
            round_duration_ms: DEFAULT_ROUND_TIME_MS,
            break_duration_ms: DEFAULT_BREAK_TIME_MS,
        }
    }

    /// One pass of the control loop.
    pub fn tick(&mut self) {
        self.service_inbound();
        self.check_progress();
    }

    /// Handle the pending inbound message, if there is one.  The buffer is
    /// emptied before parsing so a bad payload is not re-read every tick.
    pub fn service_inbound(&mut self) {
        let Some(text) = self.transport.take_message() else {
            return;
        };
        self.handle_message(&text);
    }

    /// Decode and apply one inbound payload.  Malformed payloads are logged
    /// and dropped without a reply.
    pub fn handle_message(&mut self, text: &str) {
        let inbound = match Inbound::parse(text) {
            Ok(inbound) => inbound,
            Err(e) => {
                log::warn!("Dropping inbound message: {}", e);
                return;
            }
        };

        if let Some(settings) = inbound.settings {
            self.apply_settings(settings);
        }
        if let Some(command) = inbound.command {
            self.handle_command(command.command);
        }
    }

    /// Apply all four settings at once, or none of them.  A rejected set is
    /// only logged; the app gets no reply.
    pub fn apply_settings(&mut self, settings: SensorSettings) {
        if let Err(e) = self
            .detector
            .configure(settings.fsr_sensitivity, settings.fsr_threshold)
        {
            log::warn!("Settings rejected: {}", e);
            return;
        }
        self.round_duration_ms = settings.round_time;
        self.break_duration_ms = settings.break_time;

        log::info!(
            "Settings updated: sensitivity {} mV, release {} mV, round {} ms, break {} ms",
            settings.fsr_sensitivity,
            settings.fsr_threshold,
            settings.round_time,
            settings.break_time
        );
        self.emit(RoundEvent::SettingsUpdated);
    }

    /// Run one numeric round command.  Reported times are sampled before the
    /// command takes effect.
    pub fn handle_command(&mut self, code: i64) {
        let now = self.clock.now_ms();
        let elapsed_s = self.timer.elapsed_seconds(now);

        let Some(command) = RoundCommand::from_code(code) else {
            log::warn!("Unknown command {}", code);
            self.emit(RoundEvent::UnknownCommand);
            return;
        };
        log::debug!("Command {} ({:?})", command.code(), command);

        match command {
            RoundCommand::Start => {
                log::info!("Starting the round at {}s", elapsed_s);
                self.detector.reset_count();
                self.timer.restart(now);
                self.round_active = true;
                self.is_paused = false;
                self.emit(RoundEvent::Started { elapsed_s });
            }
            RoundCommand::Pause => {
                self.timer.pause(now);
                self.is_paused = true;
                log::info!("Round paused at {}s", self.timer.paused_at_s());
                self.emit(RoundEvent::Paused { elapsed_s });
            }
            RoundCommand::Resume => {
                self.timer.resume(now);
                self.is_paused = false;
                log::info!("Round resumed at {}s", self.timer.resumed_at_s());
                self.emit(RoundEvent::Resumed { elapsed_s });
            }
            RoundCommand::Reset => {
                log::info!("Resetting the round at {}s", elapsed_s);
                self.detector.reset_count();
                self.timer.restart(now);
                self.round_active = true;
                self.is_paused = false;
                self.emit(RoundEvent::Reset);
            }
            RoundCommand::End => {
                log::info!("Ending the round at {}s", elapsed_s);
                self.round_active = false;
                self.emit(RoundEvent::Ended { final_s: elapsed_s });
                self.timer.reset();
                self.detector.reset_count();
            }
        }
    }

    /// Punch detection and round expiry.  Does nothing unless a round is
    /// running.  Expiry leaves the punch count intact.
    pub fn check_progress(&mut self) {
        if !self.round_active || self.is_paused {
            return;
        }

        let now = self.clock.now_ms();
        if self.detector.poll(now) && self.detector.record_accepted() {
            let line = self
                .detector
                .format_telemetry(self.timer.elapsed_ms(now), self.role.label());
            log::debug!("{}", line);
            self.transport.send_message(&line);
        }

        if self.timer.elapsed_ms(now) >= self.round_duration_ms {
            log::info!("Round complete ({} punches)", self.detector.punch_count());
            self.round_active = false;
            self.emit(RoundEvent::Completed);
            self.timer.reset();
        }
    }

    fn emit(&mut self, event: RoundEvent) {
        self.transport.send_message(&event.to_wire());
    }

    pub fn round_active(&self) -> bool {
        self.round_active
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn round_duration_ms(&self) -> u64 {
        self.round_duration_ms
    }

    pub fn break_duration_ms(&self) -> u64 {
        self.break_duration_ms
    }

    pub fn punch_count(&self) -> u32 {
        self.detector.punch_count()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.timer.elapsed_ms(self.clock.now_ms())
    }

    pub fn detector(&self) -> &PunchDetector<S> {
        &self.detector
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    pub fn role(&self) -> DeviceRole {
        self.role
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
