// Boxer Box — FSR Punch Detector
//
// Edge-triggered punch detection over one or more force sensors.  Each poll
// reads every channel and keeps the strongest reading; a punch is the rising
// edge through `sensitivity`, re-armed only once the reading falls back below
// `release`.  Onsets closer together than the debounce window are ignored.

use crate::config::*;
use crate::error::SettingsError;

/// A single analog force input.
pub trait ForceSensor {
    fn read_millivolts(&mut self) -> anyhow::Result<i32>;
}

/// Hysteresis band: onset above `sensitivity`, release below `release`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    sensitivity: i32,
    release: i32,
}

impl Thresholds {
    pub fn new(sensitivity: i32, release: i32) -> Result<Self, SettingsError> {
        if release >= sensitivity {
            return Err(SettingsError::InvertedThresholds {
                sensitivity,
                release,
            });
        }
        Ok(Self {
            sensitivity,
            release,
        })
    }

    pub fn sensitivity(&self) -> i32 {
        self.sensitivity
    }

    pub fn release(&self) -> i32 {
        self.release
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_FSR_SENSITIVITY,
            release: DEFAULT_FSR_THRESHOLD,
        }
    }
}

/// One FSR input plus its most recent reading.
pub struct SensorChannel<S> {
    id: u8,
    sensor: S,
    latest: i32,
}

impl<S: ForceSensor> SensorChannel<S> {
    pub fn new(id: u8, sensor: S) -> Self {
        Self {
            id,
            sensor,
            latest: 0,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn latest(&self) -> i32 {
        self.latest
    }

    /// A failed read counts as no force, so a healthy channel outvotes it.
    fn refresh(&mut self) -> i32 {
        self.latest = match self.sensor.read_millivolts() {
            Ok(mv) => mv,
            Err(e) => {
                log::trace!("FSR channel {} read failed: {}", self.id, e);
                0
            }
        };
        self.latest
    }
}

pub struct PunchDetector<S> {
    channels: Vec<SensorChannel<S>>,
    thresholds: Thresholds,

    contact_active: bool,
    last_event_ms: Option<u64>,
    punch_count: u32,
    reading: i32,
}

impl<S: ForceSensor> PunchDetector<S> {
    pub fn new(channels: Vec<SensorChannel<S>>, thresholds: Thresholds) -> Self {
        Self {
            channels,
            thresholds,
            contact_active: false,
            last_event_ms: None,
            punch_count: 0,
            reading: 0,
        }
    }

    /// Replace both thresholds.  An inverted band is rejected and the current
    /// thresholds are kept.
    pub fn configure(&mut self, sensitivity: i32, release: i32) -> Result<(), SettingsError> {
        self.thresholds = Thresholds::new(sensitivity, release)?;
        Ok(())
    }

    /// Sample all channels and run one step of the edge detector.
    /// Returns `true` only on the tick where a new onset is accepted.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        self.reading = self
            .channels
            .iter_mut()
            .map(SensorChannel::refresh)
            .max()
            .unwrap_or(0);

        if self.reading > self.thresholds.sensitivity && !self.contact_active {
            let debounced = self
                .last_event_ms
                .map_or(true, |last| now_ms.saturating_sub(last) >= PUNCH_DEBOUNCE_MS);
            if debounced {
                self.contact_active = true;
                self.last_event_ms = Some(now_ms);
                return true;
            }
        } else if self.reading < self.thresholds.release && self.contact_active {
            self.contact_active = false;
        }

        false
    }

    /// Count the punch reported by the last `poll`, provided the reading is
    /// still above the release threshold.  Returns whether it was counted.
    pub fn record_accepted(&mut self) -> bool {
        if self.reading > self.thresholds.release {
            self.punch_count += 1;
            true
        } else {
            false
        }
    }

    /// `Punch Count: <n> Timestamp: <mm:ss:hh> Device: <role> | Sensor millivolts: <v>`
    pub fn format_telemetry(&self, elapsed_ms: u64, role: &str) -> String {
        format!(
            "Punch Count: {} Timestamp: {} Device: {} | Sensor millivolts: {}",
            self.punch_count,
            format_timestamp(elapsed_ms),
            role,
            self.reading
        )
    }

    pub fn reset_count(&mut self) {
        self.punch_count = 0;
    }

    pub fn punch_count(&self) -> u32 {
        self.punch_count
    }

    /// Representative (maximum) reading of the last poll, in millivolts.
    pub fn reading(&self) -> i32 {
        self.reading
    }

    /// Representative reading in volts.
    pub fn sensor_voltage(&self) -> f32 {
        self.reading as f32 / 1000.0
    }

    pub fn is_contact_active(&self) -> bool {
        self.contact_active
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn channels(&self) -> &[SensorChannel<S>] {
        &self.channels
    }
}

/// `mm:ss:hh` (minutes, seconds, hundredths), each zero-padded to two digits.
pub fn format_timestamp(elapsed_ms: u64) -> String {
    let minutes = elapsed_ms / 60_000;
    let seconds = (elapsed_ms % 60_000) / 1000;
    let hundredths = (elapsed_ms % 1000) / 10;
    format!("{:02}:{:02}:{:02}", minutes, seconds, hundredths)
}
