// Boxer Box — Hardware & System Configuration
// Target: DFRobot Beetle ESP32-C6 (RISC-V)

// ---------------------------------------------------------------------------
// FSR inputs (ADC1, one channel per GPIO on the C6)
// ---------------------------------------------------------------------------
pub const FSR_PINS: [u8; 3] = [4, 5, 6]; // A-pins wired to the pad FSRs

// ---------------------------------------------------------------------------
// Punch detection defaults (millivolts)
// ---------------------------------------------------------------------------
pub const DEFAULT_FSR_SENSITIVITY: i32 = 800; // onset above this
pub const DEFAULT_FSR_THRESHOLD: i32 = 200;   // release below this
pub const PUNCH_DEBOUNCE_MS: u64 = 200;       // minimum gap between onsets

// ---------------------------------------------------------------------------
// Round defaults (milliseconds)
// ---------------------------------------------------------------------------
pub const DEFAULT_ROUND_TIME_MS: u64 = 180_000; // 3 minutes
pub const DEFAULT_BREAK_TIME_MS: u64 = 60_000;  // 1 minute

// ---------------------------------------------------------------------------
// Task / loop timing
// ---------------------------------------------------------------------------
pub const LOOP_PERIOD_MS: u32 = 5;       // control loop tick (~200 Hz at CONFIG_FREERTOS_HZ=1000)
pub const STACK_CONSOLE: usize = 4096;   // console reader thread (bytes)

// ---------------------------------------------------------------------------
// Device roles, keyed by Bluetooth MAC
// ---------------------------------------------------------------------------
pub const BLUEBOXER_MACS: [&str; 4] = [
    "f0:f5:bd:2c:10:72",
    "f0:f5:bd:2c:1a:32",
    "f0:f5:bd:2c:0b:ee",
    "f0:f5:bd:2c:16:3a",
];

pub const REDBOXER_MACS: [&str; 2] = ["f0:f5:bd:2c:15:1a", "f0:f5:bd:2c:11:e6"];

// ---------------------------------------------------------------------------
// ADC (12-bit oneshot, 11 dB attenuation → ~0–3.3 V)
// ---------------------------------------------------------------------------
pub const ADC_MAX_RAW: i32 = 4095;
pub const ADC_FULL_SCALE_MV: i32 = 3300;
