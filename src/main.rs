// Boxer Box — Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging.
//   2. Resolve the device role (RedBoxer / BlueBoxer) from the BT MAC.
//   3. Configure the FSR ADC channels.
//   4. Start the console transport (reader thread + mailbox).
//   5. Run the control loop forever: one controller tick per LOOP_PERIOD_MS.
//
// All round and punch state lives in the controller and is only touched from
// this thread.

#[cfg(target_os = "espidf")]
mod drivers;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::rc::Rc;

    use esp_idf_hal::delay::FreeRtos;

    use boxer_box::clock::MonotonicClock;
    use boxer_box::config::*;
    use boxer_box::controller::RoundController;
    use boxer_box::detector::{PunchDetector, SensorChannel, Thresholds};
    use boxer_box::role::{format_mac, DeviceRole};
    use boxer_box::transport::ConsoleTransport;

    use crate::drivers::fsr::{AdcUnit, FsrChannel};

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("Boxer Box firmware starting…");

    // ---- Device role ------------------------------------------------------
    let role = match drivers::mac::read_bt_mac() {
        Ok(mac) => {
            let mac = format_mac(&mac);
            log::info!("BLE address: {}", mac);
            DeviceRole::from_mac(&mac)
        }
        Err(e) => {
            log::error!("Could not read BT MAC: {}", e);
            DeviceRole::Unknown
        }
    };

    // ---- FSR channels -----------------------------------------------------
    // A pin that fails to configure is left out; the others keep working.
    let adc = Rc::new(AdcUnit::new()?);
    let mut channels = Vec::with_capacity(FSR_PINS.len());
    for pin in FSR_PINS {
        match FsrChannel::new(&adc, pin) {
            Ok(fsr) => channels.push(SensorChannel::new(pin, fsr)),
            Err(e) => log::error!("FSR on GPIO{} unavailable: {}", pin, e),
        }
    }
    let detector = PunchDetector::new(channels, Thresholds::default());

    // ---- Transport & controller -------------------------------------------
    let transport = ConsoleTransport::spawn()?;
    let mut app = RoundController::new(detector, transport, MonotonicClock::new(), role);

    log::info!("{} ready — waiting for the app…", app.role());

    loop {
        app.tick();
        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("boxer-box is firmware for the ESP-IDF target; build it with the esp toolchain.");
}
