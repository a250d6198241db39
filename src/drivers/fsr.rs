// Boxer Box — FSR ADC Driver
//
// One-shot ADC1 reads via raw ESP-IDF calls.  Each FSR pin becomes one
// `FsrChannel`; all channels share the same ADC unit handle.

use std::rc::Rc;

use esp_idf_sys::esp;

use boxer_box::config::*;
use boxer_box::detector::ForceSensor;

/// Owned ADC1 oneshot unit.  Released when the last channel is dropped.
pub struct AdcUnit {
    handle: esp_idf_sys::adc_oneshot_unit_handle_t,
}

impl AdcUnit {
    pub fn new() -> anyhow::Result<Self> {
        let mut handle: esp_idf_sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();
        // SAFETY: the config is fully initialised (zeroed, then the fields we
        // care about set) and `handle` is a valid out-pointer.
        unsafe {
            let unit_cfg = esp_idf_sys::adc_oneshot_unit_init_cfg_t {
                unit_id: esp_idf_sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: esp_idf_sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            esp!(esp_idf_sys::adc_oneshot_new_unit(&unit_cfg, &mut handle))?;
        }
        log::info!("ADC1 oneshot unit ready");
        Ok(Self { handle })
    }
}

impl Drop for AdcUnit {
    fn drop(&mut self) {
        // SAFETY: `handle` came from `adc_oneshot_new_unit` and is deleted once.
        unsafe {
            esp_idf_sys::adc_oneshot_del_unit(self.handle);
        }
    }
}

pub struct FsrChannel {
    unit: Rc<AdcUnit>,
    channel: esp_idf_sys::adc_channel_t,
}

impl FsrChannel {
    /// Configure `gpio` as an ADC1 input (12-bit, 11 dB).
    pub fn new(unit: &Rc<AdcUnit>, gpio: u8) -> anyhow::Result<Self> {
        let mut unit_id: esp_idf_sys::adc_unit_t = 0;
        let mut channel: esp_idf_sys::adc_channel_t = 0;

        // SAFETY: out-pointers are valid locals; the unit handle is live.
        unsafe {
            esp!(esp_idf_sys::adc_oneshot_io_to_channel(
                gpio as i32,
                &mut unit_id,
                &mut channel,
            ))?;
            if unit_id != esp_idf_sys::adc_unit_t_ADC_UNIT_1 {
                anyhow::bail!("GPIO{} is not on ADC1", gpio);
            }

            let chan_cfg = esp_idf_sys::adc_oneshot_chan_cfg_t {
                atten: esp_idf_sys::adc_atten_t_ADC_ATTEN_DB_11,
                bitwidth: esp_idf_sys::adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            esp!(esp_idf_sys::adc_oneshot_config_channel(
                unit.handle,
                channel,
                &chan_cfg,
            ))?;
        }

        log::info!("FSR on GPIO{} -> ADC1 channel {}", gpio, channel);
        Ok(Self {
            unit: Rc::clone(unit),
            channel,
        })
    }
}

impl ForceSensor for FsrChannel {
    /// Linear raw → mV over the 11 dB range (no eFuse calibration).
    fn read_millivolts(&mut self) -> anyhow::Result<i32> {
        let mut raw: i32 = 0;
        // SAFETY: the unit outlives this channel through the `Rc`.
        unsafe {
            esp!(esp_idf_sys::adc_oneshot_read(
                self.unit.handle,
                self.channel,
                &mut raw,
            ))?;
        }
        Ok(raw * ADC_FULL_SCALE_MV / ADC_MAX_RAW)
    }
}
