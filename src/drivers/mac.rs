// Boxer Box — Factory MAC readout

use esp_idf_sys::esp;

/// Bluetooth MAC as burned into eFuse.
pub fn read_bt_mac() -> anyhow::Result<[u8; 6]> {
    let mut mac = [0u8; 6];
    // SAFETY: `mac` is a 6-byte buffer, as esp_read_mac requires.
    unsafe {
        esp!(esp_idf_sys::esp_read_mac(
            mac.as_mut_ptr(),
            esp_idf_sys::esp_mac_type_t_ESP_MAC_BT,
        ))?;
    }
    Ok(mac)
}
