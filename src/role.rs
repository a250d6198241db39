// Boxer Box — Device Role
//
// Which corner this pad belongs to.  Resolved once at boot from the Bluetooth
// MAC and handed to the controller; the label is embedded in every punch line.

use core::fmt;

use crate::config::{BLUEBOXER_MACS, REDBOXER_MACS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceRole {
    RedBoxer,
    BlueBoxer,
    #[default]
    Unknown,
}

impl DeviceRole {
    /// Case-insensitive lookup of a colon-separated MAC (`f0:f5:bd:2c:10:72`).
    pub fn from_mac(mac: &str) -> Self {
        let mac = mac.trim();
        if BLUEBOXER_MACS.iter().any(|m| m.eq_ignore_ascii_case(mac)) {
            Self::BlueBoxer
        } else if REDBOXER_MACS.iter().any(|m| m.eq_ignore_ascii_case(mac)) {
            Self::RedBoxer
        } else {
            Self::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RedBoxer => "RedBoxer",
            Self::BlueBoxer => "BlueBoxer",
            Self::Unknown => "UnknownDevice",
        }
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `aa:bb:cc:dd:ee:ff`, lower-case.
pub fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
