pub mod fsr;
pub mod mac;
