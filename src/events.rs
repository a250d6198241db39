// Boxer Box — Wire Messages
//
// Inbound control messages from the app and the outbound events we answer
// with.  Field names are fixed by the mobile app and must match exactly.
// Punch telemetry is deliberately plain text (see `PunchDetector`), every
// other outbound message is a single JSON object.

use serde::{Deserialize, Serialize};

use crate::error::MessageError;

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// One inbound payload.  Both parts may be present in the same message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Inbound {
    #[serde(rename = "SensorSettings")]
    pub settings: Option<SensorSettings>,
    #[serde(rename = "RoundStatusCommand")]
    pub command: Option<RoundStatusCommand>,
}

impl Inbound {
    pub fn parse(text: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSettings {
    #[serde(rename = "FsrSensitivity")]
    pub fsr_sensitivity: i32,
    #[serde(rename = "FsrThreshold")]
    pub fsr_threshold: i32,
    /// Round length, milliseconds.
    #[serde(rename = "RoundTime")]
    pub round_time: u64,
    /// Break length, milliseconds.
    #[serde(rename = "BreakTime")]
    pub break_time: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RoundStatusCommand {
    /// A missing code reads as 0, which no command uses.
    #[serde(rename = "Command", default)]
    pub command: i64,
}

/// The five round commands understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundCommand {
    Start,
    Pause,
    Resume,
    Reset,
    End,
}

impl RoundCommand {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Start),
            2 => Some(Self::Pause),
            3 => Some(Self::Resume),
            4 => Some(Self::Reset),
            5 => Some(Self::End),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Start => 1,
            Self::Pause => 2,
            Self::Resume => 3,
            Self::Reset => 4,
            Self::End => 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// JSON events sent to the app.  Elapsed times are whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    Started { elapsed_s: u64 },
    Paused { elapsed_s: u64 },
    Resumed { elapsed_s: u64 },
    Reset,
    Ended { final_s: u64 },
    Completed,
    SettingsUpdated,
    UnknownCommand,
}

#[derive(Serialize)]
struct RoundStateBody {
    #[serde(rename = "RoundState")]
    state: &'static str,
    #[serde(rename = "Time", skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(rename = "FinalTime", skip_serializing_if = "Option::is_none")]
    final_time: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "Error")]
    error: &'static str,
}

impl RoundEvent {
    /// Serialised form, exactly as the app expects it.
    pub fn to_wire(&self) -> String {
        let body = match *self {
            Self::Started { elapsed_s } => state("Started", Some(format!("{}...s", elapsed_s)), None),
            Self::Paused { elapsed_s } => state("Paused", Some(format!("{}...s", elapsed_s)), None),
            Self::Resumed { elapsed_s } => state("Resumed", Some(format!("{}...s", elapsed_s)), None),
            Self::Reset => state("Reset", Some("0s".into()), None),
            Self::Ended { final_s } => state("Ended", None, Some(format!("{}s", final_s))),
            Self::Completed => state("Completed", None, None),
            Self::SettingsUpdated => state("Settings Updated", None, None),
            Self::UnknownCommand => return error("Unknown Command"),
        };
        // Serialising a struct of strings into a String cannot fail.
        serde_json::to_string(&body).unwrap_or_default()
    }
}

fn state(state: &'static str, time: Option<String>, final_time: Option<String>) -> RoundStateBody {
    RoundStateBody {
        state,
        time,
        final_time,
    }
}

fn error(error: &'static str) -> String {
    serde_json::to_string(&ErrorBody { error }).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_round_command() {
        let msg = Inbound::parse(r#"{"RoundStatusCommand":{"Command":3}}"#).unwrap();
        assert_eq!(msg.command, Some(RoundStatusCommand { command: 3 }));
        assert_eq!(msg.settings, None);
    }

    #[test]
    fn parses_settings_and_command_together() {
        let msg = Inbound::parse(
            r#"{"SensorSettings":{"FsrSensitivity":900,"FsrThreshold":250,"RoundTime":120000,"BreakTime":30000},
                "RoundStatusCommand":{"Command":1}}"#,
        )
        .unwrap();
        assert_eq!(
            msg.settings,
            Some(SensorSettings {
                fsr_sensitivity: 900,
                fsr_threshold: 250,
                round_time: 120_000,
                break_time: 30_000,
            })
        );
        assert_eq!(msg.command.map(|c| c.command), Some(1));
    }

    #[test]
    fn missing_command_reads_as_zero() {
        let msg = Inbound::parse(r#"{"RoundStatusCommand":{}}"#).unwrap();
        assert_eq!(msg.command, Some(RoundStatusCommand { command: 0 }));
        assert_eq!(RoundCommand::from_code(0), None);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let msg = Inbound::parse(r#"{"Hello":"there"}"#).unwrap();
        assert_eq!(msg, Inbound::default());
    }

    #[test]
    fn malformed_payloads_fail() {
        assert!(Inbound::parse("{\"RoundStatusCommand\":").is_err());
        assert!(Inbound::parse("start").is_err());
        assert!(Inbound::parse(r#"{"SensorSettings":{"FsrSensitivity":900}}"#).is_err());
    }

    #[test]
    fn command_codes() {
        for code in 1..=5 {
            assert_eq!(RoundCommand::from_code(code).map(RoundCommand::code), Some(code));
        }
        assert_eq!(RoundCommand::from_code(6), None);
        assert_eq!(RoundCommand::from_code(-1), None);
    }

    #[test]
    fn wire_format() {
        assert_eq!(
            RoundEvent::Started { elapsed_s: 0 }.to_wire(),
            r#"{"RoundState":"Started","Time":"0...s"}"#
        );
        assert_eq!(
            RoundEvent::Paused { elapsed_s: 42 }.to_wire(),
            r#"{"RoundState":"Paused","Time":"42...s"}"#
        );
        assert_eq!(RoundEvent::Reset.to_wire(), r#"{"RoundState":"Reset","Time":"0s"}"#);
        assert_eq!(
            RoundEvent::Ended { final_s: 97 }.to_wire(),
            r#"{"RoundState":"Ended","FinalTime":"97s"}"#
        );
        assert_eq!(RoundEvent::Completed.to_wire(), r#"{"RoundState":"Completed"}"#);
        assert_eq!(
            RoundEvent::SettingsUpdated.to_wire(),
            r#"{"RoundState":"Settings Updated"}"#
        );
        assert_eq!(RoundEvent::UnknownCommand.to_wire(), r#"{"Error":"Unknown Command"}"#);
    }
}
