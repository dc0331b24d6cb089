use std::fmt;

use thiserror::Error;

/// Status code returned by a failing native call.
///
/// Native surfaces report failure as a negative errno-style code; backends
/// convert their driver errors into this type at the trait boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("native call failed with code {code}")]
pub struct NativeError {
    pub code: i32,
}

impl NativeError {
    pub fn new(code: i32) -> Self {
        Self { code }
    }
}

/// Stage of the mixer open sequence that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MixerStage {
    Open,
    Attach,
    RegisterSimple,
    Load,
}

impl fmt::Display for MixerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Attach => "attach",
            Self::RegisterSimple => "register-simple",
            Self::Load => "load",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while probing or driving mixer hardware.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MixerError {
    #[error("card enumeration failed: {0}")]
    EnumerationFailed(String),

    #[error("mixer open failed at {stage} stage (code {code})")]
    MixerOpenFailed { stage: MixerStage, code: i32 },

    #[error("control not found: {control}")]
    ControlNotFound { control: String },

    #[error("channel {channel} not found on control {control}")]
    ChannelNotFound { control: String, channel: String },

    #[error("value {value} outside [{min}, {max}] for {control}")]
    OutOfRange {
        control: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("label {label:?} not found on control {control}")]
    LabelNotFound { control: String, label: String },

    #[error("control {control} is not enumerated")]
    NotEnumerated { control: String },

    #[error("invalid sweep step: {0}")]
    InvalidStep(i64),

    #[error("invalid control regex {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("reading {control} failed (code {code})")]
    ReadFailed { control: String, code: i32 },

    #[error("writing {attempted_value} to {control_name} failed (code {code})")]
    WriteFailed {
        control_name: String,
        attempted_value: i64,
        code: i32,
    },

    #[error("trial open of {rate} Hz / {bits} bit / {channels} ch failed (code {code})")]
    ProbeTrialFailed {
        rate: u32,
        bits: u16,
        channels: u16,
        code: i32,
    },

    #[error("level sample failed: {0}")]
    SampleFailed(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("cancelled")]
    Cancelled,
}
