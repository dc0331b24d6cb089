use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::capability::{DeviceCapability, SupportedSet};
use super::card::CardDescriptor;
use super::error::MixerError;

/// How to reach and use a sound device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceSettings {
    /// Playback device name (default: "default").
    pub playback_device_name: String,

    /// Recording device name (default: "default").
    pub recording_device_name: String,

    /// Mixer device name (default: "default").
    pub mixer_device_name: String,

    /// Recording sample rate in Hz (default: 48000).
    pub recording_sample_rate: u32,

    /// Recording channel count (default: 2).
    pub recording_channels: u16,

    /// Recording bit depth (default: 16). Valid values: 8, 16, 24, 32.
    pub recording_bits_per_sample: u16,

    pub card_id: Option<String>,
    pub card_name: Option<String>,
    pub card_long_name: Option<String>,
    pub card_index: Option<u32>,

    pub supported_sample_rates: Vec<u32>,
    pub supported_sample_bits: Vec<u16>,
    pub supported_channels: Vec<u16>,
    pub supported_combinations: Vec<DeviceCapability>,
}

impl DeviceSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.recording_sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if ![8, 16, 24, 32].contains(&self.recording_bits_per_sample) {
            return Err(format!(
                "unsupported bit depth: {}",
                self.recording_bits_per_sample
            ));
        }
        if self.recording_channels == 0 {
            return Err("channel count must be at least 1".into());
        }
        Ok(())
    }

    /// Copy a probe result into the discovered-capability lists.
    pub fn apply_supported(&mut self, supported: &SupportedSet) {
        self.supported_sample_rates = supported.rates.iter().copied().collect();
        self.supported_sample_bits = supported.bits.iter().copied().collect();
        self.supported_channels = supported.channels.iter().copied().collect();
        let mut combinations = supported.combinations.clone();
        combinations.sort();
        self.supported_combinations = combinations;
    }

    /// Point the settings at `card`: its identity plus the `hw:` device
    /// string for the mixer.
    pub fn apply_card(&mut self, card: &CardDescriptor) {
        self.card_id = card.id.clone();
        self.card_name = Some(card.name.clone());
        self.card_long_name = card.long_name.clone();
        self.card_index = Some(card.index);
        self.mixer_device_name = card.device_name();
    }

    /// The configured recording triple.
    pub fn recording_capability(&self) -> DeviceCapability {
        DeviceCapability::new(
            self.recording_sample_rate,
            self.recording_bits_per_sample,
            self.recording_channels,
        )
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            playback_device_name: "default".into(),
            recording_device_name: "default".into(),
            mixer_device_name: "default".into(),
            recording_sample_rate: 48000,
            recording_channels: 2,
            recording_bits_per_sample: 16,
            card_id: None,
            card_name: None,
            card_long_name: None,
            card_index: None,
            supported_sample_rates: Vec::new(),
            supported_sample_bits: Vec::new(),
            supported_channels: Vec::new(),
            supported_combinations: Vec::new(),
        }
    }
}

/// Safety envelope for sweeping every control whose name matches a regex.
///
/// The envelope is always intersected with the hardware range; it never
/// widens it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSpec {
    pub control_name_regex: String,
    pub clamp_min: i64,
    pub clamp_max: i64,
    pub step: i64,
}

impl SweepSpec {
    pub fn new(control_name_regex: impl Into<String>, clamp_min: i64, clamp_max: i64, step: i64) -> Self {
        Self {
            control_name_regex: control_name_regex.into(),
            clamp_min,
            clamp_max,
            step,
        }
    }

    pub fn validate(&self) -> Result<(), MixerError> {
        if self.step <= 0 {
            return Err(MixerError::InvalidStep(self.step));
        }
        self.compile().map(|_| ())
    }

    pub fn compile(&self) -> Result<Regex, MixerError> {
        Regex::new(&self.control_name_regex).map_err(|e| MixerError::InvalidRegex {
            pattern: self.control_name_regex.clone(),
            reason: e.to_string(),
        })
    }

    /// `[max(clamp_min, hw_min), min(clamp_max, hw_max)]`, or `None` when
    /// the envelope and the hardware range do not overlap.
    pub fn effective_range(&self, hw_min: i64, hw_max: i64) -> Option<(i64, i64)> {
        let min = self.clamp_min.max(hw_min);
        let max = self.clamp_max.min(hw_max);
        (min <= max).then_some((min, max))
    }
}

/// Sweep run configuration supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SweepConfiguration {
    pub sweeps: Vec<SweepSpec>,

    /// Write each control's pre-sweep values back when its sweep ends.
    pub restore_original_values: bool,

    /// Dwell after each write before the level is sampled.
    pub settle_time_ms: u64,

    /// Restrict sweeps to one channel; all channels when `None`.
    pub channel: Option<String>,

    /// JSON-lines file for measurement samples.
    pub results_path: Option<PathBuf>,
}

impl SweepConfiguration {
    pub fn validate(&self) -> Result<(), MixerError> {
        if self.sweeps.is_empty() {
            return Err(MixerError::ConfigurationFailed(
                "no sweep specifications".into(),
            ));
        }
        self.sweeps.iter().try_for_each(SweepSpec::validate)
    }

    pub fn settle_time(&self) -> Duration {
        Duration::from_millis(self.settle_time_ms)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, MixerError> {
        let json = fs::read_to_string(path).map_err(|e| {
            MixerError::ConfigurationFailed(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            MixerError::ConfigurationFailed(format!("failed to parse {}: {}", path.display(), e))
        })
    }
}

impl Default for SweepConfiguration {
    fn default() -> Self {
        Self {
            sweeps: Vec::new(),
            restore_original_values: true,
            settle_time_ms: 150,
            channel: None,
            results_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        assert!(DeviceSettings::default().validate().is_ok());
    }

    #[test]
    fn settings_reject_odd_bit_depth() {
        let settings = DeviceSettings {
            recording_bits_per_sample: 20,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn apply_supported_sorts_combinations() {
        let mut supported = SupportedSet::default();
        supported.record(DeviceCapability::new(96000, 24, 2));
        supported.record(DeviceCapability::new(48000, 16, 2));

        let mut settings = DeviceSettings::default();
        settings.apply_supported(&supported);

        assert_eq!(settings.supported_sample_rates, vec![48000, 96000]);
        assert_eq!(settings.supported_sample_bits, vec![16, 24]);
        assert_eq!(settings.supported_combinations[0], DeviceCapability::new(48000, 16, 2));
    }

    #[test]
    fn apply_card_fills_identity() {
        let card = CardDescriptor {
            index: 1,
            id: Some("USBAudio".into()),
            name: "USB Audio".into(),
            long_name: None,
        };
        let mut settings = DeviceSettings::default();
        settings.apply_card(&card);

        assert_eq!(settings.card_id.as_deref(), Some("USBAudio"));
        assert_eq!(settings.card_index, Some(1));
        assert_eq!(settings.mixer_device_name, "hw:1");
        assert_eq!(settings.recording_device_name, "default");
        assert!(settings.card_long_name.is_none());
    }

    #[test]
    fn settings_json_carries_card_identity_only() {
        let json = serde_json::to_value(DeviceSettings::default()).unwrap();
        assert!(json.get("cardId").is_some());
        assert!(json.get("baselineFilePath").is_none());
        assert_eq!(
            DeviceSettings::default().recording_capability(),
            DeviceCapability::new(48000, 16, 2)
        );
    }

    #[test]
    fn effective_range_intersects_hardware() {
        let spec = SweepSpec::new("Master", 10, 90, 20);
        assert_eq!(spec.effective_range(0, 100), Some((10, 90)));
        assert_eq!(spec.effective_range(20, 60), Some((20, 60)));
        assert_eq!(spec.effective_range(95, 127), None);
    }

    #[test]
    fn non_positive_step_is_invalid() {
        assert_eq!(SweepSpec::new("ADC", 0, 10, 0).validate(), Err(MixerError::InvalidStep(0)));
        assert_eq!(SweepSpec::new("ADC", 0, 10, -2).validate(), Err(MixerError::InvalidStep(-2)));
    }

    #[test]
    fn bad_regex_is_invalid() {
        let err = SweepSpec::new("(", 0, 10, 1).validate().unwrap_err();
        assert!(matches!(err, MixerError::InvalidRegex { .. }));
    }

    #[test]
    fn configuration_parses_camel_case_json() {
        let json = r#"{
            "sweeps": [{"controlNameRegex": "ADC", "clampMin": 0, "clampMax": 100, "step": 5}],
            "settleTimeMs": 0
        }"#;
        let config: SweepConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.sweeps[0], SweepSpec::new("ADC", 0, 100, 5));
        assert!(config.restore_original_values);
        assert_eq!(config.settle_time(), Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_configuration_is_rejected() {
        assert!(matches!(
            SweepConfiguration::default().validate(),
            Err(MixerError::ConfigurationFailed(_))
        ));
    }
}
