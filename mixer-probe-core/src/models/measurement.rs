use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One level reading taken after a control value was applied.
///
/// `level` is whatever scalar the sampler reports (typically dBFS); a
/// failed sample is recorded as NaN, which serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementSample {
    pub timestamp: DateTime<Utc>,
    pub run_id: String,
    pub control_name: String,
    /// Element index; tells same-name controls apart.
    #[serde(default)]
    pub index: u32,
    pub channel: Option<String>,
    pub applied_value: i64,
    pub level: f64,
}

impl MeasurementSample {
    pub fn new(run_id: &str, control_name: &str, channel: Option<&str>, applied_value: i64, level: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            run_id: run_id.to_string(),
            control_name: control_name.to_string(),
            index: 0,
            channel: channel.map(str::to_string),
            applied_value,
            level,
        }
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }
}
