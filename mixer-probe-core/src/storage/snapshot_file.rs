use std::fs;
use std::path::Path;

use crate::catalog::snapshot::MixerSnapshot;
use crate::models::error::MixerError;

/// Persist a mixer snapshot as pretty-printed JSON.
pub fn write_snapshot(snapshot: &MixerSnapshot, path: &Path) -> Result<(), MixerError> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| MixerError::StorageError(format!("failed to serialize snapshot: {}", e)))?;
    fs::write(path, json).map_err(|e| MixerError::StorageError(format!("failed to write snapshot: {}", e)))?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<MixerSnapshot, MixerError> {
    let json = fs::read_to_string(path)
        .map_err(|e| MixerError::StorageError(format!("failed to read snapshot: {}", e)))?;
    let snapshot: MixerSnapshot = serde_json::from_str(&json)
        .map_err(|e| MixerError::StorageError(format!("failed to parse snapshot: {}", e)))?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::snapshot::SnapshotEntry;

    #[test]
    fn snapshot_survives_disk() {
        let path = std::env::temp_dir().join(format!("mixer_probe_snapshot_{}.json", uuid::Uuid::new_v4()));
        let snapshot = MixerSnapshot {
            device: "hw:0".into(),
            entries: vec![SnapshotEntry {
                control_name: "Capture".into(),
                index: 0,
                channel: "FR".into(),
                value: 12,
            }],
        };

        write_snapshot(&snapshot, &path).unwrap();
        assert_eq!(read_snapshot(&path).unwrap(), snapshot);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn garbage_is_rejected() {
        let path = std::env::temp_dir().join(format!("mixer_probe_snapshot_{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, "not json").unwrap();
        assert!(matches!(read_snapshot(&path), Err(MixerError::StorageError(_))));
        fs::remove_file(&path).ok();
    }
}
