use serde::{Deserialize, Serialize};

/// A hardware card reported by the driver.
///
/// Indices are only meaningful until the next enumeration pass; cards can
/// be renumbered when devices are added or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDescriptor {
    pub index: u32,
    /// Driver identifier (e.g. "PCH"); stable across renumbering.
    pub id: Option<String>,
    pub name: String,
    pub long_name: Option<String>,
}

impl CardDescriptor {
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index,
            id: None,
            name: name.into(),
            long_name: None,
        }
    }

    /// Hardware device string used to attach a mixer or open a stream.
    pub fn device_name(&self) -> String {
        format!("hw:{}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_name_uses_index() {
        let card = CardDescriptor::new(3, "USB Audio");
        assert_eq!(card.device_name(), "hw:3");
        assert!(card.long_name.is_none());
        assert!(card.id.is_none());
    }
}
