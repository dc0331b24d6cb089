use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Simple-element channel position, in native channel-id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChannelId {
    #[serde(rename = "FL")]
    FrontLeft,
    #[serde(rename = "FR")]
    FrontRight,
    #[serde(rename = "RL")]
    RearLeft,
    #[serde(rename = "RR")]
    RearRight,
    #[serde(rename = "FC")]
    FrontCenter,
    #[serde(rename = "LFE")]
    Woofer,
    #[serde(rename = "SL")]
    SideLeft,
    #[serde(rename = "SR")]
    SideRight,
    #[serde(rename = "RC")]
    RearCenter,
}

impl ChannelId {
    pub const ALL: [ChannelId; 9] = [
        Self::FrontLeft,
        Self::FrontRight,
        Self::RearLeft,
        Self::RearRight,
        Self::FrontCenter,
        Self::Woofer,
        Self::SideLeft,
        Self::SideRight,
        Self::RearCenter,
    ];

    /// Mono elements address the front-left slot.
    pub const MONO: ChannelId = Self::FrontLeft;

    pub fn short_name(self) -> &'static str {
        match self {
            Self::FrontLeft => "FL",
            Self::FrontRight => "FR",
            Self::RearLeft => "RL",
            Self::RearRight => "RR",
            Self::FrontCenter => "FC",
            Self::Woofer => "LFE",
            Self::SideLeft => "SL",
            Self::SideRight => "SR",
            Self::RearCenter => "RC",
        }
    }

    pub fn long_name(self) -> &'static str {
        match self {
            Self::FrontLeft => "Front Left",
            Self::FrontRight => "Front Right",
            Self::RearLeft => "Rear Left",
            Self::RearRight => "Rear Right",
            Self::FrontCenter => "Front Center",
            Self::Woofer => "Woofer",
            Self::SideLeft => "Side Left",
            Self::SideRight => "Side Right",
            Self::RearCenter => "Rear Center",
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for ChannelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("mono") {
            return Ok(Self::MONO);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|ch| {
                trimmed.eq_ignore_ascii_case(ch.short_name())
                    || trimmed.eq_ignore_ascii_case(ch.long_name())
            })
            .ok_or_else(|| format!("unknown channel: {}", s))
    }
}

/// Which side of the element a channel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamDirection {
    Playback,
    Capture,
}

/// How a control's value space is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// Integer range (volume, gain, EQ band).
    Volume,
    /// Boolean on/off over `[0, 1]`.
    Switch,
    /// Item list; values are item ordinals.
    Enumerated,
}

/// Native element identity: simple elements are keyed by name plus index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId {
    pub name: String,
    pub index: u32,
}

impl ElementId {
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// Capabilities an element reports, read once per walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementCaps {
    pub playback_volume: bool,
    pub capture_volume: bool,
    pub playback_switch: bool,
    pub capture_switch: bool,
    pub enumerated: bool,
}

impl ElementCaps {
    /// Classify the element. Volume wins over switch; elements exposing
    /// neither a range, a switch nor items are not controls.
    pub fn kind(&self) -> Option<ControlKind> {
        if self.enumerated {
            Some(ControlKind::Enumerated)
        } else if self.playback_volume || self.capture_volume {
            Some(ControlKind::Volume)
        } else if self.playback_switch || self.capture_switch {
            Some(ControlKind::Switch)
        } else {
            None
        }
    }

    /// Preferred direction for reads and writes: playback when present.
    pub fn direction(&self) -> StreamDirection {
        if self.playback_volume || (!self.capture_volume && self.playback_switch) {
            StreamDirection::Playback
        } else if self.capture_volume || self.capture_switch {
            StreamDirection::Capture
        } else {
            StreamDirection::Playback
        }
    }

    pub fn has_switch(&self, direction: StreamDirection) -> bool {
        match direction {
            StreamDirection::Playback => self.playback_switch,
            StreamDirection::Capture => self.capture_switch,
        }
    }
}

/// One hardware channel of a mixer control.
///
/// `db` is in hundredths of a decibel as reported by the driver. `db` and
/// `switch_state` are `None` when the element lacks that capability, which
/// is not the same as reporting zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlChannelInfo {
    pub name: String,
    pub channel: ChannelId,
    pub direction: StreamDirection,
    pub raw: i64,
    pub min: i64,
    pub max: i64,
    pub db: Option<i64>,
    pub switch_state: Option<i32>,
}

impl ControlChannelInfo {
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// A logical mixer control and its channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInfo {
    pub control_name: String,
    pub index: u32,
    pub kind: ControlKind,
    pub channels: Vec<ControlChannelInfo>,
    pub items: Vec<String>,
}

impl ControlInfo {
    pub fn element_id(&self) -> ElementId {
        ElementId::new(self.control_name.clone(), self.index)
    }

    pub fn channel(&self, name: &str) -> Option<&ControlChannelInfo> {
        let wanted = name.parse::<ChannelId>().ok();
        self.channels
            .iter()
            .find(|c| c.name == name || Some(c.channel) == wanted)
    }

    /// Range valid on every channel at once: `[max(min), min(max)]`.
    /// `None` when the channels share no common value.
    pub fn common_range(&self) -> Option<(i64, i64)> {
        let min = self.channels.iter().map(|c| c.min).max()?;
        let max = self.channels.iter().map(|c| c.max).min()?;
        (min <= max).then_some((min, max))
    }
}
