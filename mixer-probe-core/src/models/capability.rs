use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A `(rate, bits, channels)` stream configuration.
///
/// Only a successful trial open with exactly these parameters makes a
/// triple "supported"; independently supported values say nothing about
/// their combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceCapability {
    pub rate: u32,
    pub bits: u16,
    pub channels: u16,
}

impl DeviceCapability {
    pub fn new(rate: u32, bits: u16, channels: u16) -> Self {
        Self {
            rate,
            bits,
            channels,
        }
    }
}

/// Candidate values tried by the capability prober.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSet {
    pub rates: Vec<u32>,
    pub bits: Vec<u16>,
    pub channels: Vec<u16>,
}

impl CandidateSet {
    pub fn new(rates: Vec<u32>, bits: Vec<u16>, channels: Vec<u16>) -> Self {
        Self {
            rates,
            bits,
            channels,
        }
    }

    /// Number of triples in the cross product.
    pub fn trial_count(&self) -> usize {
        self.rates.len() * self.bits.len() * self.channels.len()
    }

    /// Cross product in rate, bits, channels order.
    pub fn combinations(&self) -> impl Iterator<Item = DeviceCapability> + '_ {
        self.rates.iter().flat_map(move |&rate| {
            self.bits.iter().flat_map(move |&bits| {
                self.channels
                    .iter()
                    .map(move |&channels| DeviceCapability::new(rate, bits, channels))
            })
        })
    }
}

impl Default for CandidateSet {
    /// Common hardware rates, sample widths and channel counts.
    fn default() -> Self {
        Self {
            rates: vec![
                8000, 11025, 16000, 22050, 32000, 44100, 48000, 88200, 96000, 176400, 192000,
            ],
            bits: vec![8, 16, 24, 32],
            channels: vec![1, 2, 4, 6, 8],
        }
    }
}

/// Outcome of a probe run.
///
/// `combinations` is the only jointly-valid list; the three independent
/// sets are its projections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedSet {
    pub rates: BTreeSet<u32>,
    pub bits: BTreeSet<u16>,
    pub channels: BTreeSet<u16>,
    pub combinations: Vec<DeviceCapability>,
    /// Set when the trial cap was hit and some candidates were never tried.
    #[serde(default)]
    pub truncated: bool,
}

impl SupportedSet {
    pub fn record(&mut self, capability: DeviceCapability) {
        self.rates.insert(capability.rate);
        self.bits.insert(capability.bits);
        self.channels.insert(capability.channels);
        self.combinations.push(capability);
    }

    pub fn supports(&self, capability: &DeviceCapability) -> bool {
        self.combinations.contains(capability)
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }
}
