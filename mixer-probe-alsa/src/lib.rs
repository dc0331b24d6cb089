//! # mixer-probe-alsa
//!
//! Linux ALSA backend for mixer-probe.
//!
//! Provides:
//! - `AlsaCards`: card enumeration via the ALSA card cursor, plus PCM device hints
//! - `AlsaMixerBackend` / `AlsaMixer`: simple-element mixer access
//! - `AlsaTrialOpener`: exact hw-params trial opens for capability probing
//! - `AlsaCaptureSampler`: dBFS level of a short capture window
//!
//! ## Platform Requirements
//! - Linux with `libasound2` (and its development headers for linking)
//!
//! ## Usage
//! ```ignore
//! use mixer_probe_alsa::{AlsaCaptureSampler, AlsaCards, AlsaMixerBackend};
//! use mixer_probe_core::{MixerProbe, SweepConfiguration};
//!
//! let probe = MixerProbe::new(AlsaMixerBackend);
//! let cards = probe.list_cards(AlsaCards::new());
//! let mut sampler = AlsaCaptureSampler::open("hw:1", 48000, 2, 4800).unwrap();
//! let config = SweepConfiguration::from_json_file("sweep.json".as_ref()).unwrap();
//! let report = probe.sweep_card(cards[0].index, &config, &mut sampler, None, None).unwrap();
//! ```

#[cfg(target_os = "linux")]
pub mod capture_sampler;
#[cfg(target_os = "linux")]
pub mod card_enumerator;
#[cfg(target_os = "linux")]
mod errors;
#[cfg(target_os = "linux")]
pub mod mixer;
#[cfg(target_os = "linux")]
pub mod pcm_prober;

#[cfg(target_os = "linux")]
pub use capture_sampler::AlsaCaptureSampler;
#[cfg(target_os = "linux")]
pub use card_enumerator::AlsaCards;
#[cfg(target_os = "linux")]
pub use mixer::{AlsaMixer, AlsaMixerBackend};
#[cfg(target_os = "linux")]
pub use pcm_prober::AlsaTrialOpener;
