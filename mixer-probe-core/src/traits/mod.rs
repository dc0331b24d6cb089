pub mod card_source;
pub mod level_sampler;
pub mod native_mixer;
pub mod trial_opener;
