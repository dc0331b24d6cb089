pub mod capability;
pub mod card;
pub mod config;
pub mod control;
pub mod error;
pub mod hint;
pub mod measurement;
pub mod state;
pub mod sweep_result;
