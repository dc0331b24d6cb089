pub mod cancel;
pub mod engine;
pub mod steps;
