pub mod mixer_probe;
pub mod mixer_session;
