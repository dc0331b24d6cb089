pub mod control_catalog;
pub mod labels;
pub mod snapshot;
