pub mod results_writer;
pub mod snapshot_file;
