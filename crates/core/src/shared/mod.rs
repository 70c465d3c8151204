pub mod bounding_box;
pub mod config;
pub mod constants;
pub mod error;
pub mod resize_factor;
pub mod scratch_file;
