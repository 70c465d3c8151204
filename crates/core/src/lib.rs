//! Puts an animated overlay on every face in a photo.
//!
//! Face boxes from a detection service are turned into pixel placements
//! ([`overlay::domain::placement`]), then into compositor commands
//! ([`overlay::domain::composite_command`]), composited in one pass and
//! published. [`pipeline::tomify_upload_use_case::TomifyUploadUseCase`]
//! drives one request end to end.

pub mod detection;
pub mod overlay;
pub mod pipeline;
pub mod publish;
pub mod shared;
