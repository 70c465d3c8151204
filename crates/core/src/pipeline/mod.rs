pub mod overlay_faces_use_case;
pub mod pipeline_logger;
pub mod pipeline_stage;
pub mod tomify_upload_use_case;
pub mod upload_intake;

#[cfg(test)]
pub(crate) mod test_doubles;
