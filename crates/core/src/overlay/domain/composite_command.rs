use std::path::{Path, PathBuf};

use crate::overlay::domain::placement::PlacementSpec;

/// Tokens for one "resize the overlay, then layer it at an offset" step,
/// in the compositor's command-line syntax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeCommand {
    tokens: Vec<String>,
}

impl CompositeCommand {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Everything the compositor needs for a single invocation.
///
/// Commands are applied in order on top of the source image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub commands: Vec<CompositeCommand>,
}

impl OverlayRequest {
    /// Full argument list: source, every command's tokens, destination.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(2 + self.commands.len() * 10);
        args.push(self.source.display().to_string());
        for command in &self.commands {
            args.extend(command.tokens.iter().cloned());
        }
        args.push(self.destination.display().to_string());
        args
    }
}

pub fn build_command(spec: &PlacementSpec, overlay_asset: &Path) -> CompositeCommand {
    let tokens = vec![
        "null:".to_string(),
        "(".to_string(),
        overlay_asset.display().to_string(),
        "-resize".to_string(),
        format!("{}x{}", spec.height, spec.width),
        ")".to_string(),
        "-geometry".to_string(),
        format!("{}{}", signed_offset(spec.x), signed_offset(spec.y)),
        "-layers".to_string(),
        "composite".to_string(),
    ];
    CompositeCommand { tokens }
}

/// Geometry offsets have no separator between x and y, so every value
/// carries an explicit sign.
pub fn signed_offset(value: i64) -> String {
    format!("{value:+}")
}
