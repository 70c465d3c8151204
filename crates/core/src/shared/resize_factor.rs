use crate::shared::error::OverlayError;

/// Positive scale applied to every overlay on top of the fixed magnification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeFactor(f64);

impl ResizeFactor {
    pub fn new(value: f64) -> Result<Self, OverlayError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(OverlayError::ClientInput(format!(
                "resize must be a positive number, got {value}"
            )))
        }
    }

    /// Parses an optional query-style value. Absent or blank means 1.
    pub fn parse(raw: Option<&str>) -> Result<Self, OverlayError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(text) => {
                let value: f64 = text.parse().map_err(|_| {
                    OverlayError::ClientInput(format!("resize must be a positive number, got {text:?}"))
                })?;
                Self::new(value)
            }
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for ResizeFactor {
    fn default() -> Self {
        Self(1.0)
    }
}
