use tracing::warn;

use crate::errors::CoreError;
use crate::models::color::{ColorRequest, Rgb};

/// Resolves a holding's requested color to RGB.
///
/// Unset colors cycle through the palette by the holding's position. Names
/// are looked up case-sensitively in the CSS3 table; an unknown name is not
/// fatal and falls back to the palette with a warning. A malformed `#` hex
/// string is fatal only in strict mode.
pub struct ColorService {
    strict: bool,
}

impl ColorService {
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// A resolver that rejects malformed hex colors with `InvalidColor`.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn resolve(
        &self,
        requested: Option<&str>,
        index: usize,
        palette: &[Rgb],
    ) -> Result<Rgb, CoreError> {
        match ColorRequest::parse(requested) {
            ColorRequest::Hex(rgb) | ColorRequest::Named(rgb) => Ok(rgb),
            ColorRequest::Auto => Self::fallback(index, palette),
            ColorRequest::MalformedHex(hex) => {
                if self.strict {
                    return Err(CoreError::InvalidColor(format!(
                        "'{hex}' is not a valid hex color"
                    )));
                }
                warn!(color = %hex, "color not recognized, falling back to automatic assignment");
                Self::fallback(index, palette)
            }
            ColorRequest::Unrecognized(name) => {
                warn!(color = %name, "color not recognized, falling back to automatic assignment");
                Self::fallback(index, palette)
            }
        }
    }

    fn fallback(index: usize, palette: &[Rgb]) -> Result<Rgb, CoreError> {
        if palette.is_empty() {
            return Err(CoreError::InvalidColor(
                "no palette colors to assign from".into(),
            ));
        }
        Ok(palette[index % palette.len()])
    }
}

impl Default for ColorService {
    fn default() -> Self {
        Self::new()
    }
}
