//! Font registration for chart text.
//!
//! The plotting backend draws text only with fonts registered at runtime.
//! DejaVu Sans ships inside the crate, so every chart gets its title, cell
//! values and labels. A configured TrueType file takes precedence over it.
//! Registration happens once per process under the `sans-serif` family.

use crate::error::{ChartError, ChartResult};
use plotters::style::FontStyle;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static BUNDLED_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

static SANS_FONT: OnceLock<Result<FontSource, String>> = OnceLock::new();

/// Where the registered sans-serif face came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Bundled,
    File(PathBuf),
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => f.write_str("DejaVu Sans (bundled)"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Register the sans-serif face if it is not registered yet. The first
/// call decides; later hints are ignored. Fails only if no face at all
/// could be registered.
pub fn ensure_sans_font(hint: Option<&Path>) -> ChartResult<&'static FontSource> {
    SANS_FONT
        .get_or_init(|| {
            let found = register(hint);
            match &found {
                Ok(source) => log::debug!("fonts: registered {source}"),
                Err(e) => log::error!("fonts: {e}"),
            }
            found
        })
        .as_ref()
        .map_err(|e| ChartError::Font(e.clone()))
}

/// The registered face, if registration has run and succeeded.
pub fn registered_font() -> Option<&'static FontSource> {
    SANS_FONT.get().and_then(|r| r.as_ref().ok())
}

fn register(hint: Option<&Path>) -> Result<FontSource, String> {
    if let Some(path) = hint {
        match std::fs::read(path) {
            Ok(bytes) => {
                // The backend keeps a 'static reference; one face per process.
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                if plotters::style::register_font("sans-serif", FontStyle::Normal, bytes).is_ok() {
                    return Ok(FontSource::File(path.to_path_buf()));
                }
                log::warn!("fonts: {} is not a usable font, using bundled face", path.display());
            }
            Err(e) => log::warn!("fonts: cannot read {}: {e}, using bundled face", path.display()),
        }
    }
    plotters::style::register_font("sans-serif", FontStyle::Normal, BUNDLED_SANS)
        .map(|()| FontSource::Bundled)
        .map_err(|_| "bundled DejaVu Sans failed to load".to_string())
}
