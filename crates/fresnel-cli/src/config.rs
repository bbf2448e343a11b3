//! TOML configuration file.
//!
//! ```toml
//! [lens]
//! width = 100.0
//! height = 100.0
//! focal_length = 200.0
//! n_prisms = 20
//! effective_radius_mode = "radial"
//!
//! [output]
//! path = "lens.stl"
//! format = "ascii"
//! name = "lens"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fresnel_kernel::LensParams;
use serde::Deserialize;

/// Contents of a configuration file. Every table and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub lens: LensParams,
    pub output: OutputConfig,
}

/// `[output]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub format: Option<String>,
    pub name: Option<String>,
}

impl FileConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` if given, otherwise an empty configuration.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// File lens parameters with command-line values laid on top.
    ///
    /// An alternative given on the command line (aperture size or prism
    /// count) displaces the file's other alternative instead of conflicting.
    pub fn lens_with(&self, cli: &LensParams) -> LensParams {
        let mut base = self.lens.clone();
        if cli.width.is_some() || cli.height.is_some() {
            base.diameter = None;
        }
        if cli.diameter.is_some() {
            base.width = None;
            base.height = None;
        }
        if cli.n_prisms.is_some() {
            base.prism_pitch = None;
        }
        if cli.prism_pitch.is_some() {
            base.n_prisms = None;
        }
        base.merged(cli)
    }
}
