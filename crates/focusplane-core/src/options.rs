//! Configuration options for the focus plane tool.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Global configuration options for the focus plane tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Name suffix that marks a proxy, also used to rediscover it.
    pub marker: String,

    /// Proxy geometry.
    pub plane: PlaneOptions,

    /// Controls window.
    pub panel: PanelOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            marker: "FocusPlane".to_string(),
            plane: PlaneOptions::default(),
            panel: PanelOptions::default(),
        }
    }
}

impl Options {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_json_str(&text)?;
        log::debug!("loaded focus plane options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Serializes the options as pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Proxy name for a camera transform called `camera_name`.
    pub fn proxy_name(&self, camera_name: &str) -> String {
        format!("{camera_name}{}", self.marker)
    }

    /// Whether `node_name` looks like a proxy.
    pub fn is_proxy_name(&self, node_name: &str) -> bool {
        node_name.contains(&self.marker)
    }
}

/// Size and grid of the proxy quad.
///
/// The subdivisions only draw a reference grid, they carry no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneOptions {
    /// Width before scaling.
    pub width: f64,
    /// Height before scaling.
    pub height: f64,
    /// Faces along X.
    pub subdivisions_x: u32,
    /// Faces along Y.
    pub subdivisions_y: u32,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            subdivisions_x: 3,
            subdivisions_y: 3,
        }
    }
}

/// Controls window layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelOptions {
    /// Window title.
    pub title: String,
    /// Window width in pixels.
    pub width: u32,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            title: "Focus Plane Controls".to_string(),
            width: 300,
        }
    }
}
