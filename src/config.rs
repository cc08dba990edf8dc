use std::{fs, net::IpAddr, path::Path};

use serde::Deserialize;

use crate::presets::{Presets, DEFAULT_ROTATION};
use crate::HueError;

/// Runtime settings. Defaults are overlaid by the TOML config file, which is
/// overlaid by environment variables; the binary applies CLI flags on top.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the web server listens on, `host:port`.
    pub bind: String,
    /// Hue application key (username).
    pub username: String,
    /// Pinned bridge address. When unset the bridge is discovered at startup.
    pub bridge_addr: Option<IpAddr>,
    /// Scene sequence for the button rotation.
    pub rotation: Vec<String>,
    /// When false, a failed bridge call is logged and the endpoint still
    /// reports success (the button stays responsive with the bridge down).
    pub surface_bridge_errors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:9000".into(),
            username: String::new(),
            bridge_addr: None,
            rotation: DEFAULT_ROTATION.iter().map(ToString::to_string).collect(),
            surface_bridge_errors: true,
        }
    }
}

impl Settings {
    /// Fails fast on a missing key or a rotation entry outside the scene
    /// catalog (the resolver would otherwise silently fall back to `on`).
    pub fn validate(&self, presets: &Presets) -> crate::Result<()> {
        if self.username.is_empty() {
            return Err(HueError::ConfigError {
                msg: "hue username / application key is required".into(),
            });
        }
        if let Some(unknown) = self.rotation.iter().find(|name| !presets.has_scene(name)) {
            return Err(HueError::ConfigError {
                msg: format!("unknown scene {unknown:?} in rotation"),
            });
        }
        Ok(())
    }
}

pub fn load_settings(path: &Path) -> crate::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str(&raw).map_err(|e| HueError::ConfigError {
            msg: format!("{}: {e}", path.display()),
        })?,
        Err(_) => Settings::default(),
    };

    if let Ok(v) = std::env::var("HUEPRESETD_BIND") {
        settings.bind = v;
    }
    if let Ok(v) = std::env::var("HUE_USERNAME") {
        settings.username = v;
    }
    if let Ok(v) = std::env::var("HUE_BRIDGE_ADDR") {
        settings.bridge_addr = Some(v.parse()?);
    }

    Ok(settings)
}
