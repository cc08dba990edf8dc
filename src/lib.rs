//! Preset scene daemon for Philips Hue lights.
//!
//! `huepresetd` is a small local web server that lets phones, tablets and
//! Flic buttons trigger preset lighting scenes on a Hue bridge. Symbolic
//! room and scene names are resolved against a fixed catalog
//! ([`presets::Presets`]), and repeated button presses cycle through a
//! configurable sequence of scenes ([`rotation::Rotation`]).
//!
//! The bridge itself is addressed through [`bridge::Bridge`], found on the
//! local network with [`disco::discover_bridge`] at startup.

pub mod bridge;
pub mod config;
pub mod disco;
pub mod dispatch;
pub mod presets;
pub mod resource;
pub mod rotation;
pub mod server;

pub use crate::bridge::Bridge;
pub use crate::dispatch::{DispatchError, Dispatcher, GroupClient};
pub use crate::presets::Presets;
pub use crate::resource::{GroupId, LightState};
pub use crate::rotation::Rotation;

pub type Result<T> = std::result::Result<T, HueError>;

#[derive(thiserror::Error, Debug)]
pub enum HueError {
    #[error("protocol error: {msg}")]
    ProtocolError { msg: String },
    #[error("bridge error {code}: {msg}")]
    BridgeError { code: usize, msg: String },
    #[error("discovery error: {msg}")]
    DiscoveryError { msg: String },
    #[error("config error: {msg}")]
    ConfigError { msg: String },
    #[error("mDNS error: {0}")]
    MdnsError(std::io::Error),
    #[error(transparent)]
    RequestError(#[from] reqwest::Error),
    #[error(transparent)]
    AddrError(#[from] std::net::AddrParseError),
}

impl HueError {
    pub fn protocol_err(msg: impl Into<String>) -> HueError {
        HueError::ProtocolError { msg: msg.into() }
    }
}
