use crate::{HueError, HueError::DiscoveryError};
use serde_json::{Map, Value};
use std::net::IpAddr;

mod mdns;

// Service name the bridge announces over DNS-SD
const DNS_SD_HUE_SERVICE_NAME: &str = "_hue._tcp.local";

// As per instructions at
// https://developers.meethue.com/develop/application-design-guidance/hue-bridge-discovery/
pub async fn discover_bridge() -> Result<IpAddr, HueError> {
    match mdns::query_once(DNS_SD_HUE_SERVICE_NAME).await {
        Ok(bridge_ip) => {
            log::info!("discovered bridge at {bridge_ip} using mDNS");
            Ok(bridge_ip)
        }
        Err(mdns_error) => {
            log::debug!("mDNS discovery failed ({mdns_error}), falling back to n-upnp");
            match discover_bridge_n_upnp().await {
                Ok(bridge_ip) => {
                    log::info!("discovered bridge at {bridge_ip} using n-upnp");
                    Ok(bridge_ip)
                }
                Err(nupnp_error) => {
                    log::debug!("n-upnp discovery failed: {nupnp_error}");
                    Err(DiscoveryError {
                        msg: "could not discover a bridge".into(),
                    })
                }
            }
        }
    }
}

pub async fn discover_bridge_n_upnp() -> Result<IpAddr, HueError> {
    let entries: Vec<Map<String, Value>> = reqwest::get("https://discovery.meethue.com/")
        .await?
        .json()
        .await?;

    let entry = entries.first().ok_or(DiscoveryError {
        msg: "expected non-empty array".into(),
    })?;
    let ip = entry
        .get("internalipaddress")
        .and_then(Value::as_str)
        .ok_or(DiscoveryError {
            msg: "expected internalipaddress".into(),
        })?;
    Ok(ip.parse()?)
}
