use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::resource::{GroupId, LightState};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// A bridge whose address is known but that has no application key
/// configured yet.
#[derive(Debug, Clone)]
pub struct UnauthBridge {
    /// The IP-address of the bridge.
    pub ip: std::net::IpAddr,
}

impl UnauthBridge {
    /// Consumes the bridge and returns a new one with a configured username.
    /// ### Example
    /// ```no_run
    /// let bridge = huepresetd::Bridge::for_ip([192u8, 168, 0, 4])
    ///     .with_user("rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj");
    /// ```
    pub fn with_user(self, username: impl Into<String>) -> Bridge {
        Bridge {
            ip: self.ip,
            username: username.into(),
            client: create_reqwest_client(),
        }
    }
}

/// The bridge is the central access point of the lamps in a Hue setup; every
/// command this daemon issues goes through its REST API.
#[derive(Debug, Clone)]
pub struct Bridge {
    /// The IP-address of the bridge.
    pub ip: std::net::IpAddr,
    /// The username (application key) of the currently logged in user.
    pub username: String,
    client: reqwest::Client,
}

fn create_reqwest_client() -> reqwest::Client {
    reqwest::Client::builder()
        .tcp_keepalive(Some(Duration::from_secs(5)))
        .build()
        .unwrap()
}

impl Bridge {
    /// Creates a handle for a bridge at this IP. If you know the IP-address,
    /// this is the fastest option. Note that this function does not validate
    /// whether a bridge is really present at the IP-address.
    /// ### Example
    /// ```no_run
    /// let bridge = huepresetd::Bridge::for_ip([192u8, 168, 0, 4]);
    /// ```
    pub fn for_ip(ip: impl Into<std::net::IpAddr>) -> UnauthBridge {
        UnauthBridge { ip: ip.into() }
    }

    /// Applies `state` to the group with the given id.
    /// ### Example
    /// ```no_run
    /// # use huepresetd::{GroupId, LightState};
    /// # tokio_test::block_on(async {
    /// let bridge = huepresetd::Bridge::for_ip([192u8, 168, 0, 4])
    ///     .with_user("rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj");
    /// let relax = LightState::default().on().with_brightness(144);
    /// bridge.set_group_state(GroupId(1), &relax).await.unwrap();
    /// # })
    /// ```
    pub async fn set_group_state(&self, group: GroupId, state: &LightState) -> crate::Result<()> {
        let url = format!(
            "http://{}/api/{}/groups/{}/action",
            self.ip, self.username, group
        );
        let resp: BridgeResponse<SuccessResponse<Value>> = self
            .client
            .put(&url)
            .json(state)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        resp.get()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl crate::dispatch::GroupClient for Bridge {
    async fn set_group_state(&self, group: GroupId, state: &LightState) -> crate::Result<()> {
        Bridge::set_group_state(self, group, state).await
    }
}

/// The bridge answers every command with a JSON array of per-field success
/// entries, or an array of error entries.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BridgeResponse<T> {
    Element(T),
    List(Vec<T>),
    Errors(Vec<BridgeError>),
}

impl<T> BridgeResponse<T> {
    fn get(self) -> crate::Result<T> {
        match self {
            BridgeResponse::Element(t) => Ok(t),
            BridgeResponse::List(mut ts) => ts
                .pop()
                .ok_or_else(|| crate::HueError::protocol_err("expected non-empty array")),
            BridgeResponse::Errors(mut es) => {
                // it is safe to unwrap here, since any empty lists will be
                // treated as the `BridgeResponse::List` case.
                let BridgeError { error } = es.pop().unwrap();
                Err(crate::HueError::BridgeError {
                    code: error.r#type,
                    msg: error.description,
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct BridgeError {
    error: BridgeErrorInner,
}

#[derive(Debug, Deserialize)]
struct BridgeErrorInner {
    #[allow(dead_code)]
    address: String,
    description: String,
    r#type: usize,
}

#[derive(Debug, Deserialize)]
struct SuccessResponse<T> {
    success: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_success_array_decodes() {
        let resp: BridgeResponse<SuccessResponse<Value>> = serde_json::from_str(
            r#"[{"success":{"/groups/1/action/on":true}},
                {"success":{"/groups/1/action/bri":144}}]"#,
        )
        .unwrap();
        assert!(resp.get().is_ok());
    }

    #[test]
    fn an_error_array_becomes_a_bridge_error() {
        let resp: BridgeResponse<SuccessResponse<Value>> = serde_json::from_str(
            r#"[{"error":{"type":201,"address":"/groups/1/action/on",
                "description":"parameter, on, is not modifiable."}}]"#,
        )
        .unwrap();
        match resp.get() {
            Err(crate::HueError::BridgeError { code, msg }) => {
                assert_eq!(code, 201);
                assert_eq!(msg, "parameter, on, is not modifiable.");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn an_empty_array_is_a_protocol_error() {
        let resp: BridgeResponse<SuccessResponse<Value>> = serde_json::from_str("[]").unwrap();
        assert!(matches!(
            resp.get(),
            Err(crate::HueError::ProtocolError { .. })
        ));
    }
}
