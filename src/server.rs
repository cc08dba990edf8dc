use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Redirect},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;

use crate::dispatch::{DispatchError, Dispatcher, GroupClient};

/// Envelope returned by the JSON endpoints. `status_code` mirrors the HTTP
/// status line so clients that drop the transport status still see it.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub result: bool,
    pub message: String,
    pub status_code: u16,
}

impl ApiResponse {
    fn ok(message: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
        Self::reply(StatusCode::OK, true, message)
    }

    fn fail(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
        Self::reply(status, false, message)
    }

    fn reply(
        status: StatusCode,
        result: bool,
        message: impl Into<String>,
    ) -> (StatusCode, Json<ApiResponse>) {
        (
            status,
            Json(ApiResponse {
                result,
                message: message.into(),
                status_code: status.as_u16(),
            }),
        )
    }
}

/// Builds the full route table. The two JSON endpoints accept any verb and
/// answer 403 themselves for the ones they do not support, which keeps the
/// envelope shape consistent across methods.
pub fn build_router<C>(dispatcher: Arc<Dispatcher<C>>) -> Router
where
    C: GroupClient + Send + Sync + 'static,
{
    Router::new()
        .route("/flic", any(flic::<C>))
        .route("/phone", get(phone))
        .route("/home", get(home))
        .route("/status", get(status))
        .route("/api/1/group", any(group::<C>))
        .route("/api/1/status", get(status))
        .route("/", get(root))
        .with_state(dispatcher)
}

async fn root() -> Redirect {
    Redirect::temporary("/home")
}

async fn home() -> Html<&'static str> {
    Html(include_str!("../templates/home.html"))
}

async fn phone() -> Html<&'static str> {
    Html(include_str!("../templates/phone.html"))
}

async fn status() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot")
}

/// `GET /api/1/group?name=<room>&state=<scene>`: applies a named scene.
async fn group<C>(
    State(dispatcher): State<Arc<Dispatcher<C>>>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<ApiResponse>)
where
    C: GroupClient + Send + Sync + 'static,
{
    if method != Method::GET {
        return ApiResponse::fail(StatusCode::FORBIDDEN, "Not an HTTP GET.");
    }
    let Some(name) = params.get("name") else {
        return ApiResponse::fail(StatusCode::UNAUTHORIZED, "Invalid id or name.");
    };
    let Some(state) = params.get("state") else {
        return ApiResponse::fail(StatusCode::UNAUTHORIZED, "Invalid state.");
    };
    match dispatcher.apply_named_scene(name, state).await {
        Ok(scene) => ApiResponse::ok(scene),
        Err(e) => dispatch_failure(e),
    }
}

/// `GET /flic` reports the scene the next press will apply; `POST
/// /flic?name=<room>` applies it and advances the rotation.
async fn flic<C>(
    State(dispatcher): State<Arc<Dispatcher<C>>>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<ApiResponse>)
where
    C: GroupClient + Send + Sync + 'static,
{
    match method {
        Method::GET => ApiResponse::ok(dispatcher.peek_scene()),
        Method::POST => {
            let Some(name) = params.get("name") else {
                return ApiResponse::fail(StatusCode::UNAUTHORIZED, "Invalid id or name.");
            };
            match dispatcher.trigger_next_scene(name).await {
                Ok(scene) => ApiResponse::ok(scene),
                Err(e) => dispatch_failure(e),
            }
        }
        _ => ApiResponse::fail(StatusCode::FORBIDDEN, "Not an HTTP POST."),
    }
}

fn dispatch_failure(err: DispatchError) -> (StatusCode, Json<ApiResponse>) {
    match err {
        DispatchError::UnknownRoom(_) => {
            ApiResponse::fail(StatusCode::UNAUTHORIZED, "Invalid id or name.")
        }
        DispatchError::Bridge(e) => {
            ApiResponse::fail(StatusCode::BAD_GATEWAY, format!("Bridge request failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::Presets;
    use crate::resource::{GroupId, LightState};
    use crate::rotation::Rotation;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct StubClient {
        fail: bool,
    }

    #[async_trait::async_trait]
    impl GroupClient for StubClient {
        async fn set_group_state(&self, _group: GroupId, _state: &LightState) -> crate::Result<()> {
            if self.fail {
                Err(crate::HueError::protocol_err("bridge offline"))
            } else {
                Ok(())
            }
        }
    }

    fn test_app(fail: bool, surface: bool) -> Router {
        let dispatcher = Dispatcher::new(
            Presets::builtin(),
            Rotation::default(),
            StubClient { fail },
            surface,
        );
        build_router(Arc::new(dispatcher))
    }

    async fn send(app: &Router, method: &str, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn group_applies_a_named_scene() {
        let app = test_app(false, true);
        let response = send(&app, "GET", "/api/1/group?name=bedroom&state=blue").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"result": true, "message": "blue", "status_code": 200})
        );
    }

    #[tokio::test]
    async fn group_requires_the_state_parameter() {
        let app = test_app(false, true);
        let response = send(&app, "GET", "/api/1/group?name=bedroom").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({"result": false, "message": "Invalid state.", "status_code": 401})
        );
    }

    #[tokio::test]
    async fn group_requires_the_name_parameter() {
        let app = test_app(false, true);
        let response = send(&app, "GET", "/api/1/group?state=blue").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({"result": false, "message": "Invalid id or name.", "status_code": 401})
        );
    }

    #[tokio::test]
    async fn group_rejects_unknown_rooms() {
        let app = test_app(false, true);
        let response = send(&app, "GET", "/api/1/group?name=garage&state=on").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid id or name.");
    }

    #[tokio::test]
    async fn group_rejects_other_verbs() {
        let app = test_app(false, true);
        let response = send(&app, "POST", "/api/1/group?name=bedroom&state=blue").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            json!({"result": false, "message": "Not an HTTP GET.", "status_code": 403})
        );
    }

    #[tokio::test]
    async fn flic_get_reads_without_advancing() {
        let app = test_app(false, true);
        for _ in 0..3 {
            let response = send(&app, "GET", "/flic").await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await["message"], "deep-sea");
        }
    }

    #[tokio::test]
    async fn flic_post_applies_and_advances() {
        let app = test_app(false, true);
        let response = send(&app, "POST", "/flic?name=bedroom").await;
        assert_eq!(response.status(), StatusCode::OK);
        // the reply names the scene that was just applied
        assert_eq!(body_json(response).await["message"], "deep-sea");

        let response = send(&app, "GET", "/flic").await;
        assert_eq!(body_json(response).await["message"], "blue");
    }

    #[tokio::test]
    async fn flic_post_requires_the_name_parameter() {
        let app = test_app(false, true);
        let response = send(&app, "POST", "/flic").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({"result": false, "message": "Invalid id or name.", "status_code": 401})
        );
    }

    #[tokio::test]
    async fn flic_rejects_other_verbs() {
        let app = test_app(false, true);
        let response = send(&app, "DELETE", "/flic?name=bedroom").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            json!({"result": false, "message": "Not an HTTP POST.", "status_code": 403})
        );
    }

    #[tokio::test]
    async fn a_bridge_failure_surfaces_and_still_advances() {
        let app = test_app(true, true);
        let response = send(&app, "POST", "/flic?name=bedroom").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["result"], false);
        assert_eq!(body["status_code"], 502);

        let response = send(&app, "GET", "/flic").await;
        assert_eq!(body_json(response).await["message"], "blue");
    }

    #[tokio::test]
    async fn a_bridge_failure_is_swallowed_when_configured() {
        let app = test_app(true, false);
        let response = send(&app, "POST", "/flic?name=bedroom").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "deep-sea");
    }

    #[tokio::test]
    async fn status_is_a_teapot() {
        let app = test_app(false, true);
        for uri in ["/status", "/api/1/status"] {
            let response = send(&app, "GET", uri).await;
            assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        }
    }

    #[tokio::test]
    async fn root_redirects_to_home() {
        let app = test_app(false, true);
        let response = send(&app, "GET", "/").await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()["location"], "/home");
    }
}
