//! Cross-cutting HTTP layers: CORS, security headers and panic recovery.

use std::any::Any;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::error::GENERIC_MESSAGE;

/// Headers added to every response unless a handler already set them.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    ("x-dns-prefetch-control", "off"),
];

/// CORS restricted to the configured origins, with credentials allowed.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Response mapper adding the standard security headers.
pub async fn security_headers(mut response: Response<Body>) -> Response<Body> {
    let headers = response.headers_mut();
    for &(name, value) in SECURITY_HEADERS {
        let name = HeaderName::from_static(name);
        if !headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static(value));
        }
    }
    response
}

/// Build the panic handler used by `CatchPanicLayer`.
///
/// A panicking handler becomes a JSON 500; the panic message is only
/// exposed outside production.
pub fn panic_response(
    production: bool,
) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response<Body> + Clone {
    move |err: Box<dyn Any + Send + 'static>| {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "Unknown panic".to_string()
        };
        tracing::error!("Handler panicked: {}", detail);

        let message = if production {
            GENERIC_MESSAGE.to_string()
        } else {
            detail
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "Internal Server Error",
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn security_headers_are_added() {
        let response = security_headers(Response::new(Body::empty())).await;
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
        assert_eq!(response.headers()["referrer-policy"], "no-referrer");
    }

    #[tokio::test]
    async fn security_headers_keep_existing_values() {
        let mut response = Response::new(Body::empty());
        response
            .headers_mut()
            .insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

        let response = security_headers(response).await;
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }

    async fn panic_body(production: bool, payload: Box<dyn Any + Send>) -> serde_json::Value {
        let handler = panic_response(production);
        let response = handler(payload);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn panic_response_hides_message_in_production() {
        let body = panic_body(true, Box::new("boom")).await;
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], GENERIC_MESSAGE);
    }

    #[tokio::test]
    async fn panic_response_shows_message_in_development() {
        let body = panic_body(false, Box::new(String::from("index out of bounds"))).await;
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], "index out of bounds");
    }
}
