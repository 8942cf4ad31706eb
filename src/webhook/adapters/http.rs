//! HTTP endpoint receiving tracker notifications.
//!
//! The route accepts every method so that method and media-type rejections
//! produce the same JSON error envelope as payload validation failures.

use crate::webhook::{
    domain::WebhookError,
    ports::{DispatchError, WebhookDispatch},
    services::WebhookNormalizer,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::any,
};
use mockable::Clock;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Path the webhook endpoint is mounted on.
pub const WEBHOOK_PATH: &str = "/webhook";

struct WebhookState<C> {
    dispatch: Arc<dyn WebhookDispatch>,
    clock: Arc<C>,
}

/// Builds the router serving [`WEBHOOK_PATH`].
pub fn webhook_router<C>(dispatch: Arc<dyn WebhookDispatch>, clock: Arc<C>) -> Router
where
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route(WEBHOOK_PATH, any(receive_webhook::<C>))
        .with_state(Arc::new(WebhookState { dispatch, clock }))
}

/// Serves `router` on `bind` until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns the I/O error raised while binding or serving.
pub async fn serve_webhooks(
    bind: SocketAddr,
    router: Router,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "webhook endpoint listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuccessBody {
    status: &'static str,
    ticket_id: String,
    message: String,
    request_id: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: u16,
    message: String,
}

#[derive(Debug)]
enum WebhookRejection {
    MethodNotAllowed(Method),
    UnsupportedMediaType,
    Invalid(WebhookError),
    Dispatch(DispatchError),
}

impl WebhookRejection {
    const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MethodNotAllowed(method) => format!("method {method} not allowed, use POST"),
            Self::UnsupportedMediaType => "content type must be application/json".to_owned(),
            Self::Invalid(err) => err.to_string(),
            Self::Dispatch(err) => err.to_string(),
        }
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: ErrorDetail {
                code: status.as_u16(),
                message: self.message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

async fn receive_webhook<C>(
    State(state): State<Arc<WebhookState<C>>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    C: Clock + Send + Sync + 'static,
{
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("webhook", request_id = %request_id);
    async move {
        match accept(&state, &method, &headers, &body).await {
            Ok((ticket_id, message)) => {
                tracing::info!(ticket_id = %ticket_id, "webhook processed");
                let success = SuccessBody {
                    status: "success",
                    ticket_id,
                    message,
                    request_id,
                };
                (StatusCode::OK, Json(success)).into_response()
            }
            Err(rejection) => {
                tracing::warn!(status = rejection.status().as_u16(), error = %rejection.message(), "webhook rejected");
                rejection.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn accept<C>(
    state: &WebhookState<C>,
    method: &Method,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<(String, String), WebhookRejection>
where
    C: Clock + Send + Sync + 'static,
{
    if method != Method::POST {
        return Err(WebhookRejection::MethodNotAllowed(method.clone()));
    }
    if !is_json(headers) {
        return Err(WebhookRejection::UnsupportedMediaType);
    }
    let event = WebhookNormalizer::normalize(body, &*state.clock)
        .map_err(WebhookRejection::Invalid)?;
    tracing::debug!(ticket_id = %event.ticket_id, event = %event.event, "webhook normalized");
    let receipt = state
        .dispatch
        .dispatch(event)
        .await
        .map_err(WebhookRejection::Dispatch)?;
    Ok((receipt.ticket_id, receipt.message))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
}
