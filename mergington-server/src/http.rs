use std::{future::Future, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::{
        self,
        rejection::{PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post},
    Json, Router,
};
use mergington_shared::{Activities, Detail, Message};
use serde_derive::Deserialize;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    openapi,
    state::{RegistryError, State},
};

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: String,
}

/// An error sent back as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let status = match err {
            RegistryError::ActivityNotFound => StatusCode::NOT_FOUND,
            RegistryError::AlreadySignedUp | RegistryError::NotRegistered => {
                StatusCode::BAD_REQUEST
            }
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

/// A segment that does not decode to UTF-8 cannot name any activity.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        log::debug!("Rejected activity name: {}", rejection.body_text());
        RegistryError::ActivityNotFound.into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(Detail {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

async fn list_activities(extract::State(state): extract::State<Arc<State>>) -> Json<Activities> {
    Json(state.list())
}

async fn signup(
    activity: Result<Path<String>, PathRejection>,
    query: Result<Query<EmailQuery>, QueryRejection>,
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Json<Message>, ApiError> {
    let Path(activity) = activity?;
    let Query(EmailQuery { email }) = query?;
    match state.signup(&activity, &email) {
        Ok(spots_left) => {
            log::info!("Signed up {email:?} for {activity:?} ({spots_left} spots left)");
            Ok(Json(Message {
                message: format!("Signed up {email} for {activity}"),
            }))
        }
        Err(err) => {
            log::debug!("Refused signup of {email:?} for {activity:?}: {err}");
            Err(err.into())
        }
    }
}

async fn unregister(
    activity: Result<Path<String>, PathRejection>,
    query: Result<Query<EmailQuery>, QueryRejection>,
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Json<Message>, ApiError> {
    let Path(activity) = activity?;
    let Query(EmailQuery { email }) = query?;
    match state.unregister(&activity, &email) {
        Ok(()) => {
            log::info!("Unregistered {email:?} from {activity:?}");
            Ok(Json(Message {
                message: format!("Unregistered {email} from {activity}"),
            }))
        }
        Err(err) => {
            log::debug!("Refused unregistration of {email:?} from {activity:?}: {err}");
            Err(err.into())
        }
    }
}

async fn openapi_json() -> Json<serde_json::Value> {
    Json(openapi::document())
}

async fn swagger_ui() -> Html<String> {
    Html(openapi::swagger_ui_html())
}

async fn redoc() -> Html<String> {
    Html(openapi::redoc_html())
}

pub fn router(state: Arc<State>) -> Router {
    let static_dir = state.static_dir.clone();

    Router::new()
        .route("/", get(|| async { Redirect::temporary("/static/index.html") }))
        .route("/activities", get(list_activities))
        .route("/activities/:activity_name/signup", post(signup))
        .route("/activities/:activity_name/unregister", delete(unregister))
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(swagger_ui))
        .route("/redoc", get(redoc))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn main(
    state: Arc<State>,
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("http server")?;
    Ok(())
}
