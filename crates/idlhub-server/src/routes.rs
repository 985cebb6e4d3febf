//! Route handlers for the repository API.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::TryStreamExt;
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::info;

use idlhub_core::catalog;

use crate::error::ApiError;
use crate::state::AppState;

/// Assemble the project router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/projects", get(list_projects))
        .route("/v1/projects/:project/types", get(list_types))
        .route(
            "/v1/projects/:project/types/:type/versions",
            get(list_versions),
        )
        .route(
            "/v1/projects/:project/types/:type/versions/:version",
            post(submit_version),
        )
        .route(
            "/v1/projects/:project/types/:type/versions/:version/data.tar.gz",
            get(pull_version),
        )
        .fallback(unmatched)
}

async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let projects = catalog::list_projects(state.storage.as_ref()).await?;
    Ok(Json(projects))
}

async fn list_types(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let types = catalog::list_types(state.storage.as_ref(), &project).await?;
    Ok(Json(types))
}

async fn list_versions(
    State(state): State<AppState>,
    Path((project, idl_type)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ApiError> {
    let versions = catalog::list_versions(state.storage.as_ref(), &project, &idl_type).await?;
    Ok(Json(versions))
}

/// Accept an uploaded archive, streaming the request body straight into
/// storage at the version's payload path.
async fn submit_version(
    State(state): State<AppState>,
    Path((project, idl_type, version)): Path<(String, String, String)>,
    body: Body,
) -> Result<StatusCode, ApiError> {
    let stream = body.into_data_stream().map_err(std::io::Error::other);
    let mut reader = StreamReader::new(stream);

    catalog::store_payload(
        state.storage.as_ref(),
        &project,
        &idl_type,
        &version,
        &mut reader,
    )
    .await?;
    Ok(StatusCode::CREATED)
}

/// Relay a stored archive back to the client as an octet stream.
async fn pull_version(
    State(state): State<AppState>,
    Path((project, idl_type, version)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let reader =
        catalog::open_payload(state.storage.as_ref(), &project, &idl_type, &version).await?;

    let body = Body::from_stream(ReaderStream::new(reader));
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        body,
    ))
}

async fn unmatched(uri: Uri) -> StatusCode {
    info!(%uri, "url not handled");
    StatusCode::NOT_FOUND
}
