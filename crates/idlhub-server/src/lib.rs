//! The idlhub repository server.
//!
//! A thin axum surface over [`idlhub_core::catalog`]: list handlers return
//! JSON arrays of names, the payload handlers stream archives in and out
//! of storage, and everything else falls through to a logged 404.
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET  | `/v1/projects` | 200, project names |
//! | GET  | `/v1/projects/{project}/types` | 200, type names |
//! | GET  | `/v1/projects/{project}/types/{type}/versions` | 200, version names |
//! | GET  | `/v1/projects/{project}/types/{type}/versions/{version}/data.tar.gz` | 200, archive bytes |
//! | POST | `/v1/projects/{project}/types/{type}/versions/{version}` | 201, empty |

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
