/**
 * serve.rs
 * Local preview server for a generated site
 *
 * Static files only, served by `ServeDir`. `/` and directory paths serve
 * `index.html`, page paths without an extension get `.html` appended.
 * Runs until Ctrl-C.
 */

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::errors::Result;

pub async fn serve_dir(root: PathBuf, port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("serving {} at http://localhost:{}", root.display(), port);

    axum::serve(listener, router(root))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for Ctrl-C: {}", e);
    }
    info!("shutting down the server");
}

/// Router serving the files under `root`
pub fn router(root: PathBuf) -> Router {
    Router::new()
        .fallback(serve_page)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(root))
}

async fn serve_page(State(root): State<Arc<PathBuf>>, mut request: Request) -> Response {
    if let Some(page) = page_request_path(&root, request.uri().path()) {
        let target = match request.uri().query() {
            Some(query) => format!("{}?{}", page, query),
            None => page,
        };
        match target.parse::<Uri>() {
            Ok(uri) => {
                debug!("{} -> {}", request.uri(), uri);
                *request.uri_mut() = uri;
            }
            Err(e) => warn!("cannot rewrite {}: {}", request.uri(), e),
        }
    }

    match ServeDir::new(root.as_path())
        .append_index_html_on_directories(true)
        .oneshot(request)
        .await
    {
        Ok(res) => res.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// The `.html` path for an extensionless page request, `None` to serve `url_path` as is.
///
/// Directories, paths with an extension and anything that does not decode
/// to a plain relative path are left alone.
pub fn page_request_path(root: &Path, url_path: &str) -> Option<String> {
    if url_path.ends_with('/') {
        return None;
    }
    let decoded = percent_decode_str(url_path).decode_utf8().ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    if relative.extension().is_some() || root.join(relative).is_dir() {
        return None;
    }
    Some(format!("{}.html", url_path))
}
