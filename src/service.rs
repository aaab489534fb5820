use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{self, Extension},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
};
use handlebars::Handlebars;
use include_dir::{include_dir, Dir};
use serde::Serialize;
use tracing::log::*;

use crate::client::ApiClient;
use crate::notebook::Notebook;
use crate::view;

const STATIC_FILES: Dir = include_dir!("$CARGO_MANIFEST_DIR/static");

pub(crate) async fn serve_asset(extract::Path(path): extract::Path<PathBuf>) -> impl IntoResponse {
    let path = path.strip_prefix("/").unwrap_or(&path);

    let file = match STATIC_FILES.get_file(&path) {
        Some(file) => file,
        None => return Err((StatusCode::NOT_FOUND, "file not found")),
    };

    let mime = mime_guess::from_path(&path);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        mime.first_or_octet_stream().to_string().parse().unwrap(),
    );

    Ok((headers, file.contents()))
}

#[derive(Debug, Serialize)]
struct ListEntry {
    filename: String,
    size_kb: String,
}

#[derive(Debug, Serialize)]
struct ListData {
    api_base: String,
    entries: Vec<ListEntry>,
}

pub(crate) async fn notebook_list(
    Extension(client): Extension<Arc<ApiClient>>,
) -> Html<String> {
    let entries = match client.notebooks().await {
        Ok(entries) => entries,
        Err(err) => {
            error!("failed to list notebooks: {}", err);
            return error_page(
                &format!("Could not load the notebook list: {}", err),
                ErrorNav::Retry,
            );
        }
    };

    let data = ListData {
        api_base: client.base().to_owned(),
        entries: entries
            .into_iter()
            .map(|entry| ListEntry {
                filename: entry.filename,
                size_kb: format_kb(entry.size),
            })
            .collect(),
    };

    let html = Handlebars::new()
        .render_template(include_str!("../templates/notebook_list.html"), &data)
        .unwrap();

    Html(html)
}

#[derive(Debug, Serialize)]
struct NotebookData {
    filename: String,
    size_kb: Option<String>,
    cell_count: usize,
    cells_html: String,
    raw_json: String,
}

pub(crate) async fn notebook_view(
    extract::Path(filename): extract::Path<String>,
    Extension(client): Extension<Arc<ApiClient>>,
) -> Html<String> {
    let raw = match client.notebook(&filename).await {
        Ok(raw) => raw,
        Err(err) => {
            error!("failed to fetch notebook {}: {}", filename, err);
            return error_page(
                &format!("Could not load {}: {}", filename, err),
                ErrorNav::BackToList,
            );
        }
    };

    let notebook: Notebook = match serde_json::from_value(raw.clone()) {
        Ok(notebook) => notebook,
        Err(err) => {
            warn!("notebook {} failed to parse: {}", filename, err);
            return error_page(
                "The notebook does not have a valid structure.",
                ErrorNav::BackToList,
            );
        }
    };

    let cells = match &notebook.cells {
        Some(cells) => cells,
        None => {
            return error_page(
                "The notebook does not have a valid structure.",
                ErrorNav::BackToList,
            );
        }
    };

    let data = NotebookData {
        filename,
        size_kb: notebook
            .file_info
            .as_ref()
            .map(|info| format_kb(info.size)),
        cell_count: cells.len(),
        cells_html: view::render_cells(cells),
        raw_json: serde_json::to_string_pretty(&raw).unwrap_or_else(|_| raw.to_string()),
    };

    let html = Handlebars::new()
        .render_template(include_str!("../templates/notebook_view.html"), &data)
        .unwrap();

    Html(html)
}

#[derive(Debug)]
enum ErrorNav {
    Retry,
    BackToList,
}

#[derive(Debug, Serialize)]
struct ErrorData<'a> {
    message: &'a str,
    retry: bool,
    back: bool,
}

fn error_page(message: &str, nav: ErrorNav) -> Html<String> {
    let data = ErrorData {
        message,
        retry: matches!(nav, ErrorNav::Retry),
        back: matches!(nav, ErrorNav::BackToList),
    };

    let html = Handlebars::new()
        .render_template(include_str!("../templates/error.html"), &data)
        .unwrap();

    Html(html)
}

fn format_kb(size: u64) -> String {
    format!("{:.1}", size as f64 / 1024.0)
}
