//! nbview is a self-hosted, browser-based viewer for Jupyter notebooks.
//!
//! This crate provides a [`Server`] that fetches notebooks from a backend
//! API and serves them as rendered HTML pages: a list page with every
//! notebook the backend knows about, and a detail page per notebook showing
//! its markdown and code cells, execution outputs, and the raw JSON
//! document.
//!
//! The backend API is an external collaborator; see [`client::ApiClient`]
//! for the two endpoints it must provide. Rendering itself is pure and
//! synchronous and lives in [`render`] and [`view`], so it can also be used
//! without the server.
//!
//! # Example
//!
//! ```no_run
//! use std::net::SocketAddr;
//! use nbview::client::ApiClient;
//! use nbview::Server;
//!
//! # tokio_test::block_on(async {
//! let addr = "127.0.0.1:1337".parse::<SocketAddr>()?;
//! let server = Server::bind(&addr, ApiClient::new("http://localhost:8000")).await?;
//!
//! server.open_browser()?;
//! #   Ok::<_, Box<dyn std::error::Error>>(())
//! # });
//! ```

#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

use std::io;
use std::net::SocketAddr;
use std::process::Stdio;
use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use tokio::process::Command;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::log::*;

pub mod client;
pub mod notebook;
pub mod render;
pub mod view;

mod service;

use crate::client::ApiClient;

/// Notebook viewer server.
///
/// Listens for HTTP connections and serves rendered notebook pages. Each
/// page view issues exactly one request to the backend API; handlers hold no
/// state between requests.
///
/// The server is asynchronous, and assumes that a `tokio` runtime is in use.
#[derive(Debug)]
pub struct Server {
    addr: SocketAddr,
    api_base: String,
    _shutdown_tx: oneshot::Sender<()>,
}

impl Server {
    /// Binds the server to a specified address `addr`, serving notebooks
    /// fetched with the provided `client`.
    ///
    /// Binding to port 0 will request a port assignment from the OS. Use [`addr()`][Self::addr]
    /// to determine what port was assigned.
    ///
    /// The server must be bound using a Tokio runtime.
    pub async fn bind(addr: &SocketAddr, client: ApiClient) -> io::Result<Server> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let api_base = client.base().to_owned();

        let app = Router::new()
            .route("/", get(service::notebook_list))
            .route("/notebooks/:filename", get(service::notebook_view))
            .route("/__/*path", get(service::serve_asset))
            .layer(Extension(Arc::new(client)))
            .layer(TraceLayer::new_for_http());

        let http_server = axum::Server::bind(addr).serve(app.into_make_service());

        let addr = http_server.local_addr();
        info!("listening on {:?}, backend at {}", addr, api_base);

        let http_server = http_server.with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });

        tokio::spawn(http_server);

        Ok(Server {
            addr,
            api_base,
            _shutdown_tx: shutdown_tx,
        })
    }

    /// Returns the socket address that the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the base URL of the backend API the server fetches from.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Opens the user's default browser with the server's URL in the background.
    ///
    /// This function uses platform-specific utilities to determine the browser. The following
    /// platforms are supported:
    ///
    /// | Platform | Program    |
    /// | -------- | ---------- |
    /// | Linux    | `xdg-open` |
    /// | OS X     | `open -g`  |
    /// | Windows  | `explorer` |
    pub fn open_browser(&self) -> io::Result<()> {
        let command = if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg("-g");
            command
        } else if cfg!(target_os = "windows") {
            Command::new("explorer")
        } else {
            Command::new("xdg-open")
        };

        self.open_specific_browser(command)
    }

    /// Opens a browser with a specified command. The HTTP address of the server will be appended
    /// to the command as an argument.
    pub fn open_specific_browser(&self, mut command: Command) -> io::Result<()> {
        command.arg(&format!("http://{}", self.addr()));

        command.stdout(Stdio::null()).stderr(Stdio::null());

        info!("spawning browser: {:?}", command);
        command.spawn()?;
        Ok(())
    }
}
