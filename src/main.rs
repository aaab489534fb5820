use std::env;

use anyhow::Context;
use futures::future;
use tokio::net::lookup_host;

use nbview::client::ApiClient;
use nbview::Server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let client = ApiClient::from_env();

    let port = match env::var("NBVIEW_PORT") {
        Ok(port) => port.parse().context("NBVIEW_PORT is not a port number")?,
        Err(_) => 0,
    };

    let addr = lookup_host(("localhost", port))
        .await?
        .next()
        .context("could not resolve localhost")?;

    let server = Server::bind(&addr, client).await?;

    println!("viewing notebooks from {}", server.api_base());
    println!("listening on http://{}", server.addr());

    if let Err(err) = server.open_browser() {
        eprintln!("could not open a browser: {}", err);
    }

    let () = future::pending().await;

    Ok(())
}
