//! Serve command implementation.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use url::Url;

use mergulho_server::server::{self, AppState};
use mergulho_server::store::StoreArgs;

use crate::output;

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Address to listen on
    #[arg(long, env = "MERGULHO_LISTEN", default_value = "127.0.0.1:8000")]
    pub listen: SocketAddr,

    /// Base URL sighting images are served under (images at {base}/imagens/{registro}.jpg)
    #[arg(long, env = "MERGULHO_IMAGE_BASE_URL")]
    pub image_base_url: Option<Url>,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let store = args.store.open()?;

    let mut state = AppState::new(store);
    if let Some(base) = args.image_base_url {
        state = state.with_image_base_url(base);
    }

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("Failed to listen on {}", args.listen))?;
    output::field("Listening", &format!("http://{}", listener.local_addr()?));

    server::serve(listener, state)
        .await
        .context("HTTP server failed")
}
