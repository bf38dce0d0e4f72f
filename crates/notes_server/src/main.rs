//! Notes REST API server entry point.

use clap::Parser;
use notes_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    notes_server::serve(config).await
}
