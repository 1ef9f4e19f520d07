//! axone-mcp - MCP server for the dataverse contracts of an axone chain

use axone_mcp::cli::App;
use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let app = App::parse();
    app.init_tracing();

    app.run().await
}
