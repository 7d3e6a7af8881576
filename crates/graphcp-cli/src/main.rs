//! graphcp CLI - Compile diagram intents into Graphviz documents and images

mod cli;

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli_args = cli::Cli::parse();
    let app = cli::GraphcpApp::new();

    if let Err(e) = app.run(cli_args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
