//! dsvg CLI - draw.io diagram to SVG converter.
//!
//! Provides commands for:
//! - `convert`: Convert a diagram file (or stdin) to SVG
//! - `serve`: Start the conversion HTTP server

mod commands;
mod error;
mod logging;
mod output;

use clap::{CommandFactory, Parser, Subcommand};

use commands::{ConvertArgs, GlobalArgs, ServeArgs};
use output::Output;

/// dsvg - draw.io diagram to SVG converter.
#[derive(Parser)]
#[command(name = "dsvg", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a diagram to SVG.
    Convert(ConvertArgs),
    /// Start the conversion server.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return;
    };

    let result = match command {
        Commands::Convert(args) => args.execute(&cli.global),
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(Into::into)
            .and_then(|rt| rt.block_on(args.execute(&cli.global))),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
