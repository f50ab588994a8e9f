//! Print the OpenAPI document as JSON, to stdout or a file.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use portal_backend::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Write the enrollment portal OpenAPI document as pretty JSON",
    version
)]
struct CliArgs {
    /// Write to this path instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|error| io::Error::other(format!("serialise OpenAPI document: {error}")))?;

    match args.output {
        Some(path) => std::fs::write(&path, document + "\n"),
        None => {
            println!("{document}");
            Ok(())
        }
    }
}
