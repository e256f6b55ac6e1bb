//! Interactive query loop over a freshly built index. Prints each result list
//! as pretty JSON, exactly as the server would return it.

use anyhow::Result;
use clap::Parser;
use search_core::query::to_json;
use server::IndexArgs;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search-debug")]
struct Args {
    #[command(flatten)]
    index: IndexArgs,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();
    let args = Args::parse();
    let engine = args.index.load_engine()?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, "Please Enter Your Search Query# ")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim_end_matches(['\n', '\r']);
        match engine.search(query) {
            Ok(results) => writeln!(stdout, "{}", to_json(&results)?)?,
            Err(err) => tracing::error!(error = %err, query, "search failed"),
        }
    }
    Ok(())
}
