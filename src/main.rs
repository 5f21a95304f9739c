use anyhow::{Context, Result};
use cbrw::{
    cli::{Cli, OutputFormat},
    ObservationCounter,
};
use clap::Parser;
use std::io::{BufRead, BufReader, Read};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn open_input(args: &Cli) -> Result<Box<dyn Read>> {
    match &args.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(std::io::stdin())),
    }
}

/// Count a whole JSON document (object or array of objects)
fn count_document(counter: &mut ObservationCounter, reader: impl Read) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_reader(reader).context("Failed to parse JSON input")?;
    counter.update_json(&value)?;
    Ok(())
}

/// Count JSON Lines input, one document per non-blank line
fn count_lines(counter: &mut ObservationCounter, reader: impl Read) -> Result<()> {
    for (n, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse JSON on line {}", n + 1))?;
        counter
            .update_json(&value)
            .with_context(|| format!("Invalid observation on line {}", n + 1))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let reader = open_input(&args)?;
    let mut counter = ObservationCounter::new();
    if args.lines {
        count_lines(&mut counter, reader)?;
    } else {
        count_document(&mut counter, reader)?;
    }

    let report = counter.report();
    match args.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
