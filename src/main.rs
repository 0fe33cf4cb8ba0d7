use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tinylisp::{EvaluationContext, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};

/// A small interpreter for a Lisp-like expression language.
#[derive(Debug, Parser)]
#[command(name = "tinylisp", version, about)]
struct Cli {
    /// Source file to run. Starts an interactive session when omitted.
    file: Option<PathBuf>,
}

async fn query(stdout: &mut io::Stdout, lines: &mut io::Lines<io::BufReader<io::Stdin>>) -> io::Result<Option<String>> {
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    lines.next_line().await
}

async fn repl() -> anyhow::Result<()> {
    let mut context = EvaluationContext::new();
    let mut lines = io::BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    println!("tinylisp {}", env!("CARGO_PKG_VERSION"));
    println!("Type (exit) to quit");

    while let Some(line) = query(&mut stdout, &mut lines).await? {
        let line = line.trim();
        if line.is_empty() { continue; }
        if line == "(exit)" { break; }

        match context.run(line) {
            Ok(Value::Unit) => {}
            Ok(value) => println!("{}", value),
            Err(err) => println!("Error: {}", err),
        }
    }

    Ok(())
}

fn run_file(path: PathBuf) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("could not read {}", path.display()))?;

    let mut context = EvaluationContext::new();
    match context.run(&source).with_context(|| format!("while running {}", path.display()))? {
        Value::Unit => {}
        value => println!("{}", value),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.file {
        Some(path) => run_file(path),
        None => repl().await,
    }
}
