use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ttentails::{read_statement_file, Knowledge};

/// Decide whether a statement follows from a propositional knowledge base.
#[derive(Debug, Parser)]
#[command(name = "ttentails", version)]
struct Args {
	/// Rules file, one prefix expression per line
	rules: PathBuf,
	/// Additional knowledge file, same format as the rules
	additional: PathBuf,
	/// Statement file; only the first line is read
	statement: PathBuf,
	/// Where the verdict is written
	#[arg(short, long, default_value = "result.txt")]
	output: PathBuf,
	/// Do not echo the knowledge base and statement
	#[arg(short, long)]
	quiet: bool,
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.init();
	let args = Args::parse();

	let mut knowledge = Knowledge::new();
	info!("Loading wumpus rules...");
	knowledge.load_file(&args.rules)?;
	info!("Loading additional knowledge...");
	knowledge.load_file(&args.additional)?;
	knowledge.validate()?;
	if !args.quiet {
		println!("{}", knowledge.knowledge_base().render("\n"));
	}

	info!("Loading statement...");
	let statement = read_statement_file(&args.statement)?;
	if !args.quiet {
		println!("\nChecking statement: {}", statement);
	}

	let verdict = knowledge.verdict(&statement)?;
	println!("\n{}\n", verdict);
	fs::write(&args.output, format!("{}\n", verdict))
		.with_context(|| format!("failed to write {}", args.output.display()))?;
	Ok(())
}
