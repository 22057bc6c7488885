mod calendar;
mod domain;
mod holidays;
mod import;
mod storage;
mod ui;

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::storage::{data_dir, resolve_db_path, Store};

const LOG_FILE: &str = "timecard.log";

#[derive(Debug, Parser)]
#[command(name = "timecard", about = "Personal timesheet for the terminal")]
struct Cli {
	#[arg(long)]
	db: Option<PathBuf>,
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
	Dashboard,
	DbInfo,
	Import { file: PathBuf },
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	init_logging();
	let cli = Cli::parse();
	let store = Store::open(resolve_db_path(cli.db))?;

	match cli.command.unwrap_or(Command::Dashboard) {
		Command::Dashboard => ui::run_dashboard(&store)?,
		Command::DbInfo => print_db_info(&store)?,
		Command::Import { file } => {
			let summary = import::import_file(&store, &file)?;
			for (sheet, count) in &summary.sheets {
				println!("{sheet}: {count} entries");
			}
			println!(
				"imported {} entries (hourly rate {})",
				summary.total_entries, summary.hourly_rate
			);
		}
	}

	Ok(())
}

fn init_logging() {
	let dir = data_dir();
	if fs::create_dir_all(&dir).is_err() {
		return;
	}
	let file = match fs::OpenOptions::new()
		.create(true)
		.append(true)
		.open(dir.join(LOG_FILE))
	{
		Ok(file) => file,
		Err(_) => return,
	};
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(Arc::new(file))
		.with_ansi(false)
		.init();
}

fn print_db_info(store: &Store) -> Result<(), Box<dyn Error>> {
	let info = store.file_info()?;
	let modified: DateTime<Local> = info.modified.into();
	println!("path:     {}", info.path.display());
	println!("size:     {} bytes", info.size_bytes);
	println!("modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
	Ok(())
}
