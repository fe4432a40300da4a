use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use parentage::formats::run_script;
use parentage::Sprite;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	#[arg(help = "Path to the scene script (.json)")]
	script_path: PathBuf,
	#[arg(short, long, help = "Log every push to a target")]
	verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	tracing_subscriber::registry()
		.with(fmt::layer())
		.with(if cli.verbose { LevelFilter::TRACE } else { LevelFilter::INFO })
		.init();

	info!("Running {}", cli.script_path.display());
	let text = fs::read_to_string(&cli.script_path)?;
	let output = run_script::<Sprite>(&text)?;

	println!("{}", output.registry);
	for (query, reply) in &output.replies {
		println!("{} -> {}", query.opcode(), reply);
	}

	for id in output.registry.ids() {
		if let Some(sprite) = output.registry.target(id) {
			println!(
				"{id}: x={:.3} y={:.3} direction={:.3} size={:.3}",
				sprite.x, sprite.y, sprite.direction, sprite.size
			);
		}
	}

	Ok(())
}
