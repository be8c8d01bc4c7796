//! MAP level utility.
//!
//! Provides three subcommands:
//! - `info`: print the section counts and flags of one or more levels.
//! - `json`: dump a level (or only its summary) as JSON.
//! - `collision`: render the solid grid as a 128x128 grayscale PNG.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use image::{GrayImage, Luma};
use log::info;
use pak_rs::pak_types::file::{
	FloorFrame,
	map::{File as MapFile, constants},
};

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(opts) => run_info(opts),
		Command::Json(opts) => run_json(opts),
		Command::Collision(opts) => run_collision(opts),
	}
}

#[derive(Parser)]
#[command(name = "map_utils")]
#[command(version)]
#[command(about = "Inspect and export MAP level files", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print a summary of each level
	Info(InfoArgs),
	/// Dump a level as JSON
	Json(JsonArgs),
	/// Render the collision grid as a PNG
	Collision(CollisionArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Level files to inspect
	#[arg(value_name = "FILE", required = true)]
	inputs: Vec<PathBuf>,

	/// Also print the floor frame of the given cell, as `x,y`
	#[arg(long, value_name = "X,Y", value_parser = parse_cell)]
	cell: Option<(usize, usize)>,
}

#[derive(Args)]
struct JsonArgs {
	/// Level file to dump
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// Output file (stdout when omitted)
	#[arg(short, long, value_name = "FILE")]
	output: Option<PathBuf>,

	/// Only dump the summary
	#[arg(short, long, default_value_t = false)]
	summary: bool,
}

#[derive(Args)]
struct CollisionArgs {
	/// Level file to render
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// Output PNG path (defaults to the input with a `_solid.png` suffix)
	#[arg(short, long, value_name = "FILE")]
	output: Option<PathBuf>,
}

fn parse_cell(s: &str) -> Result<(usize, usize), String> {
	let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
	let x = x.trim().parse().map_err(|e| format!("invalid x: {e}"))?;
	let y = y.trim().parse().map_err(|e| format!("invalid y: {e}"))?;
	Ok((x, y))
}

fn run_info(opts: InfoArgs) -> Result<()> {
	for input in &opts.inputs {
		let level = MapFile::open(input)?;
		println!("{}:", input.display());
		println!("{}", level.summary());

		if let Some((x, y)) = opts.cell {
			match level.floor_at(x, y) {
				Some(FloorFrame::Base(frame)) => println!("floor ({x}, {y}): base frame {frame}"),
				Some(FloorFrame::Alternate(frame)) => println!("floor ({x}, {y}): alternate frame {frame}"),
				None => println!("floor ({x}, {y}): outside the map"),
			}
		}
	}
	Ok(())
}

fn run_json(opts: JsonArgs) -> Result<()> {
	let level = MapFile::open(&opts.input)?;
	let json = if opts.summary {
		serde_json::to_string_pretty(&level.summary())?
	} else {
		serde_json::to_string_pretty(&level)?
	};

	match opts.output {
		Some(path) => {
			fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
			info!("wrote {}", path.display());
		}
		None => println!("{json}"),
	}
	Ok(())
}

fn run_collision(opts: CollisionArgs) -> Result<()> {
	let level = MapFile::open(&opts.input)?;

	let mut img = GrayImage::new(constants::WIDTH as u32, constants::HEIGHT as u32);
	for (x, y, pixel) in img.enumerate_pixels_mut() {
		let solid = level.solid_at(x as usize, y as usize).unwrap_or(0);
		*pixel = Luma([if solid != 0 { 255 } else { 0 }]);
	}

	let output = opts.output.unwrap_or_else(|| {
		let stem = opts.input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
		opts.input.with_file_name(format!("{stem}_solid.png"))
	});
	img.save(&output).with_context(|| format!("writing {}", output.display()))?;
	info!("wrote collision map of {} to {}", opts.input.display(), output.display());
	Ok(())
}
