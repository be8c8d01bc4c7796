//! ZEL sprite utility.
//!
//! Provides three subcommands:
//! - `info`: decode a sprite file and print per-frame dimensions.
//! - `unpack`: write every frame as `frame_NNNN.png` plus a `metadata.json`.
//! - `sheet`: lay all frames out on a single PNG grid.
//!
//! Shadow tilesets (`X/tilesets/tileset_N_shadows.zel`) are recognised from their
//! path and decoded with the constant-pixel variant unless `--options` or
//! `--constant` say otherwise.

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use image::{RgbaImage, imageops};
use log::{debug, info, warn};
use pak_rs::pak_types::file::{
	Palette,
	zel::{DecodeOptions, File as ZelFile, Frame},
};
use serde::Serialize;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(opts) => run_info(opts),
		Command::Unpack(opts) => run_unpack(opts),
		Command::Sheet(opts) => run_sheet(opts),
	}
}

#[derive(Parser)]
#[command(name = "zel_utils")]
#[command(version)]
#[command(about = "Inspect and export ZEL sprite files", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print frame count and per-frame dimensions
	Info(InfoArgs),
	/// Export every frame as a PNG
	Unpack(UnpackArgs),
	/// Export all frames as a single sprite sheet
	Sheet(SheetArgs),
}

#[derive(Args)]
struct DecodeArgs {
	/// 256-entry RGBA palette file; the Plan 9 palette is used when omitted
	#[arg(short, long, value_name = "FILE")]
	palette: Option<PathBuf>,

	/// JSON file with decoder options
	#[arg(long, value_name = "FILE")]
	options: Option<PathBuf>,

	/// Force the constant-pixel variant
	#[arg(long, default_value_t = false)]
	constant: bool,
}

#[derive(Args)]
struct InfoArgs {
	/// Sprite file to inspect
	#[arg(value_name = "FILE")]
	input: PathBuf,

	#[command(flatten)]
	decode: DecodeArgs,
}

#[derive(Args)]
struct UnpackArgs {
	/// Sprite files to export
	#[arg(value_name = "FILE", required = true)]
	inputs: Vec<PathBuf>,

	/// Output directory; each sprite gets a sub-directory named after its stem
	#[arg(short, long, value_name = "DIR", default_value = "_dump_")]
	output: PathBuf,

	#[command(flatten)]
	decode: DecodeArgs,
}

#[derive(Args)]
struct SheetArgs {
	/// Sprite file to export
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// Output PNG path (defaults to the input with a `.png` extension)
	#[arg(short, long, value_name = "FILE")]
	output: Option<PathBuf>,

	/// Number of frames per row
	#[arg(short, long, value_name = "COUNT", default_value_t = 16)]
	columns: usize,

	#[command(flatten)]
	decode: DecodeArgs,
}

/// Frame metadata written next to the exported PNGs.
#[derive(Serialize)]
struct SpriteMetadata {
	source: PathBuf,
	frame_count: usize,
	options: DecodeOptions,
	frames: Vec<FrameMetadata>,
}

#[derive(Serialize)]
struct FrameMetadata {
	index: usize,
	width: u16,
	height: u16,
	opaque_pixels: usize,
	filename: String,
}

impl DecodeArgs {
	fn palette(&self) -> Result<Palette> {
		Ok(Palette::load_or_fallback(self.palette.as_deref())?)
	}

	/// Resolves the options for `input`: JSON file first, then the shadow tileset
	/// convention, then the command line flag.
	fn options_for(&self, input: &Path) -> Result<DecodeOptions> {
		let base = match &self.options {
			Some(path) => {
				let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
				serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?
			}
			None => DecodeOptions::default(),
		};
		let options = base.for_path(input);
		Ok(options.with_constant_pixels(options.constant_pixels || self.constant))
	}
}

fn frame_image(frame: &Frame) -> Result<RgbaImage> {
	RgbaImage::from_raw(u32::from(frame.width()), u32::from(frame.height()), frame.to_rgba())
		.context("frame buffer does not match its dimensions")
}

fn run_info(opts: InfoArgs) -> Result<()> {
	let palette = opts.decode.palette()?;
	let options = opts.decode.options_for(&opts.input)?;
	let sprite = ZelFile::open(&opts.input, &palette, &options)?;

	println!("{}: {} frames", opts.input.display(), sprite.len());
	if options.constant_pixels {
		println!("constant-pixel variant");
	}
	for (index, frame) in sprite.iter().enumerate() {
		println!("  {index:4}: {frame}");
	}
	let (width, height) = sprite.max_frame_size();
	println!("largest frame: {width}x{height}");
	Ok(())
}

fn run_unpack(opts: UnpackArgs) -> Result<()> {
	let palette = opts.decode.palette()?;
	for input in &opts.inputs {
		let options = opts.decode.options_for(input)?;
		unpack_one(input, &opts.output, &palette, &options)?;
	}
	Ok(())
}

fn unpack_one(input: &Path, output: &Path, palette: &Palette, options: &DecodeOptions) -> Result<()> {
	let sprite = ZelFile::open(input, palette, options)?;

	let stem = input.file_stem().context("input has no file name")?;
	let dir = output.join(stem);
	fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
	info!("unpacking {} ({} frames) into {}", input.display(), sprite.len(), dir.display());

	let mut metadata = SpriteMetadata {
		source: input.to_path_buf(),
		frame_count: sprite.len(),
		options: *options,
		frames: Vec::with_capacity(sprite.len()),
	};

	for (index, frame) in sprite.iter().enumerate() {
		let filename = format!("frame_{index:04}.png");
		let path = dir.join(&filename);
		frame_image(frame)?.save(&path).with_context(|| format!("writing {}", path.display()))?;
		debug!("wrote {}", path.display());

		metadata.frames.push(FrameMetadata {
			index,
			width: frame.width(),
			height: frame.height(),
			opaque_pixels: frame.opaque_count(),
			filename,
		});
	}

	let metadata_path = dir.join("metadata.json");
	fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)
		.with_context(|| format!("writing {}", metadata_path.display()))?;
	info!("{}: exported {} frames", input.display(), metadata.frames.len());
	Ok(())
}

fn run_sheet(opts: SheetArgs) -> Result<()> {
	let palette = opts.decode.palette()?;
	let options = opts.decode.options_for(&opts.input)?;
	let sprite = ZelFile::open(&opts.input, &palette, &options)?;

	let (width, height) = sprite.sprite_sheet_dimensions(opts.columns);
	if width == 0 || height == 0 {
		warn!("{} has no frames to lay out", opts.input.display());
		return Ok(());
	}

	let (cell_width, cell_height) = sprite.max_frame_size();
	let columns = opts.columns.min(sprite.len());
	let mut sheet = RgbaImage::new(width, height);
	for (index, frame) in sprite.iter().enumerate() {
		let x = (index % columns) as u32 * cell_width;
		let y = (index / columns) as u32 * cell_height;
		imageops::replace(&mut sheet, &frame_image(frame)?, i64::from(x), i64::from(y));
	}

	let output = opts.output.unwrap_or_else(|| opts.input.with_extension("png"));
	sheet.save(&output).with_context(|| format!("writing {}", output.display()))?;
	info!("wrote {width}x{height} sheet of {} frames to {}", sprite.len(), output.display());
	Ok(())
}
