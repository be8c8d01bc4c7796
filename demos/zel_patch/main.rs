//! Repairs damaged sprite files in an extracted game dump.
//!
//! By default the built-in repairs for the building tilesets are applied below
//! `_dump_`. A JSON file holding a list of patches can be given instead.

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use pak_rs::pak_types::file::{Patch, PatchOutcome, known_patches};

#[derive(Parser)]
#[command(name = "zel_patch")]
#[command(version)]
#[command(about = "Apply byte-level repairs to extracted sprite files", long_about = None)]
struct Cli {
	/// Root of the extracted game data
	#[arg(short, long, value_name = "DIR", default_value = "_dump_")]
	root: PathBuf,

	/// JSON file with a list of patches to apply instead of the built-in set
	#[arg(short, long, value_name = "FILE")]
	patches: Option<PathBuf>,

	/// Verify the patches without writing any file
	#[arg(short = 'n', long, default_value_t = false)]
	dry_run: bool,

	/// Print the patch set as JSON and exit
	#[arg(long, default_value_t = false)]
	list: bool,
}

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let patches = load_patches(cli.patches.as_deref())?;

	if cli.list {
		println!("{}", serde_json::to_string_pretty(&patches)?);
		return Ok(());
	}

	let mut applied = 0usize;
	for patch in &patches {
		let outcome = if cli.dry_run {
			check(patch, &cli.root)?
		} else {
			patch.apply_file(&cli.root)?
		};
		if let PatchOutcome::Applied(_) = outcome {
			applied += 1;
		}
	}

	info!(
		"{} of {} files {}",
		applied,
		patches.len(),
		if cli.dry_run { "would be patched" } else { "patched" }
	);
	Ok(())
}

fn load_patches(path: Option<&Path>) -> Result<Vec<Patch>> {
	let Some(path) = path else {
		return Ok(known_patches());
	};
	let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	let patches: Vec<Patch> = serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
	if patches.is_empty() {
		warn!("{} holds no patches", path.display());
	}
	Ok(patches)
}

/// Applies `patch` in memory only.
fn check(patch: &Patch, root: &Path) -> Result<PatchOutcome> {
	let path = root.join(&patch.path);
	let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
	let outcome = patch.apply(&data).with_context(|| format!("checking {}", path.display()))?;
	match &outcome {
		PatchOutcome::Applied(patched) => {
			info!("{} would be patched ({} -> {} bytes)", path.display(), data.len(), patched.len());
		}
		PatchOutcome::AlreadyPatched => info!("{} already patched", path.display()),
	}
	Ok(outcome)
}
