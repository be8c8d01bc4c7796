//! PAK archive utility.
//!
//! Provides two subcommands:
//! - `list`: print the extracted tree of an archive with node kinds and sizes.
//! - `extract`: write every node of the tree to disk, using the dump layout
//!   `<out>/<stem>/archive_NNNN.bin`, `<out>/<stem>/archive_NNNN/file_NNNN.bin`.
//!
//! A rename table (JSON object of dump path to friendly path) can be supplied to
//! `extract`. Leaves listed there are written under their friendly name, and
//! intermediate containers listed there are removed once their children exist.

use std::{
	collections::BTreeMap,
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use pak_rs::pak_types::file::pak::{self, BlobKind, Tree, discardable};

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::List(opts) => run_list(opts),
		Command::Extract(opts) => run_extract(opts),
	}
}

#[derive(Parser)]
#[command(name = "pak_utils")]
#[command(version)]
#[command(about = "List and extract nested PAK archives", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print the archive tree
	List(ListArgs),
	/// Extract every blob of one or more archives
	Extract(ExtractArgs),
}

#[derive(Args)]
struct ListArgs {
	/// Archive to inspect
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// Only print the node counts
	#[arg(short, long, default_value_t = false)]
	summary: bool,
}

#[derive(Args)]
struct ExtractArgs {
	/// Archives to extract
	#[arg(value_name = "FILE", required = true)]
	inputs: Vec<PathBuf>,

	/// Output directory
	#[arg(short, long, value_name = "DIR", default_value = "_dump_")]
	output: PathBuf,

	/// JSON rename table mapping dump paths to friendly paths
	#[arg(short, long, value_name = "FILE")]
	renames: Option<PathBuf>,
}

/// Dump path (relative to the archive's output directory, `/` separated) to
/// friendly path.
type RenameTable = BTreeMap<String, PathBuf>;

fn load_renames(path: Option<&Path>) -> Result<RenameTable> {
	let Some(path) = path else {
		return Ok(RenameTable::new());
	};
	let json = fs::read_to_string(path).with_context(|| format!("reading rename table {}", path.display()))?;
	let table: RenameTable =
		serde_json::from_str(&json).with_context(|| format!("parsing rename table {}", path.display()))?;
	debug!("loaded {} renames from {}", table.len(), path.display());
	Ok(table)
}

fn table_key(path: &Path) -> String {
	path.to_string_lossy().replace('\\', "/")
}

fn read_archive(path: &Path) -> Result<Vec<u8>> {
	let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
	if !pak::is_archive(&data) {
		bail!("{} is not a PAK archive", path.display());
	}
	Ok(data)
}

fn run_list(opts: ListArgs) -> Result<()> {
	let data = read_archive(&opts.input)?;
	let tree = Tree::extract(&data).with_context(|| format!("extracting {}", opts.input.display()))?;

	if !opts.summary {
		for (path, node) in tree.walk() {
			let depth = path.components().count().saturating_sub(1);
			println!(
				"{:indent$}{:<8} {:>10}  {}",
				"",
				node.kind().to_string(),
				node.data().len(),
				path.display(),
				indent = depth * 2
			);
		}
	}

	let stats = tree.stats();
	println!(
		"{}: {} archives, {} sounds, {} files, depth {}",
		opts.input.display(),
		stats.archives,
		stats.sounds,
		stats.files,
		stats.depth
	);
	Ok(())
}

fn run_extract(opts: ExtractArgs) -> Result<()> {
	let renames = load_renames(opts.renames.as_deref())?;
	for input in &opts.inputs {
		extract_one(input, &opts.output, &renames)?;
	}
	Ok(())
}

fn extract_one(input: &Path, output: &Path, renames: &RenameTable) -> Result<()> {
	let data = read_archive(input)?;
	let tree = Tree::extract(&data).with_context(|| format!("extracting {}", input.display()))?;

	let stem = input.file_stem().context("input has no file name")?;
	let root = output.join(stem);
	info!("extracting {} into {}", input.display(), root.display());

	let mut containers = Vec::new();
	let mut written = 0usize;
	for (relative, node) in tree.walk() {
		let key = table_key(&relative);
		let target = match renames.get(&key) {
			Some(friendly) if node.kind() != BlobKind::Archive => root.join(friendly),
			_ => root.join(&relative),
		};

		if let Some(parent) = target.parent() {
			fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
		}
		fs::write(&target, node.data()).with_context(|| format!("writing {}", target.display()))?;
		debug!("wrote {} ({} bytes)", target.display(), node.data().len());
		written += 1;

		if discardable(&relative, node, |path| renames.contains_key(&table_key(path))) {
			containers.push(target);
		}
	}

	// children are all on disk once the walk finishes
	for container in &containers {
		fs::remove_file(container).with_context(|| format!("removing {}", container.display()))?;
		debug!("discarded {}", container.display());
	}

	info!("{}: wrote {} blobs, discarded {} containers", input.display(), written, containers.len());
	Ok(())
}
