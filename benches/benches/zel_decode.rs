//! Benchmark suite for ZEL frame decoding and PAK extraction
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pak_benches::{generate_pak_tree, generate_zel_file, generate_zel_frame, sizes};
use pak_types::file::pak::{Archive, Tree};
use pak_types::file::{DecodeOptions, Palette, zel};
use std::hint::black_box;

/// Benchmark single frame decoding across frame sizes
fn bench_decode_frame(c: &mut Criterion) {
	let mut group = c.benchmark_group("zel_frame");
	let palette = Palette::plan9();
	let options = DecodeOptions::default();

	for (name, (width, height)) in
		[("tile", sizes::TILE), ("building", sizes::BUILDING), ("screen", sizes::SCREEN), ("max", sizes::MAX)]
	{
		let data = generate_zel_frame(width, height);
		group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
		group.bench_with_input(BenchmarkId::new("decode", name), &data, |b, data| {
			b.iter(|| black_box(zel::decode_frame(black_box(data), &palette, &options)));
		});
	}

	group.finish();
}

/// Benchmark the constant variant used by shadow tilesets
fn bench_decode_constant(c: &mut Criterion) {
	let mut group = c.benchmark_group("zel_constant");
	let palette = Palette::plan9();
	let options = DecodeOptions::default().with_constant_pixels(true);
	let (width, height) = sizes::BUILDING;

	// constant runs carry no index bytes, so strip them by rebuilding the stream
	let mut data = Vec::new();
	data.extend_from_slice(&width.to_le_bytes());
	data.extend_from_slice(&height.to_le_bytes());
	for _ in 0..height {
		data.extend_from_slice(&(0x9000u16 | width).to_le_bytes());
	}

	group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
	group.bench_function("decode", |b| {
		b.iter(|| black_box(zel::decode_frame(black_box(&data), &palette, &options)));
	});

	group.finish();
}

/// Benchmark whole-file decoding
fn bench_decode_all(c: &mut Criterion) {
	let mut group = c.benchmark_group("zel_file");
	let palette = Palette::plan9();
	let options = DecodeOptions::default();
	let data = generate_zel_file(256, sizes::TILE.0, sizes::TILE.1);

	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("decode_all_256_tiles", |b| {
		b.iter(|| black_box(zel::File::from_bytes(black_box(&data), &palette, &options)));
	});

	group.finish();
}

/// Benchmark container parsing and recursive extraction
fn bench_archive(c: &mut Criterion) {
	let mut group = c.benchmark_group("pak");
	let flat = generate_pak_tree(1, 4096, 64);
	let nested = generate_pak_tree(16, 64, 256);

	group.bench_function("parse_4096_blobs", |b| {
		b.iter(|| black_box(Archive::parse(black_box(&flat))));
	});
	group.bench_function("classify_4096_blobs", |b| {
		let archive = Archive::parse(&flat).unwrap();
		b.iter(|| archive.blobs().map(|blob| blob.kind()).filter(|kind| kind.extension() == "bin").count());
	});
	group.bench_function("extract_tree_depth_16", |b| {
		b.iter(|| black_box(Tree::extract(black_box(&nested)).map(|tree| tree.walk().count())));
	});

	group.finish();
}

criterion_group!(benches, bench_decode_frame, bench_decode_constant, bench_decode_all, bench_archive);

criterion_main!(benches);
