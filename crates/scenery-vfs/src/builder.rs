//! Orchestrates the five-step `load_file_system` load (§4.3): seed the
//! synthetic catch-all region, sweep the active package's own asset tree,
//! discover every contributing manifest in priority order, ingest them
//! sequentially into the shared maps, then freeze the result into a sorted
//! index for query-time binary search.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::definition::Definition;
use crate::manifest::parse_manifest;
use crate::region::Region;
use crate::weighted::DefinitionPath;
use crate::{Error, VirtualFs, ASSET_EXTENSIONS};

/// Builds a [`VirtualFs`] from an X-Plane-style install layout.
///
/// `custom_packages_ordered` is highest-priority first: the first package to
/// export a given virtual path contributes the first `RegionalDefinitions`
/// entry, and later packages (including stock scenery, always last) append.
///
/// Only missing top-level roots are fatal (`active_package`, `xp_root`, or an
/// entry of `custom_packages_ordered`); everything below that — unreadable
/// subdirectories, broken symlinks, malformed manifest lines — is logged and
/// skipped per §7.
pub fn load_file_system(
	xp_root: &Path,
	active_package: &Path,
	custom_packages_ordered: &[PathBuf],
) -> Result<VirtualFs, Error> {
	let mut regions = HashMap::new();
	regions.insert("region_all".to_string(), Region::default());

	let mut definitions = HashMap::new();

	sweep_active_package(active_package, &mut definitions)?;

	let stock_scenery = xp_root.join("Resources").join("default scenery");

	for root in custom_packages_ordered {
		if !root.is_dir() {
			return Err(Error::CustomPackage(root.clone()));
		}
	}

	if !stock_scenery.is_dir() {
		return Err(Error::XpRoot(xp_root.to_path_buf()));
	}

	let discovered = discover_manifests(custom_packages_ordered, &stock_scenery);

	for (package_root, manifest_path) in &discovered {
		ingest_manifest(package_root, manifest_path, &mut definitions, &mut regions);
	}

	let mut sorted: Vec<Definition> = definitions.into_values().collect();
	sorted.sort_by(|a, b| a.virtual_path.cmp(&b.virtual_path));

	Ok(VirtualFs {
		definitions: sorted,
		regions,
	})
}

fn sweep_active_package(
	active_package: &Path,
	definitions: &mut HashMap<String, Definition>,
) -> Result<(), Error> {
	if !active_package.is_dir() {
		return Err(Error::ActivePackage(active_package.to_path_buf()));
	}

	for entry in WalkDir::new(active_package)
		.follow_links(false)
		.sort_by_file_name()
		.into_iter()
		.filter_map(|e| e.ok())
	{
		let path = entry.path();

		if !entry.file_type().is_file() {
			continue;
		}

		let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
			continue;
		};

		let dotted = format!(".{ext}");

		if !ASSET_EXTENSIONS.contains(&dotted.as_str()) {
			continue;
		}

		let Ok(relative) = path.strip_prefix(active_package) else {
			continue;
		};

		let virtual_path = relative
			.components()
			.map(|c| c.as_os_str().to_string_lossy())
			.collect::<Vec<_>>()
			.join("/");

		let def = definitions
			.entry(virtual_path.clone())
			.or_insert_with(|| Definition::new(virtual_path.clone()));

		def.regional_def_mut("region_all").default.add(
			DefinitionPath::new(active_package, relative, false),
			1.0,
		);
	}

	Ok(())
}

/// Collects `(package_root, manifest_path)` pairs in the spec-mandated
/// order: every custom package's `library.txt` files first (in declared
/// package order; the per-package walk itself runs in parallel since it has
/// no side effects, but results are flattened back in order before any
/// parsing happens), then every stock-scenery `library.txt`.
fn discover_manifests(
	custom_packages_ordered: &[PathBuf],
	stock_scenery: &Path,
) -> Vec<(PathBuf, PathBuf)> {
	let mut pairs: Vec<(PathBuf, PathBuf)> = custom_packages_ordered
		.par_iter()
		.map(|pkg| find_manifests_under(pkg))
		.collect::<Vec<_>>()
		.into_iter()
		.flatten()
		.collect();

	pairs.extend(find_manifests_under(stock_scenery));
	pairs
}

/// Finds every `library.txt` under `root`, pairing each with its own
/// containing directory as its package root (real paths in a manifest are
/// anchored to the folder the manifest lives in, not `root` itself — this
/// matters for the stock scenery tree, where each subfolder is its own
/// package, and is harmless for a custom package whose manifest sits at its
/// top level).
fn find_manifests_under(root: &Path) -> Vec<(PathBuf, PathBuf)> {
	WalkDir::new(root)
		.follow_links(false)
		.sort_by_file_name()
		.into_iter()
		.filter_map(|e| match e {
			Ok(entry) => Some(entry),
			Err(err) => {
				log::warn!("skipping unreadable entry under {}: {err}", root.display());
				None
			}
		})
		.filter(|entry| entry.file_type().is_file() && entry.file_name() == "library.txt")
		.map(|entry| {
			let manifest_path = entry.path().to_path_buf();
			let package_root = manifest_path
				.parent()
				.map(Path::to_path_buf)
				.unwrap_or_else(|| root.to_path_buf());
			(package_root, manifest_path)
		})
		.collect()
}

fn ingest_manifest(
	package_root: &Path,
	manifest_path: &Path,
	definitions: &mut HashMap<String, Definition>,
	regions: &mut HashMap<String, Region>,
) {
	let bytes = match std::fs::read(manifest_path) {
		Ok(b) => b,
		Err(err) => {
			log::warn!("skipping unreadable manifest {}: {err}", manifest_path.display());
			return;
		}
	};

	// `parse_manifest` works on raw bytes, not a validated `str` — a real
	// path may contain bytes that aren't valid UTF-8, and lossily decoding
	// here would permanently replace them before they ever reach a
	// `DefinitionPath` (spec.md §4.1/§6.1).
	parse_manifest(&bytes, package_root, definitions, regions);
}
