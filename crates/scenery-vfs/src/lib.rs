//! # scenery-vfs
//!
//! A virtual file system resolver for flight-sim scenery packages: a
//! `library.txt` manifest language maps virtual asset paths to one or more
//! real files, gated by geographic region, season, weighted-random choice
//! among interchangeable variants, and public/private visibility.
//!
//! Loading a VFS sweeps an "active" package's own asset tree, then layers
//! every `library.txt` manifest found across a priority-ordered list of
//! custom packages and the stock scenery tree on top, merging their
//! contributions under a flat index addressed by virtual path. Resolving a
//! virtual path at a `(lat, lon, season)` then walks that path's
//! region-gated variants in priority order and samples the first
//! geographically compatible one.

mod builder;
mod definition;
mod manifest;
mod region;
mod regional;
mod weighted;

use std::collections::HashMap;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use rand::Rng;

pub use self::builder::load_file_system;
pub use self::definition::Definition;
pub use self::region::{Condition, Region};
pub use self::regional::{
	RegionalDefinitions, SEASON_DEFAULT, SEASON_FALL, SEASON_SPRING, SEASON_SUMMER, SEASON_WINTER,
};
pub use self::weighted::{DefinitionPath, WeightedOptions};

/// The resolved result of a full load: a sorted index of every virtual path
/// discovered across the active package and every layered manifest, plus the
/// named regions they reference.
///
/// Immutable after [`load_file_system`] returns; nothing here supports
/// concurrent mutation.
#[derive(Debug)]
pub struct VirtualFs {
	definitions: Vec<Definition>,
	regions: HashMap<String, Region>,
}

impl VirtualFs {
	/// Looks up a virtual path by binary search over the sorted index.
	#[must_use]
	pub fn get_definition(&self, virtual_path: &str) -> Option<&Definition> {
		self.definitions
			.binary_search_by(|def| def.virtual_path.as_str().cmp(virtual_path))
			.ok()
			.map(|idx| &self.definitions[idx])
	}

	#[must_use]
	pub fn get_region(&self, region_name: &str) -> Option<&Region> {
		self.regions.get(region_name)
	}

	#[must_use]
	pub fn definitions(&self) -> &[Definition] {
		&self.definitions
	}

	#[must_use]
	pub fn regions(&self) -> &HashMap<String, Region> {
		&self.regions
	}

	/// Looks up `virtual_path` and resolves it against `(lat, lon, season)`
	/// in one call, using the given RNG for weighted sampling.
	#[must_use]
	pub fn resolve_with(
		&self,
		virtual_path: &str,
		lat: f64,
		lon: f64,
		season: char,
		rng: &mut impl Rng,
	) -> Option<PathBuf> {
		self.get_definition(virtual_path)?
			.resolve(&self.regions, lat, lon, season, rng)
	}

	/// Convenience wrapper over [`VirtualFs::resolve_with`] seeding from
	/// [`rand::thread_rng`] for callers that don't need deterministic
	/// sampling.
	#[must_use]
	pub fn resolve(&self, virtual_path: &str, lat: f64, lon: f64, season: char) -> Option<PathBuf> {
		self.resolve_with(virtual_path, lat, lon, season, &mut rand::thread_rng())
	}
}

/// Fatal load-time failures (§7): a top-level root that doesn't exist or
/// isn't a directory. Everything below that level — unreadable
/// subdirectories, malformed manifest lines, numeric parse failures — is
/// logged and skipped rather than propagated here.
#[derive(Debug)]
pub enum Error {
	ActivePackage(PathBuf),
	XpRoot(PathBuf),
	CustomPackage(PathBuf),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::ActivePackage(path) => {
				write!(f, "active package is not a directory: {}", path.display())
			}
			Self::XpRoot(path) => write!(
				f,
				"X-Plane root's stock scenery tree is not a directory: {}",
				path.display()
			),
			Self::CustomPackage(path) => {
				write!(f, "custom package is not a directory: {}", path.display())
			}
		}
	}
}

/// File extensions recognized during the active-package asset sweep (§6.2),
/// matched against `path.extension()` with the leading dot restored. Raw
/// case, no lowercasing — this resolver compares the bytes it's given.
pub(crate) static ASSET_EXTENSIONS: Lazy<[&str; 12]> = Lazy::new(|| {
	[
		".lin", ".pol", ".str", ".ter", ".net", ".obj", ".agb", ".ags", ".agp", ".bch", ".fac",
		".for",
	]
});

/// Returns the file extensions recognized during an active-package asset
/// sweep (§6.2), each with its leading dot.
#[must_use]
pub fn recognized_asset_extensions() -> &'static [&'static str] {
	ASSET_EXTENSIONS.as_slice()
}
