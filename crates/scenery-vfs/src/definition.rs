//! A virtual path's full record: its priority-ordered regional variants,
//! private-visibility flag, and resolution (§3, §4.5).

use std::collections::HashMap;
use std::path::PathBuf;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::region::Region;
use crate::regional::RegionalDefinitions;

/// A virtual path's full record.
///
/// `regional_defs` is priority-ordered: the first element is tried first at
/// resolution time. Region names may repeat across `Definition`s in
/// different manifests, but *within* one `Definition` a name should appear
/// at most once per layering pass — see [`Definition::regional_def_mut`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Definition {
	pub virtual_path: String,
	pub regional_defs: Vec<RegionalDefinitions>,
	/// Sticky: once any contributing manifest line sets this, it stays
	/// `true` even if later lines for the same virtual path are public.
	pub is_private: bool,
}

impl Definition {
	#[must_use]
	pub fn new(virtual_path: impl Into<String>) -> Self {
		Self {
			virtual_path: virtual_path.into(),
			regional_defs: vec![],
			is_private: false,
		}
	}

	/// Returns the first [`RegionalDefinitions`] entry named `region_name`,
	/// inserting a fresh one at the tail (preserving manifest-discovery
	/// insertion order) on a miss.
	pub fn regional_def_mut(&mut self, region_name: &str) -> &mut RegionalDefinitions {
		if let Some(idx) = self
			.regional_defs
			.iter()
			.position(|rd| rd.region_name == region_name)
		{
			return &mut self.regional_defs[idx];
		}

		self.regional_defs
			.push(RegionalDefinitions::new(region_name));
		self.regional_defs.last_mut().unwrap()
	}

	/// Walks `regional_defs` in priority order. The first entry whose
	/// region is known and geographically compatible with `(lat, lon)`
	/// "wins" — its season bucket is sampled and that result (real path, or
	/// `None` if the bucket came up empty) is returned immediately, without
	/// trying any further entry. A `region_name` absent from `regions` is
	/// treated as incompatible and skipped.
	///
	/// Returns `None` if no entry matches, or if the matching entry's
	/// sampled bucket is empty.
	#[must_use]
	pub fn resolve(
		&self,
		regions: &HashMap<String, Region>,
		lat: f64,
		lon: f64,
		season: char,
		rng: &mut impl Rng,
	) -> Option<PathBuf> {
		for rd in &self.regional_defs {
			let Some(region) = regions.get(&rd.region_name) else {
				continue;
			};

			if !region.compatible_with(lat, lon) {
				continue;
			}

			return rd
				.select_season(season, rng)
				.map(|path| path.real_path().to_path_buf());
		}

		None
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::weighted::DefinitionPath;

	fn regions_with(name: &str, region: Region) -> HashMap<String, Region> {
		let mut m = HashMap::new();
		m.insert(name.to_string(), region);
		m
	}

	#[test]
	fn regional_def_mut_inserts_on_miss_and_reuses_on_hit() {
		let mut def = Definition::new("lib/x.obj");
		def.regional_def_mut("region_all").default.add(
			DefinitionPath::new("/pkg", "a.obj", true),
			1.0,
		);
		assert_eq!(def.regional_defs.len(), 1);

		def.regional_def_mut("region_all")
			.default
			.add(DefinitionPath::new("/pkg", "b.obj", true), 1.0);
		assert_eq!(def.regional_defs.len(), 1);
		assert_eq!(def.regional_defs[0].default.count(), 2);
	}

	#[test]
	fn resolve_commits_to_first_geographically_compatible_region() {
		let mut def = Definition::new("lib/y.obj");
		def.regional_def_mut("r1")
			.default
			.add(DefinitionPath::new("/p1", "y.obj", true), 1.0);

		let regions = regions_with("r1", Region::default());
		let mut rng = rand::thread_rng();

		// '?' routes to the `default`/`backup` buckets (see
		// `RegionalDefinitions::select_season`); 'd' would sample `summer`,
		// which plain `EXPORT`-style entries never populate.
		let resolved = def.resolve(&regions, 0.0, 0.0, '?', &mut rng).unwrap();
		assert_eq!(resolved, std::path::Path::new("/p1/y.obj"));
	}

	#[test]
	fn missing_region_reference_is_skipped() {
		let mut def = Definition::new("lib/y.obj");
		def.regional_def_mut("ghost")
			.default
			.add(DefinitionPath::new("/p1", "ghost.obj", true), 1.0);
		def.regional_def_mut("region_all")
			.default
			.add(DefinitionPath::new("/p2", "fallback.obj", true), 1.0);

		// Only "region_all" is a known region.
		let regions = regions_with("region_all", Region::default());
		let mut rng = rand::thread_rng();

		let resolved = def.resolve(&regions, 0.0, 0.0, '?', &mut rng).unwrap();
		assert_eq!(resolved, std::path::Path::new("/p2/fallback.obj"));
	}

	#[test]
	fn no_match_returns_none() {
		let def = Definition::new("lib/z.obj");
		let regions = HashMap::new();
		let mut rng = rand::thread_rng();
		assert!(def.resolve(&regions, 0.0, 0.0, 'd', &mut rng).is_none());
	}
}
