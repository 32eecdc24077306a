//! A concrete real-file mapping and the weighted bag of options it lives in
//! (§3's `DefinitionPath`/`WeightedOptions`).

use std::path::{Path, PathBuf};

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A concrete real-file mapping for a virtual path.
///
/// `real_path` is always `package_path.join(path)`; the three fields are set
/// together by [`DefinitionPath::new`] and never independently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DefinitionPath {
	package_path: PathBuf,
	path: PathBuf,
	real_path: PathBuf,
	/// `true` if sourced from a `library.txt`, `false` if discovered by
	/// scanning the active package's own asset tree.
	pub from_library: bool,
}

impl DefinitionPath {
	#[must_use]
	pub fn new(package_path: impl Into<PathBuf>, path: impl Into<PathBuf>, from_library: bool) -> Self {
		let package_path = package_path.into();
		let path = path.into();
		let real_path = package_path.join(&path);

		Self {
			package_path,
			path,
			real_path,
			from_library,
		}
	}

	#[must_use]
	pub fn package_path(&self) -> &Path {
		&self.package_path
	}

	#[must_use]
	pub fn path(&self) -> &Path {
		&self.path
	}

	#[must_use]
	pub fn real_path(&self) -> &Path {
		&self.real_path
	}

	/// `true` for a [`DefinitionPath`] that was never actually assigned a
	/// path (e.g. the sentinel returned by a miss in resolution).
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.package_path.as_os_str().is_empty() && self.path.as_os_str().is_empty()
	}
}

/// An ordered bag of `(weight, DefinitionPath)` options plus a running
/// weight total, supporting weighted random sampling.
///
/// Invariant: `total_weight == sum of each option's weight`. After
/// [`WeightedOptions::reset`], the bag is empty and `total_weight == 0`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightedOptions {
	options: Vec<(f64, DefinitionPath)>,
	total_weight: f64,
}

impl WeightedOptions {
	/// Appends an option with the given weight (default `1.0`, per
	/// spec.md's `EXPORT`/`EXPORT_BACKUP`/etc., which never pass an
	/// explicit weight except via `EXPORT_RATIO*`).
	pub fn add(&mut self, path: DefinitionPath, weight: f64) {
		self.options.push((weight, path));
		self.total_weight += weight;
	}

	/// Clears every option and resets `total_weight` to `0`.
	pub fn reset(&mut self) {
		self.options.clear();
		self.total_weight = 0.0;
	}

	#[must_use]
	pub fn count(&self) -> usize {
		self.options.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.options.is_empty()
	}

	#[must_use]
	pub fn total_weight(&self) -> f64 {
		self.total_weight
	}

	#[must_use]
	pub fn options(&self) -> &[(f64, DefinitionPath)] {
		&self.options
	}

	/// Draws `r` uniformly from `[0, total_weight)` and returns the option
	/// whose cumulative weight first covers `r`. Returns `None` if the bag
	/// is empty.
	#[must_use]
	pub fn sample(&self, rng: &mut impl Rng) -> Option<&DefinitionPath> {
		if self.options.is_empty() {
			return None;
		}

		let mut r = rng.gen_range(0.0..self.total_weight);

		for (weight, path) in &self.options {
			r -= weight;

			if r <= 0.0 {
				return Some(path);
			}
		}

		// Floating-point error may leave `r` slightly positive after the
		// last subtraction; fall back to the final option rather than `None`.
		self.options.last().map(|(_, path)| path)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use rand::SeedableRng;

	fn path(name: &str) -> DefinitionPath {
		DefinitionPath::new("/pkg", name, false)
	}

	#[test]
	fn weight_conservation_after_add_and_reset() {
		let mut opts = WeightedOptions::default();
		opts.add(path("a"), 3.0);
		opts.add(path("b"), 1.0);
		assert_eq!(opts.total_weight(), 4.0);
		assert_eq!(opts.count(), 2);

		opts.reset();
		assert_eq!(opts.total_weight(), 0.0);
		assert_eq!(opts.count(), 0);
		assert!(opts.is_empty());
	}

	#[test]
	fn sample_on_empty_bag_is_none() {
		let opts = WeightedOptions::default();
		let mut rng = rand::rngs::StdRng::seed_from_u64(0);
		assert!(opts.sample(&mut rng).is_none());
	}

	#[test]
	fn sample_converges_to_weight_ratio() {
		let mut opts = WeightedOptions::default();
		opts.add(path("a"), 3.0);
		opts.add(path("b"), 1.0);

		let mut rng = rand::rngs::StdRng::seed_from_u64(42);
		let mut a_count = 0;
		const N: u32 = 20_000;

		for _ in 0..N {
			if opts.sample(&mut rng).unwrap().path() == std::path::Path::new("a") {
				a_count += 1;
			}
		}

		let ratio = f64::from(a_count) / f64::from(N);
		assert!((ratio - 0.75).abs() < 0.02, "ratio was {ratio}");
	}

	#[test]
	fn definition_path_real_path_is_joined() {
		let dp = DefinitionPath::new("/pkg/root", "assets/foo.obj", true);
		assert_eq!(dp.real_path(), std::path::Path::new("/pkg/root/assets/foo.obj"));
		assert!(dp.from_library);
	}

	proptest::proptest! {
		#[test]
		fn weight_conservation_arbitrary_sequence(weights in proptest::collection::vec(0.01f64..1000.0, 0..20)) {
			let mut opts = WeightedOptions::default();
			let mut expected = 0.0;

			for (i, w) in weights.iter().enumerate() {
				opts.add(path(&format!("opt{i}")), *w);
				expected += w;
			}

			proptest::prop_assert!((opts.total_weight() - expected).abs() < 1e-6);

			opts.reset();
			proptest::prop_assert_eq!(opts.total_weight(), 0.0);
			proptest::prop_assert_eq!(opts.count(), 0);
		}
	}
}
