//! A named geographic/predicate region and membership testing (§4.4).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An opaque dataref-style condition: `(lhs, op, rhs)`. Recorded from
/// `REGION_DREF` lines but never evaluated by this crate — a future
/// evaluator consuming simulator datarefs may interpret these.
pub type Condition = (String, String, String);

/// A named predicate on `(lat, lon)`, plus a list of opaque conditions this
/// crate records but does not evaluate.
///
/// The sentinel bounds `(north = 91, south = -91, east = 181, west = -181)`
/// exceed every valid coordinate on all four sides, so a freshly constructed
/// `Region` is compatible with every `(lat, lon)` — see
/// [`Region::compatible_with`] for why the east/west sentinels must be this
/// way round rather than the source's literal `dblEast{-181}, dblWest{181}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
	pub north: f64,
	pub south: f64,
	pub east: f64,
	pub west: f64,
	pub conditions: Vec<Condition>,
}

impl Default for Region {
	fn default() -> Self {
		Self {
			north: 91.0,
			south: -91.0,
			east: 181.0,
			west: -181.0,
			conditions: vec![],
		}
	}
}

impl Region {
	/// Returns `true` iff `south < lat < north` and `west < lon < east`.
	/// Strict on all four sides; a point exactly on a boundary is outside.
	///
	/// `conditions` are ignored here; see the type's documentation.
	#[must_use]
	pub fn compatible_with(&self, lat: f64, lon: f64) -> bool {
		lat > self.south && lat < self.north && lon > self.west && lon < self.east
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn default_is_permissive() {
		let region = Region::default();
		assert!(region.compatible_with(0.0, 0.0));
		assert!(region.compatible_with(89.9, 179.9));
		assert!(region.compatible_with(-89.9, -179.9));
	}

	#[test]
	fn boundary_is_exclusive() {
		let region = Region {
			north: 10.0,
			south: -10.0,
			east: 10.0,
			west: -10.0,
			conditions: vec![],
		};

		assert!(!region.compatible_with(10.0, 0.0));
		assert!(!region.compatible_with(-10.0, 0.0));
		assert!(!region.compatible_with(0.0, 10.0));
		assert!(!region.compatible_with(0.0, -10.0));
		assert!(region.compatible_with(9.999, 9.999));
	}
}
