//! One virtual path's variant bound to a single named region, and its six
//! seasonal weighted-option buckets (§3, §4.5).

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::weighted::{DefinitionPath, WeightedOptions};

/// A season character as accepted by [`RegionalDefinitions::select_season`]:
/// `'s'`/`'d'` -> summer, `'w'` -> winter, `'f'` -> fall, `'p'` -> spring,
/// anything else -> default/backup.
pub const SEASON_DEFAULT: char = 'd';
pub const SEASON_SUMMER: char = 's';
pub const SEASON_WINTER: char = 'w';
pub const SEASON_FALL: char = 'f';
pub const SEASON_SPRING: char = 'p';

/// One virtual path's options for a single named region.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionalDefinitions {
	pub region_name: String,
	pub summer: WeightedOptions,
	pub winter: WeightedOptions,
	pub spring: WeightedOptions,
	pub fall: WeightedOptions,
	pub default: WeightedOptions,
	pub backup: WeightedOptions,
}

impl RegionalDefinitions {
	#[must_use]
	pub fn new(region_name: impl Into<String>) -> Self {
		Self {
			region_name: region_name.into(),
			..Default::default()
		}
	}

	/// Samples the bucket appropriate for `season`.
	///
	/// `'s'` and `'d'` both sample `summer`; `'w'` samples `winter`; `'f'`
	/// samples `fall`; `'p'` samples `spring`. Any other character consults
	/// `default` if it has any options, else `backup`.
	///
	/// Carried-forward quirk: if the season-specific bucket (`summer`,
	/// `winter`, `fall`, `spring`) is empty, this returns `None` rather than
	/// falling back to `default`/`backup` — only the "any other character"
	/// path ever consults `default`/`backup`. See spec.md §4.5/§9.
	#[must_use]
	pub fn select_season(&self, season: char, rng: &mut impl Rng) -> Option<&DefinitionPath> {
		match season {
			SEASON_SUMMER | SEASON_DEFAULT => self.summer.sample(rng),
			SEASON_WINTER => self.winter.sample(rng),
			SEASON_FALL => self.fall.sample(rng),
			SEASON_SPRING => self.spring.sample(rng),
			_ => {
				if !self.default.is_empty() {
					self.default.sample(rng)
				} else {
					self.backup.sample(rng)
				}
			}
		}
	}
}
