//! The stateful `library.txt` directive interpreter (§4.2) — the bulk of
//! this crate's logic.
//!
//! [`parse_manifest`] consumes one manifest file's contents against a
//! package root, mutating the shared definition and region maps that the
//! [`crate::builder`] passes in by exclusive reference (per spec.md §9,
//! these maps are external to the parser for the duration of the call).
//!
//! Everything here operates on raw bytes, never on `str`: a manifest is
//! "bytes-in, bytes-out" tolerant (spec.md §4.1/§6.1), and a real path may
//! contain bytes that aren't valid UTF-8. Only ASCII-only fields that are
//! never stored as a `real_path` — directive keywords, region names, virtual
//! paths, numeric tokens — are ever decoded to `str`, and even then via
//! lossy conversion rather than a hard UTF-8 validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokenize::{tokenize, trim_whitespace_bytes, WHITESPACE};

use crate::definition::Definition;
use crate::region::Region;

/// Per-file parser state. Reset fresh for every manifest.
#[derive(Debug, Default)]
struct ParserState {
	current_region_name: String,
	pending_region: Region,
	pending_region_def_name: String,
	in_private: bool,
	last_cmd_was_region: bool,
}

impl ParserState {
	fn new() -> Self {
		Self {
			current_region_name: "region_all".to_string(),
			pending_region: Region::default(),
			pending_region_def_name: String::new(),
			in_private: false,
			last_cmd_was_region: false,
		}
	}
}

/// Parses the contents of one `library.txt` against `package_root`,
/// inserting/updating entries in `definitions` and `regions`.
///
/// `contents` is the manifest's raw bytes, not a validated `str` — a real
/// path may contain bytes that aren't valid UTF-8, and this parser never
/// rejects or replaces them.
///
/// `package_root` is the directory containing the manifest; it becomes the
/// `package_path` of every [`crate::weighted::DefinitionPath`] this manifest
/// contributes, and the namespace prefix for every region name it defines or
/// references (`"<package_root>:<name>"`).
pub fn parse_manifest(
	contents: &[u8],
	package_root: &Path,
	definitions: &mut HashMap<String, Definition>,
	regions: &mut HashMap<String, Region>,
) {
	let mut state = ParserState::new();
	let pkg_prefix = package_root.to_string_lossy().into_owned();

	for raw_line in contents.split(|&b| b == b'\n') {
		if raw_line.first() == Some(&b'#') {
			continue;
		}

		let tokens = tokenize(raw_line, WHITESPACE);

		if tokens.is_empty() {
			continue;
		}

		let this_cmd_was_region = dispatch(
			raw_line,
			&tokens,
			&pkg_prefix,
			package_root,
			&mut state,
			definitions,
		);

		if state.last_cmd_was_region && !this_cmd_was_region && !state.pending_region_def_name.is_empty() {
			regions.insert(
				state.pending_region_def_name.clone(),
				state.pending_region.clone(),
			);
			state.pending_region_def_name.clear();
		}

		state.last_cmd_was_region = this_cmd_was_region;
	}

	// A manifest that ends mid-block still finalizes its last open region.
	if state.last_cmd_was_region && !state.pending_region_def_name.is_empty() {
		regions.insert(state.pending_region_def_name.clone(), state.pending_region);
	}
}

/// Dispatches one already-tokenized, non-comment, non-blank line. Returns
/// whether this line counts as a region-definition-block command (for the
/// caller's end-of-block bookkeeping).
#[allow(clippy::too_many_arguments)]
fn dispatch(
	raw_line: &[u8],
	tokens: &[&[u8]],
	pkg_prefix: &str,
	package_root: &Path,
	state: &mut ParserState,
	definitions: &mut HashMap<String, Definition>,
) -> bool {
	match tokens[0] {
		b"EXPORT" | b"EXPORT_EXTEND" if tokens.len() >= 3 => {
			export_plain(raw_line, tokens, package_root, state, definitions, false);
			false
		}
		b"EXPORT_BACKUP" if tokens.len() >= 3 => {
			export_plain(raw_line, tokens, package_root, state, definitions, true);
			false
		}
		b"EXPORT_RATIO" if tokens.len() >= 4 => {
			export_ratio(raw_line, tokens, package_root, state, definitions);
			false
		}
		b"EXPORT_EXCLUDE" if tokens.len() >= 3 => {
			export_exclude(raw_line, tokens, package_root, state, definitions);
			false
		}
		b"EXPORT_SEASON" | b"EXPORT_EXTEND_SEASON" if tokens.len() >= 4 => {
			export_season(raw_line, tokens, package_root, state, definitions);
			false
		}
		b"EXPORT_RATIO_SEASON" if tokens.len() >= 5 => {
			export_ratio_season(raw_line, tokens, package_root, state, definitions);
			false
		}
		b"EXPORT_EXCLUDE_SEASON" if tokens.len() >= 4 => {
			export_exclude_season(raw_line, tokens, package_root, state, definitions);
			false
		}
		b"REGION_DEFINE" if tokens.len() == 2 => {
			state.pending_region = Region::default();
			state.pending_region_def_name =
				format!("{pkg_prefix}:{}", String::from_utf8_lossy(tokens[1]));
			true
		}
		b"REGION_ALL" if tokens.len() == 1 => true,
		b"REGION_RECT" if tokens.len() == 5 => {
			parse_region_rect(raw_line, tokens, &mut state.pending_region);
			true
		}
		b"REGION_BITMAP" if tokens.len() >= 2 => {
			log::warn!(
				"REGION_BITMAP is not evaluated by this resolver: {}",
				String::from_utf8_lossy(raw_line)
			);
			true
		}
		b"REGION_DREF" if tokens.len() == 4 => {
			state.pending_region.conditions.push((
				String::from_utf8_lossy(tokens[1]).into_owned(),
				String::from_utf8_lossy(tokens[2]).into_owned(),
				String::from_utf8_lossy(tokens[3]).into_owned(),
			));
			true
		}
		b"REGION" if tokens.len() == 2 => {
			state.current_region_name =
				format!("{pkg_prefix}:{}", String::from_utf8_lossy(tokens[1]));
			false
		}
		b"PUBLIC" if tokens.len() == 1 => {
			state.in_private = false;
			false
		}
		b"PRIVATE" if tokens.len() == 1 => {
			state.in_private = true;
			false
		}
		_ => false,
	}
}

/// Parses `REGION_RECT`'s four bounds (`w s e n`) independently of one
/// another: each token is decoded and parsed on its own, and a failure in
/// one leaves only *that* field at its previous value rather than
/// discarding the whole line. Mirrors the original's sequential
/// `dblWest`/`dblSouth`/`dblEast`/`dblNorth` assignment
/// (`XPLibrarySystem.cpp`), where an exception partway through a `stod`
/// chain still commits whichever fields were assigned before it, rather
/// than the all-or-nothing reading spec.md's prose alone might suggest.
fn parse_region_rect(raw_line: &[u8], tokens: &[&[u8]], region: &mut Region) {
	assign_bound(&mut region.west, tokens[1], "west", raw_line);
	assign_bound(&mut region.south, tokens[2], "south", raw_line);
	assign_bound(&mut region.east, tokens[3], "east", raw_line);
	assign_bound(&mut region.north, tokens[4], "north", raw_line);
}

fn assign_bound(field: &mut f64, token: &[u8], name: &str, raw_line: &[u8]) {
	match parse_f64(token) {
		Some(v) => *field = v,
		None => log::warn!(
			"malformed REGION_RECT {name} bound, keeping previous value: {}",
			String::from_utf8_lossy(raw_line)
		),
	}
}

fn parse_f64(token: &[u8]) -> Option<f64> {
	std::str::from_utf8(token).ok()?.parse::<f64>().ok()
}

/// Builds a [`PathBuf`] from raw bytes without validating or re-encoding
/// them. On Unix, `OsStr` natively wraps arbitrary bytes, so this round-trips
/// the manifest's real-path bytes exactly. Non-Unix `OsString`s (Windows'
/// UTF-16-based one, in particular) have no such constructor — there, lossy
/// decoding is an actual platform boundary, not a shortcut this crate takes.
#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
	use std::os::unix::ffi::OsStrExt;
	PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
	PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

fn get_or_insert<'d>(
	definitions: &'d mut HashMap<String, Definition>,
	virtual_path: &str,
) -> &'d mut Definition {
	definitions
		.entry(virtual_path.to_string())
		.or_insert_with(|| Definition::new(virtual_path))
}

fn export_plain(
	raw_line: &[u8],
	tokens: &[&[u8]],
	package_root: &Path,
	state: &mut ParserState,
	definitions: &mut HashMap<String, Definition>,
	backup: bool,
) {
	let vpath = String::from_utf8_lossy(tokens[1]).into_owned();
	let real = path_from_bytes(real_path_remainder(raw_line, 2));
	let def = get_or_insert(definitions, &vpath);

	if state.in_private {
		def.is_private = true;
	}

	let rd = def.regional_def_mut(&state.current_region_name);
	let dp = crate::weighted::DefinitionPath::new(package_root, real, true);

	if backup {
		rd.backup.add(dp, 1.0);
	} else {
		rd.default.add(dp, 1.0);
	}
}

fn export_ratio(
	raw_line: &[u8],
	tokens: &[&[u8]],
	package_root: &Path,
	state: &mut ParserState,
	definitions: &mut HashMap<String, Definition>,
) {
	// `EXPORT_RATIO <weight> <virtual path> <real path>`. The weight is read
	// from tokens[1], *not* tokens[2] — the latter was the original C++
	// implementation's bug (it re-read the virtual path as the weight). See
	// spec.md §9.
	let weight = parse_f64(tokens[1]).unwrap_or_else(|| {
		log::warn!(
			"malformed EXPORT_RATIO weight, defaulting to 1: {}",
			String::from_utf8_lossy(raw_line)
		);
		1.0
	});

	let vpath = String::from_utf8_lossy(tokens[2]).into_owned();
	let real = path_from_bytes(real_path_remainder(raw_line, 3));
	let def = get_or_insert(definitions, &vpath);

	if state.in_private {
		def.is_private = true;
	}

	let rd = def.regional_def_mut(&state.current_region_name);
	rd.backup
		.add(crate::weighted::DefinitionPath::new(package_root, real, true), weight);
}

fn export_exclude(
	raw_line: &[u8],
	tokens: &[&[u8]],
	package_root: &Path,
	state: &mut ParserState,
	definitions: &mut HashMap<String, Definition>,
) {
	let vpath = String::from_utf8_lossy(tokens[1]).into_owned();
	let real = path_from_bytes(real_path_remainder(raw_line, 2));
	let def = get_or_insert(definitions, &vpath);

	if state.in_private {
		def.is_private = true;
	}

	let rd = def.regional_def_mut(&state.current_region_name);
	rd.default.reset();
	rd.default
		.add(crate::weighted::DefinitionPath::new(package_root, real, true), 1.0);
}

fn matching_seasons(seasons: &[u8]) -> [bool; 4] {
	// Order: summer, winter, spring, fall. Substring match, literal, per
	// spec.md §4.2.
	[
		contains_subslice(seasons, b"sum"),
		contains_subslice(seasons, b"win"),
		contains_subslice(seasons, b"spr"),
		contains_subslice(seasons, b"fal"),
	]
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
	haystack.windows(needle.len()).any(|w| w == needle)
}

fn export_season(
	raw_line: &[u8],
	tokens: &[&[u8]],
	package_root: &Path,
	state: &mut ParserState,
	definitions: &mut HashMap<String, Definition>,
) {
	let seasons = tokens[1];
	let vpath = String::from_utf8_lossy(tokens[2]).into_owned();
	let real = path_from_bytes(real_path_remainder(raw_line, 3));
	let weight = 1.0;

	let def = get_or_insert(definitions, &vpath);

	if state.in_private {
		def.is_private = true;
	}

	let rd = def.regional_def_mut(&state.current_region_name);
	let [sum, win, spr, fal] = matching_seasons(seasons);
	let dp = crate::weighted::DefinitionPath::new(package_root, real, true);

	if sum {
		rd.summer.add(dp.clone(), weight);
	}
	if win {
		rd.winter.add(dp.clone(), weight);
	}
	if spr {
		rd.spring.add(dp.clone(), weight);
	}
	if fal {
		rd.fall.add(dp, weight);
	}
}

fn export_ratio_season(
	raw_line: &[u8],
	tokens: &[&[u8]],
	package_root: &Path,
	state: &mut ParserState,
	definitions: &mut HashMap<String, Definition>,
) {
	// `EXPORT_RATIO_SEASON <seasons> <weight> <virtual path> <real path>`.
	let weight = parse_f64(tokens[2]).unwrap_or_else(|| {
		log::warn!(
			"malformed EXPORT_RATIO_SEASON weight, defaulting to 1: {}",
			String::from_utf8_lossy(raw_line)
		);
		1.0
	});

	export_season_with_vpath_at(raw_line, tokens, package_root, state, definitions, 3, 4, weight);
}

/// Shared implementation for `EXPORT_RATIO_SEASON`, which (unlike
/// `EXPORT_SEASON`) has an extra leading weight token shifting the virtual
/// path and real-path prefix length by one.
#[allow(clippy::too_many_arguments)]
fn export_season_with_vpath_at(
	raw_line: &[u8],
	tokens: &[&[u8]],
	package_root: &Path,
	state: &mut ParserState,
	definitions: &mut HashMap<String, Definition>,
	vpath_idx: usize,
	prefix_len: usize,
	weight: f64,
) {
	let seasons = tokens[1];
	let vpath = String::from_utf8_lossy(tokens[vpath_idx]).into_owned();
	let real = path_from_bytes(real_path_remainder(raw_line, prefix_len));

	let def = get_or_insert(definitions, &vpath);

	if state.in_private {
		def.is_private = true;
	}

	let rd = def.regional_def_mut(&state.current_region_name);
	let [sum, win, spr, fal] = matching_seasons(seasons);
	let dp = crate::weighted::DefinitionPath::new(package_root, real, true);

	if sum {
		rd.summer.add(dp.clone(), weight);
	}
	if win {
		rd.winter.add(dp.clone(), weight);
	}
	if spr {
		rd.spring.add(dp.clone(), weight);
	}
	if fal {
		rd.fall.add(dp, weight);
	}
}

fn export_exclude_season(
	raw_line: &[u8],
	tokens: &[&[u8]],
	package_root: &Path,
	state: &mut ParserState,
	definitions: &mut HashMap<String, Definition>,
) {
	let seasons = tokens[1];
	let vpath = String::from_utf8_lossy(tokens[2]).into_owned();
	let real = path_from_bytes(real_path_remainder(raw_line, 3));

	let def = get_or_insert(definitions, &vpath);

	if state.in_private {
		def.is_private = true;
	}

	let rd = def.regional_def_mut(&state.current_region_name);
	rd.default.reset();

	let [sum, win, spr, fal] = matching_seasons(seasons);
	let dp = crate::weighted::DefinitionPath::new(package_root, real, true);

	if sum {
		rd.summer.add(dp.clone(), 1.0);
	}
	if win {
		rd.winter.add(dp.clone(), 1.0);
	}
	if spr {
		rd.spring.add(dp.clone(), 1.0);
	}
	if fal {
		rd.fall.add(dp, 1.0);
	}
}

/// Skips `n` whitespace-delimited tokens from the start of `line`
/// positionally (mirroring repeated `istream >>` reads), then returns the
/// trimmed remainder as the real path's raw bytes. This is why real paths
/// containing internal spaces survive intact — they are never tokenized,
/// only the fixed-arity prefix is — and why bytes that aren't valid UTF-8
/// survive intact too, since nothing here decodes the line to `str`.
#[must_use]
fn real_path_remainder(line: &[u8], n: usize) -> &[u8] {
	let mut rest = line;

	for _ in 0..n {
		rest = skip_leading_whitespace(rest);
		let end = rest.iter().position(|b| WHITESPACE.contains(b)).unwrap_or(rest.len());
		rest = &rest[end..];
	}

	trim_whitespace_bytes(rest)
}

fn skip_leading_whitespace(s: &[u8]) -> &[u8] {
	let start = s.iter().position(|b| !WHITESPACE.contains(b)).unwrap_or(s.len());
	&s[start..]
}
