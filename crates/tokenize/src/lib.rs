//! A small, byte-exact whitespace tokenizer for line-oriented directive
//! languages such as X-Plane's `library.txt` manifests.
//!
//! The scanner never validates UTF-8. It only needs to avoid splitting a
//! multibyte codepoint apart if one happens to straddle a delimiter byte
//! value (ASCII space, in particular), which it does by tracking whether the
//! most recently consumed byte had its continuation bit (`0x80`) set.

/// The default delimiter set used when tokenizing manifest lines: space, tab,
/// line feed, carriage return.
pub const WHITESPACE: &[u8] = b" \t\n\r";

/// Splits `line` on any byte in `delimiters`, dropping the delimiters and
/// collapsing runs of them (empty tokens are never produced).
///
/// A byte with its high bit (`0x80`) set puts the scanner into a
/// continuation state that lasts for exactly one more byte, during which
/// delimiter matching is suppressed. This keeps a UTF-8 continuation byte
/// that happens to equal a delimiter's value from splitting a multibyte
/// codepoint; it is not a validating UTF-8 decoder.
#[must_use]
pub fn tokenize<'l>(line: &'l [u8], delimiters: &[u8]) -> Vec<&'l [u8]> {
	let mut tokens = vec![];
	let mut start = None;
	let mut in_continuation = false;

	for (i, &byte) in line.iter().enumerate() {
		let is_delim = !in_continuation && delimiters.contains(&byte);

		match (is_delim, start) {
			(true, Some(s)) => {
				tokens.push(&line[s..i]);
				start = None;
			}
			(true, None) => {}
			(false, None) => start = Some(i),
			(false, Some(_)) => {}
		}

		in_continuation = byte & 0x80 != 0;
	}

	if let Some(s) = start {
		tokens.push(&line[s..]);
	}

	tokens
}

/// Like [`tokenize`], but for a `str` input, returning `str` slices. Since the
/// input is already known to be valid UTF-8 and the scanner never splits a
/// multibyte codepoint (see [`tokenize`]'s continuation-byte handling), every
/// returned slice is guaranteed to land on a char boundary.
#[must_use]
pub fn tokenize_str<'l>(line: &'l str, delimiters: &[u8]) -> Vec<&'l str> {
	tokenize(line.as_bytes(), delimiters)
		.into_iter()
		.map(|tok| {
			std::str::from_utf8(tok).expect("tokenize never splits a multibyte codepoint")
		})
		.collect()
}

/// Strips leading and trailing bytes in `{' ', '\t', '\n', '\r'}` from `s`.
#[must_use]
pub fn trim_whitespace(s: &str) -> &str {
	s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// Byte-slice counterpart to [`trim_whitespace`], for callers that haven't
/// (or can't) validate UTF-8 up front.
#[must_use]
pub fn trim_whitespace_bytes(s: &[u8]) -> &[u8] {
	let start = s
		.iter()
		.position(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'));

	let Some(start) = start else {
		return &[];
	};

	let end = s
		.iter()
		.rposition(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
		.unwrap();

	&s[start..=end]
}

#[cfg(test)]
mod test;
