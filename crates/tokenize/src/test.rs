use super::*;

#[test]
fn basic_split() {
	let tokens = tokenize_str("EXPORT lib/foo.obj  assets/foo.obj", WHITESPACE);
	assert_eq!(tokens, vec!["EXPORT", "lib/foo.obj", "assets/foo.obj"]);
}

#[test]
fn tabs_equivalent_to_spaces() {
	let a = tokenize_str("EXPORT\tlib/foo.obj\tassets/foo.obj", WHITESPACE);
	let b = tokenize_str("EXPORT lib/foo.obj assets/foo.obj", WHITESPACE);
	assert_eq!(a, b);
}

#[test]
fn crlf_trailing_is_dropped() {
	let tokens = tokenize_str("REGION_ALL\r\n", WHITESPACE);
	assert_eq!(tokens, vec!["REGION_ALL"]);
}

#[test]
fn adjacent_delimiters_collapse() {
	let tokens = tokenize_str("a    b\t\tc", WHITESPACE);
	assert_eq!(tokens, vec!["a", "b", "c"]);
}

#[test]
fn empty_line_yields_no_tokens() {
	assert!(tokenize_str("   \t\r\n", WHITESPACE).is_empty());
	assert!(tokenize_str("", WHITESPACE).is_empty());
}

#[test]
fn utf8_continuation_byte_not_split() {
	// 0xC3 0xA9 is 'é'; its continuation byte 0xA9 does not equal any ASCII
	// delimiter, but a crafted continuation byte that did (e.g. 0x80 | b' ')
	// must still not split the token.
	let mut bytes = b"caf".to_vec();
	bytes.push(0xC0); // lead byte (high bit set)
	bytes.push(0x80 | b' '); // continuation byte that numerically equals a flagged space
	bytes.extend_from_slice(b"e");

	let tokens = tokenize(&bytes, WHITESPACE);
	assert_eq!(tokens.len(), 1);
	assert_eq!(tokens[0], bytes.as_slice());
}

#[test]
fn trims_all_whitespace_kinds() {
	assert_eq!(trim_whitespace("  \t hello \r\n"), "hello");
	assert_eq!(trim_whitespace("\t\t"), "");
	assert_eq!(trim_whitespace("none"), "none");
}

#[test]
fn trim_whitespace_bytes_matches_str_version() {
	assert_eq!(trim_whitespace_bytes(b"  \t hello \r\n"), b"hello");
	assert_eq!(trim_whitespace_bytes(b"\t\t"), b"");
}

proptest::proptest! {
	/// Property 1 (spec.md Testable Properties): re-tokenizing the
	/// delimiter-joined output reproduces the same token list, for any ASCII
	/// input that avoids the delimiter bytes inside tokens.
	#[test]
	fn tokenizer_round_trip(tokens in proptest::collection::vec("[a-zA-Z0-9]{1,8}", 0..8)) {
		let joined = tokens.join(" ");
		let reparsed = tokenize_str(&joined, WHITESPACE);
		proptest::prop_assert_eq!(reparsed, tokens);
	}

	/// Property 2: tokenizing arbitrary valid UTF-8 text with ASCII
	/// delimiters never produces a token that isn't itself valid UTF-8 (i.e.
	/// no multibyte codepoint is ever split).
	#[test]
	fn utf8_preservation(s in "\\PC*") {
		let tokens = tokenize_str(&s, WHITESPACE);
		for tok in tokens {
			proptest::prop_assert!(std::str::from_utf8(tok.as_bytes()).is_ok());
		}
	}
}
