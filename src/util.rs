use std::collections::HashSet;

use crate::object::ObjectKind;

mod sha;
pub use sha::{Sha, HEX_LEN as SHA_HEX_LEN};

/// The header prepended to every loose object before hashing/deflating:
/// `"<kind> <len>\0"`.
pub fn header_for(kind: ObjectKind, len: usize) -> Vec<u8> {
  format!("{} {}\0", kind.as_str(), len).as_bytes().to_vec()
}

// A pared-down version of the rules from git-check-ref-format; tag names
// never contain a category prefix, so the one-level rule is waived.
pub fn is_valid_refname(s: &str) -> bool {
  use std::iter::FromIterator;

  if s.is_empty()
    || s == "@"
    || s.starts_with("/")
    || s.ends_with("/")
    || s.ends_with(".")
  {
    return false;
  }

  let forbidden_chars: HashSet<char> =
    HashSet::from_iter(vec!['\\', ' ', '~', '^', ':', '?', '*', '[']);

  if s
    .chars()
    .any(|c| c.is_ascii_control() || forbidden_chars.contains(&c))
  {
    return false;
  }

  let forbidden_patterns = &["..", "@{", "//"];

  for p in forbidden_patterns {
    if s.contains(p) {
      return false;
    }
  }

  for hunk in s.split("/") {
    if hunk.starts_with(".") || hunk.ends_with(".lock") {
      return false;
    }
  }

  true
}
