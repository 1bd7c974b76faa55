use crate::errors::{Result, TaggitError};
use crate::object::{GitObject, ObjectKind};
use crate::signature::Signature;
use crate::util::{Sha, SHA_HEX_LEN};

/// An annotated tag: a stored object naming some other object. Lightweight
/// tags never take this form; they are bare refs handled entirely by the ref
/// layer.
///
/// A Tag is immutable once built, whether it came from `parse` or `new`.
/// `message` distinguishes "absent" (no blank-line separator in the source
/// buffer) from "present but empty".
#[derive(Debug, PartialEq)]
pub struct Tag {
  target:      Sha,
  target_type: ObjectKind,
  name:        String,
  tagger:      Option<Signature>,
  message:     Option<String>,
}

// the trailing newline is part of the match, so "treefrog" can't pass as
// "tree"
const TYPE_LITERALS: &[(&[u8], ObjectKind)] = &[
  (b"commit\n", ObjectKind::Commit),
  (b"tree\n", ObjectKind::Tree),
  (b"blob\n", ObjectKind::Blob),
  (b"tag\n", ObjectKind::Tag),
];

// If buf continues with marker, consume it.
fn eat(buf: &[u8], pos: &mut usize, marker: &[u8]) -> bool {
  if buf[*pos..].starts_with(marker) {
    *pos += marker.len();
    true
  } else {
    false
  }
}

// Index of the next newline at or after pos.
fn find_newline(buf: &[u8], pos: usize) -> Option<usize> {
  buf[pos..].iter().position(|&b| b == b'\n').map(|i| pos + i)
}

impl Tag {
  pub fn new(
    target: Sha,
    target_type: ObjectKind,
    name: &str,
    tagger: Option<Signature>,
    message: Option<String>,
  ) -> Self {
    Tag {
      target,
      target_type,
      name: name.to_string(),
      tagger,
      message,
    }
  }

  /// Parses the stored form of a tag object. The grammar is line-oriented
  /// and order-fixed, so this is a single forward pass: `object`, `type`,
  /// `tag`, then an optional tagger line, then an optional blank-line
  /// separator followed by the message.
  pub fn parse(buf: &[u8]) -> Result<Self> {
    let mut pos = 0;

    // object <40 hex chars>\n
    if !eat(buf, &mut pos, b"object ") {
      return Err(TaggitError::InvalidObjectField);
    }

    if buf.len() < pos + SHA_HEX_LEN + 1 || buf[pos + SHA_HEX_LEN] != b'\n' {
      return Err(TaggitError::InvalidObjectField);
    }

    let hex = std::str::from_utf8(&buf[pos..pos + SHA_HEX_LEN])
      .map_err(|_| TaggitError::InvalidObjectField)?;
    let target =
      Sha::from_hex(hex).map_err(|_| TaggitError::InvalidObjectField)?;
    pos += SHA_HEX_LEN + 1;

    // type <commit|tree|blob|tag>\n, first byte-exact match wins
    if !eat(buf, &mut pos, b"type ") {
      return Err(TaggitError::InvalidTypeField);
    }

    let target_type = TYPE_LITERALS
      .iter()
      .find(|&&(lit, _)| eat(buf, &mut pos, lit))
      .map(|&(_, kind)| kind)
      .ok_or(TaggitError::InvalidTypeField)?;

    // tag <name>\n; an empty name is unusual but not a parse error
    if !eat(buf, &mut pos, b"tag ") {
      return Err(TaggitError::InvalidTagField);
    }

    let eol = find_newline(buf, pos).ok_or(TaggitError::InvalidTagField)?;
    let name = String::from_utf8(buf[pos..eol].to_vec())?;
    pos = eol + 1;

    // a line here that isn't the blank separator must be the tagger
    let mut tagger = None;
    if pos < buf.len() && buf[pos] != b'\n' {
      if !eat(buf, &mut pos, b"tagger ") {
        return Err(TaggitError::InvalidTaggerField);
      }

      let eol =
        find_newline(buf, pos).ok_or(TaggitError::InvalidTaggerField)?;
      let sig = Signature::parse(&buf[pos..eol])
        .map_err(|_| TaggitError::InvalidTaggerField)?;
      tagger = Some(sig);
      pos = eol + 1;
    }

    // anything left must start with the separator newline; past it, the
    // rest of the buffer is the message, verbatim
    let mut message = None;
    if pos < buf.len() {
      if buf[pos] != b'\n' {
        return Err(TaggitError::MissingMessageSeparator);
      }
      pos += 1;

      message = Some(String::from_utf8(buf[pos..].to_vec())?);
    }

    Ok(Tag {
      target,
      target_type,
      name,
      tagger,
      message,
    })
  }

  pub fn target(&self) -> &Sha {
    &self.target
  }

  pub fn target_type(&self) -> ObjectKind {
    self.target_type
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn tagger(&self) -> Option<&Signature> {
    self.tagger.as_ref()
  }

  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }
}

impl GitObject for Tag {
  fn kind(&self) -> ObjectKind {
    ObjectKind::Tag
  }

  // The exact inverse of parse; field order must not change, since these
  // bytes are what gets hashed.
  fn raw_content(&self) -> Vec<u8> {
    let mut out = vec![];

    out.extend_from_slice(format!("object {}\n", self.target).as_bytes());
    out.extend_from_slice(format!("type {}\n", self.target_type).as_bytes());
    out.extend_from_slice(format!("tag {}\n", self.name).as_bytes());

    if let Some(tagger) = &self.tagger {
      out.extend_from_slice(format!("tagger {}\n", tagger).as_bytes());
    }

    if let Some(message) = &self.message {
      out.push(b'\n');
      out.extend_from_slice(message.as_bytes());
    }

    out
  }
}
