use std::fmt;
use std::path::{Path, PathBuf};

use crate::util::Sha;

mod tag;
pub use tag::Tag;

/// The four kinds of object the store knows about. The wire literals are the
/// lowercase type names; matching is byte-exact, never case-folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
  Commit,
  Tree,
  Blob,
  Tag,
}

impl ObjectKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Commit => "commit",
      Self::Tree => "tree",
      Self::Blob => "blob",
      Self::Tag => "tag",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "commit" => Some(Self::Commit),
      "tree" => Some(Self::Tree),
      "blob" => Some(Self::Blob),
      "tag" => Some(Self::Tag),
      _ => None,
    }
  }
}

impl fmt::Display for ObjectKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

pub trait GitObject {
  fn kind(&self) -> ObjectKind;
  fn raw_content(&self) -> Vec<u8>;
}

/// An object as loaded from an odb: its id, kind, and inflated content,
/// plus the objects directory it came from. The latter is what lets the tag
/// lifecycle reject targets that belong to some other repository.
#[derive(Debug)]
pub struct RawObject {
  sha:     Sha,
  kind:    ObjectKind,
  content: Vec<u8>,
  owner:   PathBuf,
}

impl RawObject {
  pub(crate) fn new(
    sha: Sha,
    kind: ObjectKind,
    content: Vec<u8>,
    owner: PathBuf,
  ) -> Self {
    RawObject {
      sha,
      kind,
      content,
      owner,
    }
  }

  pub fn sha(&self) -> &Sha {
    &self.sha
  }

  pub fn kind(&self) -> ObjectKind {
    self.kind
  }

  pub fn size(&self) -> usize {
    self.content.len()
  }

  pub fn content(&self) -> &[u8] {
    &self.content
  }

  pub(crate) fn owner(&self) -> &Path {
    &self.owner
  }
}
