use sha1::Sha1 as Sha1Obj;
use std::fmt;

use crate::errors::{Result, TaggitError};

/// The number of hex characters in a full object id.
pub const HEX_LEN: usize = sha1::DIGEST_LENGTH * 2;

pub enum Sha {
  Object(Sha1Obj),
  Digest(String),
}

impl Sha {
  /// Validates a 40-char hex string; anything else is rejected so that a
  /// digest-backed Sha always holds real hex.
  pub fn from_hex(hex_str: &str) -> Result<Self> {
    if hex_str.len() != HEX_LEN || hex::decode(hex_str).is_err() {
      return Err(TaggitError::Generic(format!(
        "not a valid object id: {:?}",
        hex_str
      )));
    }

    Ok(Self::Digest(hex_str.to_string()))
  }

  pub fn hexdigest(&self) -> String {
    match self {
      Self::Object(sha1) => sha1.hexdigest(),
      Self::Digest(s) => s.clone(),
    }
  }

  pub fn split_for_path(&self) -> (String, String) {
    let hex = self.hexdigest();
    let (a, b) = hex.split_at(2);
    (a.to_string(), b.to_string())
  }
}

impl fmt::Debug for Sha {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Sha").field(&self.hexdigest()).finish()
  }
}

impl fmt::Display for Sha {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.hexdigest())
  }
}

impl Eq for Sha {}

impl PartialEq for Sha {
  fn eq(&self, other: &Self) -> bool {
    self.hexdigest() == other.hexdigest()
  }
}

impl Clone for Sha {
  fn clone(&self) -> Self {
    match self {
      Self::Object(sha1) => Self::Object(sha1.clone()),
      Self::Digest(s) => Self::Digest(s.clone()),
    }
  }
}

impl From<Sha1Obj> for Sha {
  fn from(obj: Sha1Obj) -> Self {
    Self::Object(obj)
  }
}

impl From<String> for Sha {
  fn from(digest: String) -> Self {
    Self::Digest(digest)
  }
}

impl From<&str> for Sha {
  fn from(digest: &str) -> Self {
    Self::Digest(digest.to_string())
  }
}
