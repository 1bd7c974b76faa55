use chrono::{DateTime, FixedOffset, Local};
use std::fmt;
use std::io::prelude::*;
use std::io::BufReader;

use crate::errors::{Result, TaggitError};

/// A name, an email, and a moment in time, as it appears on tagger lines:
/// `A U Thor <author@example.com> 1234567890 +0000`.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
  pub name:  String,
  pub email: String,
  pub date:  DateTime<FixedOffset>,
}

fn malformed(buf: &[u8]) -> TaggitError {
  TaggitError::Generic(format!(
    "malformed signature: {:?}",
    String::from_utf8_lossy(buf)
  ))
}

impl Signature {
  pub fn new(name: &str, email: &str, date: DateTime<FixedOffset>) -> Self {
    Signature {
      name: name.to_string(),
      email: email.to_string(),
      date,
    }
  }

  /// A signature stamped with the local wall clock.
  pub fn now(name: &str, email: &str) -> Self {
    let now = Local::now();
    Self::new(name, email, now.with_timezone(now.offset()))
  }

  pub fn parse(buf: &[u8]) -> Result<Self> {
    let mut reader = BufReader::new(buf);

    let mut name = vec![];
    reader.read_until(b'<', &mut name)?;
    if name.last() != Some(&b'<') {
      return Err(malformed(buf));
    }
    name.pop();

    let mut email = vec![];
    reader.read_until(b'>', &mut email)?;
    if email.last() != Some(&b'>') {
      return Err(malformed(buf));
    }
    email.pop();

    let mut date = String::new();
    reader.read_to_string(&mut date)?;

    let date = DateTime::parse_from_str(date.trim(), "%s %z")
      .map_err(|_| malformed(buf))?;

    Ok(Signature {
      name: String::from_utf8(name)?.trim().to_string(),
      email: String::from_utf8(email)?.trim().to_string(),
      date,
    })
  }
}

impl fmt::Display for Signature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} <{}> {}",
      self.name,
      self.email,
      self.date.format("%s %z")
    )
  }
}
