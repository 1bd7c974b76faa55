use std::fmt;
use std::io::Error as IoError;
use std::path::PathBuf;
use std::str::Utf8Error;
use std::string::FromUtf8Error;

use crate::object::ObjectKind;

#[derive(Debug)]
pub enum TaggitError {
  Generic(String),
  Clap(clap::Error),
  Io(IoError),
  Encoding(Box<dyn std::error::Error>),
  // parse failures, one per field of the tag grammar
  InvalidObjectField,
  InvalidTypeField,
  InvalidTagField,
  InvalidTaggerField,
  MissingMessageSeparator,
  // the buffer was well-formed but disagrees with the store
  ObjectNotFound(String),
  TypeMismatch {
    declared: ObjectKind,
    actual:   ObjectKind,
  },
  ForeignTarget(String),
  // name conflicts and lookups, both expected conditions
  RefExists(String),
  RefNotFound(String),
  InvalidRefName(String),
  Lock(PathBuf, IoError),
}

type TE = TaggitError;
pub type Result<T> = std::result::Result<T, TaggitError>;

impl std::error::Error for TaggitError {}

impl fmt::Display for TaggitError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      TE::Generic(err) => write!(f, "{}", err),
      TE::Clap(err) => write!(f, "{:?}", err),
      TE::Io(err) => write!(f, "{:?}", err),
      TE::Encoding(err) => write!(f, "{}", err),
      TE::InvalidObjectField => {
        write!(f, "failed to parse tag: object field invalid")
      },
      TE::InvalidTypeField => {
        write!(f, "failed to parse tag: type field invalid")
      },
      TE::InvalidTagField => {
        write!(f, "failed to parse tag: tag field invalid")
      },
      TE::InvalidTaggerField => {
        write!(f, "failed to parse tag: tagger field invalid")
      },
      TE::MissingMessageSeparator => {
        write!(f, "failed to parse tag: no new line before message")
      },
      TE::ObjectNotFound(sha) => write!(f, "object not found: {}", sha),
      TE::TypeMismatch { declared, actual } => write!(
        f,
        "declared target type {} does not match stored type {}",
        declared, actual
      ),
      TE::ForeignTarget(sha) => {
        write!(f, "target {} does not belong to this repository", sha)
      },
      TE::RefExists(refname) => {
        write!(f, "reference already exists: {}", refname)
      },
      TE::RefNotFound(refname) => write!(f, "ref not found: {}", refname),
      TE::InvalidRefName(name) => write!(f, "invalid ref name: {}", name),
      TE::Lock(path, err) => write!(f, "could not lock {:?}: {}", path, err),
    }
  }
}

impl From<clap::Error> for TaggitError {
  fn from(err: clap::Error) -> Self {
    TE::Clap(err)
  }
}

impl From<IoError> for TaggitError {
  fn from(err: IoError) -> Self {
    TE::Io(err)
  }
}

impl From<Utf8Error> for TaggitError {
  fn from(err: Utf8Error) -> Self {
    TE::Encoding(Box::new(err))
  }
}

impl From<FromUtf8Error> for TaggitError {
  fn from(err: FromUtf8Error) -> Self {
    TE::Encoding(Box::new(err))
  }
}
