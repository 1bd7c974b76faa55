use log::debug;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::errors::{Result, TaggitError};
use crate::lockfile::Lockfile;
use crate::util::Sha;

// The word "ref" is already claimed by the language, so internally a git
// ref is a "gref"; `let gref = ...` compiles where `let ref = ...` won't.
#[derive(Debug)]
pub struct Grefs {
  git_dir: PathBuf,
}

/// What a visitor wants next: keep going, or stop with a caller-chosen code.
pub enum Visit {
  Continue,
  Stop(i32),
}

/// How an enumeration ended. A visitor stopping early is not an error; store
/// failures still come back through `Err`.
#[derive(Debug, PartialEq)]
pub enum Traversal {
  Exhausted,
  Stopped(i32),
}

impl Grefs {
  pub fn new(git_dir: PathBuf) -> Self {
    Grefs { git_dir }
  }

  fn path_for(&self, refstr: &str) -> PathBuf {
    self.git_dir.join(refstr)
  }

  /// `None` means "no such ref", which is not an error.
  pub fn lookup(&self, refstr: &str) -> Result<Option<Sha>> {
    let path = self.path_for(refstr);

    if !path.is_file() {
      return Ok(None);
    }

    let mut s = String::new();
    File::open(path)?.read_to_string(&mut s)?;

    Ok(Some(Sha::from(s.trim().to_string())))
  }

  pub fn resolve(&self, refstr: &str) -> Result<Sha> {
    self
      .lookup(refstr)?
      .ok_or_else(|| TaggitError::RefNotFound(refstr.to_string()))
  }

  /// The authoritative bind. Takes the ref's lockfile first, so the
  /// existence check below happens with the update already serialized
  /// against concurrent writers; callers may have done their own check
  /// earlier, but only this one counts.
  pub fn create_or_update(
    &self,
    refstr: &str,
    sha: &Sha,
    allow_overwrite: bool,
  ) -> Result<()> {
    let path = self.path_for(refstr);
    std::fs::create_dir_all(path.parent().unwrap())?;

    let lockfile = Lockfile::new(path);
    let mut lock = lockfile.lock()?;

    if !allow_overwrite && lockfile.path().is_file() {
      lock.rollback()?;
      return Err(TaggitError::RefExists(refstr.to_string()));
    }

    lock.write_all(format!("{}\n", sha).as_bytes())?;
    lock.commit()?;

    debug!("bound {} -> {}", refstr, sha);
    Ok(())
  }

  pub fn delete(&self, refstr: &str) -> Result<()> {
    let path = self.path_for(refstr);

    if !path.is_file() {
      return Err(TaggitError::RefNotFound(refstr.to_string()));
    }

    std::fs::remove_file(path)?;
    debug!("deleted {}", refstr);
    Ok(())
  }

  /// Visits every ref name under `refs/`, in filesystem order (which is
  /// not sorted). Names use forward slashes regardless of platform.
  pub fn foreach_name<F>(&self, mut cb: F) -> Result<Traversal>
  where
    F: FnMut(&str) -> Visit,
  {
    for entry in WalkDir::new(self.git_dir.join("refs")) {
      let entry = entry.map_err(|e| {
        TaggitError::Generic(format!("cannot enumerate refs: {}", e))
      })?;

      if !entry.file_type().is_file() {
        continue;
      }

      // an in-flight update, not a ref
      if entry.path().extension() == Some("lock".as_ref()) {
        continue;
      }

      let name = entry
        .path()
        .strip_prefix(&self.git_dir)
        .expect("walked file outside the gitdir")
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

      if let Visit::Stop(code) = cb(&name) {
        return Ok(Traversal::Stopped(code));
      }
    }

    Ok(Traversal::Exhausted)
  }
}
