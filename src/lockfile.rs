use std::cell::Cell;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use crate::errors::{Result, TaggitError};

/// Mutual exclusion for a single on-disk file, git style: take `<path>.lock`
/// with O_CREAT|O_EXCL, write the new content there, then rename over the
/// real path on commit. Whoever owns the lockfile owns the ref update, which
/// is what makes `Grefs::create_or_update` an atomic conditional bind.
#[derive(Debug)]
pub struct Lockfile {
  path:      PathBuf,
  lock_path: PathBuf,
  locked:    Cell<bool>,
}

#[derive(Debug)]
pub struct FileLock<'l> {
  file:     File,
  lockfile: &'l Lockfile,
}

impl Lockfile {
  pub fn new(path: PathBuf) -> Self {
    let mut name = path.clone().into_os_string();
    name.push(".lock");

    Lockfile {
      path,
      lock_path: PathBuf::from(name),
      locked: Cell::new(false),
    }
  }

  pub fn lock(&self) -> Result<FileLock> {
    let file = OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&self.lock_path)
      .map_err(|e| TaggitError::Lock(self.lock_path.clone(), e))?;

    self.locked.set(true);

    Ok(FileLock {
      file,
      lockfile: &self,
    })
  }

  pub fn is_locked(&self) -> bool {
    self.locked.get()
  }

  pub fn path(&self) -> &PathBuf {
    &self.path
  }
}

impl<'l> FileLock<'l> {
  // write this file out to its name, minus .lock, then drop ourselves
  pub fn commit(mut self) -> Result<()> {
    use std::io::Write;
    self.file.flush()?;
    std::fs::rename(&self.lockfile.lock_path, &self.lockfile.path)?;
    self.lockfile.locked.set(false);
    Ok(())
  }

  pub fn rollback(self) -> Result<()> {
    std::fs::remove_file(&self.lockfile.lock_path)?;
    self.lockfile.locked.set(false);
    Ok(())
  }
}

impl<'l> std::io::Write for FileLock<'l> {
  fn write(&mut self, buf: &[u8]) -> std::result::Result<usize, std::io::Error> {
    self.file.write(buf)
  }

  fn flush(&mut self) -> std::result::Result<(), std::io::Error> {
    self.file.flush()
  }
}
