// prelude for easy testing
pub use crate::errors::{Result, TaggitError};
pub use assert_fs::prelude::*;
pub use assert_fs::TempDir;
pub use predicates::prelude::*;
pub use serial_test::serial;

use crate::repo::Repository;

// this is just so that the tempdir won't be dropped before the repo is
pub struct TestRepo {
  #[allow(unused)]
  dir:      TempDir,
  pub repo: Repository,
}

pub fn tempdir() -> TempDir {
  let d = TempDir::new().expect("couldn't make tempdir");
  assert!(d.path().is_dir());
  d
}

pub fn new_empty_repo() -> TestRepo {
  let dir = tempdir();

  let path = dir.path().canonicalize().unwrap();
  let repo = Repository::create_empty(&path).expect("could not init test repo");

  TestRepo { dir, repo }
}
