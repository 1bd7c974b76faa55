use std::fs::{DirBuilder, File};
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TaggitError};
use crate::object::RawObject;
use crate::odb::Odb;
use crate::util::Sha;

mod grefs;
mod tags;

pub use grefs::{Grefs, Traversal, Visit};
pub use tags::Tags;

const GITDIR_NAME: &str = ".taggit";

const HEAD: &str = "ref: refs/heads/master\n";

const CONFIG: &str = "\
[core]
	repositoryformatversion = 0
	bare = false
";

#[derive(Debug)]
pub struct Repository {
  gitdir: PathBuf,
}

impl Repository {
  pub fn from_gitdir(gitdir: &Path) -> Result<Self> {
    if !gitdir.is_dir() {
      return Err(TaggitError::Generic(format!(
        "not a taggit repository: {}",
        gitdir.display()
      )));
    }

    Ok(Repository {
      gitdir: gitdir.to_path_buf(),
    })
  }

  pub fn from_work_tree(dir: &Path) -> Result<Self> {
    Self::from_gitdir(&dir.join(GITDIR_NAME))
  }

  pub fn create_empty(root: &Path) -> Result<Self> {
    let gitdir = root.join(GITDIR_NAME);
    DirBuilder::new().create(&gitdir)?;

    let repo = Repository { gitdir };

    File::create(repo.gitdir.join("HEAD"))?.write_all(HEAD.as_bytes())?;
    File::create(repo.gitdir.join("config"))?.write_all(CONFIG.as_bytes())?;

    for dir in &["objects", "refs/heads", "refs/tags"] {
      DirBuilder::new()
        .recursive(true)
        .create(repo.gitdir.join(dir))?;
    }

    Ok(repo)
  }

  pub fn gitdir(&self) -> &Path {
    &self.gitdir
  }

  pub fn odb(&self) -> Odb {
    Odb::new(&self.gitdir)
  }

  pub fn grefs(&self) -> Grefs {
    Grefs::new(self.gitdir.clone())
  }

  pub fn tags(&self) -> Tags {
    Tags::new(self)
  }

  pub fn object_for_sha(&self, sha: &str) -> Result<RawObject> {
    self.odb().read(&Sha::from_hex(sha)?)
  }
}

/// Walks up from the current directory looking for a gitdir.
pub fn find_repo() -> Result<Repository> {
  let pwd = std::env::current_dir()?;

  for dir in pwd.ancestors() {
    let gitdir = dir.join(GITDIR_NAME);
    if gitdir.is_dir() {
      return Repository::from_gitdir(&gitdir);
    }
  }

  Err(TaggitError::Generic(format!(
    "not a taggit repository (or any of the parent directories): {}",
    pwd.display()
  )))
}
