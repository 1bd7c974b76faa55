use clap::{App, ArgMatches};

use crate::prelude::*;

pub fn app<'a, 'b>() -> App<'a, 'b> {
  App::new("init").about("initialize a taggit repository")
}

pub fn run(_matches: &ArgMatches) -> Result<()> {
  if let Ok(repo) = find_repo() {
    println!(
      "{} already exists, nothing to do!",
      repo.gitdir().display()
    );
    return Ok(());
  }

  let pwd = std::env::current_dir()?;
  let repo = Repository::create_empty(&pwd)?;

  println!(
    "initialized empty taggit repository at {}",
    repo.gitdir().display()
  );

  Ok(())
}
