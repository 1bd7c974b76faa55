pub mod cmd;
mod errors;
mod lockfile;
mod object;
mod odb;
mod repo;
mod signature;
pub mod util;

pub use lockfile::Lockfile;

// A convenience module appropriate for glob imports (`use taggit::prelude::*;`).
pub mod prelude {
  pub use crate::errors::{Result, TaggitError};
  pub use crate::object::{GitObject, ObjectKind, RawObject, Tag};
  pub use crate::odb::Odb;
  pub use crate::repo::{find_repo, Grefs, Repository, Tags, Traversal, Visit};
  pub use crate::signature::Signature;
  pub use crate::util;
}

pub use prelude::*;

pub fn app() -> clap::App<'static, 'static> {
  use clap::{crate_version, App, AppSettings};

  App::new("taggit")
    .version(crate_version!())
    .setting(AppSettings::SubcommandRequiredElseHelp)
    .subcommands(cmd::command_apps())
}

#[cfg(test)]
pub mod test_prelude;
