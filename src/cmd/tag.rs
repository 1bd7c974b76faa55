use clap::{App, Arg, ArgMatches};

use crate::prelude::*;

pub fn app<'a, 'b>() -> App<'a, 'b> {
  App::new("tag")
    .about("create, list, or delete tags")
    .arg(
      Arg::with_name("list")
        .short("l")
        .long("list")
        .takes_value(true)
        .min_values(0)
        .value_name("pattern")
        .help("list tags, optionally matching a glob pattern"),
    )
    .arg(
      Arg::with_name("annotate")
        .short("a")
        .long("annotate")
        .help("make an annotated tag object"),
    )
    .arg(
      Arg::with_name("message")
        .short("m")
        .long("message")
        .takes_value(true)
        .value_name("msg")
        .help("message for the annotated tag"),
    )
    .arg(
      Arg::with_name("delete")
        .short("d")
        .long("delete")
        .help("delete the named tag"),
    )
    .arg(
      Arg::with_name("force")
        .short("f")
        .long("force")
        .help("replace an existing tag"),
    )
    .arg(Arg::with_name("name").help("tag name"))
    .arg(Arg::with_name("target").help("object the tag should point at"))
}

pub fn run(m: &ArgMatches) -> Result<()> {
  let repo = find_repo()?;
  let tags = repo.tags();

  if m.is_present("list") || !m.is_present("name") {
    let mut names = tags.list(m.value_of("list").unwrap_or(""))?;
    names.sort();

    for name in names {
      println!("{}", name);
    }

    return Ok(());
  }

  let name = m.value_of("name").unwrap();

  if m.is_present("delete") {
    tags.delete(name)?;
    println!("deleted tag '{}'", name);
    return Ok(());
  }

  let target_sha = m.value_of("target").ok_or_else(|| {
    TaggitError::Generic("a target object is required to create a tag".into())
  })?;
  let target = repo.object_for_sha(target_sha)?;
  let force = m.is_present("force");

  if m.is_present("annotate") {
    let message = m.value_of("message").ok_or_else(|| {
      TaggitError::Generic("an annotated tag needs a message (-m)".into())
    })?;

    let mut message = message.to_string();
    if !message.ends_with("\n") {
      message.push_str("\n");
    }

    let tag_id = tags.create(name, &target, &tagger()?, &message, force)?;
    println!("{}", tag_id);
  } else {
    tags.create_lightweight(name, &target, force)?;
  }

  Ok(())
}

fn tagger() -> Result<Signature> {
  let name = std::env::var("GIT_AUTHOR_NAME").map_err(|_| {
    TaggitError::Generic("GIT_AUTHOR_NAME is not set".into())
  })?;
  let email = std::env::var("GIT_AUTHOR_EMAIL").map_err(|_| {
    TaggitError::Generic("GIT_AUTHOR_EMAIL is not set".into())
  })?;

  Ok(Signature::now(&name, &email))
}
