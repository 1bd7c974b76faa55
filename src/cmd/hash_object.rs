use clap::{App, Arg, ArgMatches};
use sha1::Sha1;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::PathBuf;

use crate::prelude::*;
use crate::util::Sha;

pub fn app<'a, 'b>() -> App<'a, 'b> {
  App::new("hash-object")
    .about("compute object id and optionally write the object")
    .arg(
      Arg::with_name("type")
        .short("t")
        .long("type")
        .takes_value(true)
        .default_value("blob")
        .help("specify the object type"),
    )
    .arg(
      Arg::with_name("write")
        .short("w")
        .long("write")
        .help("actually write the object into the object database"),
    )
    .arg(Arg::with_name("path").required(true).help("path to hash"))
}

pub fn run(m: &ArgMatches) -> Result<()> {
  let kind_str = m.value_of("type").unwrap();
  let kind = ObjectKind::from_str(kind_str).ok_or_else(|| {
    TaggitError::Generic(format!("invalid object type: {}", kind_str))
  })?;

  let path = PathBuf::from(m.value_of("path").unwrap());

  if !path.is_file() {
    return Err(TaggitError::Generic(format!(
      "cannot open {}: no such file or directory",
      path.display()
    )));
  }

  let mut content = vec![];
  BufReader::new(File::open(&path)?).read_to_end(&mut content)?;

  let sha = if m.is_present("write") {
    find_repo()?.odb().write_raw(kind, &content)?
  } else {
    let mut hash = Sha1::new();
    hash.update(&util::header_for(kind, content.len()));
    hash.update(&content);
    Sha::from(hash)
  };

  println!("{}", sha);

  Ok(())
}
