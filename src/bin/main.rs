fn main() {
  pretty_env_logger::init();

  let matches = taggit::app().get_matches();
  let res = taggit::cmd::dispatch(&matches);

  if let Err(err) = res {
    eprintln!("fatal: {}", err);
    std::process::exit(1);
  }
}
