use flate2::bufread::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use sha1::Sha1;
use std::fs::{DirBuilder, File};
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TaggitError};
use crate::object::{GitObject, ObjectKind, RawObject};
use crate::util::{self, Sha};

/// The loose-object database under `<gitdir>/objects`. Objects are keyed by
/// the sha1 of `header + content` and stored zlib-deflated in a two-level
/// fan-out (`objects/bc/8a49...`).
#[derive(Debug)]
pub struct Odb {
  root: PathBuf,
}

impl Odb {
  pub fn new(gitdir: &Path) -> Self {
    Odb {
      root: gitdir.join("objects"),
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn path_for(&self, sha: &Sha) -> PathBuf {
    let (dir, file) = sha.split_for_path();
    self.root.join(dir).join(file)
  }

  pub fn contains(&self, sha: &Sha) -> bool {
    self.path_for(sha).is_file()
  }

  pub fn read(&self, sha: &Sha) -> Result<RawObject> {
    let path = self.path_for(sha);

    if !path.is_file() {
      return Err(TaggitError::ObjectNotFound(sha.hexdigest()));
    }

    let f = File::open(&path)?;
    let mut zfile = BufReader::new(ZlibDecoder::new(BufReader::new(f)));

    let mut header = vec![];
    zfile.read_until(b'\0', &mut header)?;

    if header.pop() != Some(b'\0') {
      return Err(TaggitError::Generic(format!(
        "malformed header in object {}",
        sha
      )));
    }

    let header = std::str::from_utf8(&header)?;
    let mut bits = header.splitn(2, ' ');

    let kind = bits
      .next()
      .and_then(ObjectKind::from_str)
      .ok_or_else(|| {
        TaggitError::Generic(format!("unknown type in object {}", sha))
      })?;

    let size = bits
      .next()
      .and_then(|s| s.parse::<usize>().ok())
      .ok_or_else(|| {
        TaggitError::Generic(format!("bad size in object {}", sha))
      })?;

    let mut content = vec![];
    zfile.read_to_end(&mut content)?;

    if content.len() != size {
      return Err(TaggitError::Generic(format!(
        "size mismatch in object {}: header says {}, got {}",
        sha,
        size,
        content.len()
      )));
    }

    Ok(RawObject::new(sha.clone(), kind, content, self.root.clone()))
  }

  pub fn write(&self, obj: &impl GitObject) -> Result<Sha> {
    self.write_raw(obj.kind(), &obj.raw_content())
  }

  /// Stores a fully materialized buffer as an object of the given kind.
  pub fn write_raw(&self, kind: ObjectKind, content: &[u8]) -> Result<Sha> {
    let mut stream = self.open_wstream(kind, content.len())?;
    stream.write_all(content)?;
    stream.finalize()
  }

  /// Opens a streaming writer for an object whose total content length is
  /// known up front. Bytes fed to the stream are hashed and deflated as
  /// they arrive; nothing touches disk until `finalize`, when the id is
  /// known.
  pub fn open_wstream(
    &self,
    kind: ObjectKind,
    len: usize,
  ) -> Result<WriteStream> {
    let header = util::header_for(kind, len);

    let mut hash = Sha1::new();
    hash.update(&header);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&header)?;

    Ok(WriteStream {
      hash,
      encoder,
      root: self.root.clone(),
    })
  }
}

pub struct WriteStream {
  hash:    Sha1,
  encoder: ZlibEncoder<Vec<u8>>,
  root:    PathBuf,
}

impl WriteStream {
  pub fn finalize(self) -> Result<Sha> {
    let sha = Sha::from(self.hash);
    let compressed = self.encoder.finish()?;

    let (dir, file) = sha.split_for_path();
    let path = self.root.join(dir).join(file);

    // content-addressed: an existing file already holds these exact bytes
    if !path.is_file() {
      DirBuilder::new()
        .recursive(true)
        .create(path.parent().unwrap())?;
      File::create(&path)?.write_all(&compressed)?;
      debug!("wrote object {}", sha);
    }

    Ok(sha)
  }
}

impl Write for WriteStream {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.hash.update(buf);
    self.encoder.write(buf)
  }

  fn flush(&mut self) -> std::io::Result<()> {
    self.encoder.flush()
  }
}
