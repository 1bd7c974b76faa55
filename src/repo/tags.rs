use glob::Pattern;
use std::io::prelude::*;

use crate::errors::{Result, TaggitError};
use crate::object::{ObjectKind, RawObject, Tag};
use crate::repo::{Repository, Traversal, Visit};
use crate::signature::Signature;
use crate::util::{self, Sha};

pub const TAGS_DIR: &str = "refs/tags";

/// The tag lifecycle: create (annotated, lightweight, or from a raw
/// buffer), delete, enumerate, peel. A `Tags` holds no state of its own;
/// every operation runs start to finish against the odb and the ref store.
pub struct Tags<'r> {
  repo: &'r Repository,
}

impl<'r> Tags<'r> {
  pub(crate) fn new(repo: &'r Repository) -> Self {
    Tags { repo }
  }

  fn refname_for(&self, name: &str) -> Result<String> {
    if !util::is_valid_refname(name) {
      return Err(TaggitError::InvalidRefName(name.to_string()));
    }

    Ok(format!("{}/{}", TAGS_DIR, name))
  }

  // Fast-path rejection only. create_or_update re-checks under the ref's
  // lock, and that check is the one that decides a race.
  fn check_free(&self, refname: &str, force: bool) -> Result<()> {
    if !force && self.repo.grefs().lookup(refname)?.is_some() {
      return Err(TaggitError::RefExists(refname.to_string()));
    }

    Ok(())
  }

  fn check_ours(&self, target: &RawObject) -> Result<()> {
    if target.owner() != self.repo.odb().root() {
      return Err(TaggitError::ForeignTarget(target.sha().hexdigest()));
    }

    Ok(())
  }

  /// Creates an annotated tag: writes a tag object wrapping `target`, then
  /// binds `refs/tags/<name>` to it. Returns the tag object's id.
  pub fn create(
    &self,
    name: &str,
    target: &RawObject,
    tagger: &Signature,
    message: &str,
    force: bool,
  ) -> Result<Sha> {
    self.check_ours(target)?;
    let refname = self.refname_for(name)?;
    self.check_free(&refname, force)?;

    let tag = Tag::new(
      target.sha().clone(),
      target.kind(),
      name,
      Some(tagger.clone()),
      Some(message.to_string()),
    );

    let tag_id = self.repo.odb().write(&tag)?;
    self.repo.grefs().create_or_update(&refname, &tag_id, force)?;

    Ok(tag_id)
  }

  /// Creates a lightweight tag: no tag object at all, just a ref pointing
  /// straight at the target.
  pub fn create_lightweight(
    &self,
    name: &str,
    target: &RawObject,
    force: bool,
  ) -> Result<Sha> {
    self.check_ours(target)?;
    let refname = self.refname_for(name)?;
    self.check_free(&refname, force)?;

    self
      .repo
      .grefs()
      .create_or_update(&refname, target.sha(), force)?;

    Ok(target.sha().clone())
  }

  /// Creates an annotated tag from already-serialized bytes. The buffer is
  /// validated (parseable, target present, declared type matches the stored
  /// one) and then stored *verbatim*; round-tripping it through our own
  /// serializer could produce different bytes and therefore a different id.
  pub fn create_from_buffer(&self, buf: &[u8], force: bool) -> Result<Sha> {
    let tag = Tag::parse(buf)?;

    let odb = self.repo.odb();
    let target = odb.read(tag.target())?;

    if target.kind() != tag.target_type() {
      return Err(TaggitError::TypeMismatch {
        declared: tag.target_type(),
        actual:   target.kind(),
      });
    }

    let refname = self.refname_for(tag.name())?;
    self.check_free(&refname, force)?;

    let mut stream = odb.open_wstream(ObjectKind::Tag, buf.len())?;
    stream.write_all(buf)?;
    let tag_id = stream.finalize()?;

    self.repo.grefs().create_or_update(&refname, &tag_id, force)?;

    Ok(tag_id)
  }

  pub fn delete(&self, name: &str) -> Result<()> {
    let refname = self.refname_for(name)?;
    self.repo.grefs().delete(&refname)
  }

  /// Resolves `refs/tags/<name>` and parses the annotated tag it points at.
  pub fn lookup(&self, name: &str) -> Result<Tag> {
    let refname = self.refname_for(name)?;
    let sha = self.repo.grefs().resolve(&refname)?;
    let obj = self.repo.odb().read(&sha)?;

    if obj.kind() != ObjectKind::Tag {
      return Err(TaggitError::Generic(format!(
        "{} is not an annotated tag",
        name
      )));
    }

    Tag::parse(obj.content())
  }

  /// Visits `(full refname, resolved id)` for every tag ref. The visitor
  /// can stop the walk early; that comes back as `Traversal::Stopped` with
  /// the visitor's code, distinct from both exhaustion and store errors.
  pub fn foreach<F>(&self, mut cb: F) -> Result<Traversal>
  where
    F: FnMut(&str, &Sha) -> Visit,
  {
    let grefs = self.repo.grefs();
    let prefix = format!("{}/", TAGS_DIR);
    let mut failure = None;

    let traversal = grefs.foreach_name(|refname| {
      if !refname.starts_with(&prefix) {
        return Visit::Continue;
      }

      match grefs.resolve(refname) {
        Ok(sha) => cb(refname, &sha),
        Err(err) => {
          failure = Some(err);
          Visit::Stop(-1)
        },
      }
    })?;

    match failure {
      Some(err) => Err(err),
      None => Ok(traversal),
    }
  }

  /// All tag short names, optionally filtered by a shell-style glob. Order
  /// is whatever the ref store enumerates, not sorted.
  pub fn list(&self, pattern: &str) -> Result<Vec<String>> {
    let pattern = if pattern.is_empty() {
      None
    } else {
      Some(Pattern::new(pattern).map_err(|e| {
        TaggitError::Generic(format!("invalid pattern {:?}: {}", pattern, e))
      })?)
    };

    let prefix = format!("{}/", TAGS_DIR);
    let mut names = vec![];

    self.foreach(|refname, _| {
      let name = &refname[prefix.len()..];

      if pattern.as_ref().map_or(true, |p| p.matches(name)) {
        names.push(name.to_string());
      }

      Visit::Continue
    })?;

    Ok(names)
  }

  /// Follows a tag through any chain of intermediate tag objects to the
  /// first non-tag object. Chains can't cycle; an id would have to contain
  /// its own hash.
  pub fn peel(&self, tag: &Tag) -> Result<RawObject> {
    let odb = self.repo.odb();
    let mut obj = odb.read(tag.target())?;

    while obj.kind() == ObjectKind::Tag {
      let inner = Tag::parse(obj.content())?;
      obj = odb.read(inner.target())?;
    }

    Ok(obj)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::object::GitObject;
  use crate::test_prelude::*;

  fn tagger() -> Signature {
    Signature::parse(b"A U Thor <author@example.com> 1196000000 +0100")
      .unwrap()
  }

  // a target object of the given kind; the odb doesn't validate content
  fn target(tr: &TestRepo, kind: ObjectKind, content: &[u8]) -> RawObject {
    let sha = tr.repo.odb().write_raw(kind, content).unwrap();
    tr.repo.odb().read(&sha).unwrap()
  }

  #[test]
  fn create_annotated() {
    let tr = new_empty_repo();
    let commit = target(&tr, ObjectKind::Commit, b"some commit");

    let tags = tr.repo.tags();
    let tag_id = tags
      .create("v1.0", &commit, &tagger(), "first release\n", false)
      .unwrap();

    // the ref points at the tag object, not the commit
    assert_ne!(&tag_id, commit.sha());
    let bound = tr.repo.grefs().resolve("refs/tags/v1.0").unwrap();
    assert_eq!(bound, tag_id);

    let tag = tags.lookup("v1.0").unwrap();
    assert_eq!(tag.name(), "v1.0");
    assert_eq!(tag.target(), commit.sha());
    assert_eq!(tag.target_type(), ObjectKind::Commit);
    assert_eq!(tag.tagger().unwrap().email, "author@example.com");
    assert_eq!(tag.message(), Some("first release\n"));
  }

  #[test]
  fn create_lightweight() {
    let tr = new_empty_repo();
    let blob = target(&tr, ObjectKind::Blob, b"data");

    let tags = tr.repo.tags();
    let id = tags.create_lightweight("marker", &blob, false).unwrap();

    // lightweight tags bind the target id directly
    assert_eq!(&id, blob.sha());
    let bound = tr.repo.grefs().resolve("refs/tags/marker").unwrap();
    assert_eq!(&bound, blob.sha());
  }

  #[test]
  fn overwrite_needs_force() {
    let tr = new_empty_repo();
    let first = target(&tr, ObjectKind::Blob, b"one");
    let second = target(&tr, ObjectKind::Blob, b"two");

    let tags = tr.repo.tags();
    tags.create_lightweight("v1", &first, false).unwrap();

    let err = tags.create_lightweight("v1", &second, false);
    assert!(matches!(err, Err(TaggitError::RefExists(_))));

    // first binding untouched
    let bound = tr.repo.grefs().resolve("refs/tags/v1").unwrap();
    assert_eq!(&bound, first.sha());

    tags.create_lightweight("v1", &second, true).unwrap();
    let bound = tr.repo.grefs().resolve("refs/tags/v1").unwrap();
    assert_eq!(&bound, second.sha());
  }

  #[test]
  fn overwrite_needs_force_annotated() {
    let tr = new_empty_repo();
    let commit = target(&tr, ObjectKind::Commit, b"some commit");

    let tags = tr.repo.tags();
    let first = tags
      .create("v1", &commit, &tagger(), "take one\n", false)
      .unwrap();

    let err = tags.create("v1", &commit, &tagger(), "take two\n", false);
    assert!(matches!(err, Err(TaggitError::RefExists(_))));
    assert_eq!(tr.repo.grefs().resolve("refs/tags/v1").unwrap(), first);

    let second = tags
      .create("v1", &commit, &tagger(), "take two\n", true)
      .unwrap();
    assert_eq!(tr.repo.grefs().resolve("refs/tags/v1").unwrap(), second);
  }

  #[test]
  fn rejects_foreign_target() {
    let ours = new_empty_repo();
    let theirs = new_empty_repo();
    let foreign = target(&theirs, ObjectKind::Blob, b"elsewhere");

    let tags = ours.repo.tags();

    let err = tags.create("v1", &foreign, &tagger(), "msg\n", false);
    assert!(matches!(err, Err(TaggitError::ForeignTarget(_))));

    let err = tags.create_lightweight("v1", &foreign, false);
    assert!(matches!(err, Err(TaggitError::ForeignTarget(_))));
  }

  #[test]
  fn rejects_bad_name() {
    let tr = new_empty_repo();
    let blob = target(&tr, ObjectKind::Blob, b"data");

    let err = tr.repo.tags().create_lightweight("v..1", &blob, false);
    assert!(matches!(err, Err(TaggitError::InvalidRefName(_))));
  }

  #[test]
  fn from_buffer() {
    let tr = new_empty_repo();
    let commit = target(&tr, ObjectKind::Commit, b"some commit");

    let tag = Tag::new(
      commit.sha().clone(),
      ObjectKind::Commit,
      "v2.0",
      Some(tagger()),
      Some("from a buffer\n".to_string()),
    );
    let buf = tag.raw_content();

    let tags = tr.repo.tags();
    let tag_id = tags.create_from_buffer(&buf, false).unwrap();

    assert_eq!(tr.repo.grefs().resolve("refs/tags/v2.0").unwrap(), tag_id);
    assert_eq!(tags.lookup("v2.0").unwrap(), tag);
  }

  #[test]
  fn from_buffer_stores_bytes_verbatim() {
    let tr = new_empty_repo();
    let commit = target(&tr, ObjectKind::Commit, b"some commit");

    // the doubled space in the tagger line would not survive a re-serialize
    let buf = format!(
      "object {}\ntype commit\ntag v3\n\
       tagger A U Thor  <author@example.com> 1196000000 +0100\n\nmsg\n",
      commit.sha()
    )
    .into_bytes();

    let tags = tr.repo.tags();
    let tag_id = tags.create_from_buffer(&buf, false).unwrap();

    let stored = tr.repo.odb().read(&tag_id).unwrap();
    assert_eq!(stored.content(), &buf[..]);
  }

  #[test]
  fn from_buffer_missing_target() {
    let tr = new_empty_repo();

    let buf = format!(
      "object {}\ntype commit\ntag v1\n",
      "bc8a4908df90d086b9e9880ee28dcbcbe2cf294c"
    );

    let tags = tr.repo.tags();
    let err = tags.create_from_buffer(buf.as_bytes(), false);
    assert!(matches!(err, Err(TaggitError::ObjectNotFound(_))));

    // the failed create must not leave a ref behind
    assert!(tr.repo.grefs().lookup("refs/tags/v1").unwrap().is_none());
  }

  #[test]
  fn from_buffer_type_mismatch() {
    let tr = new_empty_repo();
    let tags = tr.repo.tags();

    let stored_kinds = [
      (ObjectKind::Commit, ObjectKind::Tree),
      (ObjectKind::Tree, ObjectKind::Blob),
      (ObjectKind::Blob, ObjectKind::Tag),
      (ObjectKind::Tag, ObjectKind::Commit),
    ];

    for (i, (actual, declared)) in stored_kinds.iter().enumerate() {
      let obj = target(&tr, *actual, format!("content {}", i).as_bytes());
      let buf = format!(
        "object {}\ntype {}\ntag mismatch-{}\n",
        obj.sha(),
        declared,
        i
      );

      let err = tags.create_from_buffer(buf.as_bytes(), false);
      match err {
        Err(TaggitError::TypeMismatch {
          declared: d,
          actual: a,
        }) => {
          assert_eq!(d, *declared);
          assert_eq!(a, *actual);
        },
        other => panic!("expected TypeMismatch, got {:?}", other),
      }

      let refname = format!("refs/tags/mismatch-{}", i);
      assert!(tr.repo.grefs().lookup(&refname).unwrap().is_none());
    }
  }

  #[test]
  fn delete() {
    let tr = new_empty_repo();
    let blob = target(&tr, ObjectKind::Blob, b"data");
    let tags = tr.repo.tags();

    assert!(matches!(
      tags.delete("nope"),
      Err(TaggitError::RefNotFound(_))
    ));

    tags.create_lightweight("v1", &blob, false).unwrap();
    assert_eq!(tags.list("").unwrap(), vec!["v1"]);

    tags.delete("v1").unwrap();
    assert!(tags.list("").unwrap().is_empty());
  }

  #[test]
  fn list_with_globs() {
    let tr = new_empty_repo();
    let blob = target(&tr, ObjectKind::Blob, b"data");
    let tags = tr.repo.tags();

    for &name in &["v1.0", "v1.1", "v2.0", "v10", "latest"] {
      tags.create_lightweight(name, &blob, false).unwrap();
    }

    let sorted = |pattern: &str| {
      let mut names = tags.list(pattern).unwrap();
      names.sort();
      names
    };

    assert_eq!(sorted(""), vec!["latest", "v1.0", "v1.1", "v10", "v2.0"]);
    assert_eq!(sorted("v1.*"), vec!["v1.0", "v1.1"]);
    assert_eq!(sorted("v*"), vec!["v1.0", "v1.1", "v10", "v2.0"]);
    assert_eq!(sorted("v?.0"), vec!["v1.0", "v2.0"]);
    assert_eq!(sorted("v1.[01]"), vec!["v1.0", "v1.1"]);
    assert!(sorted("x*").is_empty());
  }

  #[test]
  fn foreach_stops_early() {
    let tr = new_empty_repo();
    let blob = target(&tr, ObjectKind::Blob, b"data");
    let tags = tr.repo.tags();

    for &name in &["a", "b", "c"] {
      tags.create_lightweight(name, &blob, false).unwrap();
    }

    // a branch ref must not be visited
    tr.repo
      .grefs()
      .create_or_update("refs/heads/master", blob.sha(), false)
      .unwrap();

    let mut visited = 0;
    let res = tags.foreach(|refname, sha| {
      assert!(refname.starts_with("refs/tags/"));
      assert_eq!(sha, blob.sha());
      visited += 1;
      if visited == 2 {
        Visit::Stop(7)
      } else {
        Visit::Continue
      }
    });

    assert_eq!(res.unwrap(), Traversal::Stopped(7));
    assert_eq!(visited, 2);

    let res = tags.foreach(|_, _| Visit::Continue);
    assert_eq!(res.unwrap(), Traversal::Exhausted);
  }

  #[test]
  fn peel_through_tag_chain() {
    let tr = new_empty_repo();
    let blob = target(&tr, ObjectKind::Blob, b"the bottom");
    let tags = tr.repo.tags();

    let inner_id = tags
      .create("inner", &blob, &tagger(), "wraps the blob\n", false)
      .unwrap();

    let inner_obj = tr.repo.odb().read(&inner_id).unwrap();
    tags
      .create("outer", &inner_obj, &tagger(), "wraps the tag\n", false)
      .unwrap();

    let outer = tags.lookup("outer").unwrap();
    assert_eq!(outer.target_type(), ObjectKind::Tag);

    let peeled = tags.peel(&outer).unwrap();
    assert_eq!(peeled.kind(), ObjectKind::Blob);
    assert_eq!(peeled.sha(), blob.sha());

    // peeling a tag that already points at a non-tag is a no-op hop
    let inner = tags.lookup("inner").unwrap();
    assert_eq!(tags.peel(&inner).unwrap().sha(), blob.sha());
  }
}
