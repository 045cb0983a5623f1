//! A read-through cache of source file contents. Several phases of one build
//! look at the same posts; the cache makes sure each file is read from disk
//! once. It lives as long as the [`crate::build::Site`] that owns it, and
//! there is no persistence across runs. Contents are assumed not to change
//! while a build runs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Default)]
pub struct SourceCache {
    entries: RefCell<HashMap<PathBuf, Rc<str>>>,
}

impl SourceCache {
    pub fn new() -> SourceCache {
        SourceCache::default()
    }

    /// Returns the contents of `path`, reading the file on first access only.
    pub fn read(&self, path: &Path) -> io::Result<Rc<str>> {
        if let Some(text) = self.entries.borrow().get(path) {
            tracing::trace!(path = %path.display(), "cache hit");
            return Ok(Rc::clone(text));
        }

        let text: Rc<str> = Rc::from(std::fs::read_to_string(path)?);
        self.entries
            .borrow_mut()
            .insert(path.to_owned(), Rc::clone(&text));
        Ok(text)
    }

    /// The number of distinct files read so far.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
