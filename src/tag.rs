//! Defines the [`Tag`] type, which represents a [`crate::post::Post`] tag,
//! and [`slugify`], which normalizes tag names.

use crate::layout;
use std::hash::{Hash, Hasher};

/// Normalizes a tag name: lower-cased, with spaces replaced by hyphens, so
/// that e.g. `Django Rest Framework` and `django rest framework` both become
/// `django-rest-framework`. Slugifying a slug returns it unchanged.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Reports whether `slug` can name a single path segment under `tags/` and
/// `feeds/`: it must be non-empty, have no path separator and not be `.` or
/// `..`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains(|c: char| c == '/' || c == '\\') && slug != "." && slug != ".."
}

/// Slugifies every name in `names`, dropping repeats and keeping the first
/// occurrence's position.
pub fn slugify_all<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let slug = slugify(name.as_ref());
        if !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }
    slugs
}

/// A tag with the site-relative URLs of its generated pages.
#[derive(Clone, Debug)]
pub struct Tag {
    /// The tag's slug.
    pub name: String,

    /// The URL of the tag's page, `/tags/{name}/`.
    pub url: String,

    /// The URL of the tag's feed, `/feeds/{name}.xml`.
    pub feed_url: String,
}

impl Tag {
    /// Builds a [`Tag`] from an already slugified name.
    pub fn new(name: &str) -> Tag {
        Tag {
            name: name.to_owned(),
            url: layout::tag_url(name),
            feed_url: layout::tag_feed_url(name),
        }
    }
}

impl Hash for Tag {
    /// Implements [`Hash`] for [`Tag`] by delegating directly to the `name`
    /// field.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

impl PartialEq for Tag {
    /// Implements [`PartialEq`] and [`Eq`] for [`Tag`] by delegating directly
    /// to the `name` field.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl Eq for Tag {}
