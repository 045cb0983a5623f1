//! Defines [`Source`], a path under the source root together with where it
//! ends up in the output tree, and [`IgnoreList`], which decides which
//! sources are skipped altogether.

use crate::config::Config;
use std::fmt;
use std::path::{Component, Path, PathBuf};

const MARKDOWN_EXTENSION: &str = "md";
const INDEX_FILE: &str = "index.html";
const INDEX_STEM: &str = "index";

/// What a [`Source`] is, which decides how it is processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Recreated as a directory in the output tree.
    Directory,

    /// Copied verbatim.
    Asset,

    /// A Markdown file with front matter, rendered as a post.
    Post,
}

impl SourceKind {
    /// Classifies `path`. Only files can be posts.
    pub fn classify(path: &Path, is_dir: bool) -> SourceKind {
        if is_dir {
            SourceKind::Directory
        } else if path.extension().map_or(false, |ext| ext == MARKDOWN_EXTENSION) {
            SourceKind::Post
        } else {
            SourceKind::Asset
        }
    }
}

/// A file or directory under the source root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    path: PathBuf,
    relative_path: PathBuf,
    kind: SourceKind,
    destination: PathBuf,
}

impl Source {
    /// Builds a [`Source`] for `path`, which must live under
    /// `config.source_directory`.
    pub fn new(config: &Config, path: &Path, is_dir: bool) -> Result<Source, OutsideRootError> {
        let relative_path = path
            .strip_prefix(&config.source_directory)
            .map_err(|_| OutsideRootError {
                path: path.to_owned(),
                root: config.source_directory.clone(),
            })?
            .to_owned();
        let kind = SourceKind::classify(path, is_dir);
        let destination = config
            .destination_directory
            .join(map_destination(&relative_path, kind));
        Ok(Source {
            path: path.to_owned(),
            relative_path,
            kind,
            destination,
        })
    }

    /// Builds a [`Source`] from a directory-walk entry.
    pub fn from_entry(
        config: &Config,
        entry: &walkdir::DirEntry,
    ) -> Result<Source, OutsideRootError> {
        Source::new(config, entry.path(), entry.file_type().is_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path relative to the source root, e.g. `posts/hello/index.md`.
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Where the source is written. Directories and assets keep their
    /// relative location. `dir/index.md` becomes `dir/index.html` and any
    /// other `dir/name.md` becomes `dir/name/index.html`.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// The site-relative URL of a rendered post: the destination directory
    /// with a leading and a trailing slash, e.g. `/posts/hello/`.
    pub fn relative_url(&self) -> String {
        let dir = map_destination(&self.relative_path, self.kind);
        match dir.parent() {
            Some(parent) => directory_url(parent),
            None => String::from("/"),
        }
    }
}

fn map_destination(relative_path: &Path, kind: SourceKind) -> PathBuf {
    if kind != SourceKind::Post {
        return relative_path.to_owned();
    }
    let parent = relative_path.parent().unwrap_or_else(|| Path::new(""));
    match relative_path.file_stem() {
        Some(stem) if stem != INDEX_STEM => parent.join(stem).join(INDEX_FILE),
        _ => parent.join(INDEX_FILE),
    }
}

/// Joins the normal components of `path` with `/`.
pub fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Turns a relative directory into a URL with a leading and trailing slash.
pub fn directory_url(path: &Path) -> String {
    let joined = url_path(path);
    match joined.is_empty() {
        true => String::from("/"),
        false => format!("/{}/", joined),
    }
}

/// Glob patterns matched against paths relative to the source root. A `*`
/// matches across `/`, so `.git/*` covers the whole `.git` tree.
pub struct IgnoreList {
    patterns: Vec<glob::Pattern>,
}

impl IgnoreList {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<IgnoreList, glob::PatternError> {
        Ok(IgnoreList {
            patterns: patterns
                .iter()
                .map(|p| glob::Pattern::new(p.as_ref()))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Reports whether `relative_path` matches any pattern.
    pub fn is_ignored(&self, relative_path: &Path) -> bool {
        let candidate = url_path(relative_path);
        self.patterns.iter().any(|p| p.matches(&candidate))
    }

    /// Reports whether `relative_path` or any of its ancestors is ignored.
    /// Used where entries aren't reached through a pruned directory walk.
    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        relative_path
            .ancestors()
            .filter(|a| !a.as_os_str().is_empty())
            .any(|a| self.is_ignored(a))
    }
}

/// Returned when a path doesn't live under the source root.
#[derive(Debug)]
pub struct OutsideRootError {
    path: PathBuf,
    root: PathBuf,
}

impl fmt::Display for OutsideRootError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:?} is not under the source directory {:?}",
            &self.path, &self.root
        )
    }
}

impl std::error::Error for OutsideRootError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn config() -> Config {
        Config::with_roots(
            Path::new("/home/user/source-dir"),
            Path::new("/home/user/destination-dir"),
        )
    }

    fn destination(path: &str, is_dir: bool) -> PathBuf {
        Source::new(&config(), Path::new(path), is_dir)
            .unwrap()
            .destination()
            .to_owned()
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            SourceKind::classify(Path::new("/var/log"), true),
            SourceKind::Directory
        );
        assert_eq!(
            SourceKind::classify(Path::new("/path/to/posts/post.md"), false),
            SourceKind::Post
        );
        assert_eq!(
            SourceKind::classify(Path::new("/post/to/some/image/image.png"), false),
            SourceKind::Asset
        );
    }

    #[test]
    fn test_relative_path() -> Result<(), OutsideRootError> {
        let source = Source::new(
            &config(),
            Path::new("/home/user/source-dir/posts/some-post/index.md"),
            false,
        )?;
        assert_eq!(source.relative_path(), Path::new("posts/some-post/index.md"));
        Ok(())
    }

    #[test]
    fn test_outside_root() {
        assert!(Source::new(&config(), Path::new("/etc/passwd"), false).is_err());
    }

    #[test]
    fn test_destination() {
        assert_eq!(
            destination("/home/user/source-dir/some-other-dir/", true),
            PathBuf::from("/home/user/destination-dir/some-other-dir/")
        );
        assert_eq!(
            destination("/home/user/source-dir/posts/some-post/index.md", false),
            PathBuf::from("/home/user/destination-dir/posts/some-post/index.html")
        );
        assert_eq!(
            destination("/home/user/source-dir/posts/post.md", false),
            PathBuf::from("/home/user/destination-dir/posts/post/index.html")
        );
        assert_eq!(
            destination("/home/user/source-dir/images/image.png", false),
            PathBuf::from("/home/user/destination-dir/images/image.png")
        );
    }

    #[test]
    fn test_destination_is_deterministic() {
        let path = "/home/user/source-dir/posts/post.md";
        let source = Source::new(&config(), Path::new(path), false).unwrap();
        assert_eq!(source.destination(), source.destination());
        assert_eq!(destination(path, false), destination(path, false));
    }

    #[test]
    fn test_relative_url() -> Result<(), OutsideRootError> {
        let config = config();
        let bundle = Source::new(
            &config,
            Path::new("/home/user/source-dir/posts/some-post/index.md"),
            false,
        )?;
        assert_eq!(bundle.relative_url(), "/posts/some-post/");

        let loose = Source::new(&config, Path::new("/home/user/source-dir/posts/post.md"), false)?;
        assert_eq!(loose.relative_url(), "/posts/post/");

        let root = Source::new(&config, Path::new("/home/user/source-dir/index.md"), false)?;
        assert_eq!(root.relative_url(), "/");
        Ok(())
    }

    #[test]
    fn test_relative_url_matches_destination() -> Result<(), OutsideRootError> {
        let config = config();
        for path in [
            "/home/user/source-dir/posts/some-post/index.md",
            "/home/user/source-dir/posts/post.md",
            "/home/user/source-dir/about.md",
        ] {
            let source = Source::new(&config, Path::new(path), false)?;
            let dir = source
                .destination()
                .strip_prefix(&config.destination_directory)
                .unwrap()
                .parent()
                .unwrap();
            assert_eq!(source.relative_url(), directory_url(dir));
        }
        Ok(())
    }

    #[test]
    fn test_ignore_list() -> Result<(), glob::PatternError> {
        let ignore = IgnoreList::new(crate::config::IGNORE)?;
        assert!(ignore.is_ignored(Path::new("README.md")));
        assert!(ignore.is_ignored(Path::new(".git")));
        assert!(ignore.is_ignored(Path::new(".git/objects/ab/cdef")));
        assert!(ignore.is_ignored(Path::new("drafts")));
        assert!(!ignore.is_ignored(Path::new("posts/README.md")));
        assert!(!ignore.is_ignored(Path::new("posts/hello/index.md")));
        Ok(())
    }

    #[test]
    fn test_ignore_list_excludes_descendants() -> Result<(), glob::PatternError> {
        let ignore = IgnoreList::new(&["test"])?;
        assert!(!ignore.is_ignored(Path::new("test/fixture.md")));
        assert!(ignore.is_excluded(Path::new("test/fixture.md")));
        assert!(!ignore.is_excluded(Path::new("posts/test.md")));
        Ok(())
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(IgnoreList::new(&["[unclosed"]).is_err());
    }
}
