//! Defines the [`Post`] type, a Markdown [`Source`] with its front matter
//! parsed and its body rendered, and the [`Error`] for loading one.

use crate::cache::SourceCache;
use crate::config::Config;
use crate::frontmatter::{self, FrontMatter};
use crate::markdown;
use crate::source::{url_path, Source, SourceKind};
use crate::tag::{is_valid_slug, slugify_all};
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

/// A blog post. Every field is derived from the source file's contents when
/// the post is loaded.
#[derive(Clone, Debug)]
pub struct Post {
    /// Where the post comes from and where it goes.
    pub source: Source,

    /// The title of the post.
    pub title: String,

    /// The date on which the post was first published.
    pub date_published: NaiveDate,

    /// The slugified tags, without repeats.
    pub tags: Vec<String>,

    /// The Markdown body, front matter excluded.
    pub text: String,

    /// The HTML of the body text before the excerpt separator, or `None`
    /// when the body has no separator.
    pub excerpt: Option<String>,

    /// The HTML of the whole body.
    pub html: String,

    /// The URL of the image next to the post source, if there is one.
    pub image: Option<String>,
}

impl Post {
    /// Loads the post at `source`, reading the file through `cache`. The
    /// error is annotated with the source path.
    pub fn load(config: &Config, source: Source, cache: &SourceCache) -> Result<Post> {
        match Self::_load(config, source.clone(), cache) {
            Ok(post) => Ok(post),
            Err(e) => Err(Error::Annotated(
                format!("loading post `{}`", source.path().display()),
                Box::new(e),
            )),
        }
    }

    fn _load(config: &Config, source: Source, cache: &SourceCache) -> Result<Post> {
        if source.kind() != SourceKind::Post {
            return Err(Error::NotMarkdown(source.path().to_owned()));
        }
        let input = cache.read(source.path())?;
        let image = find_image(config, &source);
        let mut post = Post::parse(source, &input, &config.excerpt_separator)?;
        post.image = image;
        Ok(post)
    }

    /// Parses a post from the text of its source file. `excerpt_separator`
    /// marks the end of the excerpt. Doesn't touch the filesystem, so
    /// `image` is left empty.
    pub fn parse(source: Source, input: &str, excerpt_separator: &str) -> Result<Post> {
        let (header, text) = frontmatter::split(input)?;
        let FrontMatter {
            title,
            first_published,
            tags,
        } = frontmatter::parse(&header)?;

        let tags = slugify_all(&tags);
        if let Some(invalid) = tags.iter().find(|slug| !is_valid_slug(slug)) {
            return Err(Error::InvalidTag(invalid.clone()));
        }

        Ok(Post {
            source,
            title,
            date_published: first_published,
            tags,
            excerpt: excerpt(&text, excerpt_separator),
            html: markdown::to_html(&text),
            text,
            image: None,
        })
    }

    /// The site-relative URL of the post's page.
    pub fn url(&self) -> String {
        self.source.relative_url()
    }
}

/// Renders the part of `text` before `separator` as HTML. Returns `None` if
/// `text` doesn't contain `separator`.
pub fn excerpt(text: &str, separator: &str) -> Option<String> {
    text.find(separator)
        .map(|i| markdown::to_html(&text[..i]))
}

// Looks for one of `config.post_image_files` next to the post source.
fn find_image(config: &Config, source: &Source) -> Option<String> {
    let dir = source.path().parent()?;
    config
        .post_image_files
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .and_then(|image| Source::new(config, &image, false).ok())
        .map(|image| format!("/{}", url_path(image.relative_path())))
}

/// Represents the result of a [`Post`]-load operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Post`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the front matter is missing, malformed or incomplete.
    FrontMatter(frontmatter::Error),

    /// Returned when the source isn't a Markdown file.
    NotMarkdown(PathBuf),

    /// Returned for I/O errors reading the source file.
    Io(std::io::Error),

    /// Returned when a tag can't be used as a path segment, e.g. `../x`.
    InvalidTag(String),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontMatter(err) => err.fmt(f),
            Error::NotMarkdown(path) => {
                write!(f, "not a Markdown file: {:?}", path)
            }
            Error::Io(err) => err.fmt(f),
            Error::InvalidTag(tag) => write!(f, "invalid tag: {:?}", tag),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontMatter(err) => Some(err),
            Error::NotMarkdown(_) => None,
            Error::Io(err) => Some(err),
            Error::InvalidTag(_) => None,
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<frontmatter::Error> for Error {
    fn from(err: frontmatter::Error) -> Error {
        Error::FrontMatter(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::EXCERPT_SEPARATOR;
    use std::path::Path;

    const FAKE_POST: &str = "---
title: Fake Post Title
first-published: 2020-12-17
tags:
- Fake Tag 1
- Fake Tag 2
---

This is the post excerpt.

<!-- read more -->

This is the post content.
";

    const FAKE_POST_WITHOUT_EXCERPT: &str = "---
title: Fake Post Title
first-published: 2020-12-17
tags:
- Fake Tag 1
- Fake Tag 2
---

This is the post content.";

    fn source() -> Source {
        let config = Config::with_roots(Path::new("/home/user/source-dir"), Path::new("/out"));
        Source::new(
            &config,
            Path::new("/home/user/source-dir/posts/some-post/index.md"),
            false,
        )
        .unwrap()
    }

    fn fake_post(input: &str) -> Result<Post> {
        Post::parse(source(), input, EXCERPT_SEPARATOR)
    }

    #[test]
    fn test_parse() -> Result<()> {
        let post = fake_post(FAKE_POST)?;
        assert_eq!(post.title, "Fake Post Title");
        assert_eq!(post.tags, vec!["fake-tag-1", "fake-tag-2"]);
        assert_eq!(
            post.date_published,
            NaiveDate::from_ymd_opt(2020, 12, 17).unwrap()
        );
        assert_eq!(
            post.text,
            "\nThis is the post excerpt.\n\n<!-- read more -->\n\nThis is the post content."
        );
        assert_eq!(post.url(), "/posts/some-post/");
        assert!(post.image.is_none());
        Ok(())
    }

    #[test]
    fn test_excerpt() -> Result<()> {
        let post = fake_post(FAKE_POST)?;
        assert_eq!(
            post.excerpt.as_deref(),
            Some("<p>This is the post excerpt.</p>\n")
        );
        Ok(())
    }

    #[test]
    fn test_excerpt_without_separator() -> Result<()> {
        let post = fake_post(FAKE_POST_WITHOUT_EXCERPT)?;
        assert_eq!(post.excerpt, None);
        Ok(())
    }

    #[test]
    fn test_html() -> Result<()> {
        let post = fake_post(FAKE_POST)?;
        let excerpt = post.html.find("<p>This is the post excerpt.</p>");
        let content = post.html.find("<p>This is the post content.</p>");
        assert!(excerpt.is_some() && content.is_some(), "{}", post.html);
        assert!(excerpt < content);
        assert!(post.html.contains(EXCERPT_SEPARATOR));
        Ok(())
    }

    #[test]
    fn test_missing_title() {
        let err = fake_post("---\nfirst-published: 2020-12-17\n---\nbody").unwrap_err();
        assert!(matches!(
            err,
            Error::FrontMatter(frontmatter::Error::DeserializeYaml(_))
        ));
    }

    #[test]
    fn test_tags_must_be_path_segments() {
        for tags in ["[../../escaped]", "[/etc]", "[\"\"]", "[rust, a/b]"] {
            let input = format!("---\ntitle: x\nfirst-published: 2020-12-17\ntags: {}\n---\nbody", tags);
            let err = fake_post(&input).unwrap_err();
            assert!(matches!(err, Error::InvalidTag(_)), "{}: {}", tags, err);
        }
    }

    #[test]
    fn test_load_reads_image_and_annotates_errors() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::with_roots(dir.path(), &dir.path().join("out"));
        let bundle = config.posts_directory.join("hello");
        std::fs::create_dir_all(&bundle)?;
        std::fs::write(bundle.join("index.md"), FAKE_POST)?;
        std::fs::write(bundle.join("index.png"), b"png")?;
        std::fs::write(bundle.join("broken.md"), "no front matter")?;

        let cache = SourceCache::new();
        let source = Source::new(&config, &bundle.join("index.md"), false).unwrap();
        let post = Post::load(&config, source, &cache)?;
        assert_eq!(post.image.as_deref(), Some("/posts/hello/index.png"));

        let broken = Source::new(&config, &bundle.join("broken.md"), false).unwrap();
        let err = Post::load(&config, broken, &cache).unwrap_err();
        assert!(err.to_string().contains("broken.md"), "{}", err);
        Ok(())
    }

    #[test]
    fn test_load_rejects_assets() {
        let config = Config::with_roots(Path::new("/src"), Path::new("/out"));
        let source = Source::new(&config, Path::new("/src/image.png"), false).unwrap();
        let err = Post::load(&config, source, &SourceCache::new()).unwrap_err();
        assert!(matches!(err, Error::Annotated(_, ref inner) if matches!(**inner, Error::NotMarkdown(_))));
    }
}
