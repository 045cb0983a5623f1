//! Builds the template contexts for feeds: the site feed, one feed per tag,
//! and the page listing them. Feeds need absolute links, so every URL is
//! resolved against the site URL.

use crate::layout::absolute_url;
use crate::post::Post;
use crate::tag::Tag;
use crate::value::{array, object, optional, string};
use chrono::{NaiveDate, TimeZone, Utc};
use gtmpl::Value;
use std::fmt;
use url::{ParseError, Url};

/// Bundled configuration for one feed.
pub struct FeedConfig<'a> {
    /// The feed's title.
    pub title: String,

    /// The site's absolute base URL.
    pub site_url: &'a Url,

    /// The site-relative URL of the page the feed stands for.
    pub link: String,

    /// The site-relative URL of the feed document itself.
    pub feed_url: String,

    /// The tag the feed is restricted to, if any.
    pub tag: Option<&'a Tag>,
}

/// Builds the `feed` template context for `posts`, which must already be
/// sorted and truncated.
pub fn feed(config: &FeedConfig, posts: &[&Post]) -> Result<Value> {
    let items = posts
        .iter()
        .map(|post| feed_item(config.site_url, post))
        .collect::<Result<Vec<Value>>>()?;

    Ok(object([
        ("title", string(config.title.as_str())),
        (
            "link",
            string(absolute_url(config.site_url, &config.link)?.to_string()),
        ),
        (
            "feed_url",
            string(absolute_url(config.site_url, &config.feed_url)?.to_string()),
        ),
        (
            "updated",
            optional(posts.first().and_then(|p| rfc2822(p.date_published))),
        ),
        ("tag", optional(config.tag.map(Value::from))),
        ("posts", Value::Array(items)),
    ]))
}

// A post value with the absolute `link` and the RFC 2822 `pub_date` that
// feed readers expect.
fn feed_item(site_url: &Url, post: &Post) -> Result<Value> {
    let mut value = Value::from(post);
    if let Value::Object(fields) = &mut value {
        fields.insert(
            "link".to_owned(),
            string(absolute_url(site_url, &post.url())?.to_string()),
        );
        fields.insert(
            "pub_date".to_owned(),
            optional(rfc2822(post.date_published)),
        );
    }
    Ok(value)
}

/// A listing entry for the `feeds` template.
pub struct FeedLink {
    pub name: String,
    pub url: String,
}

/// Builds the `feeds` template context.
pub fn feeds(title: &str, links: &[FeedLink]) -> Value {
    object([
        ("title", string(title)),
        (
            "feeds",
            array(links, |link| {
                object([
                    ("name", string(link.name.as_str())),
                    ("url", string(link.url.as_str())),
                ])
            }),
        ),
    ])
}

/// Midnight UTC on `date`, formatted per RFC 2822.
pub fn rfc2822(date: NaiveDate) -> Option<String> {
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| Utc.from_utc_datetime(&midnight).to_rfc2822())
}

/// The result of a fallible feed operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed.
#[derive(Debug)]
pub enum Error {
    /// Returned when a feed link can't be resolved against the site URL.
    UrlParse(ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UrlParse(err) => write!(f, "Resolving feed link: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::source::Source;
    use crate::value::{field, items, text};
    use std::path::Path;

    fn post(relative: &str, date: &str) -> Post {
        let config = Config::with_roots(Path::new("/src"), Path::new("/out"));
        let source = Source::new(&config, &Path::new("/src").join(relative), false).unwrap();
        let input = format!(
            "---\ntitle: {}\nfirst-published: {}\ntags: [Rust]\n---\nIntro\n\n<!-- read more -->\n\nRest",
            relative, date
        );
        Post::parse(source, &input, crate::config::EXCERPT_SEPARATOR).unwrap()
    }

    #[test]
    fn test_rfc2822() {
        let date = NaiveDate::from_ymd_opt(2020, 12, 17).unwrap();
        assert_eq!(
            rfc2822(date).as_deref(),
            Some("Thu, 17 Dec 2020 00:00:00 +0000")
        );
    }

    #[test]
    fn test_feed() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let site_url = Url::parse("https://example.org/blog/")?;
        let newer = post("posts/newer/index.md", "2021-03-14");
        let older = post("posts/older/index.md", "2020-12-17");
        let tag = Tag::new("rust");
        let config = FeedConfig {
            title: String::from("Website - rust"),
            site_url: &site_url,
            link: tag.url.clone(),
            feed_url: tag.feed_url.clone(),
            tag: Some(&tag),
        };

        let value = feed(&config, &[&newer, &older])?;
        assert_eq!(text(&value, "link"), Some("https://example.org/blog/tags/rust/"));
        assert_eq!(
            text(&value, "feed_url"),
            Some("https://example.org/blog/feeds/rust.xml")
        );
        assert_eq!(text(&value, "updated"), Some("Sun, 14 Mar 2021 00:00:00 +0000"));
        assert!(field(&value, "tag").is_some());

        let posts = items(&value, "posts");
        assert_eq!(posts.len(), 2);
        assert_eq!(
            text(&posts[0], "link"),
            Some("https://example.org/blog/posts/newer/")
        );
        assert_eq!(text(&posts[1], "pub_date"), Some("Thu, 17 Dec 2020 00:00:00 +0000"));
        assert_eq!(text(&posts[1], "excerpt"), Some("<p>Intro</p>\n"));
        Ok(())
    }

    #[test]
    fn test_empty_feed() -> Result<()> {
        let site_url = Url::parse("https://example.org/").unwrap();
        let config = FeedConfig {
            title: String::from("Website"),
            site_url: &site_url,
            link: String::from("/"),
            feed_url: String::from("/feeds/feed.xml"),
            tag: None,
        };
        let value = feed(&config, &[])?;
        assert!(matches!(field(&value, "updated"), Some(Value::Nil)));
        assert!(matches!(field(&value, "tag"), Some(Value::Nil)));
        assert!(items(&value, "posts").is_empty());
        Ok(())
    }

    #[test]
    fn test_feeds() {
        let value = feeds(
            "Feeds",
            &[FeedLink {
                name: String::from("Website"),
                url: String::from("/feeds/feed.xml"),
            }],
        );
        let links = items(&value, "feeds");
        assert_eq!(links.len(), 1);
        assert_eq!(text(&links[0], "url"), Some("/feeds/feed.xml"));
    }
}
