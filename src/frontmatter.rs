//! Splits a source file into its YAML front matter and its body, and parses
//! the front matter into a [`FrontMatter`].

use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;

const FENCE: &str = "---";

/// The metadata at the top of every Markdown source.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct FrontMatter {
    /// The title of the post.
    pub title: String,

    /// The date on which the post was first published.
    #[serde(rename = "first-published")]
    pub first_published: NaiveDate,

    /// The tags, as written by the author (not yet slugified).
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Splits `input` into `(front_matter, body)`. The first line must be a
/// `---` fence and the front matter runs until the next `---` line. The body
/// is every line after the closing fence joined with `\n`.
pub fn split(input: &str) -> Result<(String, String)> {
    let mut lines = input.lines();
    match lines.next() {
        Some(line) if line.trim() == FENCE => {}
        _ => return Err(Error::MissingStartFence),
    }

    let mut header = Vec::new();
    loop {
        match lines.next() {
            None => return Err(Error::MissingEndFence),
            Some(line) if line.trim() == FENCE => break,
            Some(line) => header.push(line),
        }
    }

    Ok((header.join("\n"), lines.collect::<Vec<_>>().join("\n")))
}

/// Parses the front matter text (without fences).
pub fn parse(header: &str) -> Result<FrontMatter> {
    Ok(serde_yaml::from_str(header)?)
}

/// Represents the result of a front-matter operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error extracting front matter from a source file.
#[derive(Debug)]
pub enum Error {
    /// Returned when the source doesn't begin with a `---` line.
    MissingStartFence,

    /// Returned when the opening `---` line has no matching closing line.
    MissingEndFence,

    /// Returned when the front matter is malformed YAML or lacks a required
    /// key (`title`, `first-published`).
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingStartFence => write!(f, "Source must begin with `---`"),
            Error::MissingEndFence => write!(f, "Missing closing `---`"),
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingStartFence => None,
            Error::MissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const FAKE_POST_TEXT: &str = "---\ntitle: Fake Post Title\nfirst-published: 2020-12-17\ntags:\n- Fake Tag 1\n- Fake Tag 2\n---\n\nThis is the post excerpt.\n\n<!-- read more -->\n\nThis is the post content.";

    #[test]
    fn test_split() -> Result<()> {
        let (header, body) = split(FAKE_POST_TEXT)?;
        assert_eq!(
            header,
            "title: Fake Post Title\nfirst-published: 2020-12-17\ntags:\n- Fake Tag 1\n- Fake Tag 2"
        );
        assert_eq!(
            body,
            "\nThis is the post excerpt.\n\n<!-- read more -->\n\nThis is the post content."
        );
        Ok(())
    }

    #[test]
    fn test_split_keeps_later_rules_in_body() -> Result<()> {
        let (_, body) = split("---\ntitle: x\n---\nabove\n\n---\n\nbelow\n")?;
        assert_eq!(body, "above\n\n---\n\nbelow");
        Ok(())
    }

    #[test]
    fn test_split_missing_fences() {
        assert!(matches!(split("title: x\n"), Err(Error::MissingStartFence)));
        assert!(matches!(split(""), Err(Error::MissingStartFence)));
        assert!(matches!(
            split("---\ntitle: x\n"),
            Err(Error::MissingEndFence)
        ));
    }

    #[test]
    fn test_parse() -> Result<()> {
        let (header, _) = split(FAKE_POST_TEXT)?;
        assert_eq!(
            parse(&header)?,
            FrontMatter {
                title: String::from("Fake Post Title"),
                first_published: NaiveDate::from_ymd_opt(2020, 12, 17).unwrap(),
                tags: vec![String::from("Fake Tag 1"), String::from("Fake Tag 2")],
            }
        );
        Ok(())
    }

    #[test]
    fn test_parse_tags_are_optional() -> Result<()> {
        let front_matter = parse("title: x\nfirst-published: 2021-01-02")?;
        assert!(front_matter.tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_requires_title_and_date() {
        let err = parse("first-published: 2021-01-02").unwrap_err();
        assert!(err.to_string().contains("title"), "{}", err);

        let err = parse("title: x").unwrap_err();
        assert!(err.to_string().contains("first-published"), "{}", err);
    }
}
