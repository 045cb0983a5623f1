//! Conversions from the model types into template [`Value`]s.

use crate::post::Post;
use crate::tag::Tag;
use gtmpl::Value;
use std::collections::HashMap;

/// Builds a [`Value::Object`] from `(key, value)` pairs.
pub fn object<I>(fields: I) -> Value
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect::<HashMap<String, Value>>(),
    )
}

pub fn string<S: Into<String>>(s: S) -> Value {
    Value::String(s.into())
}

/// Converts `Some` to its value and `None` to [`Value::Nil`], so templates
/// can test the field with `{{if}}`.
pub fn optional<T: Into<Value>>(opt: Option<T>) -> Value {
    match opt {
        Some(v) => v.into(),
        None => Value::Nil,
    }
}

pub fn number(n: usize) -> Value {
    Value::from(n as u64)
}

pub fn array<T, F>(items: &[T], f: F) -> Value
where
    F: Fn(&T) -> Value,
{
    Value::Array(items.iter().map(f).collect())
}

impl From<&Tag> for Value {
    /// Converts [`Tag`]s into [`Value`]s with fields `name`, `url` and
    /// `feed_url`.
    fn from(t: &Tag) -> Value {
        object([
            ("name", string(&t.name)),
            ("url", string(&t.url)),
            ("feed_url", string(&t.feed_url)),
        ])
    }
}

/// A tag with the number of posts carrying it, for tag listings.
pub fn counted_tag(tag: &Tag, count: usize) -> Value {
    let mut value = Value::from(tag);
    if let Value::Object(fields) = &mut value {
        fields.insert("count".to_owned(), number(count));
    }
    value
}

impl From<&Post> for Value {
    /// Converts a [`Post`] into a [`Value::Object`] with fields `title`,
    /// `date_published`, `url`, `content`, `excerpt`, `image` and `tags`.
    fn from(p: &Post) -> Value {
        let tags: Vec<Tag> = p.tags.iter().map(|t| Tag::new(t)).collect();
        object([
            ("title", string(&p.title)),
            (
                "date_published",
                string(p.date_published.format("%Y-%m-%d").to_string()),
            ),
            ("url", string(p.url())),
            ("content", string(&p.html)),
            ("excerpt", optional(p.excerpt.clone())),
            ("image", optional(p.image.clone())),
            ("tags", array(&tags, |t| Value::from(t))),
        ])
    }
}

/// Reads the field `key` of a [`Value::Object`]. Used by tests to inspect
/// rendered contexts.
#[cfg(test)]
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(fields) => fields.get(key),
        _ => None,
    }
}

/// Reads the string field `key` of a [`Value::Object`].
#[cfg(test)]
pub fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    match field(value, key) {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

/// Reads the array field `key` of a [`Value::Object`].
#[cfg(test)]
pub fn items<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    match field(value, key) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tag_value() {
        let value = counted_tag(&Tag::new("rust"), 3);
        assert_eq!(text(&value, "name"), Some("rust"));
        assert_eq!(text(&value, "url"), Some("/tags/rust/"));
        assert_eq!(text(&value, "feed_url"), Some("/feeds/rust.xml"));
        assert!(matches!(field(&value, "count"), Some(Value::Number(_))));
    }

    #[test]
    fn test_optional() {
        assert!(matches!(optional::<String>(None), Value::Nil));
        assert!(matches!(optional(Some(String::from("x"))), Value::String(ref s) if s == "x"));
    }
}
