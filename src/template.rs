//! Templating. The build driver only sees the [`Render`] trait: render the
//! template named [`TemplateName`] with a [`Value`] context. [`Templates`]
//! implements it with `gtmpl` template files.

use gtmpl::{Context, Template, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// The templates a site is rendered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateName {
    /// A single post page.
    Post,

    /// A paginated index page.
    Page,

    /// The page listing the posts of one tag.
    Tag,

    /// The page listing all tags.
    Tags,

    /// A feed document.
    Feed,

    /// The page listing all feeds.
    Feeds,
}

impl TemplateName {
    /// The template's file name within the templates directory.
    pub fn file_name(self) -> &'static str {
        match self {
            TemplateName::Post => "post.html",
            TemplateName::Page => "page.html",
            TemplateName::Tag => "tag.html",
            TemplateName::Tags => "tags.html",
            TemplateName::Feed => "feed.xml",
            TemplateName::Feeds => "feeds.html",
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Renders a named template with a context.
pub trait Render {
    fn render(&self, name: TemplateName, context: Value) -> Result<String>;
}

/// `gtmpl` templates loaded from a directory. Each template is parsed on
/// first use and kept for the lifetime of the [`Templates`].
pub struct Templates {
    directory: PathBuf,
    parsed: RefCell<HashMap<TemplateName, Rc<Template>>>,
}

impl Templates {
    pub fn new(directory: &Path) -> Templates {
        Templates {
            directory: directory.to_owned(),
            parsed: RefCell::new(HashMap::new()),
        }
    }

    fn load(&self, name: TemplateName) -> Result<Rc<Template>> {
        if let Some(template) = self.parsed.borrow().get(&name) {
            return Ok(Rc::clone(template));
        }

        let template = Rc::new(parse_template(&self.directory.join(name.file_name()))?);
        tracing::debug!(template = %name, "parsed template");
        self.parsed.borrow_mut().insert(name, Rc::clone(&template));
        Ok(template)
    }
}

impl Render for Templates {
    fn render(&self, name: TemplateName, context: Value) -> Result<String> {
        let template = self.load(name)?;
        let context = Context::from(context).map_err(|e| Error::Execute(name, e))?;
        let mut out: Vec<u8> = Vec::new();
        template
            .execute(&mut out, &context)
            .map_err(|e| Error::Execute(name, e))?;
        String::from_utf8(out).map_err(|e| Error::Execute(name, e.to_string()))
    }
}

// Loads the template file contents and parses them into a template.
fn parse_template(path: &Path) -> Result<Template> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::OpenTemplateFile {
        path: path.to_owned(),
        err: e,
    })?;

    let mut template = Template::default();
    template.add_func("xml", xml);
    template
        .parse(contents)
        .map_err(|e| Error::ParseTemplate {
            path: path.to_owned(),
            err: e,
        })?;
    Ok(template)
}

/// The `xml` template function: `{{xml .title}}` prints its argument with
/// `&`, `<`, `>`, `"` and `'` replaced by entities, so it is safe in XML and
/// HTML text and attribute values. Nil prints as the empty string.
fn xml(args: &[Value]) -> std::result::Result<Value, String> {
    let text = match args {
        [Value::String(s)] => escape_xml(s),
        [Value::Nil] | [Value::NoValue] => String::new(),
        [other] => escape_xml(&other.to_string()),
        _ => return Err(String::from("xml requires one argument")),
    };
    Ok(Value::String(text))
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// The result of a fallible templating operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or executing a template.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate { path: PathBuf, err: String },

    /// Returned for errors executing a template.
    Execute(TemplateName, String),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file '{}': {}", path.display(), err)
            }
            Error::Execute(name, err) => {
                write!(f, "Rendering template '{}': {}", name, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::Execute(..) => None,
        }
    }
}
