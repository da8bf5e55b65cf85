//! Compiled template representation: parsing, rendering, extraction.

use indexmap::IndexMap;

use crate::error::TemplateError;

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    /// Verbatim text between placeholders.
    Literal(String),
    /// A `{name}` placeholder.
    Placeholder(String),
}

/// A compiled placeholder template.
///
/// Parsing validates syntax only; whether every placeholder can be satisfied
/// is decided per [`render`](Template::render) call from the bindings given
/// to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    parts: Vec<Part>,
    names: Vec<String>,
}

impl Template {
    /// Parses a raw template string.
    ///
    /// The grammar is literal text interleaved with `{name}` placeholders.
    /// Placeholder names must start with a letter or underscore and continue
    /// with letters, digits, underscores or dashes.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut parts = Vec::new();
        let mut names = Vec::new();
        let mut literal = String::new();

        let mut chars = raw.char_indices();
        while let Some((position, c)) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedPlaceholder {
                            raw: raw.to_owned(),
                            position,
                        });
                    }
                    if !is_valid_name(&name) {
                        return Err(TemplateError::InvalidPlaceholderName {
                            raw: raw.to_owned(),
                            name,
                        });
                    }
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    names.push(name.clone());
                    parts.push(Part::Placeholder(name));
                }
                '}' => {
                    return Err(TemplateError::UnexpectedClose {
                        raw: raw.to_owned(),
                        position,
                    });
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_owned(),
            parts,
            names,
        })
    }

    /// Returns the raw string this template was compiled from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the placeholder names in the order they appear.
    #[must_use]
    pub fn placeholder_names(&self) -> &[String] {
        &self.names
    }

    /// Renders the template by substituting every placeholder from
    /// `bindings`.
    ///
    /// A placeholder with no bound value fails the whole render call with
    /// [`TemplateError::UnboundPlaceholder`].
    pub fn render(&self, bindings: &Bindings) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.raw.len());
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Placeholder(name) => {
                    let value =
                        bindings
                            .get(name)
                            .ok_or_else(|| TemplateError::UnboundPlaceholder {
                                name: name.clone(),
                            })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    /// Matches `input` against the template and captures placeholder values.
    ///
    /// Literal parts must appear verbatim; each placeholder captures the text
    /// up to the next literal anchor, or the rest of the input when it is the
    /// final part. Returns `None` when the input does not fit the template.
    #[must_use]
    pub fn extract(&self, input: &str) -> Option<Bindings> {
        let mut bindings = Bindings::new();
        let mut rest = input;
        let mut index = 0;

        while index < self.parts.len() {
            match &self.parts[index] {
                Part::Literal(text) => {
                    rest = rest.strip_prefix(text.as_str())?;
                    index += 1;
                }
                Part::Placeholder(name) => match self.parts.get(index + 1) {
                    Some(Part::Literal(anchor)) => {
                        let at = rest.find(anchor.as_str())?;
                        bindings.insert(name, &rest[..at]);
                        rest = &rest[at + anchor.len()..];
                        index += 2;
                    }
                    Some(Part::Placeholder(_)) => {
                        // Adjacent placeholders have no anchor between them;
                        // the earlier one captures nothing.
                        bindings.insert(name, "");
                        index += 1;
                    }
                    None => {
                        bindings.insert(name, rest);
                        rest = "";
                        index += 1;
                    }
                },
            }
        }

        if rest.is_empty() {
            Some(bindings)
        } else {
            None
        }
    }
}

/// Returns true for a valid placeholder identifier.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Name-to-value bindings consumed by [`Template::render`] and produced by
/// [`Template::extract`].
///
/// Preserves insertion order so captured values line up with
/// [`Template::placeholder_names`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    inner: IndexMap<String, String>,
}

impl Bindings {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any previous binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(name.into(), value.into());
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Returns true if no names are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
