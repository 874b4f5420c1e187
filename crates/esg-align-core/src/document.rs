//! Documents under analysis and the framework selection applied to them.
//!
//! A [`Document`] is an ordered list of passages (pages or paragraphs). Every
//! passage is trimmed, has internal line breaks collapsed to spaces, and is
//! non-empty. A document always holds at least one passage.

use serde::Serialize;

use crate::error::InvalidInput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    passages: Vec<String>,
}

impl Document {
    /// Build a document from raw passage strings, normalising each one and
    /// dropping those that end up empty.
    pub fn new<I, S>(passages: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let passages: Vec<String> = passages
            .into_iter()
            .filter_map(|p| normalize_passage(p.as_ref()))
            .collect();
        if passages.is_empty() {
            return Err(InvalidInput::EmptyDocument);
        }
        Ok(Self { passages })
    }

    /// One passage per extracted page.
    pub fn from_pages<I, S>(pages: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(pages)
    }

    /// Split pasted text into paragraphs on blank-line boundaries.
    pub fn from_pasted_text(text: &str) -> Result<Self, InvalidInput> {
        let text = text.replace("\r\n", "\n");
        Self::new(text.split("\n\n"))
    }

    pub fn passages(&self) -> &[String] {
        &self.passages
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Always false: construction rejects empty documents.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

fn normalize_passage(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.replace(['\r', '\n'], " "))
}

/// Ordered, de-duplicated set of framework names chosen by the caller.
///
/// Order is the caller's order; a repeated name keeps its first position.
/// Names are not checked against a corpus here: analysis skips names the
/// corpus does not know.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameworkSelection {
    names: Vec<String>,
}

impl FrameworkSelection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            let name = name.trim();
            if !name.is_empty() && !out.iter().any(|n| n == name) {
                out.push(name.to_string());
            }
        }
        Self { names: out }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl<S: Into<String>> FromIterator<S> for FrameworkSelection {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
