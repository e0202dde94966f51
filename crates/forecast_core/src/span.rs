use serde::{Deserialize, Serialize};

use crate::{ErrorKind, ExtractError};

/// Which occurrence of the end anchor closes the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Policy {
    /// First occurrence of the end anchor anywhere in the document.
    #[default]
    FirstFirst,
    /// Last occurrence of the end anchor in the whole document.
    FirstLast,
}

/// Two literal anchors bracketing a value in the page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPair {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub policy: Policy,
}

impl MarkerPair {
    pub fn new(start: impl Into<String>, end: impl Into<String>, policy: Policy) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            policy,
        }
    }
}

/// Byte range strictly between the two anchors. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn slice<'a>(&self, doc: &'a str) -> &'a str {
        &doc[self.start..self.end]
    }
}

/// Locate the text between `pair.start` and `pair.end`.
///
/// The end anchor is searched in the whole document, not only after the start
/// anchor, so an end anchor that precedes the start anchor yields
/// [`ErrorKind::MarkerOrderInvalid`].
pub fn find_span(doc: &str, pair: &MarkerPair) -> Result<Span, ExtractError> {
    let start = find_anchor(doc, &pair.start)
        .map(|idx| idx + pair.start.len())
        .ok_or_else(|| {
            ExtractError::new(
                ErrorKind::MarkerNotFound,
                format!("start anchor {:?} not found", pair.start),
            )
        })?;

    let end = match pair.policy {
        Policy::FirstFirst => find_anchor(doc, &pair.end),
        Policy::FirstLast => rfind_anchor(doc, &pair.end),
    }
    .ok_or_else(|| {
        ExtractError::new(
            ErrorKind::MarkerNotFound,
            format!("end anchor {:?} not found", pair.end),
        )
    })?;

    if start >= end {
        return Err(ExtractError::new(
            ErrorKind::MarkerOrderInvalid,
            format!("span start {start} is not before end {end}"),
        ));
    }

    Ok(Span { start, end })
}

// An empty anchor would match everywhere; treat it as absent.
fn find_anchor(doc: &str, anchor: &str) -> Option<usize> {
    if anchor.is_empty() {
        return None;
    }
    doc.find(anchor)
}

fn rfind_anchor(doc: &str, anchor: &str) -> Option<usize> {
    if anchor.is_empty() {
        return None;
    }
    doc.rfind(anchor)
}
