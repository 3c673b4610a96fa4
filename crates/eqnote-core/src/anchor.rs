//! Equation anchor identifiers.
//!
//! MathJax gives every tagged equation line an anchor cell whose `id` is
//! derived from the author's `\label{...}`. The renderer is configured to
//! format those ids with [`AnchorId::from_label`], and annotation
//! declarations name their targets by label, so both sides go through the
//! same normalization and always agree.

use smol_str::{SmolStr, format_smolstr};

/// DOM id of a tagged equation line's anchor cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct AnchorId(SmolStr);

impl AnchorId {
    /// Wrap an id read verbatim from the DOM.
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    /// Build the anchor id for an equation label.
    ///
    /// `%3A` (a URI-encoded colon, as left behind by some toolchains) is
    /// decoded first. Whitespace becomes `_`, anything else outside
    /// `[A-Za-z0-9_-]` becomes `-`.
    pub fn from_label(prefix: &str, label: &str) -> Self {
        let decoded = label.trim().replace("%3A", ":").replace("%3a", ":");
        let mut id = String::with_capacity(prefix.len() + decoded.len());
        id.push_str(prefix);
        for c in decoded.chars() {
            match c {
                c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => id.push(c),
                c if c.is_whitespace() => id.push('_'),
                _ => id.push('-'),
            }
        }
        Self(SmolStr::new(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AnchorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split a `;`-separated target list into labels.
///
/// Entries are trimmed and empty entries dropped, so `"a; b;"` yields
/// `["a", "b"]`.
pub fn parse_target_list(raw: &str) -> Vec<&str> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Id of the highlight element for an ordered list of targets.
///
/// This is the memoization key: the same ordered list always maps to the
/// same region, and a different order is a different region.
pub fn region_marker_id(ids: &[AnchorId]) -> SmolStr {
    let joined = ids.iter().map(AnchorId::as_str).collect::<Vec<_>>().join("-");
    format_smolstr!("div-{}", joined)
}
