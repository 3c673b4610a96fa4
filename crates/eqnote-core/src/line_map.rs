//! Equation-to-lines mapping.
//!
//! MathJax lays out a multi-line display as a table of rows, and only the
//! row that carries the equation number is labeled. An equation therefore
//! spans the run of rows ending at its labeled row:
//!
//! ```text
//! row 0  a = b        (1)   -> equation 0: [0]
//! row 1  c = d
//! row 2    + e        (2)   -> equation 1: [1, 2]
//! row 3  f = g        (3)   -> equation 2: [3]
//! ```
//!
//! Rows after the last label still form a group so that every row belongs
//! to exactly one equation; that case is reported as a [`StructuralAnomaly`].

use std::ops::Range;

use crate::anchor::AnchorId;

/// Rows after the last labeled row were grouped without a label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralAnomaly {
    /// Indices of the unlabeled trailing rows.
    pub trailing_lines: Range<usize>,
}

impl std::fmt::Display for StructuralAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "equation lines {}..{} are not terminated by a numbered line",
            self.trailing_lines.start, self.trailing_lines.end
        )
    }
}

/// Ordered equation groups of one equation block.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct EquationLineMap {
    groups: Vec<Vec<usize>>,
    num_lines: usize,
    anomaly: Option<StructuralAnomaly>,
}

impl EquationLineMap {
    /// Group lines given, for each line in order, whether it is labeled.
    pub fn from_labels(labels: impl IntoIterator<Item = bool>) -> Self {
        let mut groups = Vec::new();
        let mut current = Vec::new();
        let mut num_lines = 0;

        for (line_idx, labeled) in labels.into_iter().enumerate() {
            num_lines = line_idx + 1;
            current.push(line_idx);
            if labeled {
                groups.push(std::mem::take(&mut current));
            }
        }

        let anomaly = match (current.first(), current.last()) {
            (Some(&start), Some(&end)) => {
                let anomaly = StructuralAnomaly {
                    trailing_lines: start..end + 1,
                };
                tracing::warn!(%anomaly, "equations should all be numbered but this one isn't");
                groups.push(current);
                Some(anomaly)
            }
            _ => None,
        };

        Self {
            groups,
            num_lines,
            anomaly,
        }
    }

    /// Map for a single unlabeled equation with no table structure.
    pub fn single_line() -> Self {
        Self {
            groups: vec![vec![0]],
            num_lines: 1,
            anomaly: None,
        }
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn group(&self, idx: usize) -> Option<&[usize]> {
        self.groups.get(idx).map(Vec::as_slice)
    }

    pub fn num_lines(&self) -> usize {
        self.num_lines
    }

    pub fn num_equations(&self) -> usize {
        self.groups.len()
    }

    pub fn anomaly(&self) -> Option<&StructuralAnomaly> {
        self.anomaly.as_ref()
    }
}

/// Anchor ids paired with their equation groups, in document order.
///
/// The i-th labeled row closes the i-th group, so the i-th anchor id names
/// the i-th group.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AnchorIndex {
    ids: Vec<AnchorId>,
}

impl AnchorIndex {
    pub fn new(ids: Vec<AnchorId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[AnchorId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn position(&self, id: &AnchorId) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Line indices of the equation tagged with `id`.
    pub fn lines_for<'m>(&self, map: &'m EquationLineMap, id: &AnchorId) -> Option<&'m [usize]> {
        self.position(id).and_then(|idx| map.group(idx))
    }

    /// `(id, lines)` pairs in document order.
    pub fn entries<'a>(
        &'a self,
        map: &'a EquationLineMap,
    ) -> impl Iterator<Item = (&'a AnchorId, &'a [usize])> + 'a {
        self.ids
            .iter()
            .enumerate()
            .filter_map(|(idx, id)| map.group(idx).map(|lines| (id, lines)))
    }
}
