//! Column metadata.

use std::fmt;

use crate::types::PrimitiveType;

/// Path to a leaf column, one segment per schema level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnPath(Vec<String>);

impl ColumnPath {
    pub fn new(parts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ColumnPath(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Number of segments in the path.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Exact match against `path`. Prefixes don't match.
    pub fn matches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.0.len() == path.len() && self.0.iter().zip(path).all(|(a, b)| a == b.as_ref())
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Physical type for leaf-level primitive columns.
///
/// Also includes the maximum definition and repetition levels required to
/// re-assemble nested data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// The "leaf" primitive type of this column
    primitive_type: PrimitiveType,
    /// Full path from the schema root to this column.
    path: ColumnPath,
    /// The maximum definition level for this column
    max_def_level: u16,
    /// The maximum repetition level for this column
    max_rep_level: u16,
}

impl ColumnDescriptor {
    pub fn new(
        primitive_type: PrimitiveType,
        path: ColumnPath,
        max_def_level: u16,
        max_rep_level: u16,
    ) -> Self {
        ColumnDescriptor {
            primitive_type,
            path,
            max_def_level,
            max_rep_level,
        }
    }

    pub fn primitive_type(&self) -> &PrimitiveType {
        &self.primitive_type
    }

    pub fn path(&self) -> &ColumnPath {
        &self.path
    }

    pub fn max_def_level(&self) -> u16 {
        self.max_def_level
    }

    pub fn max_rep_level(&self) -> u16 {
        self.max_rep_level
    }
}
