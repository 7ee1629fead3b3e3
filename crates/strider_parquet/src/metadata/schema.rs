use super::column::{ColumnDescriptor, ColumnPath};
use crate::types::{ParquetType, Repetition};

/// Schema of a parquet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Fields in the schema.
    pub fields: Vec<ParquetType>,
}

impl Schema {
    pub fn new(fields: impl IntoIterator<Item = ParquetType>) -> Self {
        Schema {
            fields: fields.into_iter().collect(),
        }
    }

    /// Resolve `path` to the leaf column it names.
    ///
    /// Returns `None` if the path doesn't exist or stops at a group.
    pub fn column<S: AsRef<str>>(&self, path: &[S]) -> Option<ColumnDescriptor> {
        let mut fields = &self.fields;
        let mut max_def_level = 0;
        let mut max_rep_level = 0;

        let (last, parents) = path.split_last()?;

        for part in parents {
            let field = fields.iter().find(|f| f.name() == part.as_ref())?;
            (max_def_level, max_rep_level) =
                add_levels(field.repetition(), max_def_level, max_rep_level);

            match field {
                ParquetType::Group(group) => fields = &group.fields,
                ParquetType::Primitive(_) => return None,
            }
        }

        match fields.iter().find(|f| f.name() == last.as_ref())? {
            ParquetType::Primitive(prim) => {
                (max_def_level, max_rep_level) =
                    add_levels(prim.info.repetition, max_def_level, max_rep_level);

                Some(ColumnDescriptor::new(
                    prim.clone(),
                    ColumnPath::new(path.iter().map(|p| p.as_ref())),
                    max_def_level,
                    max_rep_level,
                ))
            }
            ParquetType::Group(_) => None,
        }
    }

    /// All leaf columns in depth-first order.
    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        collect_leaves(&self.fields, &mut path, 0, 0, &mut out);
        out
    }
}

fn add_levels(repetition: Repetition, def: u16, rep: u16) -> (u16, u16) {
    match repetition {
        Repetition::Required => (def, rep),
        Repetition::Optional => (def + 1, rep),
        Repetition::Repeated => (def + 1, rep + 1),
    }
}

fn collect_leaves(
    fields: &[ParquetType],
    path: &mut Vec<String>,
    def: u16,
    rep: u16,
    out: &mut Vec<ColumnDescriptor>,
) {
    for field in fields {
        let (def, rep) = add_levels(field.repetition(), def, rep);
        path.push(field.name().to_string());

        match field {
            ParquetType::Primitive(prim) => out.push(ColumnDescriptor::new(
                prim.clone(),
                ColumnPath::new(path.iter().cloned()),
                def,
                rep,
            )),
            ParquetType::Group(group) => collect_leaves(&group.fields, path, def, rep, out),
        }

        path.pop();
    }
}
