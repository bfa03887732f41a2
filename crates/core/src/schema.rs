use serde::{Deserialize, Serialize};

/// Identifies a table for column lookups and helper queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    pub schema: String,
    pub table: String,
}

impl TableOptions {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

/// Column descriptor: name plus the type the database declares for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Kind of a node in the browse tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    /// Containers (schemas) and anything the database reports with an unknown type.
    #[default]
    None,
    Table,
    View,
}

/// Node of the schema → table/view browse tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    pub schema: String,
    #[serde(rename = "type")]
    pub kind: StructureType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Structure>,
}

impl Structure {
    /// A schema container holding `children`.
    pub fn schema(name: impl Into<String>, children: Vec<Structure>) -> Self {
        let name = name.into();
        Self {
            schema: name.clone(),
            name,
            kind: StructureType::None,
            children,
        }
    }

    /// A table or view leaf inside `schema`.
    pub fn leaf(schema: impl Into<String>, name: impl Into<String>, kind: StructureType) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&Structure> {
        self.children.iter().find(|c| c.name == name)
    }
}
