// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use super::{SQLBuilder, dialect::Dialect, expression_builder::ExpressionBuilder};

/// How a column's value is produced when the caller does not supply one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenerationStrategy {
    #[default]
    None,
    /// Server-side auto-increment (serial, identity). Never client-supplied.
    Increment,
    /// UUID primary key. Generated server-side when the dialect can, else
    /// synthesized client-side and bound as a parameter.
    Uuid,
}

/// A column in a physical table
#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Clone)]
pub struct PhysicalColumn {
    /// The database-level name of the column
    pub name: String,
    pub generation: GenerationStrategy,
    /// Optimistic-lock version column; newly inserted rows always start at 1
    pub is_version: bool,
    /// Declared default, as a SQL literal
    pub default_value: Option<String>,
    /// For relation columns, the column on the referenced table whose value
    /// is extracted from a sub-object
    pub reference: Option<ColumnReference>,
}

/// Link from a relation column to the column it references.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone)]
pub struct ColumnReference {
    pub table: String,
    pub column: String,
}

impl PhysicalColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generation: GenerationStrategy::None,
            is_version: false,
            default_value: None,
            reference: None,
        }
    }

    pub fn is_auto_increment(&self) -> bool {
        self.generation == GenerationStrategy::Increment
    }

    /// Will the database produce a value for this column when none is bound?
    pub fn is_generated(&self) -> bool {
        self.generation != GenerationStrategy::None
    }
}

/// The derived Debug output obscures the useful information behind every
/// field; only the column name matters when an operation is logged.
impl std::fmt::Debug for PhysicalColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!("Column: {}", &self.name))
    }
}

impl ExpressionBuilder for PhysicalColumn {
    fn build(&self, dialect: &dyn Dialect, builder: &mut SQLBuilder) {
        builder.push_identifier(dialect, &self.name)
    }
}
