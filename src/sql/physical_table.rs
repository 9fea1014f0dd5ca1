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
use super::physical_column::PhysicalColumn;

/// A physical table along with its ordered column metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhysicalTable {
    /// The name of the table
    pub name: String,
    /// The columns of the table, in declaration order
    pub columns: Vec<PhysicalColumn>,
}

impl PhysicalTable {
    pub fn new(name: impl Into<String>, columns: Vec<PhysicalColumn>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn get_column(&self, name: &str) -> Option<&PhysicalColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// The columns that receive values on insert when the caller supplies no
    /// explicit column list: every column except auto-increment ones, whose
    /// values are never client-supplied.
    pub fn insertable_columns(&self) -> Vec<&PhysicalColumn> {
        self.columns
            .iter()
            .filter(|column| !column.is_auto_increment())
            .collect()
    }
}

impl ExpressionBuilder for PhysicalTable {
    fn build(&self, dialect: &dyn Dialect, builder: &mut SQLBuilder) {
        builder.push_identifier(dialect, &self.name)
    }
}
