// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::SQLBuilder;
use super::column::Column;
use super::dialect::{Dialect, DialectFamily, ReturningPlacement};
use super::expression_builder::ExpressionBuilder;

/// The columns or expression an insert should yield back from the inserted
/// rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Returning {
    Columns(Vec<String>),
    Raw(String),
}

/// An insert operation, fully encoded: the column list and every VALUES cell
/// have already been decided by the encoder.
#[derive(Debug)]
pub struct Insert {
    /// The table to insert into.
    pub table_name: String,
    /// The columns to insert into such as `(age, name)`. May be empty, which
    /// selects the bare-insert form.
    pub columns: Vec<String>,
    /// One encoded tuple per value set, positionally aligned with `columns`.
    pub values_seq: Vec<Vec<Column>>,
    /// The columns to return, if any.
    pub returning: Option<Returning>,
}

impl ExpressionBuilder for Insert {
    /// Build the statement in the fixed shape
    /// `INSERT INTO <table>[(<columns>)] [OUTPUT <returning>]
    /// VALUES (<row>), (<row>), ... | DEFAULT VALUES [RETURNING <returning>]`.
    fn build(&self, dialect: &dyn Dialect, builder: &mut SQLBuilder) {
        builder.push_str("INSERT INTO ");
        builder.push_identifier(dialect, &self.table_name);

        if self.columns.is_empty() {
            // Bare insert: no column is being set. MySQL's grammar requires an
            // explicit empty column list and an empty row; everyone else
            // accepts DEFAULT VALUES.
            if dialect.family() == DialectFamily::MySql {
                builder.push_str(" () VALUES ()");
            } else {
                if let (Some(returning), ReturningPlacement::AfterColumns) =
                    (&self.returning, dialect.returning_placement())
                {
                    push_output(dialect, builder, returning);
                }
                builder.push_str(" DEFAULT VALUES");
            }
        } else {
            builder.push_str(" (");
            builder.push_iter(self.columns.iter(), ", ", |builder, column| {
                builder.push_identifier(dialect, column);
            });
            builder.push(')');

            if let (Some(returning), ReturningPlacement::AfterColumns) =
                (&self.returning, dialect.returning_placement())
            {
                push_output(dialect, builder, returning);
            }

            builder.push_str(" VALUES (");
            builder.push_iter(self.values_seq.iter(), "), (", |builder, values| {
                builder.push_iter(values.iter(), ", ", |builder, value| {
                    value.build(dialect, builder);
                });
            });
            builder.push(')');
        }

        if let (Some(returning), ReturningPlacement::AfterValues) =
            (&self.returning, dialect.returning_placement())
        {
            builder.push_str(" RETURNING ");
            push_returning(dialect, builder, returning, None);
        }
    }
}

fn push_output(dialect: &dyn Dialect, builder: &mut SQLBuilder, returning: &Returning) {
    builder.push_str(" OUTPUT ");
    // SQL Server addresses just-inserted rows through the INSERTED
    // pseudo-table
    push_returning(dialect, builder, returning, Some("INSERTED."));
}

fn push_returning(
    dialect: &dyn Dialect,
    builder: &mut SQLBuilder,
    returning: &Returning,
    column_prefix: Option<&str>,
) {
    match returning {
        Returning::Columns(columns) => {
            builder.push_iter(columns.iter(), ", ", |builder, column| {
                if let Some(prefix) = column_prefix {
                    builder.push_str(prefix);
                }
                builder.push_identifier(dialect, column);
            });
        }
        Returning::Raw(expression) => builder.push_str(expression),
    }
}
