// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{SQLBuilder, SQLParam};
use super::dialect::Dialect;
use super::expression_builder::ExpressionBuilder;

/// One cell of a VALUES tuple, as decided by the column value encoder. The
/// variants encode the exact emission semantics of each kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// A bound parameter. Rendered as the dialect's placeholder; the value,
    /// which may be an `SQLParam::Array`, travels in the parameter table.
    Param { name: String, value: SQLParam },
    /// Caller-supplied SQL text, emitted verbatim, unescaped and
    /// unparameterized. Safety is the caller's responsibility.
    RawExpression(String),
    /// The dialect's "use the column default" literal.
    Default,
    /// A fixed literal, such as the `1` of a version column or a column's
    /// declared default.
    Literal(String),
    /// A null value
    Null,
}

impl ExpressionBuilder for Column {
    fn build(&self, dialect: &dyn Dialect, builder: &mut SQLBuilder) {
        match self {
            Column::Param { name, value } => {
                builder.push_param(dialect, name.clone(), value.clone())
            }
            Column::RawExpression(expr) => builder.push_str(expr),
            Column::Default => builder.push_str(dialect.default_literal()),
            Column::Literal(literal) => builder.push_str(literal),
            Column::Null => builder.push_str("NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::{Postgres, SqlServer};

    #[test]
    fn param_renders_placeholder_and_records_value() {
        let column = Column::Param {
            name: "_inserted_0_name".to_owned(),
            value: SQLParam::String("a".to_owned()),
        };

        assert_binding!(
            column.to_sql(&Postgres),
            "$1",
            ("_inserted_0_name", SQLParam::String("a".to_owned()))
        );

        assert_binding!(
            column.to_sql(&SqlServer),
            "@_inserted_0_name",
            ("_inserted_0_name", SQLParam::String("a".to_owned()))
        );
    }

    #[test]
    fn raw_expression_is_emitted_verbatim() {
        let column = Column::RawExpression("now()".to_owned());
        assert_binding!(column.to_sql(&Postgres), "now()");
    }

    #[test]
    fn default_uses_dialect_literal() {
        assert_binding!(Column::Default.to_sql(&Postgres), "DEFAULT");
        assert_binding!(Column::Null.to_sql(&Postgres), "NULL");
    }
}
