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

/// A trait for types that can build themselves into an SQL expression.
///
/// Each constituent of an INSERT statement (table, column fragment, the
/// statement itself) implements this trait, which can then be used to
/// hierarchically build an SQL string and the ordered list of parameters to
/// be supplied with it. The dialect is threaded through so that fragments can
/// ask for placeholders, identifier quoting, and default literals.
pub trait ExpressionBuilder {
    /// Build the SQL expression into the given SQL builder
    fn build(&self, dialect: &dyn Dialect, builder: &mut SQLBuilder);

    /// Build the SQL expression into a string and the parameter table. Useful
    /// for testing/debugging, where we want to assert on the generated SQL
    /// without setting up a builder by hand.
    fn to_sql(&self, dialect: &dyn Dialect) -> (String, Vec<(String, SQLParam)>)
    where
        Self: Sized,
    {
        let mut builder = SQLBuilder::new();
        self.build(dialect, &mut builder);
        builder.into_sql()
    }
}

impl<T> ExpressionBuilder for Box<T>
where
    T: ExpressionBuilder,
{
    fn build(&self, dialect: &dyn Dialect, builder: &mut SQLBuilder) {
        self.as_ref().build(dialect, builder)
    }
}

impl<T> ExpressionBuilder for &T
where
    T: ExpressionBuilder,
{
    fn build(&self, dialect: &dyn Dialect, builder: &mut SQLBuilder) {
        (**self).build(dialect, builder)
    }
}
