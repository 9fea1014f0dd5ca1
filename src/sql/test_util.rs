// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![cfg(test)]

//! Test assertions to check SQL statements and their parameter tables.

/// Assert that the parameter table matches the expected `(name, value)`
/// pairs, in order.
///
/// # Usage:
/// ```no_run
/// assert_params!(actual_params, ("_inserted_0_name", SQLParam::from("a")), ...);
/// ```
macro_rules! assert_params {
    ($actual_params:expr $(, ($expected_name:expr, $expected_value:expr))*) => {
        let expected: Vec<(String, $crate::sql::SQLParam)> =
            vec![$(($expected_name.to_owned(), $expected_value)),*];
        assert_eq!($actual_params, expected, "Parameter mismatch");
    };
}

/// Assert a `(statement, params)` binding produced by
/// [`ExpressionBuilder::to_sql`](crate::sql::ExpressionBuilder::to_sql).
macro_rules! assert_binding {
    ($actual:expr, $expected_stmt:expr $(, ($expected_name:expr, $expected_value:expr))*) => {
        let (actual_stmt, actual_params) = $actual;
        assert_eq!(actual_stmt, $expected_stmt);
        assert_params!(actual_params $(, ($expected_name, $expected_value))*);
    };
}
