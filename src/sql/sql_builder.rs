// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::SQLParam;
use super::dialect::Dialect;

/// Accumulator for one SQL statement.
///
/// Parameters are kept as an ordered `(name, value)` table. The ordinal of a
/// parameter is its 1-based position in that table, which is what positional
/// dialects (`$n`, `?`) use; named dialects (`@name`) use the name.
pub struct SQLBuilder {
    /// The SQL being built, with placeholders for each parameter
    sql: String,
    /// The ordered parameter table
    params: Vec<(String, SQLParam)>,
}

impl SQLBuilder {
    pub fn new() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a string
    pub fn push_str<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push_str(s.as_ref());
    }

    /// Push a character
    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Push an identifier (table or column name), quoted the way the dialect
    /// quotes identifiers.
    pub fn push_identifier<T: AsRef<str>>(&mut self, dialect: &dyn Dialect, s: T) {
        self.sql.push_str(&dialect.quote_identifier(s.as_ref()));
    }

    /// Push a parameter: append it to the parameter table and emit the
    /// dialect's placeholder for it.
    pub fn push_param(&mut self, dialect: &dyn Dialect, name: String, value: SQLParam) {
        let placeholder = dialect.placeholder(&name, self.params.len() + 1);
        self.params.push((name, value));
        self.sql.push_str(&placeholder);
    }

    /// Push elements of an iterator, separated by `sep`.
    pub fn push_iter<T>(
        &mut self,
        iter: impl ExactSizeIterator<Item = T>,
        sep: &str,
        push_elem: impl Fn(&mut Self, T),
    ) {
        let len = iter.len();
        for (i, item) in iter.enumerate() {
            push_elem(self, item);

            if i < len - 1 {
                self.sql.push_str(sep);
            }
        }
    }

    /// Get the SQL string and the parameter table. This is the final step in
    /// building a statement, and thus consumes `self`.
    pub fn into_sql(self) -> (String, Vec<(String, SQLParam)>) {
        (self.sql, self.params)
    }
}

impl Default for SQLBuilder {
    fn default() -> Self {
        Self::new()
    }
}
