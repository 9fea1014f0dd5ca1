// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;

use crate::sql::SQLParam;

/// One candidate row to insert: column name to value, insertion-ordered. A
/// column that should take its default is simply left out of the map.
pub type ValueSet = IndexMap<String, ColumnValue>;

/// A caller-supplied value for one column. The tags make the encoder's
/// dispatch explicit; there is no runtime type sniffing.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// A plain value, bound as a parameter. An `SQLParam::Array` here still
    /// binds as one multi-element parameter.
    Scalar(SQLParam),
    /// SQL text emitted verbatim into the VALUES tuple. The caller vouches
    /// for its safety.
    Expression(String),
    /// A related record. The encoder extracts the referenced column's value
    /// from it when the target column is relational.
    SubObject(ValueSet),
}

impl ColumnValue {
    pub fn expression(text: impl Into<String>) -> Self {
        ColumnValue::Expression(text.into())
    }
}

// A blanket `impl<T: Into<SQLParam>> From<T>` would collide with the
// reflexive From impl, so the scalar conversions are spelled out.
macro_rules! scalar_from {
    ($($typ:ty),*) => {
        $(
            impl From<$typ> for ColumnValue {
                fn from(value: $typ) -> Self {
                    ColumnValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_from!(
    SQLParam,
    bool,
    i32,
    i64,
    f64,
    &str,
    String,
    uuid::Uuid,
    serde_json::Value
);

impl<T: Into<SQLParam>> From<Vec<T>> for ColumnValue {
    fn from(value: Vec<T>) -> Self {
        ColumnValue::Scalar(value.into())
    }
}

impl<T: Into<SQLParam>> From<Option<T>> for ColumnValue {
    fn from(value: Option<T>) -> Self {
        ColumnValue::Scalar(value.into())
    }
}

/// Convenience for assembling a [`ValueSet`] from pairs.
pub fn value_set<const N: usize>(pairs: [(&str, ColumnValue); N]) -> ValueSet {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect()
}
