// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

#[macro_use]
#[cfg(test)]
mod test_util;

pub mod column;
pub mod connect;
pub mod dialect;
pub(crate) mod expression_builder;
pub(crate) mod insert;
pub mod physical_column;
pub mod physical_table;
pub(crate) mod sql_builder;

pub use expression_builder::ExpressionBuilder;
pub use sql_builder::SQLBuilder;

/// A value bound to a statement parameter. The concrete tags let each dialect
/// driver encode the value on its own wire format without the core knowing
/// anything about the driver.
///
/// `Array` is deliberately a wrapper rather than a plain `Vec` flattened into
/// individual parameters: an array-valued parameter occupies a single
/// placeholder and must reach the driver as one multi-element value.
#[derive(Debug, Clone, PartialEq)]
pub enum SQLParam {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Uuid(uuid::Uuid),
    Json(serde_json::Value),
    Bytes(bytes::Bytes),
    Array(Vec<SQLParam>),
    Null,
}

impl SQLParam {
    pub fn is_array(&self) -> bool {
        matches!(self, SQLParam::Array(_))
    }
}

impl Display for SQLParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SQLParam::Bool(v) => write!(f, "{v}"),
            SQLParam::Int(v) => write!(f, "{v}"),
            SQLParam::Float(v) => write!(f, "{v}"),
            SQLParam::String(v) => write!(f, "{v}"),
            SQLParam::Uuid(v) => write!(f, "{v}"),
            SQLParam::Json(v) => write!(f, "{v}"),
            SQLParam::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            SQLParam::Array(v) => {
                write!(f, "[")?;
                for (i, elem) in v.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, "]")
            }
            SQLParam::Null => write!(f, "NULL"),
        }
    }
}

impl From<bool> for SQLParam {
    fn from(value: bool) -> Self {
        SQLParam::Bool(value)
    }
}

impl From<i32> for SQLParam {
    fn from(value: i32) -> Self {
        SQLParam::Int(value as i64)
    }
}

impl From<i64> for SQLParam {
    fn from(value: i64) -> Self {
        SQLParam::Int(value)
    }
}

impl From<f64> for SQLParam {
    fn from(value: f64) -> Self {
        SQLParam::Float(value)
    }
}

impl From<&str> for SQLParam {
    fn from(value: &str) -> Self {
        SQLParam::String(value.to_owned())
    }
}

impl From<String> for SQLParam {
    fn from(value: String) -> Self {
        SQLParam::String(value)
    }
}

impl From<uuid::Uuid> for SQLParam {
    fn from(value: uuid::Uuid) -> Self {
        SQLParam::Uuid(value)
    }
}

impl From<serde_json::Value> for SQLParam {
    fn from(value: serde_json::Value) -> Self {
        SQLParam::Json(value)
    }
}

impl<T: Into<SQLParam>> From<Option<T>> for SQLParam {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => SQLParam::Null,
        }
    }
}

impl<T: Into<SQLParam>> From<Vec<T>> for SQLParam {
    fn from(value: Vec<T>) -> Self {
        SQLParam::Array(value.into_iter().map(Into::into).collect())
    }
}
