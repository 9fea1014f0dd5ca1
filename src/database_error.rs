// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use crate::sql::dialect::DialectFamily;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// No value set was supplied to an insert. Raised before any SQL is
    /// generated and before any I/O.
    #[error("Cannot perform insert query because values are not defined")]
    MissingValues,

    /// A returning clause was requested on a dialect that cannot express one.
    /// Raised at configuration time, not at execute time.
    #[error("{0} does not support a RETURNING or OUTPUT clause for INSERT")]
    ReturningNotSupported(DialectFamily),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Failed to execute transaction: {0}")]
    Transaction(String),

    /// Opaque driver-level error, propagated verbatim.
    #[error("{0}")]
    Delegate(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("{0} {1}")]
    WithContext(String, #[source] Box<DatabaseError>),
}

impl DatabaseError {
    pub fn with_context(self, context: String) -> DatabaseError {
        DatabaseError::WithContext(context, Box::new(self))
    }
}

pub trait WithContext {
    fn with_context(self, context: String) -> Self;
}

impl<T> WithContext for Result<T, DatabaseError> {
    fn with_context(self, context: String) -> Result<T, DatabaseError> {
        self.map_err(|e| e.with_context(context))
    }
}
