// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The core idea in this library is [InsertBuilder]: a statement descriptor
//! that declares an intention to insert logical rows into a table and leaves
//! the dialect-specific details (default-value literals, RETURNING/OUTPUT
//! placement, parameter markers, value generation) to a [Dialect]
//! implementation chosen per database family. The descriptor is transformed
//! into one concrete SQL statement with an ordered parameter table, and the
//! executor runs it against a [DatabaseConnection] inside a transaction when
//! requested, notifying listeners around the statement and rehydrating the
//! input records from returned rows.
//!
//! For example, inserting two records into a table whose primary key is
//! auto-incremented produces one multi-row VALUES statement with
//! deterministic parameter names, widened (when entity update is on and the
//! dialect supports it) with a returning clause for the generated key so that
//! the caller's records come back with their keys filled in.
//!
//! This crate also contains, but doesn't expose, the lower level primitives
//! for SQL assembly.

pub mod database_error;

#[macro_use]
mod sql;
mod asql;
mod transform;

/// Public types at the root level of this crate
pub use asql::{
    executor::InsertResult,
    insert_builder::{InsertBuilder, InsertTarget},
    listener::InsertListener,
    value::{ColumnValue, ValueSet, value_set},
};

pub use sql::{
    SQLParam,
    connect::{ConnectionManager, DatabaseConnection, QueryResponse, ResultRow},
    dialect::{Dialect, DialectFamily, MySql, Postgres, ReturningPlacement, SqlServer, Sqlite},
    insert::Returning,
    physical_column::{ColumnReference, GenerationStrategy, PhysicalColumn},
    physical_table::PhysicalTable,
};

pub use database_error::DatabaseError;
