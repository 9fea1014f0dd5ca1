// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use uuid::Uuid;

use crate::database_error::DatabaseError;
use crate::sql::SQLParam;
use crate::sql::connect::{ConnectionManager, DatabaseConnection};
use crate::sql::dialect::Dialect;
use crate::sql::expression_builder::ExpressionBuilder;
use crate::sql::insert::{Insert, Returning};
use crate::sql::physical_table::PhysicalTable;
use crate::transform::encoder::EncodingContext;
use crate::transform::insert_transformer::to_insert;

use super::executor::{self, ConnectionHandle, InsertResult};
use super::listener::InsertListener;
use super::value::ValueSet;

/// What an insert targets: a table with column metadata, or a bare table name
/// for raw inserts.
#[derive(Debug)]
pub enum InsertTarget<'a> {
    Table(&'a PhysicalTable),
    Raw(String),
}

impl<'a> InsertTarget<'a> {
    pub fn name(&self) -> &str {
        match self {
            InsertTarget::Table(table) => &table.name,
            InsertTarget::Raw(name) => name,
        }
    }

    pub(crate) fn metadata(&self) -> Option<&'a PhysicalTable> {
        match self {
            InsertTarget::Table(table) => Some(table),
            InsertTarget::Raw(_) => None,
        }
    }
}

/// Statement descriptor and entry point for one INSERT.
///
/// Owned by one caller for the lifetime of one statement construction; every
/// configuration method consumes and returns the builder, so there is no
/// shared mutation to guard. Statement generation is deterministic for a
/// given descriptor state (UUID synthesis aside, which tests pin through
/// [`with_uuid_source`](Self::with_uuid_source)).
pub struct InsertBuilder<'a> {
    pub(crate) dialect: &'a dyn Dialect,
    pub(crate) target: InsertTarget<'a>,
    pub(crate) columns: Option<Vec<String>>,
    pub(crate) value_sets: Vec<ValueSet>,
    pub(crate) returning: Option<Returning>,
    pub(crate) use_transaction: bool,
    pub(crate) call_listeners: bool,
    pub(crate) update_entity: bool,
    pub(crate) listeners: Vec<Arc<dyn InsertListener>>,
    pub(crate) uuid_source: fn() -> Uuid,
}

impl<'a> InsertBuilder<'a> {
    pub fn for_table(dialect: &'a dyn Dialect, table: &'a PhysicalTable) -> Self {
        Self::new(dialect, InsertTarget::Table(table))
    }

    pub fn for_raw_table(dialect: &'a dyn Dialect, table_name: impl Into<String>) -> Self {
        Self::new(dialect, InsertTarget::Raw(table_name.into()))
    }

    fn new(dialect: &'a dyn Dialect, target: InsertTarget<'a>) -> Self {
        Self {
            dialect,
            target,
            columns: None,
            value_sets: vec![],
            returning: None,
            use_transaction: false,
            call_listeners: true,
            update_entity: true,
            listeners: vec![],
            uuid_source: Uuid::new_v4,
        }
    }

    /// Restrict the insert to exactly these columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Add one record to insert.
    pub fn values(mut self, row: ValueSet) -> Self {
        self.value_sets.push(row);
        self
    }

    /// Add many records to insert; the list is taken as-is, in order.
    pub fn values_from(mut self, rows: impl IntoIterator<Item = ValueSet>) -> Self {
        self.value_sets.extend(rows);
        self
    }

    /// Request the given columns back from the inserted rows. Fails right
    /// here when the dialect cannot express a returning clause, not at
    /// execute time.
    pub fn returning(
        mut self,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, DatabaseError> {
        self.check_returning_supported()?;
        self.returning = Some(Returning::Columns(
            columns.into_iter().map(Into::into).collect(),
        ));
        Ok(self)
    }

    /// Request a raw returning expression, emitted verbatim.
    pub fn returning_raw(mut self, expression: impl Into<String>) -> Result<Self, DatabaseError> {
        self.check_returning_supported()?;
        self.returning = Some(Returning::Raw(expression.into()));
        Ok(self)
    }

    fn check_returning_supported(&self) -> Result<(), DatabaseError> {
        if self.dialect.supports_returning() {
            Ok(())
        } else {
            Err(DatabaseError::ReturningNotSupported(self.dialect.family()))
        }
    }

    /// Run the insert inside a transaction (started by the executor unless
    /// one is already active on the connection).
    pub fn use_transaction(mut self, use_transaction: bool) -> Self {
        self.use_transaction = use_transaction;
        self
    }

    /// Notify registered listeners before and after the insert.
    pub fn call_listeners(mut self, call_listeners: bool) -> Self {
        self.call_listeners = call_listeners;
        self
    }

    /// Rehydrate the input records from returned rows after execution.
    pub fn update_entity(mut self, update_entity: bool) -> Self {
        self.update_entity = update_entity;
        self
    }

    pub fn add_listener(mut self, listener: Arc<dyn InsertListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Replace the UUID source used for client-side key synthesis. Tests use
    /// this to make generation deterministic.
    pub fn with_uuid_source(mut self, uuid_source: fn() -> Uuid) -> Self {
        self.uuid_source = uuid_source;
        self
    }

    /// The normalized, non-empty list of records to insert. Insertion cannot
    /// proceed without at least one; this check runs before SQL generation
    /// and before execution.
    pub(crate) fn resolved_value_sets(&self) -> Result<&[ValueSet], DatabaseError> {
        if self.value_sets.is_empty() {
            Err(DatabaseError::MissingValues)
        } else {
            Ok(&self.value_sets)
        }
    }

    pub(crate) fn build_insert(
        &self,
        returning: Option<&Returning>,
    ) -> Result<Insert, DatabaseError> {
        let value_sets = self.resolved_value_sets()?;
        let ctx = EncodingContext {
            dialect: self.dialect,
            metadata: self.target.metadata(),
            uuid_source: self.uuid_source,
        };
        to_insert(
            &ctx,
            self.target.name(),
            self.columns.as_deref(),
            value_sets,
            returning,
        )
    }

    /// The statement along with its ordered parameter table.
    pub fn to_sql(&self) -> Result<(String, Vec<(String, SQLParam)>), DatabaseError> {
        self.build_insert(self.returning.as_ref())
            .map(|insert| insert.to_sql(self.dialect))
    }

    /// The SQL text with placeholders; no parameter substitution.
    pub fn statement(&self) -> Result<String, DatabaseError> {
        self.to_sql().map(|(statement, _)| statement)
    }

    /// Execute against a caller-supplied connection. The connection is never
    /// released by this call.
    pub async fn execute(
        self,
        connection: &mut dyn DatabaseConnection,
    ) -> Result<InsertResult, DatabaseError> {
        executor::execute(self, ConnectionHandle::Supplied(connection)).await
    }

    /// Acquire a connection from the manager, execute, and release it. No
    /// connection is acquired at all when the descriptor has no values.
    pub async fn execute_with_manager(
        self,
        manager: &dyn ConnectionManager,
    ) -> Result<InsertResult, DatabaseError> {
        self.resolved_value_sets()?;
        let connection = manager.get_connection().await?;
        executor::execute(self, ConnectionHandle::Owned(connection)).await
    }
}
