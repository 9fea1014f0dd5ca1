// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::database_error::{DatabaseError, WithContext};
use crate::sql::SQLParam;
use crate::sql::connect::{DatabaseConnection, QueryResponse};
use crate::sql::expression_builder::ExpressionBuilder;
use crate::sql::insert::Returning;
use crate::sql::physical_table::PhysicalTable;

use super::insert_builder::InsertBuilder;
use super::listener::{InsertListener, broadcast_after_insert, broadcast_before_insert};
use super::value::{ColumnValue, ValueSet};

/// The outcome of one executed insert.
#[derive(Debug)]
pub struct InsertResult {
    /// Raw driver response
    pub raw: QueryResponse,
    /// Per row, the returned/generated column values (empty when the dialect
    /// returned nothing or entity update was off)
    pub generated: Vec<ValueSet>,
    /// The input records, rehydrated from returned rows when entity update
    /// is enabled
    pub records: Vec<ValueSet>,
}

/// A connection the executor runs on. Only an `Owned` connection, acquired by
/// the executor itself, is ever released by it.
pub(crate) enum ConnectionHandle<'a> {
    Supplied(&'a mut dyn DatabaseConnection),
    Owned(Box<dyn DatabaseConnection>),
}

impl ConnectionHandle<'_> {
    fn conn(&mut self) -> &mut dyn DatabaseConnection {
        match self {
            ConnectionHandle::Supplied(conn) => *conn,
            ConnectionHandle::Owned(conn) => conn.as_mut(),
        }
    }

    fn is_owned(&self) -> bool {
        matches!(self, ConnectionHandle::Owned(_))
    }
}

#[instrument(name = "executor::execute", skip_all)]
pub(crate) async fn execute(
    builder: InsertBuilder<'_>,
    mut handle: ConnectionHandle<'_>,
) -> Result<InsertResult, DatabaseError> {
    let result = execute_on(builder, handle.conn()).await;

    if handle.is_owned() {
        if let Err(release_err) = handle.conn().release().await {
            error!("Failed to release connection: {release_err}");
        }
    }

    result
}

async fn execute_on(
    builder: InsertBuilder<'_>,
    conn: &mut dyn DatabaseConnection,
) -> Result<InsertResult, DatabaseError> {
    // Fails fast, before any transaction work or I/O
    builder.resolved_value_sets()?;

    if conn.dialect().family() != builder.dialect.family() {
        return Err(DatabaseError::Validation(format!(
            "Statement was built for {} but the connection speaks {}",
            builder.dialect.family(),
            conn.dialect().family()
        )));
    }

    // Extra returning columns needed for rehydration are computed before
    // execution
    let returning = widen_returning(&builder);
    let insert = builder.build_insert(returning.as_ref())?;
    let (statement, params) = insert.to_sql(builder.dialect);

    let InsertBuilder {
        target,
        value_sets,
        use_transaction,
        call_listeners,
        update_entity,
        listeners,
        ..
    } = builder;
    let metadata = target.metadata();

    let owns_transaction = use_transaction && !conn.is_transaction_active();
    if owns_transaction {
        conn.start_transaction()
            .await
            .with_context("Failed to start insert transaction:".into())?;
    }

    let result = run_stages(
        conn,
        metadata,
        value_sets,
        &statement,
        &params,
        call_listeners,
        update_entity,
        &listeners,
    )
    .await;

    match result {
        Ok(result) => {
            if owns_transaction {
                if let Err(commit_err) = conn.commit().await {
                    if let Err(rollback_err) = conn.rollback().await {
                        error!("Failed to roll back insert transaction: {rollback_err}");
                    }
                    return Err(commit_err);
                }
            }
            Ok(result)
        }
        Err(err) => {
            // Best effort; the original failure must still propagate
            if owns_transaction {
                if let Err(rollback_err) = conn.rollback().await {
                    error!("Failed to roll back insert transaction: {rollback_err}");
                }
            }
            Err(err)
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_stages(
    conn: &mut dyn DatabaseConnection,
    metadata: Option<&PhysicalTable>,
    value_sets: Vec<ValueSet>,
    statement: &str,
    params: &[(String, SQLParam)],
    call_listeners: bool,
    update_entity: bool,
    listeners: &[Arc<dyn InsertListener>],
) -> Result<InsertResult, DatabaseError> {
    if call_listeners && !listeners.is_empty() {
        if let Some(metadata) = metadata {
            broadcast_before_insert(listeners, metadata, &value_sets).await?;
        }
    }

    debug!("Executing SQL operation: {statement}");
    let raw = conn.execute(statement, params).await.map_err(|err| {
        error!("Failed to execute insert: {err:?}");
        err
    })?;

    let mut records = value_sets;
    let mut generated: Vec<ValueSet> = vec![ValueSet::new(); records.len()];

    if update_entity && metadata.is_some() {
        apply_returned_rows(&raw, &mut records, &mut generated);
    }

    if call_listeners && !listeners.is_empty() {
        if let Some(metadata) = metadata {
            broadcast_after_insert(listeners, metadata, &records).await?;
        }
    }

    Ok(InsertResult {
        raw,
        generated,
        records,
    })
}

/// Rehydration needs the full set of generated columns back, not just what
/// the caller asked for. Returns the caller's returning request widened with
/// every generated, version, or defaulted column, when the dialect can
/// express a returning clause at all.
fn widen_returning(builder: &InsertBuilder) -> Option<Returning> {
    let base = builder.returning.clone();

    if !builder.update_entity || !builder.dialect.supports_returning() {
        return base;
    }
    let Some(metadata) = builder.target.metadata() else {
        return base;
    };

    let mut columns = match base {
        Some(Returning::Raw(raw)) => return Some(Returning::Raw(raw)),
        Some(Returning::Columns(columns)) => columns,
        None => vec![],
    };

    let extra: Vec<_> = metadata
        .columns
        .iter()
        .filter(|column| {
            (column.is_generated() || column.is_version || column.default_value.is_some())
                && !columns.contains(&column.name)
        })
        .map(|column| column.name.clone())
        .collect();
    columns.extend(extra);

    if columns.is_empty() {
        None
    } else {
        Some(Returning::Columns(columns))
    }
}

/// Map returned rows back onto the input records, positionally by row.
fn apply_returned_rows(
    raw: &QueryResponse,
    records: &mut [ValueSet],
    generated: &mut [ValueSet],
) {
    if raw.rows.len() != records.len() {
        return;
    }

    for (row_index, row) in raw.rows.iter().enumerate() {
        for (column_name, value) in row {
            generated[row_index]
                .insert(column_name.clone(), ColumnValue::Scalar(value.clone()));
            records[row_index].insert(column_name.clone(), ColumnValue::Scalar(value.clone()));
        }
    }
}
