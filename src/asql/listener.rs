// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::database_error::DatabaseError;
use crate::sql::physical_table::PhysicalTable;

use super::value::ValueSet;

/// Callbacks notified around an insert, once per inserted row. A failing
/// listener aborts the whole operation: a pre-insert failure propagates
/// before the statement runs, a post-insert failure before the transaction
/// commits.
#[async_trait]
pub trait InsertListener: Send + Sync {
    async fn before_insert(&self, table: &PhysicalTable, row: &ValueSet)
    -> Result<(), DatabaseError>;

    async fn after_insert(&self, table: &PhysicalTable, row: &ValueSet)
    -> Result<(), DatabaseError>;
}

/// Notify all listeners for all rows concurrently and join. Ordering across
/// rows is not guaranteed; the join completes before the caller proceeds.
pub(crate) async fn broadcast_before_insert(
    listeners: &[Arc<dyn InsertListener>],
    table: &PhysicalTable,
    rows: &[ValueSet],
) -> Result<(), DatabaseError> {
    try_join_all(
        rows.iter()
            .flat_map(|row| listeners.iter().map(move |l| l.before_insert(table, row))),
    )
    .await
    .map(|_| ())
}

pub(crate) async fn broadcast_after_insert(
    listeners: &[Arc<dyn InsertListener>],
    table: &PhysicalTable,
    rows: &[ValueSet],
) -> Result<(), DatabaseError> {
    try_join_all(
        rows.iter()
            .flat_map(|row| listeners.iter().map(move |l| l.after_insert(table, row))),
    )
    .await
    .map(|_| ())
}
