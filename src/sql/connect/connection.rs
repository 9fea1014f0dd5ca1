// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::database_error::DatabaseError;
use crate::sql::SQLParam;
use crate::sql::dialect::Dialect;

/// One row returned by the driver: column name to value, in select order.
pub type ResultRow = IndexMap<String, SQLParam>;

/// Raw driver response for one statement execution.
#[derive(Debug, Default)]
pub struct QueryResponse {
    pub rows: Vec<ResultRow>,
    pub rows_affected: u64,
}

/// A live connection to one database, with its transaction controls.
///
/// Drivers for concrete databases implement this; the core never sees a wire
/// protocol. Transaction ownership is exclusive: whichever call path starts a
/// transaction is the only one allowed to commit or roll it back, and only
/// the path that acquired a connection may release it.
#[async_trait]
pub trait DatabaseConnection: Send {
    fn dialect(&self) -> &dyn Dialect;

    fn is_transaction_active(&self) -> bool;

    async fn start_transaction(&mut self) -> Result<(), DatabaseError>;

    async fn commit(&mut self) -> Result<(), DatabaseError>;

    async fn rollback(&mut self) -> Result<(), DatabaseError>;

    /// Return the connection to wherever it came from.
    async fn release(&mut self) -> Result<(), DatabaseError>;

    /// Run one statement with its ordered parameter table and capture the raw
    /// response. No partial or streaming execution.
    async fn execute(
        &mut self,
        sql: &str,
        params: &[(String, SQLParam)],
    ) -> Result<QueryResponse, DatabaseError>;
}

/// Hands out connections. Implemented by pools or single-connection setups;
/// the executor uses it only when the caller did not supply a connection of
/// their own.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn get_connection(&self) -> Result<Box<dyn DatabaseConnection>, DatabaseError>;
}
