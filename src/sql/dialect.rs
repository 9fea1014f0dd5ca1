// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Debug, Display};

use super::SQLParam;
use super::physical_column::PhysicalColumn;

/// The closed set of database families this crate can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectFamily {
    Postgres,
    MySql,
    Sqlite,
    SqlServer,
}

impl Display for DialectFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DialectFamily::Postgres => "Postgres",
            DialectFamily::MySql => "MySQL",
            DialectFamily::Sqlite => "SQLite",
            DialectFamily::SqlServer => "SQL Server",
        };
        f.write_str(name)
    }
}

/// Where a dialect places its returning clause relative to the VALUES list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturningPlacement {
    /// `OUTPUT <columns>` immediately after the column list (SQL Server).
    AfterColumns,
    /// `RETURNING <columns>` at the end of the statement (Postgres).
    AfterValues,
}

/// Capability queries and literal production for one database family.
///
/// Each family implements this once; the assembler and encoder consult it
/// instead of branching on the family themselves.
pub trait Dialect: Debug + Send + Sync {
    fn family(&self) -> DialectFamily;

    /// Can an INSERT yield column values from the inserted rows
    /// (RETURNING/OUTPUT)?
    fn supports_returning(&self) -> bool;

    /// Can the server generate UUID primary keys itself? When it cannot, the
    /// encoder synthesizes the UUID client-side and binds it.
    fn supports_uuid_generation(&self) -> bool;

    /// Is a bare `DEFAULT` keyword allowed inside a multi-row VALUES list?
    fn supports_default_keyword(&self) -> bool;

    fn returning_placement(&self) -> ReturningPlacement;

    /// The literal meaning "use the column default" in a VALUES tuple.
    fn default_literal(&self) -> &'static str {
        "DEFAULT"
    }

    fn quote_identifier(&self, name: &str) -> String;

    /// Render the placeholder for the parameter with the given name, bound at
    /// the given 1-based position.
    fn placeholder(&self, name: &str, ordinal: usize) -> String;

    /// Coerce a value into the representation the family's driver persists.
    /// The default is the identity; families without a native type for a
    /// value override this.
    fn prepare_persistent_value(&self, value: SQLParam, _column: Option<&PhysicalColumn>) -> SQLParam {
        value
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn family(&self) -> DialectFamily {
        DialectFamily::Postgres
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn supports_uuid_generation(&self) -> bool {
        true
    }

    fn supports_default_keyword(&self) -> bool {
        true
    }

    fn returning_placement(&self) -> ReturningPlacement {
        ReturningPlacement::AfterValues
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    fn placeholder(&self, _name: &str, ordinal: usize) -> String {
        format!("${ordinal}")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn family(&self) -> DialectFamily {
        DialectFamily::MySql
    }

    fn supports_returning(&self) -> bool {
        false
    }

    fn supports_uuid_generation(&self) -> bool {
        false
    }

    fn supports_default_keyword(&self) -> bool {
        true
    }

    fn returning_placement(&self) -> ReturningPlacement {
        ReturningPlacement::AfterValues
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{name}`")
    }

    fn placeholder(&self, _name: &str, _ordinal: usize) -> String {
        "?".to_owned()
    }

    fn prepare_persistent_value(&self, value: SQLParam, _column: Option<&PhysicalColumn>) -> SQLParam {
        match value {
            // MySQL has no native uuid type; persist the canonical string form
            SQLParam::Uuid(uuid) => SQLParam::String(uuid.to_string()),
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn family(&self) -> DialectFamily {
        DialectFamily::Sqlite
    }

    fn supports_returning(&self) -> bool {
        false
    }

    fn supports_uuid_generation(&self) -> bool {
        false
    }

    fn supports_default_keyword(&self) -> bool {
        false
    }

    fn returning_placement(&self) -> ReturningPlacement {
        ReturningPlacement::AfterValues
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    fn placeholder(&self, _name: &str, _ordinal: usize) -> String {
        "?".to_owned()
    }

    fn prepare_persistent_value(&self, value: SQLParam, _column: Option<&PhysicalColumn>) -> SQLParam {
        match value {
            SQLParam::Bool(b) => SQLParam::Int(b as i64),
            SQLParam::Uuid(uuid) => SQLParam::String(uuid.to_string()),
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer;

impl Dialect for SqlServer {
    fn family(&self) -> DialectFamily {
        DialectFamily::SqlServer
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn supports_uuid_generation(&self) -> bool {
        true
    }

    fn supports_default_keyword(&self) -> bool {
        true
    }

    fn returning_placement(&self) -> ReturningPlacement {
        ReturningPlacement::AfterColumns
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("[{name}]")
    }

    fn placeholder(&self, name: &str, _ordinal: usize) -> String {
        format!("@{name}")
    }
}
