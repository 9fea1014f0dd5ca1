// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![cfg(test)]

use crate::sql::physical_column::{ColumnReference, GenerationStrategy, PhysicalColumn};
use crate::sql::physical_table::PhysicalTable;

pub struct TestSetup {
    pub articles: PhysicalTable,
    pub authors: PhysicalTable,
    pub documents: PhysicalTable,
}

pub fn increment_column(name: &str) -> PhysicalColumn {
    PhysicalColumn {
        generation: GenerationStrategy::Increment,
        ..PhysicalColumn::new(name)
    }
}

pub fn uuid_column(name: &str) -> PhysicalColumn {
    PhysicalColumn {
        generation: GenerationStrategy::Uuid,
        ..PhysicalColumn::new(name)
    }
}

pub fn version_column(name: &str) -> PhysicalColumn {
    PhysicalColumn {
        is_version: true,
        ..PhysicalColumn::new(name)
    }
}

pub fn defaulted_column(name: &str, default_value: &str) -> PhysicalColumn {
    PhysicalColumn {
        default_value: Some(default_value.to_owned()),
        ..PhysicalColumn::new(name)
    }
}

pub fn reference_column(name: &str, table: &str, column: &str) -> PhysicalColumn {
    PhysicalColumn {
        reference: Some(ColumnReference {
            table: table.to_owned(),
            column: column.to_owned(),
        }),
        ..PhysicalColumn::new(name)
    }
}

impl TestSetup {
    pub fn with_setup(test_fn: impl Fn(TestSetup)) {
        let articles = PhysicalTable::new(
            "articles",
            vec![
                increment_column("id"),
                PhysicalColumn::new("title"),
                PhysicalColumn::new("summary"),
                defaulted_column("status", "'draft'"),
                version_column("revision"),
                reference_column("author_id", "authors", "id"),
                PhysicalColumn::new("tags"),
            ],
        );

        let authors = PhysicalTable::new(
            "authors",
            vec![increment_column("id"), PhysicalColumn::new("name")],
        );

        let documents = PhysicalTable::new(
            "documents",
            vec![uuid_column("id"), PhysicalColumn::new("body")],
        );

        test_fn(TestSetup {
            articles,
            authors,
            documents,
        })
    }
}
