// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use uuid::Uuid;

use crate::asql::value::{ColumnValue, ValueSet};
use crate::database_error::DatabaseError;
use crate::sql::SQLParam;
use crate::sql::column::Column;
use crate::sql::dialect::Dialect;
use crate::sql::physical_column::{GenerationStrategy, PhysicalColumn};
use crate::sql::physical_table::PhysicalTable;

/// Everything the encoder needs to turn a `(row, column)` pair into a VALUES
/// cell.
pub(crate) struct EncodingContext<'a> {
    pub dialect: &'a dyn Dialect,
    pub metadata: Option<&'a PhysicalTable>,
    /// Injectable so that client-side UUID synthesis is deterministic in tests
    pub uuid_source: fn() -> Uuid,
}

/// Decide which columns receive values.
///
/// An explicit column list wins: it is matched against the metadata by exact
/// name membership, kept in metadata order, and a name the table does not
/// have is an error rather than a silently dropped value. Without an
/// explicit list, every known column except auto-increment ones is used.
/// Without metadata, a single value set donates its keys; multiple value
/// sets without an explicit list produce an empty list, which downstream
/// renders as a bare insert.
pub(crate) fn select_columns(
    metadata: Option<&PhysicalTable>,
    explicit: Option<&[String]>,
    value_sets: &[ValueSet],
) -> Result<Vec<String>, DatabaseError> {
    let columns = match metadata {
        Some(table) => match explicit {
            Some(requested) => {
                if let Some(unknown) = requested
                    .iter()
                    .find(|name| table.get_column(name).is_none())
                {
                    return Err(DatabaseError::Validation(format!(
                        "Unknown column {} in insert into {}",
                        unknown, table.name
                    )));
                }
                table
                    .columns
                    .iter()
                    .filter(|column| requested.contains(&column.name))
                    .map(|column| column.name.clone())
                    .collect()
            }
            None => table
                .insertable_columns()
                .into_iter()
                .map(|column| column.name.clone())
                .collect(),
        },
        None => match explicit {
            Some(requested) => requested.to_vec(),
            None if value_sets.len() == 1 => value_sets[0].keys().cloned().collect(),
            None => vec![],
        },
    };
    Ok(columns)
}

/// Encode one value set into one VALUES tuple, positionally aligned with
/// `columns`.
pub(crate) fn encode_row(
    ctx: &EncodingContext,
    columns: &[String],
    row_index: usize,
    row: &ValueSet,
) -> Result<Vec<Column>, DatabaseError> {
    columns
        .iter()
        .map(|column_name| {
            let descriptor = ctx.metadata.and_then(|table| table.get_column(column_name));
            match descriptor {
                Some(descriptor) => encode_cell(ctx, descriptor, row_index, row.get(column_name)),
                None => encode_raw_cell(ctx, column_name, row_index, row.get(column_name)),
            }
        })
        .collect()
}

/// The full five-case decision order, first match wins.
fn encode_cell(
    ctx: &EncodingContext,
    column: &PhysicalColumn,
    row_index: usize,
    value: Option<&ColumnValue>,
) -> Result<Column, DatabaseError> {
    // Every newly inserted row starts at version 1, regardless of input
    if column.is_version {
        return Ok(Column::Literal("1".to_owned()));
    }

    if column.generation == GenerationStrategy::Uuid
        && !ctx.dialect.supports_uuid_generation()
        && value.is_none()
    {
        // The synthesized key takes the same coercion path as a supplied one
        let synthesized = ctx
            .dialect
            .prepare_persistent_value(SQLParam::Uuid((ctx.uuid_source)()), Some(column));
        return Ok(Column::Param {
            name: format!("_uuid_{}{}", column.name, row_index),
            value: synthesized,
        });
    }

    match value {
        None => Ok(default_cell(ctx.dialect, Some(column))),
        Some(ColumnValue::Expression(expression)) => {
            Ok(Column::RawExpression(expression.clone()))
        }
        Some(supplied) => {
            let scalar = resolve_scalar(column, supplied)?;
            let prepared = ctx.dialect.prepare_persistent_value(scalar, Some(column));
            Ok(Column::Param {
                name: inserted_param_name(row_index, &column.name),
                value: prepared,
            })
        }
    }
}

/// The collapsed three-case order for tables without column metadata.
fn encode_raw_cell(
    ctx: &EncodingContext,
    column_name: &str,
    row_index: usize,
    value: Option<&ColumnValue>,
) -> Result<Column, DatabaseError> {
    match value {
        None => Ok(default_cell(ctx.dialect, None)),
        Some(ColumnValue::Expression(expression)) => {
            Ok(Column::RawExpression(expression.clone()))
        }
        Some(ColumnValue::Scalar(scalar)) => {
            let prepared = ctx.dialect.prepare_persistent_value(scalar.clone(), None);
            Ok(Column::Param {
                name: inserted_param_name(row_index, column_name),
                value: prepared,
            })
        }
        Some(ColumnValue::SubObject(_)) => Err(DatabaseError::Validation(format!(
            "Column {column_name} has no metadata to resolve a related record against"
        ))),
    }
}

fn inserted_param_name(row_index: usize, column_name: &str) -> String {
    format!("_inserted_{row_index}_{column_name}")
}

/// The "use default" cell for an absent value. Dialects that cannot express a
/// bare default inside a VALUES list fall back to the column's declared
/// default literal, else NULL.
fn default_cell(dialect: &dyn Dialect, column: Option<&PhysicalColumn>) -> Column {
    if dialect.supports_default_keyword() {
        Column::Default
    } else {
        match column.and_then(|c| c.default_value.as_ref()) {
            Some(default_value) => Column::Literal(default_value.clone()),
            None => Column::Null,
        }
    }
}

fn resolve_scalar(
    column: &PhysicalColumn,
    value: &ColumnValue,
) -> Result<SQLParam, DatabaseError> {
    match value {
        ColumnValue::Scalar(scalar) => Ok(scalar.clone()),
        ColumnValue::SubObject(sub_object) => {
            let reference = column.reference.as_ref().ok_or_else(|| {
                DatabaseError::Validation(format!(
                    "Column {} is not relational but was given a related record",
                    column.name
                ))
            })?;
            match sub_object.get(&reference.column) {
                Some(ColumnValue::Scalar(scalar)) => Ok(scalar.clone()),
                Some(_) => Err(DatabaseError::Validation(format!(
                    "Referenced column {} of {} must carry a plain value",
                    reference.column, reference.table
                ))),
                None => Err(DatabaseError::Validation(format!(
                    "Related record is missing referenced column {}",
                    reference.column
                ))),
            }
        }
        ColumnValue::Expression(_) => unreachable!("expressions are handled before binding"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asql::value::value_set;
    use crate::sql::dialect::{MySql, Postgres, Sqlite};
    use crate::transform::test_util::TestSetup;

    fn stub_uuid() -> Uuid {
        Uuid::nil()
    }

    fn ctx<'a>(dialect: &'a dyn Dialect, metadata: Option<&'a PhysicalTable>) -> EncodingContext<'a> {
        EncodingContext {
            dialect,
            metadata,
            uuid_source: stub_uuid,
        }
    }

    #[test]
    fn version_column_always_encodes_literal_one() {
        TestSetup::with_setup(|setup| {
            let ctx = ctx(&Postgres, Some(&setup.articles));
            let row = value_set([("revision", 42.into())]);

            let cells =
                encode_row(&ctx, &["revision".to_owned()], 0, &row).unwrap();
            assert_eq!(cells, vec![Column::Literal("1".to_owned())]);
        });
    }

    #[test]
    fn uuid_pk_is_synthesized_client_side_when_dialect_cannot() {
        TestSetup::with_setup(|setup| {
            let ctx = ctx(&Sqlite, Some(&setup.documents));
            let row = value_set([]);

            let cells = encode_row(&ctx, &["id".to_owned()], 3, &row).unwrap();
            // Sqlite persists uuids as strings, so the synthesized key is
            // coerced exactly like a supplied one
            assert_eq!(
                cells,
                vec![Column::Param {
                    name: "_uuid_id3".to_owned(),
                    value: SQLParam::String(Uuid::nil().to_string()),
                }]
            );
        });
    }

    #[test]
    fn synthesized_and_supplied_uuids_coerce_identically() {
        TestSetup::with_setup(|setup| {
            let ctx = ctx(&Sqlite, Some(&setup.documents));

            let supplied = value_set([("id", Uuid::nil().into())]);
            let supplied_cells = encode_row(&ctx, &["id".to_owned()], 0, &supplied).unwrap();

            let absent = value_set([]);
            let synthesized_cells = encode_row(&ctx, &["id".to_owned()], 0, &absent).unwrap();

            let value_of = |cell: &Column| match cell {
                Column::Param { value, .. } => value.clone(),
                other => panic!("expected a bound parameter, got {other:?}"),
            };
            assert_eq!(value_of(&supplied_cells[0]), value_of(&synthesized_cells[0]));
            assert_eq!(
                value_of(&synthesized_cells[0]),
                SQLParam::String(Uuid::nil().to_string())
            );
        });
    }

    #[test]
    fn uuid_pk_is_left_to_the_server_when_dialect_can() {
        TestSetup::with_setup(|setup| {
            let ctx = ctx(&Postgres, Some(&setup.documents));
            let row = value_set([]);

            let cells = encode_row(&ctx, &["id".to_owned()], 0, &row).unwrap();
            assert_eq!(cells, vec![Column::Default]);
        });
    }

    #[test]
    fn absent_value_falls_back_to_declared_default_then_null() {
        TestSetup::with_setup(|setup| {
            // Sqlite cannot say DEFAULT inside VALUES; "status" declares a
            // default, "summary" does not
            let ctx = ctx(&Sqlite, Some(&setup.articles));
            let row = value_set([]);

            let cells = encode_row(
                &ctx,
                &["status".to_owned(), "summary".to_owned()],
                0,
                &row,
            )
            .unwrap();
            assert_eq!(
                cells,
                vec![Column::Literal("'draft'".to_owned()), Column::Null]
            );
        });
    }

    #[test]
    fn sub_object_resolves_through_the_referenced_column() {
        TestSetup::with_setup(|setup| {
            let ctx = ctx(&Postgres, Some(&setup.articles));
            let author = value_set([("id", 7.into()), ("name", "Sam".into())]);
            let row = value_set([("author_id", ColumnValue::SubObject(author))]);

            let cells = encode_row(&ctx, &["author_id".to_owned()], 0, &row).unwrap();
            assert_eq!(
                cells,
                vec![Column::Param {
                    name: "_inserted_0_author_id".to_owned(),
                    value: SQLParam::Int(7),
                }]
            );
        });
    }

    #[test]
    fn sub_object_without_referenced_column_is_rejected() {
        TestSetup::with_setup(|setup| {
            let ctx = ctx(&Postgres, Some(&setup.articles));
            let author = value_set([("name", "Sam".into())]);
            let row = value_set([("author_id", ColumnValue::SubObject(author))]);

            let result = encode_row(&ctx, &["author_id".to_owned()], 0, &row);
            assert!(matches!(result, Err(DatabaseError::Validation(_))));
        });
    }

    #[test]
    fn array_value_binds_as_a_single_parameter() {
        TestSetup::with_setup(|setup| {
            let ctx = ctx(&Postgres, Some(&setup.articles));
            let row = value_set([("tags", vec!["a", "b"].into())]);

            let cells = encode_row(&ctx, &["tags".to_owned()], 0, &row).unwrap();
            match &cells[0] {
                Column::Param { value, .. } => assert!(value.is_array()),
                other => panic!("expected a bound parameter, got {other:?}"),
            }
        });
    }

    #[test]
    fn raw_table_cells_collapse_to_three_cases() {
        let ctx = ctx(&MySql, None);
        let row = value_set([
            ("a", "x".into()),
            ("b", ColumnValue::expression("now()")),
        ]);

        let cells = encode_row(
            &ctx,
            &["a".to_owned(), "b".to_owned(), "c".to_owned()],
            1,
            &row,
        )
        .unwrap();
        assert_eq!(
            cells,
            vec![
                Column::Param {
                    name: "_inserted_1_a".to_owned(),
                    value: SQLParam::String("x".to_owned()),
                },
                Column::RawExpression("now()".to_owned()),
                Column::Default,
            ]
        );
    }

    #[test]
    fn explicit_column_list_filters_by_exact_membership() {
        TestSetup::with_setup(|setup| {
            let explicit = vec!["title".to_owned()];
            let columns = select_columns(Some(&setup.articles), Some(&explicit), &[]).unwrap();
            assert_eq!(columns, vec!["title".to_owned()]);
        });
    }

    #[test]
    fn unknown_explicit_column_is_rejected() {
        TestSetup::with_setup(|setup| {
            // A typo must not degrade into a bare insert that drops the
            // supplied values
            let explicit = vec!["titel".to_owned()];
            let result = select_columns(Some(&setup.articles), Some(&explicit), &[]);
            assert!(matches!(result, Err(DatabaseError::Validation(_))));
        });
    }

    #[test]
    fn default_column_selection_excludes_auto_increment() {
        TestSetup::with_setup(|setup| {
            let columns = select_columns(Some(&setup.articles), None, &[]).unwrap();
            assert!(!columns.contains(&"id".to_owned()));
            assert!(columns.contains(&"title".to_owned()));
        });
    }

    #[test]
    fn single_value_set_donates_keys_without_metadata() {
        let row = value_set([("a", 1.into()), ("b", 2.into())]);
        let columns = select_columns(None, None, std::slice::from_ref(&row)).unwrap();
        assert_eq!(columns, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn multiple_value_sets_without_metadata_or_columns_select_nothing() {
        let rows = vec![value_set([("a", 1.into())]), value_set([("b", 2.into())])];
        let columns = select_columns(None, None, &rows).unwrap();
        assert!(columns.is_empty());
    }
}
