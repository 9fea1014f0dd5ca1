// Copyright Polysql, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::asql::value::ValueSet;
use crate::database_error::DatabaseError;
use crate::sql::insert::{Insert, Returning};

use super::encoder::{EncodingContext, encode_row, select_columns};

/// Turn a resolved statement descriptor into a concrete [`Insert`].
///
/// The caller has already resolved the value sets (so at least one exists).
/// One tuple is emitted per value set, and every tuple's cell ordering
/// follows the selected column ordering.
pub(crate) fn to_insert(
    ctx: &EncodingContext,
    table_name: &str,
    explicit_columns: Option<&[String]>,
    value_sets: &[ValueSet],
    returning: Option<&Returning>,
) -> Result<Insert, DatabaseError> {
    let columns = select_columns(ctx.metadata, explicit_columns, value_sets)?;

    // Zero selected columns encode to nothing; the assembler falls through to
    // the bare-insert path
    let values_seq = if columns.is_empty() {
        vec![]
    } else {
        value_sets
            .iter()
            .enumerate()
            .map(|(row_index, row)| encode_row(ctx, &columns, row_index, row))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(Insert {
        table_name: table_name.to_owned(),
        columns,
        values_seq,
        returning: returning.cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asql::value::value_set;
    use crate::sql::ExpressionBuilder;
    use crate::sql::column::Column;
    use crate::sql::dialect::Postgres;
    use crate::transform::test_util::TestSetup;

    fn ctx(setup: &TestSetup) -> EncodingContext<'_> {
        EncodingContext {
            dialect: &Postgres,
            metadata: Some(&setup.articles),
            uuid_source: uuid::Uuid::nil,
        }
    }

    #[test]
    fn one_tuple_per_value_set() {
        TestSetup::with_setup(|setup| {
            let rows = vec![
                value_set([("title", "a".into())]),
                value_set([("title", "b".into())]),
                value_set([("title", "c".into())]),
            ];

            let insert = to_insert(
                &ctx(&setup),
                "articles",
                Some(&["title".to_owned()]),
                &rows,
                None,
            )
            .unwrap();

            assert_eq!(insert.values_seq.len(), rows.len());
            for tuple in &insert.values_seq {
                assert_eq!(tuple.len(), insert.columns.len());
            }
        });
    }

    #[test]
    fn parameter_names_are_unique_within_a_statement() {
        TestSetup::with_setup(|setup| {
            let rows = vec![
                value_set([("title", "a".into()), ("summary", "s".into())]),
                value_set([("title", "b".into()), ("summary", "t".into())]),
            ];

            let insert = to_insert(&ctx(&setup), "articles", None, &rows, None).unwrap();
            let (_, params) = insert.to_sql(&Postgres);

            let mut names: Vec<_> = params.iter().map(|(name, _)| name.clone()).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), params.len());
        });
    }

    #[test]
    fn tuples_follow_column_ordering_positionally() {
        TestSetup::with_setup(|setup| {
            let rows = vec![value_set([
                // Supplied out of metadata order on purpose
                ("summary", "s".into()),
                ("title", "a".into()),
            ])];

            let insert = to_insert(
                &ctx(&setup),
                "articles",
                Some(&["title".to_owned(), "summary".to_owned()]),
                &rows,
                None,
            )
            .unwrap();

            assert_eq!(insert.columns, vec!["title".to_owned(), "summary".to_owned()]);
            assert!(matches!(
                &insert.values_seq[0][0],
                Column::Param { name, .. } if name == "_inserted_0_title"
            ));
            assert!(matches!(
                &insert.values_seq[0][1],
                Column::Param { name, .. } if name == "_inserted_0_summary"
            ));
        });
    }
}
