// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{TableFilterSpec, TableRow, TableView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDecision {
    Show,
    Hide,
    /// Header or "no data" placeholder row; its visibility is left alone.
    Untouched,
}

/// One decision per row, in row order. Pure in the query and the row texts.
pub fn filter_rows(spec: &TableFilterSpec, query: &str, rows: &[TableRow]) -> Vec<RowDecision> {
    let needle = query.to_lowercase();
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            if index < spec.header_rows || row.cells.len() <= 1 {
                return RowDecision::Untouched;
            }
            if row_matches(row, &spec.columns, &needle) {
                RowDecision::Show
            } else {
                RowDecision::Hide
            }
        })
        .collect()
}

fn row_matches(row: &TableRow, columns: &[usize], needle: &str) -> bool {
    columns
        .iter()
        .filter_map(|column| row.cells.get(*column))
        .any(|cell| cell.to_lowercase().contains(needle))
}

/// Reads the table, decides, and writes visibility back. Returns how many
/// data rows remain visible.
pub fn apply_filter<V>(view: &mut V, spec: &TableFilterSpec, query: &str) -> Result<usize>
where
    V: TableView + ?Sized,
{
    let rows = view.rows(&spec.table);
    let visibility: Vec<Option<bool>> = filter_rows(spec, query, &rows)
        .into_iter()
        .map(|decision| match decision {
            RowDecision::Show => Some(true),
            RowDecision::Hide => Some(false),
            RowDecision::Untouched => None,
        })
        .collect();
    view.set_rows_visible(&spec.table, &visibility)?;
    Ok(visibility.iter().filter(|row| **row == Some(true)).count())
}

#[cfg(test)]
mod tests {
    use super::{RowDecision, filter_rows};
    use crate::{TableFilterSpec, TableRow};

    fn course_rows() -> Vec<TableRow> {
        vec![
            TableRow::new(["Name", "Trainer", "Price", "Actions"]),
            TableRow::new(["Yoga Basics", "alice", "50", ""]),
            TableRow::new(["Spin", "Bob", "40", ""]),
            TableRow::new(["Boxing", "Carla", "60", ""]),
        ]
    }

    #[test]
    fn empty_query_shows_every_data_row() {
        let decisions = filter_rows(&TableFilterSpec::courses(), "", &course_rows());
        assert_eq!(
            decisions,
            vec![
                RowDecision::Untouched,
                RowDecision::Show,
                RowDecision::Show,
                RowDecision::Show,
            ]
        );
    }

    #[test]
    fn query_is_case_insensitive() {
        let decisions = filter_rows(&TableFilterSpec::courses(), "ALICE", &course_rows());
        assert_eq!(decisions[1], RowDecision::Show);
        assert_eq!(decisions[2], RowDecision::Hide);
        assert_eq!(decisions[3], RowDecision::Hide);
    }

    #[test]
    fn any_designated_column_can_match() {
        let decisions = filter_rows(&TableFilterSpec::courses(), "bo", &course_rows());
        // "Bob" matches on trainer, "Boxing" on name.
        assert_eq!(decisions[2], RowDecision::Show);
        assert_eq!(decisions[3], RowDecision::Show);
        assert_eq!(decisions[1], RowDecision::Hide);
    }

    #[test]
    fn undesignated_columns_are_ignored() {
        let decisions = filter_rows(&TableFilterSpec::courses(), "60", &course_rows());
        assert!(decisions[1..].iter().all(|d| *d == RowDecision::Hide));
    }

    #[test]
    fn placeholder_row_is_left_alone() {
        let rows = vec![
            TableRow::new(["Name", "Trainer"]),
            TableRow::new(["No courses found"]),
        ];
        let decisions = filter_rows(&TableFilterSpec::courses(), "zzz", &rows);
        assert_eq!(decisions, vec![RowDecision::Untouched, RowDecision::Untouched]);
    }
}
