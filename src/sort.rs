//! Row ordering for the songs table.
//!
//! Sorting is done decorate-sort-undecorate: each row is paired with its
//! original index and the comparator falls back to that index on ties, so
//! the resulting order is total and stable no matter what the underlying
//! sort algorithm guarantees.

use std::cmp::Ordering;

use crate::action::{SortColumn, SortOrder};
use crate::client::models::SongRow;

/// Compare two rows by a single column value. Text columns order
/// lexicographically, numeric columns by value.
fn compare_by_column(a: &SongRow, b: &SongRow, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Author => a.author.cmp(&b.author),
        SortColumn::Title => a.title.cmp(&b.title),
        SortColumn::Genre => a.genre.cmp(&b.genre),
        SortColumn::Year => a.year.cmp(&b.year),
        SortColumn::Duration => a.duration.cmp(&b.duration),
    }
}

/// Build a comparison function for the given column and direction.
pub fn comparator(
    column: SortColumn,
    order: SortOrder,
) -> impl Fn(&SongRow, &SongRow) -> Ordering {
    move |a, b| {
        let ord = compare_by_column(a, b, column);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// Produce a sorted copy of `rows`. Ties keep their original relative
/// order in both directions.
pub fn sort_rows(rows: &[SongRow], column: SortColumn, order: SortOrder) -> Vec<SongRow> {
    let cmp = comparator(column, order);

    let mut decorated: Vec<(usize, &SongRow)> = rows.iter().enumerate().collect();
    decorated.sort_unstable_by(|a, b| {
        let ord = cmp(a.1, b.1);
        if ord != Ordering::Equal {
            ord
        } else {
            a.0.cmp(&b.0)
        }
    });

    decorated.into_iter().map(|(_, row)| row.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, author: &str, title: &str, year: i32, duration: i32) -> SongRow {
        SongRow {
            id,
            author: author.to_string(),
            title: title.to_string(),
            genre: String::from("Rock"),
            year,
            duration,
        }
    }

    fn sample() -> Vec<SongRow> {
        vec![
            row(1, "Mori", "Blue", 2021, 180),
            row(2, "Adele", "Hello", 2015, 295),
            row(3, "Mori", "Amber", 2022, 200),
            row(4, "Zimmer", "Time", 2010, 275),
        ]
    }

    #[test]
    fn test_sort_by_text_column_ascending() {
        let sorted = sort_rows(&sample(), SortColumn::Author, SortOrder::Asc);
        let ids: Vec<i64> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_sort_by_numeric_column_descending() {
        let sorted = sort_rows(&sample(), SortColumn::Duration, SortOrder::Desc);
        let durations: Vec<i32> = sorted.iter().map(|r| r.duration).collect();
        assert_eq!(durations, vec![295, 275, 200, 180]);
    }

    #[test]
    fn test_ties_keep_original_order_in_both_directions() {
        // Two rows share the author "Mori"; their relative order (id 1
        // before id 3) must survive in both directions.
        let asc = sort_rows(&sample(), SortColumn::Author, SortOrder::Asc);
        let desc = sort_rows(&sample(), SortColumn::Author, SortOrder::Desc);

        let asc_moris: Vec<i64> = asc
            .iter()
            .filter(|r| r.author == "Mori")
            .map(|r| r.id)
            .collect();
        let desc_moris: Vec<i64> = desc
            .iter()
            .filter(|r| r.author == "Mori")
            .map(|r| r.id)
            .collect();

        assert_eq!(asc_moris, vec![1, 3]);
        assert_eq!(desc_moris, vec![1, 3]);
    }

    #[test]
    fn test_desc_is_reverse_of_asc_except_ties() {
        let rows = sample();
        let asc = sort_rows(&rows, SortColumn::Year, SortOrder::Asc);
        let desc = sort_rows(&rows, SortColumn::Year, SortOrder::Desc);

        let asc_years: Vec<i32> = asc.iter().map(|r| r.year).collect();
        let mut desc_years: Vec<i32> = desc.iter().map(|r| r.year).collect();
        desc_years.reverse();
        assert_eq!(asc_years, desc_years);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let rows = sample();
        let _ = sort_rows(&rows, SortColumn::Title, SortOrder::Asc);
        assert_eq!(rows[0].id, 1);
    }

    #[test]
    fn test_comparator_respects_direction() {
        let rows = sample();
        let asc = comparator(SortColumn::Year, SortOrder::Asc);
        let desc = comparator(SortColumn::Year, SortOrder::Desc);

        assert_eq!(asc(&rows[1], &rows[0]), Ordering::Less);
        assert_eq!(desc(&rows[1], &rows[0]), Ordering::Greater);
    }
}
