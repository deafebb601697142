use std::collections::BTreeMap;

use crate::error::Result;

use super::model::{CellValue, Table};

/// Full outer join of `left` and `right` on `keys`.
///
/// * every key combination found on either side appears in the result,
///   rows ordered by key
/// * a key present several times on both sides yields every pairing
/// * cells a side has no row for are [`CellValue::Missing`]
/// * non-key columns present on both sides are suffixed `_x` (left) and `_y` (right)
///
/// Result columns: the left table's columns in order, then the right's non-key columns.
pub fn outer_join(left: &Table, right: &Table, keys: &[String]) -> Result<Table> {
    let left_keys = key_indices(left, keys)?;
    let right_keys = key_indices(right, keys)?;

    let left_rest: Vec<usize> = (0..left.columns().len())
        .filter(|i| !left_keys.contains(i))
        .collect();
    let right_rest: Vec<usize> = (0..right.columns().len())
        .filter(|i| !right_keys.contains(i))
        .collect();

    // Left layout is preserved; key columns may sit anywhere in it.
    let mut columns: Vec<String> = left.columns().to_vec();
    for &i in &left_rest {
        let name = &left.columns()[i];
        if right_rest.iter().any(|&j| &right.columns()[j] == name) {
            columns[i] = format!("{name}_x");
        }
    }
    for &j in &right_rest {
        let name = &right.columns()[j];
        if left_rest.iter().any(|&i| &left.columns()[i] == name) {
            columns.push(format!("{name}_y"));
        } else {
            columns.push(name.clone());
        }
    }

    let left_groups = group_by_key(left, &left_keys);
    let right_groups = group_by_key(right, &right_keys);

    let mut all_keys: Vec<&Vec<CellValue>> =
        left_groups.keys().chain(right_groups.keys()).collect();
    all_keys.sort();
    all_keys.dedup();

    let mut out = Table::new(format!("{} + {}", left.origin(), right.origin()), columns);
    let empty: Vec<usize> = Vec::new();

    for key in all_keys {
        let lrows = left_groups.get(key).unwrap_or(&empty);
        let rrows = right_groups.get(key).unwrap_or(&empty);

        let left_side: Vec<Option<usize>> = if lrows.is_empty() {
            vec![None]
        } else {
            lrows.iter().copied().map(Some).collect()
        };
        let right_side: Vec<Option<usize>> = if rrows.is_empty() {
            vec![None]
        } else {
            rrows.iter().copied().map(Some).collect()
        };

        for l in &left_side {
            for r in &right_side {
                out.push_row(joined_row(left, right, key, &left_keys, &right_rest, *l, *r));
            }
        }
    }

    Ok(out)
}

/// Fold `tables` left to right with [`outer_join`].
///
/// Returns `None` when `tables` is empty.
pub fn fold_outer_join(tables: Vec<Table>, keys: &[String]) -> Result<Option<Table>> {
    let mut iter = tables.into_iter();
    let Some(mut unified) = iter.next() else {
        return Ok(None);
    };
    for table in iter {
        unified = outer_join(&unified, &table, keys)?;
    }
    Ok(Some(unified))
}

fn key_indices(table: &Table, keys: &[String]) -> Result<Vec<usize>> {
    keys.iter().map(|k| table.require_column(k)).collect()
}

fn group_by_key(table: &Table, key_idx: &[usize]) -> BTreeMap<Vec<CellValue>, Vec<usize>> {
    let mut groups: BTreeMap<Vec<CellValue>, Vec<usize>> = BTreeMap::new();
    for (n, row) in table.rows().iter().enumerate() {
        let key = key_idx.iter().map(|&i| row[i].clone()).collect();
        groups.entry(key).or_default().push(n);
    }
    groups
}

fn joined_row(
    left: &Table,
    right: &Table,
    key: &[CellValue],
    left_keys: &[usize],
    right_rest: &[usize],
    l: Option<usize>,
    r: Option<usize>,
) -> Vec<CellValue> {
    let width = left.columns().len();
    let mut row: Vec<CellValue> = match l {
        Some(n) => left.rows()[n].clone(),
        None => vec![CellValue::Missing; width],
    };
    // Keys come from whichever side matched; fill them for right-only rows.
    for (k, &i) in left_keys.iter().enumerate() {
        row[i] = key[k].clone();
    }
    for &j in right_rest {
        row.push(match r {
            Some(n) => right.rows()[n][j].clone(),
            None => CellValue::Missing,
        });
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn table(origin: &str, columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            origin,
            strings(columns),
            rows.iter()
                .map(|r| r.iter().map(|s| CellValue::parse(s)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_outer_join_keeps_union_of_keys() {
        let keys = strings(&["ano", "codigo_municipio"]);
        let a = table("a", &["ano", "codigo_municipio", "a"], &[&["2020", "1", "10"], &["2020", "2", "20"]]);
        let b = table("b", &["ano", "codigo_municipio", "b"], &[&["2020", "2", "200"], &["2020", "3", "300"]]);

        let merged = outer_join(&a, &b, &keys).unwrap();
        assert_eq!(merged.columns(), &strings(&["ano", "codigo_municipio", "a", "b"])[..]);
        assert_eq!(merged.len(), 3);

        let rendered: Vec<Vec<String>> = merged
            .rows()
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        assert_eq!(
            rendered,
            vec![
                strings(&["2020", "1", "10", ""]),
                strings(&["2020", "2", "20", "200"]),
                strings(&["2020", "3", "", "300"]),
            ]
        );
    }

    #[test]
    fn test_outer_join_duplicate_keys_pair_up() {
        let keys = strings(&["id"]);
        let a = table("a", &["id", "a"], &[&["1", "x"], &["1", "y"]]);
        let b = table("b", &["id", "b"], &[&["1", "p"], &["1", "q"]]);
        let merged = outer_join(&a, &b, &keys).unwrap();
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_outer_join_suffixes_shared_columns() {
        let keys = strings(&["id"]);
        let a = table("a", &["id", "valor"], &[&["1", "5"]]);
        let b = table("b", &["id", "valor"], &[&["1", "6"]]);
        let merged = outer_join(&a, &b, &keys).unwrap();
        assert_eq!(merged.columns(), &strings(&["id", "valor_x", "valor_y"])[..]);
    }

    #[test]
    fn test_outer_join_requires_keys() {
        let keys = strings(&["id"]);
        let a = table("a", &["id", "a"], &[]);
        let b = table("b", &["other", "b"], &[]);
        assert!(outer_join(&a, &b, &keys).is_err());
    }

    #[test]
    fn test_fold_empty_and_many() {
        let keys = strings(&["id"]);
        assert!(fold_outer_join(Vec::new(), &keys).unwrap().is_none());

        let tables = vec![
            table("a", &["id", "a"], &[&["1", "1"]]),
            table("b", &["id", "b"], &[&["2", "2"]]),
            table("c", &["id", "c"], &[&["1", "3"], &["3", "3"]]),
        ];
        let merged = fold_outer_join(tables, &keys).unwrap().unwrap();
        assert_eq!(merged.columns(), &strings(&["id", "a", "b", "c"])[..]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.rows()[0][3], CellValue::Number(3.0));
    }
}
