use std::cmp::Ordering;
use std::fmt;

use crate::error::{ProcessorError, Result};

// ---------------------------------------------------------------------------
// NonAnswer – survey answers that carry no measurement
// ---------------------------------------------------------------------------

/// Survey non-answers found in the municipal questionnaires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NonAnswer {
    /// "Não sabe" – the respondent does not know.
    DontKnow,
    /// "Não possui" – the municipality does not have the item.
    DoesNotHave,
}

impl NonAnswer {
    pub fn as_str(self) -> &'static str {
        match self {
            NonAnswer::DontKnow => "Não sabe",
            NonAnswer::DoesNotHave => "Não possui",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Não sabe" => Some(NonAnswer::DontKnow),
            "Não possui" => Some(NonAnswer::DoesNotHave),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// Markers read as an empty cell, besides the empty string itself.
const NULL_MARKERS: &[&str] = &["NA", "N/A", "#N/A", "NaN", "nan", "null", "NULL", "None"];

/// A dynamically-typed table cell.
///
/// Cells are used as join keys, so they are totally ordered and hashable.
#[derive(Debug, Clone)]
pub enum CellValue {
    Number(f64),
    NonAnswer(NonAnswer),
    Text(String),
    Missing,
}

impl CellValue {
    /// Interpret one raw CSV field.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() || NULL_MARKERS.contains(&s) {
            return CellValue::Missing;
        }
        if let Some(na) = NonAnswer::parse(s) {
            return CellValue::NonAnswer(na);
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_nan() => CellValue::Missing,
            Ok(v) => CellValue::Number(v),
            Err(_) => CellValue::Text(s.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            CellValue::Missing
        } else {
            CellValue::Number(v)
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::parse(s)
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    /// Numbers sort before text; empty cells sort last, as pandas puts NaN keys.
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Number(_) => 0,
                NonAnswer(_) => 1,
                Text(_) => 2,
                Missing => 3,
            }
        }
        match (self, other) {
            (Number(a), Number(b)) => a.total_cmp(b),
            (NonAnswer(a), NonAnswer(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Missing, Missing) => Ordering::Equal,
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            // Bit pattern matches `total_cmp` equality.
            CellValue::Number(v) => v.to_bits().hash(state),
            CellValue::NonAnswer(na) => na.hash(state),
            CellValue::Text(s) => s.hash(state),
            CellValue::Missing => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::NonAnswer(na) => f.write_str(na.as_str()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Missing => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Row – borrowed view over one table row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    origin: &'a str,
    columns: &'a [String],
    values: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Cell of `column`, or `None` when the table has no such column.
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let values = self.values;
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &values[i])
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(CellValue::as_f64)
    }

    pub fn values(&self) -> &'a [CellValue] {
        self.values
    }

    /// Origin of the table the row belongs to.
    pub fn origin(&self) -> &'a str {
        self.origin
    }
}

// ---------------------------------------------------------------------------
// Table – the in-memory rectangular dataset
// ---------------------------------------------------------------------------

/// Named columns plus rows of cells, every row as wide as the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Where the table came from, used in error messages.
    origin: String,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(origin: impl Into<String>, columns: Vec<String>) -> Self {
        Table {
            origin: origin.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from rows; short rows are padded with empty cells and
    /// long rows truncated to the header width.
    pub fn from_rows(
        origin: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let mut table = Table::new(origin, columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| ProcessorError::missing_column(column, &self.origin))
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            origin: &self.origin,
            columns: &self.columns,
            values,
        })
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            origin: &self.origin,
            columns: &self.columns,
            values,
        })
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, column: &str) -> Result<Vec<&CellValue>> {
        let idx = self.require_column(column)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Keep only `columns`, in the table's own column order.
    pub fn select(self, columns: &[String]) -> Result<Table> {
        for c in columns {
            self.require_column(c)?;
        }
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| columns.contains(&self.columns[i]))
            .collect();
        let new_columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table {
            origin: self.origin,
            columns: new_columns,
            rows,
        })
    }

    pub fn rename_column(&mut self, from: &str, to: impl Into<String>) -> Result<()> {
        let idx = self.require_column(from)?;
        self.columns[idx] = to.into();
        Ok(())
    }

    /// Remove the named columns; every one of them must exist.
    pub fn drop_columns<S: AsRef<str>>(mut self, columns: &[S]) -> Result<Table> {
        let mut drop = Vec::with_capacity(columns.len());
        for c in columns {
            drop.push(self.require_column(c.as_ref())?);
        }
        let keep: Vec<usize> = (0..self.columns.len()).filter(|i| !drop.contains(i)).collect();
        self.columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = keep.iter().map(|&i| row[i].clone()).collect();
        }
        Ok(self)
    }

    /// Replace `column` with `values`, appending it when absent.
    ///
    /// `values` must have one entry per row.
    pub fn set_column(&mut self, column: &str, values: Vec<CellValue>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(ProcessorError::Configuration(format!(
                "column '{column}' has {} values but {} has {} rows",
                values.len(),
                self.origin,
                self.rows.len()
            )));
        }
        match self.column_index(column) {
            Some(idx) => {
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                self.columns.push(column.to_string());
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_cells() {
        assert_eq!(CellValue::parse("12.5"), CellValue::Number(12.5));
        assert_eq!(CellValue::parse(" 7 "), CellValue::Number(7.0));
        assert_eq!(CellValue::parse(""), CellValue::Missing);
        assert_eq!(CellValue::parse("NaN"), CellValue::Missing);
        assert_eq!(
            CellValue::parse("Não sabe"),
            CellValue::NonAnswer(NonAnswer::DontKnow)
        );
        assert_eq!(
            CellValue::parse("Não possui"),
            CellValue::NonAnswer(NonAnswer::DoesNotHave)
        );
        assert_eq!(CellValue::parse("São Paulo"), CellValue::Text("São Paulo".into()));
    }

    #[test]
    fn test_display_round_trips_text() {
        for raw in ["3550308", "0.25", "Não possui", "Campinas", ""] {
            assert_eq!(CellValue::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_ordering_numbers_first_missing_last() {
        let mut v = vec![
            CellValue::Missing,
            CellValue::Text("a".into()),
            CellValue::Number(2.0),
            CellValue::Number(-1.0),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                CellValue::Number(-1.0),
                CellValue::Number(2.0),
                CellValue::Text("a".into()),
                CellValue::Missing,
            ]
        );
    }

    #[test]
    fn test_row_lookup() {
        let table = Table::from_rows(
            "t",
            cols(&["ano", "valor"]),
            vec![vec![CellValue::Number(2020.0), CellValue::Missing]],
        );
        let row = table.row(0).unwrap();
        assert_eq!(row.number("ano"), Some(2020.0));
        assert_eq!(row.get("valor"), Some(&CellValue::Missing));
        assert!(row.get("nope").is_none());
    }

    #[test]
    fn test_drop_missing_column_fails() {
        let table = Table::new("t", cols(&["a"]));
        let err = table.drop_columns(&["b"]).unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn { ref column, .. } if column == "b"));
    }

    #[test]
    fn test_set_column_appends_then_replaces() {
        let mut table = Table::from_rows("t", cols(&["a"]), vec![vec![1.0.into()], vec![2.0.into()]]);
        table.set_column("score", vec![10.0.into(), 20.0.into()]).unwrap();
        assert_eq!(table.columns(), &cols(&["a", "score"])[..]);
        table.set_column("score", vec![0.0.into(), 0.0.into()]).unwrap();
        assert_eq!(table.columns().len(), 2);
        assert_eq!(table.rows()[1][1], CellValue::Number(0.0));
        assert!(table.set_column("x", vec![]).is_err());
    }

    #[test]
    fn test_select_keeps_table_order() {
        let table = Table::from_rows(
            "t",
            cols(&["a", "b", "c"]),
            vec![vec![1.0.into(), 2.0.into(), 3.0.into()]],
        );
        let selected = table.select(&cols(&["c", "a"])).unwrap();
        assert_eq!(selected.columns(), &cols(&["a", "c"])[..]);
        assert_eq!(selected.rows()[0], vec![CellValue::Number(1.0), CellValue::Number(3.0)]);
    }
}
