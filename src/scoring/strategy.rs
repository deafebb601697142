use std::collections::BTreeMap;

use crate::data::model::Row;
use crate::error::Result;

/// Weight per column name.
pub type Weights = BTreeMap<String, f64>;

/// Computes one row's composite score.
///
/// Implemented by the named strategies in this module and by any closure
/// `Fn(&Row, &Weights) -> Result<f64>`, so an indicator can plug in its own
/// equation without a new type.
pub trait ScoringStrategy {
    fn score(&self, row: &Row<'_>, weights: &Weights) -> Result<f64>;

    /// Short label used when describing a processor.
    fn name(&self) -> String {
        "custom".to_string()
    }
}

impl<F> ScoringStrategy for F
where
    F: Fn(&Row<'_>, &Weights) -> Result<f64>,
{
    fn score(&self, row: &Row<'_>, weights: &Weights) -> Result<f64> {
        self(row, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Table};

    #[test]
    fn test_closure_is_a_strategy() {
        let table = Table::from_rows(
            "t",
            vec!["a".into()],
            vec![vec![CellValue::Number(4.0)]],
        );
        let double = |row: &Row<'_>, _: &Weights| -> Result<f64> {
            Ok(row.number("a").unwrap_or(0.0) * 2.0)
        };
        let strategy: &dyn ScoringStrategy = &double;
        let row = table.row(0).unwrap();
        assert_eq!(strategy.score(&row, &Weights::new()).unwrap(), 8.0);
        assert_eq!(strategy.name(), "custom");
    }
}
