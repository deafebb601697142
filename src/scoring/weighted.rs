use crate::data::model::{CellValue, Row};
use crate::error::{ProcessorError, Result};

use super::strategy::{ScoringStrategy, Weights};

/// Default strategy: sum of `value * weight` over the weighted columns.
///
/// Empty cells, survey non-answers and columns the row does not have add
/// nothing, so a row with no usable answer scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedSum;

impl ScoringStrategy for WeightedSum {
    fn score(&self, row: &Row<'_>, weights: &Weights) -> Result<f64> {
        let mut total = 0.0;
        for (column, weight) in weights {
            match row.get(column) {
                Some(CellValue::Number(v)) => total += v * weight,
                Some(CellValue::Text(s)) => {
                    return Err(ProcessorError::NonNumeric {
                        column: column.clone(),
                        value: s.clone(),
                    })
                }
                Some(CellValue::NonAnswer(_)) | Some(CellValue::Missing) | None => {}
            }
        }
        Ok(total)
    }

    fn name(&self) -> String {
        "weighted_sum".to_string()
    }
}
