use crate::data::model::{CellValue, Row};
use crate::error::{ProcessorError, Result};

use super::strategy::{ScoringStrategy, Weights};

/// `scale * numerator / denominator`, ignoring weights.
///
/// A zero denominator, or an operand that is empty or a non-answer, gives 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Ratio {
    pub numerator: String,
    pub denominator: String,
    pub scale: f64,
}

impl Ratio {
    pub fn new(numerator: impl Into<String>, denominator: impl Into<String>, scale: f64) -> Self {
        Ratio {
            numerator: numerator.into(),
            denominator: denominator.into(),
            scale,
        }
    }

    /// Percentage form, `100 * numerator / denominator`.
    pub fn percent(numerator: impl Into<String>, denominator: impl Into<String>) -> Self {
        Ratio::new(numerator, denominator, 100.0)
    }

    fn operand(row: &Row<'_>, column: &str) -> Result<Option<f64>> {
        match row.get(column) {
            Some(CellValue::Number(v)) => Ok(Some(*v)),
            Some(CellValue::Missing) | Some(CellValue::NonAnswer(_)) => Ok(None),
            Some(CellValue::Text(s)) => Err(ProcessorError::NonNumeric {
                column: column.to_string(),
                value: s.clone(),
            }),
            None => Err(ProcessorError::missing_column(column, row.origin())),
        }
    }
}

impl ScoringStrategy for Ratio {
    fn score(&self, row: &Row<'_>, _weights: &Weights) -> Result<f64> {
        let num = Self::operand(row, &self.numerator)?;
        let den = Self::operand(row, &self.denominator)?;
        match (num, den) {
            (Some(n), Some(d)) if d != 0.0 => Ok(self.scale * n / d),
            _ => Ok(0.0),
        }
    }

    fn name(&self) -> String {
        format!("{} * {} / {}", self.scale, self.numerator, self.denominator)
    }
}
