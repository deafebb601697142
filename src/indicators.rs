//! Concrete indicators: each one is a data path from the catalog plus a
//! fixed scoring equation, run through the generic [`TableProcessor`].

use crate::config::DataCatalog;
use crate::error::{ProcessorError, Result};
use crate::processor::TableProcessor;
use crate::scoring::{Ratio, ScoringStrategy, Weights};

/// Builds the strategy of an indicator.
type StrategyFactory = fn() -> Box<dyn ScoringStrategy>;

#[derive(Debug, Clone, Copy)]
pub struct Indicator {
    /// Catalog id, e.g. `"4071"`.
    pub id: &'static str,
    pub name: &'static str,
    strategy: StrategyFactory,
}

impl Indicator {
    pub fn strategy(&self) -> Box<dyn ScoringStrategy> {
        (self.strategy)()
    }

    /// Processor reading this indicator's data path from `catalog`.
    ///
    /// Ratio-style indicators read one table, so no key or weight columns are set.
    pub fn processor(&self, catalog: &DataCatalog) -> Result<TableProcessor> {
        let path = catalog.path_for(self.id)?;
        Ok(TableProcessor::new(path, Vec::new(), Vec::new(), Weights::new())
            .with_strategy(self.strategy()))
    }
}

// SNIS water-supply indicators.

fn en_4071() -> Box<dyn ScoringStrategy> {
    Box::new(Ratio::percent(
        "AG018 - Volume de água tratada importado",
        "AG006 -Volume de água produzido",
    ))
}

const BUILTIN: &[Indicator] = &[Indicator {
    id: "4071",
    name: "Treated water imported as a share of water produced",
    strategy: en_4071,
}];

pub fn builtin() -> &'static [Indicator] {
    BUILTIN
}

pub fn find(id: &str) -> Result<&'static Indicator> {
    BUILTIN
        .iter()
        .find(|i| i.id == id)
        .ok_or_else(|| ProcessorError::Configuration(format!("unknown indicator '{id}'")))
}
