use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ProcessorConfig;
use crate::data::loader::{discover_tables, read_table};
use crate::data::merge::fold_outer_join;
use crate::data::model::{CellValue, Table};
use crate::data::writer::write_table;
use crate::error::{ProcessorError, Result};
use crate::scoring::{ScoringStrategy, WeightedSum, Weights};

/// Output file written by [`TableProcessor::run`].
pub const DEFAULT_OUTPUT: &str = "processed_data.csv";

/// Name of the column holding the computed score.
pub const SCORE_COLUMN: &str = "score";

/// Caller-supplied step applied to the unified table before scoring.
pub type Transform<'a> = &'a dyn Fn(Table) -> Result<Table>;

/// Load → merge → score → save pipeline for one indicator.
pub struct TableProcessor {
    data_source: PathBuf,
    key_columns: Vec<String>,
    value_columns: Vec<String>,
    weights: Weights,
    strategy: Box<dyn ScoringStrategy>,
}

impl TableProcessor {
    /// Processor scoring with [`WeightedSum`].
    pub fn new(
        data_source: impl Into<PathBuf>,
        key_columns: Vec<String>,
        value_columns: Vec<String>,
        weights: Weights,
    ) -> Self {
        TableProcessor {
            data_source: data_source.into(),
            key_columns,
            value_columns,
            weights,
            strategy: Box::new(WeightedSum),
        }
    }

    /// Build from a validated configuration; `strategy` replaces the default
    /// weighted sum when given.
    pub fn from_config(config: &ProcessorConfig, strategy: Option<Box<dyn ScoringStrategy>>) -> Self {
        let processor = TableProcessor::new(
            config.data_source.clone(),
            config.key_columns.clone(),
            config.value_columns.clone(),
            config.weights.clone(),
        );
        match strategy {
            Some(s) => processor.with_strategy(s),
            None => processor,
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn ScoringStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn data_source(&self) -> &Path {
        &self.data_source
    }

    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn value_columns(&self) -> &[String] {
        &self.value_columns
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Load the data source into one table.
    ///
    /// A file is returned as read. A directory contributes, per `.csv` file,
    /// the key columns plus the value columns, with the first value column
    /// renamed to the file's stem; those tables are then outer-joined on the
    /// key columns in identifier order.
    pub fn load(&self) -> Result<Table> {
        if !self.data_source.exists() {
            return Err(ProcessorError::Configuration(format!(
                "data source {} does not exist",
                self.data_source.display()
            )));
        }
        if !self.data_source.is_dir() {
            return read_table(&self.data_source, None);
        }

        if self.key_columns.is_empty() {
            return Err(ProcessorError::Configuration(
                "colunas_chave: a directory data source needs at least one key column".to_string(),
            ));
        }
        let Some(first_value) = self.value_columns.first() else {
            return Err(ProcessorError::Configuration(
                "colunas_valor: a directory data source needs at least one value column".to_string(),
            ));
        };

        let usecols: Vec<String> = self
            .key_columns
            .iter()
            .chain(self.value_columns.iter())
            .cloned()
            .collect();

        let files = discover_tables(&self.data_source)?;
        let mut tables = Vec::with_capacity(files.len());
        for file in &files {
            let mut table = read_table(&file.path, Some(&usecols))?;
            table.rename_column(first_value, file.identifier.as_str())?;
            tables.push(table);
        }

        let unified = fold_outer_join(tables, &self.key_columns)?
            .ok_or_else(|| ProcessorError::NoInputTables(self.data_source.clone()))?;

        log::info!(
            "Merged {} tables from {} into {} rows",
            files.len(),
            self.data_source.display(),
            unified.len()
        );
        Ok(unified)
    }

    /// Score every row of `table`, in row order.
    pub fn score_column(&self, table: &Table) -> Result<Vec<f64>> {
        table
            .iter_rows()
            .map(|row| self.strategy.score(&row, &self.weights))
            .collect()
    }

    /// `table` with a `score` column added, or replaced if already present.
    pub fn score_table(&self, mut table: Table) -> Result<Table> {
        let scores = self.score_column(&table)?;
        table.set_column(SCORE_COLUMN, scores.into_iter().map(CellValue::from).collect())?;
        Ok(table)
    }

    /// Write `table` to `path` as CSV and report it.
    ///
    /// The confirmation line goes through the `log` facade at `info` level;
    /// callers without a logger installed see nothing, the binary installs
    /// `env_logger` with `info` as its default filter.
    pub fn save(&self, table: &Table, path: &Path) -> Result<()> {
        write_table(table, path)?;
        log::info!("Consolidated file saved as {}", path.display());
        Ok(())
    }

    /// Full pipeline writing to [`DEFAULT_OUTPUT`].
    pub fn run<S: AsRef<str>>(&self, transform: Option<Transform<'_>>, drop_columns: &[S]) -> Result<()> {
        self.run_to(Path::new(DEFAULT_OUTPUT), transform, drop_columns)
    }

    /// Full pipeline: load, optional transform, score, drop columns, save to `output`.
    ///
    /// Any failing stage aborts the run before anything is written.
    pub fn run_to<S: AsRef<str>>(
        &self,
        output: &Path,
        transform: Option<Transform<'_>>,
        drop_columns: &[S],
    ) -> Result<()> {
        let mut unified = self.load()?;
        if let Some(transform) = transform {
            unified = transform(unified)?;
        }
        let scored = self.score_table(unified)?.drop_columns(drop_columns)?;
        self.save(&scored, output)
    }
}

impl fmt::Display for TableProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data: {}", self.data_source.display())?;
        writeln!(f, "Key columns: {:?}", self.key_columns)?;
        writeln!(f, "Value columns: {:?}", self.value_columns)?;
        writeln!(f, "Weights: {:?}", self.weights)?;
        write!(f, "Formula: {}", self.strategy.name())
    }
}

impl fmt::Debug for TableProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableProcessor")
            .field("data_source", &self.data_source)
            .field("key_columns", &self.key_columns)
            .field("value_columns", &self.value_columns)
            .field("weights", &self.weights)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
