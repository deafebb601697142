use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProcessorError, Result};
use crate::scoring::Weights;

/// Configuration of one indicator processor, as stored in the theme JSON files.
///
/// Example:
/// ```json
/// {
///   "dados": "indicadores/Econômica/dados",
///   "colunas_chave": ["ano", "codigo_municipio"],
///   "colunas_valor": ["valor"],
///   "pesos": { "pib_per_capita": 0.6, "renda_media": 0.4 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProcessorConfig {
    #[serde(rename = "dados")]
    pub data_source: PathBuf,
    #[serde(rename = "colunas_chave")]
    pub key_columns: Vec<String>,
    #[serde(rename = "colunas_valor")]
    pub value_columns: Vec<String>,
    #[serde(rename = "pesos")]
    pub weights: Weights,
}

/// Wire form with every field optional, so missing fields can be reported
/// by name instead of as a generic parse failure.
#[derive(Debug, Default, Deserialize)]
struct RawProcessorConfig {
    dados: Option<PathBuf>,
    colunas_chave: Option<Vec<String>>,
    colunas_valor: Option<Vec<String>>,
    pesos: Option<Weights>,
}

impl RawProcessorConfig {
    fn validate(self) -> Result<ProcessorConfig> {
        let mut missing = Vec::new();
        if self.dados.is_none() {
            missing.push("dados");
        }
        if self.colunas_chave.is_none() {
            missing.push("colunas_chave");
        }
        if self.colunas_valor.is_none() {
            missing.push("colunas_valor");
        }
        if self.pesos.is_none() {
            missing.push("pesos");
        }

        match (self.dados, self.colunas_chave, self.colunas_valor, self.pesos) {
            (Some(data_source), Some(key_columns), Some(value_columns), Some(weights)) => {
                if key_columns.is_empty() {
                    return Err(ProcessorError::Configuration(
                        "colunas_chave: must name at least one column".to_string(),
                    ));
                }
                Ok(ProcessorConfig {
                    data_source,
                    key_columns,
                    value_columns,
                    weights,
                })
            }
            _ => Err(ProcessorError::Configuration(format!(
                "missing required field(s): {}",
                missing.join(", ")
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ProcessorConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawProcessorConfig::deserialize(deserializer)?;
        raw.validate().map_err(serde::de::Error::custom)
    }
}

impl ProcessorConfig {
    /// Build from an already-parsed JSON value, checking required fields.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawProcessorConfig = serde_json::from_value(value)
            .map_err(|e| ProcessorError::Configuration(format!("invalid processor config: {e}")))?;
        raw.validate()
    }
}

/// Read a processor configuration from a JSON file.
pub fn load_processor_config(path: &Path) -> Result<ProcessorConfig> {
    let text = fs::read_to_string(path).map_err(|e| ProcessorError::io(path, e))?;
    let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        ProcessorError::Configuration(format!("invalid JSON in {}: {e}", path.display()))
    })?;
    ProcessorConfig::from_value(value).map_err(|e| match e {
        ProcessorError::Configuration(msg) => {
            ProcessorError::Configuration(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

// ---------------------------------------------------------------------------
// Data catalog
// ---------------------------------------------------------------------------

/// Map of indicator id → data path, e.g. `{"4071": "dados/snis/4071.csv"}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct DataCatalog {
    entries: BTreeMap<String, PathBuf>,
}

impl DataCatalog {
    pub fn new(entries: BTreeMap<String, PathBuf>) -> Self {
        DataCatalog { entries }
    }

    pub fn path_for(&self, id: &str) -> Result<&Path> {
        self.entries
            .get(id)
            .map(PathBuf::as_path)
            .ok_or_else(|| ProcessorError::Configuration(format!("no data path for indicator '{id}'")))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

pub fn load_catalog(path: &Path) -> Result<DataCatalog> {
    let text = fs::read_to_string(path).map_err(|e| ProcessorError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| {
        ProcessorError::Configuration(format!("invalid data catalog {}: {e}", path.display()))
    })
}

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

/// Indicator themes, each with its own processor configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    /// Econômica
    Econ,
    /// Sociocultural
    Sociocul,
    /// Caracterização sociodemográfica
    Sociodem,
}

impl Theme {
    pub fn config_path(self) -> &'static Path {
        Path::new(match self {
            Theme::Econ => "indicadores/Econômica/econ.json",
            Theme::Sociocul => "indicadores/Sociocultural/sociocul.json",
            Theme::Sociodem => "indicadores/Caracterização_sociodemográfica/sociodem.json",
        })
    }
}
