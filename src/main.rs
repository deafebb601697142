use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use indicator_scores::config::{load_catalog, load_processor_config, Theme};
use indicator_scores::processor::DEFAULT_OUTPUT;
use indicator_scores::{indicators, ProcessorError, TableProcessor};

const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score the tables described by a processor config file
    Run {
        /// JSON file with dados, colunas_chave, colunas_valor and pesos
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Score a built-in indicator, reading its data path from a catalog
    Indicator {
        /// Indicator id, e.g. 4071
        id: String,
        /// JSON map of indicator id to data path
        #[arg(long)]
        catalog: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Score one theme using its standard config file location
    Theme {
        #[arg(value_enum)]
        theme: Theme,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the processor a config file describes
    Show {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List built-in indicators
    List,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Output CSV path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Column to leave out of the output (repeatable)
    #[arg(long = "drop")]
    drop_columns: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(name = "indicator-scores")]
#[command(about = "Merge single-metric CSV tables and score municipalities", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = execute(cli.command) {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<ProcessorError>() {
        Some(ProcessorError::Configuration(_)) => EXIT_CONFIG,
        _ => EXIT_FAILURE,
    }
}

fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Run { config, output } => run_config(&config, &output),
        Commands::Theme { theme, output } => run_config(theme.config_path(), &output),
        Commands::Indicator {
            id,
            catalog,
            output,
        } => {
            let indicator = indicators::find(&id)?;
            let catalog = load_catalog(&catalog)?;
            let processor = indicator.processor(&catalog)?;
            log::info!("Scoring indicator {} ({})", indicator.id, indicator.name);
            run_processor(&processor, &output)
        }
        Commands::Show { config } => {
            let config = load_processor_config(&config)?;
            println!("{}", TableProcessor::from_config(&config, None));
            Ok(())
        }
        Commands::List => {
            for indicator in indicators::builtin() {
                println!("{}\t{}", indicator.id, indicator.name);
            }
            Ok(())
        }
    }
}

fn run_config(path: &Path, output: &OutputArgs) -> Result<()> {
    let config = load_processor_config(path)
        .with_context(|| format!("loading processor config {}", path.display()))?;
    let processor = TableProcessor::from_config(&config, None);
    run_processor(&processor, output)
}

fn run_processor(processor: &TableProcessor, output: &OutputArgs) -> Result<()> {
    processor
        .run_to(&output.output, None, output.drop_columns.as_slice())
        .with_context(|| format!("processing {}", processor.data_source().display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn output_args(output: PathBuf) -> OutputArgs {
        OutputArgs {
            output,
            drop_columns: Vec::new(),
        }
    }

    fn write_config(dir: &Path, data: &Path) -> PathBuf {
        let config = dir.join("config.json");
        let text = serde_json::json!({
            "dados": data,
            "colunas_chave": ["ano", "codigo_municipio"],
            "colunas_valor": ["valor"],
            "pesos": {"agua": 2.0}
        });
        fs::write(&config, text.to_string()).unwrap();
        config
    }

    #[test]
    fn test_cli_parses_run_with_drops() {
        let cli = Cli::try_parse_from([
            "indicator-scores", "run", "--config", "c.json", "--drop", "a", "--drop", "b",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { config, output } => {
                assert_eq!(config, PathBuf::from("c.json"));
                assert_eq!(output.output, PathBuf::from(DEFAULT_OUTPUT));
                assert_eq!(output.drop_columns, vec!["a", "b"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_show_valid_config() {
        let dir = tempdir().unwrap();
        let config = write_config(dir.path(), dir.path());
        execute(Commands::Show { config }).unwrap();
    }

    #[test]
    fn test_run_writes_output() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("dados");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("agua.csv"), "ano,codigo_municipio,valor\n2020,1,3\n").unwrap();
        let config = write_config(dir.path(), &data);
        let out = dir.path().join("out.csv");

        execute(Commands::Run {
            config,
            output: output_args(out.clone()),
        })
        .unwrap();
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "ano,codigo_municipio,agua,score\n2020,1,3,6\n"
        );
    }

    #[test]
    fn test_incomplete_config_exits_with_config_code() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{"dados": "x"}"#).unwrap();

        let err = execute(Commands::Run {
            config,
            output: output_args(dir.path().join("out.csv")),
        })
        .unwrap_err();
        assert_eq!(exit_code(&err), EXIT_CONFIG);
    }

    #[test]
    fn test_unknown_indicator_exits_with_config_code() {
        let dir = tempdir().unwrap();
        let err = execute(Commands::Indicator {
            id: "0000".to_string(),
            catalog: dir.path().join("catalog.json"),
            output: output_args(dir.path().join("out.csv")),
        })
        .unwrap_err();
        assert_eq!(exit_code(&err), EXIT_CONFIG);
    }

    #[test]
    fn test_empty_data_directory_exits_with_failure_code() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("dados");
        fs::create_dir(&data).unwrap();
        let config = write_config(dir.path(), &data);

        let err = execute(Commands::Run {
            config,
            output: output_args(dir.path().join("out.csv")),
        })
        .unwrap_err();
        assert_eq!(exit_code(&err), EXIT_FAILURE);
    }

    #[test]
    fn test_list() {
        execute(Commands::List).unwrap();
    }
}
