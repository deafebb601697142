use std::fs;
use std::path::Path;

use serde_json::json;

/// Minimal deterministic PRNG (splitmix64)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let out_dir = Path::new("sample");
    let data_dir = out_dir.join("dados");
    fs::create_dir_all(&data_dir).expect("Failed to create sample directory");

    // IBGE codes of a few São Paulo municipalities
    let municipalities = [3550308_u32, 3509502, 3548500, 3552205, 3543402];
    let years = [2021_u32, 2022];

    // (indicator file, typical value, chance of a non-answer)
    let indicators = [
        ("coleta_seletiva", 60.0, 0.15),
        ("conselho_meio_ambiente", 1.0, 0.25),
        ("plano_saneamento", 1.0, 0.20),
    ];

    let mut rows_written = 0;
    for (name, typical, non_answer_rate) in indicators {
        let path = data_dir.join(format!("{name}.csv"));
        let mut writer = csv::Writer::from_path(&path).expect("Failed to create CSV file");
        writer
            .write_record(["ano", "codigo_municipio", "valor"])
            .expect("Failed to write header");

        for &year in &years {
            for &code in &municipalities {
                // Leave some municipalities out so the merge has gaps to fill.
                if rng.next_f64() < 0.1 {
                    continue;
                }
                let roll = rng.next_f64();
                let value = if roll < non_answer_rate / 2.0 {
                    "Não sabe".to_string()
                } else if roll < non_answer_rate {
                    "Não possui".to_string()
                } else {
                    format!("{:.1}", typical * (0.5 + rng.next_f64()))
                };
                writer
                    .write_record([year.to_string(), code.to_string(), value])
                    .expect("Failed to write row");
                rows_written += 1;
            }
        }
        writer.flush().expect("Failed to flush CSV file");
    }

    let config = json!({
        "dados": data_dir,
        "colunas_chave": ["ano", "codigo_municipio"],
        "colunas_valor": ["valor"],
        "pesos": {
            "coleta_seletiva": 0.01,
            "conselho_meio_ambiente": 0.3,
            "plano_saneamento": 0.3
        }
    });
    let config_path = out_dir.join("config.json");
    let text = serde_json::to_string_pretty(&config).expect("Failed to serialize config");
    fs::write(&config_path, text).expect("Failed to write config");

    println!(
        "Wrote {rows_written} rows across {} tables to {} and config to {}",
        indicators.len(),
        data_dir.display(),
        config_path.display()
    );
}
