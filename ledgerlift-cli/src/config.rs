use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_ledgerlift_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmSection,
    pub extract: ExtractSection,
    pub sheets: SheetsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    pub provider: String,
    pub model: String,
    pub max_tokens: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractSection {
    /// Cap on CSV characters sent inline to the model.
    pub max_csv_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsSection {
    /// Spreadsheet title becomes "<title_prefix> - YYYY-MM-DD".
    pub title_prefix: String,
    pub tab_title: String,
}

impl Default for Config {
    fn default() -> Self {
        let llm = ledgerlift_extract::LlmConfig::anthropic_default();
        Self {
            llm: LlmSection {
                provider: "anthropic".to_string(),
                model: llm.model,
                max_tokens: llm.max_tokens,
            },
            extract: ExtractSection {
                max_csv_chars: ledgerlift_extract::DEFAULT_MAX_CSV_CHARS,
            },
            sheets: SheetsSection {
                title_prefix: "Bank Transactions".to_string(),
                tab_title: "Transactions".to_string(),
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_ledgerlift_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.llm.provider, "anthropic");
        assert_eq!(back.llm.max_tokens, 4000);
        assert_eq!(back.extract.max_csv_chars, 15_000);
        assert_eq!(back.sheets.tab_title, "Transactions");
    }
}
