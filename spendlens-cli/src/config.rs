use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spendlens_core::CategorySet;
use spendlens_finance::{Engine, KeywordRules};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_spendlens_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub keywords: KeywordRules,
    pub categories: CategoriesSection,
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoriesSection {
    /// Extra buckets transactions may declare through `tableName`
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySection {
    /// Used when the transaction source carries no currency
    pub currency: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
        }
    }
}

impl Config {
    /// Validate the category labels and build an engine from this config
    pub fn engine(&self) -> Result<Engine> {
        let categories =
            CategorySet::new(&self.categories.extra).context("invalid [categories] section")?;
        Ok(Engine::new(&self.keywords, categories))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_spendlens_home()?.join("config.toml"))
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [keywords]
            food = ["swiggy", "dunzo"]

            [categories]
            extra = ["rent"]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.keywords.food, vec!["swiggy", "dunzo"]);
        assert_eq!(cfg.keywords.bill, KeywordRules::default().bill);
        assert_eq!(cfg.display.currency, "INR");
        assert_eq!(cfg.engine().unwrap().categories().len(), 6);
    }

    #[test]
    fn test_builtin_collision_rejected() {
        let cfg: Config = toml::from_str("[categories]\nextra = [\"Food\"]\n").unwrap();
        assert!(cfg.engine().is_err());
    }

    #[test]
    fn test_round_trip_default() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, Config::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let p = std::env::temp_dir().join("spendlens-does-not-exist.toml");
        assert_eq!(load_config(Some(&p)).unwrap(), Config::default());
    }
}
