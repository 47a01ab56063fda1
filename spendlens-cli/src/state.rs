use anyhow::{Context, Result};
use spendlens_core::TransactionSource;
use std::fs;
use std::path::{Path, PathBuf};

pub fn spendlens_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".spendlens"))
}

pub fn ensure_spendlens_home() -> Result<PathBuf> {
    let dir = spendlens_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Read a transaction source (`{ transactions, currency, months? }`) from JSON
pub fn read_source(path: &Path) -> Result<TransactionSource> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}
