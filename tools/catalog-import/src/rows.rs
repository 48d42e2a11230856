use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientRow {
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagRow {
    pub name: String,
    pub color: String,
    pub slug: String,
}

pub fn read_ingredients(path: &Path) -> Result<Vec<IngredientRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse(file)
}

pub fn read_tags(path: &Path) -> Result<Vec<TagRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse(file)
}

/// Headerless CSV, fields trimmed. Blank lines are skipped by the reader.
fn parse<T, R>(source: R) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(source);
    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("invalid row {}", i + 1)))
        .collect()
}
