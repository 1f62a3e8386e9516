use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use ndarray::Array2;
use serde::Deserialize;

use crate::confounds::{ComponentMeta, ConfoundMetadata, ConfoundTable, Tissue};
use crate::io::read_to_string_maybe_gz;

pub fn load_confound_table(path: &Path) -> Result<ConfoundTable> {
    let content = read_to_string_maybe_gz(path)
        .with_context(|| format!("failed to load confounds TSV {}", path.display()))?;
    parse_confound_tsv(&content, &path.display().to_string())
}

pub fn load_metadata(path: &Path) -> Result<ConfoundMetadata> {
    let content = read_to_string_maybe_gz(path)
        .with_context(|| format!("failed to load confounds JSON {}", path.display()))?;
    parse_metadata_json(&content, &path.display().to_string())
}

pub fn parse_confound_tsv(content: &str, source: &str) -> Result<ConfoundTable> {
    let mut lines = content.lines().enumerate();
    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => bail!("{} is empty (expected a header line)", source),
        }
    };
    let columns: Vec<String> = header
        .trim_end_matches('\r')
        .split('\t')
        .map(|s| s.trim().to_string())
        .collect();
    if columns.iter().any(|c| c.is_empty()) {
        bail!("{}:1 empty column name in header", source);
    }

    let n_cols = columns.len();
    let mut values = Vec::new();
    let mut n_rows = 0usize;
    for (idx, line) in lines {
        let line_no = idx + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() != n_cols {
            bail!(
                "{}:{} malformed TSV (expected {} columns, found {})",
                source,
                line_no,
                n_cols,
                parts.len()
            );
        }
        for (col, raw) in parts.iter().enumerate() {
            values.push(parse_cell(raw).with_context(|| {
                format!("{}:{} column '{}'", source, line_no, columns[col])
            })?);
        }
        n_rows += 1;
    }

    let data = Array2::from_shape_vec((n_rows, n_cols), values)?;
    ConfoundTable::new(columns, data).with_context(|| format!("invalid confound table {}", source))
}

fn parse_cell(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("n/a") || raw.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>()
        .map_err(|_| anyhow::anyhow!("non-numeric value '{}'", raw))
}

#[derive(Debug, Deserialize)]
struct RawComponentMeta {
    #[serde(rename = "Mask")]
    mask: Option<String>,
    #[serde(rename = "VarianceExplained")]
    variance_explained: Option<f64>,
    #[serde(rename = "MotionNoise")]
    motion_noise: Option<bool>,
}

pub fn parse_metadata_json(content: &str, source: &str) -> Result<ConfoundMetadata> {
    let raw: HashMap<String, serde_json::Value> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse confounds JSON {}", source))?;

    let mut meta = ConfoundMetadata::new();
    for (name, value) in raw {
        // Only per-component entries are objects; anything else carries no selection attributes.
        if !value.is_object() {
            continue;
        }
        let entry: RawComponentMeta = serde_json::from_value(value)
            .with_context(|| format!("{}: invalid metadata for '{}'", source, name))?;
        if let Some(v) = entry.variance_explained {
            if !(0.0..=1.0).contains(&v) {
                bail!(
                    "{}: VarianceExplained for '{}' out of range [0, 1]: {}",
                    source,
                    name,
                    v
                );
            }
        }
        meta.insert(
            name,
            ComponentMeta {
                tissue: entry.mask.as_deref().and_then(Tissue::from_label),
                variance_explained: entry.variance_explained,
                motion_noise: entry.motion_noise.unwrap_or(false),
            },
        );
    }
    Ok(meta)
}
