use std::collections::HashSet;

use ndarray::Array2;

use crate::confounds::catalog::{
    ACOMPCOR_FIXED_COUNT, ACOMPCOR_PREFIX, ACOMPCOR_VARIANCE_TARGET, AROMA_PREFIX, Fragment,
    SPIKE_PREFIX, Strategy,
};
use crate::confounds::{ComponentMeta, ConfoundMetadata, ConfoundTable, Tissue};
use crate::error::DenoiseError;

/// What to do when a fixed-count component rule finds fewer candidates than it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentShortfall {
    #[default]
    Fail,
    Warn,
}

#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    pub shortfall: ComponentShortfall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    IcaNoiseCount,
    ComponentShortfall,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityWarning {
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub strategy: Strategy,
    pub columns: Vec<String>,
    pub warnings: Vec<IntegrityWarning>,
}

pub fn select_confounds(
    strategy: Strategy,
    table: &ConfoundTable,
    meta: &ConfoundMetadata,
    opts: &SelectOptions,
) -> Result<Selection, DenoiseError> {
    let mut columns = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for fragment in strategy.fragments() {
        let part = resolve_fragment(*fragment, table, meta, opts, &mut warnings)?;
        for name in part {
            if seen.insert(name.clone()) {
                columns.push(name);
            }
        }
    }

    if columns.is_empty() {
        // Only reachable when every fragment is dynamic and none found candidates.
        let first = strategy
            .fragments()
            .iter()
            .find_map(|f| f.prefix())
            .unwrap_or("confounds");
        return Err(DenoiseError::missing(
            format!("{}*", first),
            format!("strategy '{}' resolved to zero columns", strategy),
        ));
    }

    Ok(Selection {
        strategy,
        columns,
        warnings,
    })
}

fn resolve_fragment(
    fragment: Fragment,
    table: &ConfoundTable,
    meta: &ConfoundMetadata,
    opts: &SelectOptions,
    warnings: &mut Vec<IntegrityWarning>,
) -> Result<Vec<String>, DenoiseError> {
    match fragment {
        Fragment::ACompCorFixed5 => acompcor_fixed(table, meta, opts, warnings),
        Fragment::ACompCorVar50 => acompcor_variance(table, meta),
        Fragment::IcaAroma => ica_noise(table, meta, warnings),
        Fragment::Spike => Ok(table.with_prefix(SPIKE_PREFIX).cloned().collect()),
        _ => fixed_fragment(fragment, table),
    }
}

fn fixed_fragment(fragment: Fragment, table: &ConfoundTable) -> Result<Vec<String>, DenoiseError> {
    fragment
        .fixed_columns()
        .unwrap_or_default()
        .into_iter()
        .map(|name| {
            if table.contains(name) {
                Ok(name.to_string())
            } else {
                Err(DenoiseError::missing(
                    name,
                    format!("required by fragment '{}'", fragment),
                ))
            }
        })
        .collect()
}

fn component_meta<'a>(meta: &'a ConfoundMetadata, name: &str) -> Result<&'a ComponentMeta, DenoiseError> {
    meta.get(name)
        .ok_or_else(|| DenoiseError::missing(name, "no entry in confound metadata"))
}

fn acompcor_fixed(
    table: &ConfoundTable,
    meta: &ConfoundMetadata,
    opts: &SelectOptions,
    warnings: &mut Vec<IntegrityWarning>,
) -> Result<Vec<String>, DenoiseError> {
    let mut out = Vec::with_capacity(2 * ACOMPCOR_FIXED_COUNT);
    for tissue in [Tissue::Csf, Tissue::Wm] {
        let mut picked = 0usize;
        for name in table.with_prefix(ACOMPCOR_PREFIX) {
            if picked == ACOMPCOR_FIXED_COUNT {
                break;
            }
            if component_meta(meta, name)?.tissue == Some(tissue) {
                out.push(name.clone());
                picked += 1;
            }
        }
        if picked < ACOMPCOR_FIXED_COUNT {
            let detail = format!(
                "found {} of {} {} components",
                picked,
                ACOMPCOR_FIXED_COUNT,
                tissue.label()
            );
            match opts.shortfall {
                ComponentShortfall::Fail => {
                    return Err(DenoiseError::missing(
                        format!("{}* ({})", ACOMPCOR_PREFIX, tissue.label()),
                        detail,
                    ));
                }
                ComponentShortfall::Warn => warnings.push(IntegrityWarning {
                    kind: WarningKind::ComponentShortfall,
                    message: detail,
                }),
            }
        }
    }
    Ok(out)
}

fn acompcor_variance(table: &ConfoundTable, meta: &ConfoundMetadata) -> Result<Vec<String>, DenoiseError> {
    let mut out = Vec::new();
    for tissue in [Tissue::Csf, Tissue::Wm] {
        let mut cumulative = 0.0f64;
        for name in table.with_prefix(ACOMPCOR_PREFIX) {
            if cumulative >= ACOMPCOR_VARIANCE_TARGET {
                break;
            }
            let entry = component_meta(meta, name)?;
            if entry.tissue != Some(tissue) {
                continue;
            }
            let variance = entry.variance_explained.ok_or_else(|| {
                DenoiseError::missing(format!("{}.VarianceExplained", name), "field absent in metadata")
            })?;
            out.push(name.clone());
            cumulative += variance;
        }
    }
    Ok(out)
}

fn ica_noise(
    table: &ConfoundTable,
    meta: &ConfoundMetadata,
    warnings: &mut Vec<IntegrityWarning>,
) -> Result<Vec<String>, DenoiseError> {
    let mut total = 0usize;
    let mut flagged = Vec::new();
    for name in table.with_prefix(AROMA_PREFIX) {
        total += 1;
        let entry = match meta.get(name) {
            Some(entry) => entry,
            None => component_meta(meta, &strip_index_zeros(name))?,
        };
        if entry.motion_noise {
            flagged.push(name.clone());
        }
    }
    if flagged.len() != total {
        warnings.push(IntegrityWarning {
            kind: WarningKind::IcaNoiseCount,
            message: format!(
                "{} of {} ICA components are flagged as motion noise; using flagged components only",
                flagged.len(),
                total
            ),
        });
    }
    Ok(flagged)
}

/// `aroma_motion_007` -> `aroma_motion_7`, matching how component keys are written in the metadata.
fn strip_index_zeros(name: &str) -> String {
    match name.rsplit_once('_') {
        Some((stem, idx)) if !idx.is_empty() && idx.chars().all(|c| c.is_ascii_digit()) => {
            let trimmed = idx.trim_start_matches('0');
            let idx = if trimmed.is_empty() { "0" } else { trimmed };
            format!("{}_{}", stem, idx)
        }
        _ => name.to_string(),
    }
}

/// Selected columns as a frames x k matrix, missing values replaced by zero.
pub fn confound_matrix(table: &ConfoundTable, selection: &Selection) -> Result<Array2<f64>, DenoiseError> {
    let mut out = Array2::zeros((table.n_frames(), selection.columns.len()));
    for (k, name) in selection.columns.iter().enumerate() {
        let column = table
            .column(name)
            .ok_or_else(|| DenoiseError::missing(name.as_str(), "selected column absent from table"))?;
        for (dst, &v) in out.column_mut(k).iter_mut().zip(column.iter()) {
            *dst = if v.is_nan() { 0.0 } else { v };
        }
    }
    Ok(out)
}
