mod loader;

pub mod catalog;
pub mod select;

use std::collections::HashMap;

use ndarray::{Array2, ArrayView1};

use crate::error::DenoiseError;

pub use catalog::{Fragment, Strategy};
pub use loader::{load_confound_table, load_metadata, parse_confound_tsv, parse_metadata_json};
pub use select::{
    ComponentShortfall, IntegrityWarning, SelectOptions, Selection, WarningKind, confound_matrix,
    select_confounds,
};

/// Frames x named regressors, as written by the preprocessing pipeline.
/// Missing cells (`n/a`) are stored as NaN.
#[derive(Debug, Clone)]
pub struct ConfoundTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    data: Array2<f64>,
}

impl ConfoundTable {
    pub fn new(columns: Vec<String>, data: Array2<f64>) -> Result<Self, DenoiseError> {
        if data.ncols() != columns.len() {
            return Err(DenoiseError::shape(
                "confound table",
                columns.len(),
                data.ncols(),
            ));
        }
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(DenoiseError::DuplicateColumn { name: name.clone() });
            }
        }
        Ok(Self {
            columns,
            index,
            data,
        })
    }

    /// Zero-filled table; handy when only the header matters.
    pub fn from_columns<S: AsRef<str>>(columns: &[S], n_frames: usize) -> Result<Self, DenoiseError> {
        let names: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let data = Array2::zeros((n_frames, names.len()));
        Self::new(names, data)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_frames(&self) -> usize {
        self.data.nrows()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.position(name).map(|i| self.data.column(i))
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Columns whose name starts with `prefix`, in table order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.columns.iter().filter(move |c| c.starts_with(prefix))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tissue {
    Csf,
    Wm,
}

impl Tissue {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "CSF" => Some(Self::Csf),
            "WM" => Some(Self::Wm),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Csf => "CSF",
            Self::Wm => "WM",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentMeta {
    pub tissue: Option<Tissue>,
    pub variance_explained: Option<f64>,
    pub motion_noise: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ConfoundMetadata {
    entries: HashMap<String, ComponentMeta>,
}

impl ConfoundMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, meta: ComponentMeta) {
        self.entries.insert(name.into(), meta);
    }

    pub fn get(&self, name: &str) -> Option<&ComponentMeta> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ComponentMeta)> for ConfoundMetadata {
    fn from_iter<T: IntoIterator<Item = (String, ComponentMeta)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
