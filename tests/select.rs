use std::collections::HashSet;

use fmri_denoiseqc::DenoiseError;
use fmri_denoiseqc::confounds::catalog::{FRISTON24, GSR4, PHYS8};
use fmri_denoiseqc::confounds::{
    ComponentMeta, ComponentShortfall, ConfoundMetadata, ConfoundTable, SelectOptions, Strategy,
    Tissue, WarningKind, confound_matrix, select_confounds,
};
use ndarray::array;

fn table(columns: &[&str]) -> ConfoundTable {
    ConfoundTable::from_columns(columns, 4).unwrap()
}

fn tissue(t: Tissue, variance: f64) -> ComponentMeta {
    ComponentMeta {
        tissue: Some(t),
        variance_explained: Some(variance),
        motion_noise: false,
    }
}

fn noise(flagged: bool) -> ComponentMeta {
    ComponentMeta {
        motion_noise: flagged,
        ..ComponentMeta::default()
    }
}

/// Every column any catalog entry can ask for, plus 6 CSF, 6 WM and 4 ICA components.
fn full_fixture() -> (ConfoundTable, ConfoundMetadata) {
    let mut cols: Vec<String> = FRISTON24.iter().map(|s| s.to_string()).collect();
    cols.extend(PHYS8.iter().map(|s| s.to_string()));
    cols.extend(GSR4.iter().map(|s| s.to_string()));
    let mut meta = ConfoundMetadata::new();
    for i in 0..12 {
        let name = format!("a_comp_cor_{:02}", i);
        let t = if i % 2 == 0 { Tissue::Csf } else { Tissue::Wm };
        meta.insert(name.clone(), tissue(t, 0.2));
        cols.push(name);
    }
    for i in 0..4 {
        let name = format!("aroma_motion_{:02}", i);
        meta.insert(format!("aroma_motion_{}", i), noise(true));
        cols.push(name);
    }
    cols.push("motion_outlier00".to_string());
    cols.push("motion_outlier01".to_string());
    (ConfoundTable::from_columns(&cols, 4).unwrap(), meta)
}

#[test]
fn six_hmp_two_phys_keeps_table_order() {
    let cols = [
        "trans_x",
        "trans_y",
        "trans_z",
        "rot_x",
        "rot_y",
        "rot_z",
        "csf",
        "white_matter",
    ];
    let sel = select_confounds(
        Strategy::Hmp6Phys2,
        &table(&cols),
        &ConfoundMetadata::new(),
        &SelectOptions::default(),
    )
    .unwrap();
    assert_eq!(sel.columns, cols.to_vec());
    assert!(sel.warnings.is_empty());
}

#[test]
fn every_strategy_selects_a_duplicate_free_subset() {
    let (table, meta) = full_fixture();
    let available: HashSet<&String> = table.columns().iter().collect();
    for strategy in Strategy::ALL {
        let sel = select_confounds(strategy, &table, &meta, &SelectOptions::default()).unwrap();
        let unique: HashSet<&String> = sel.columns.iter().collect();
        assert_eq!(unique.len(), sel.columns.len(), "{} has duplicates", strategy);
        assert!(
            sel.columns.iter().all(|c| available.contains(c)),
            "{} selected a column outside the table",
            strategy
        );
    }
}

#[test]
fn friston24_strategies_start_with_the_24_motion_columns() {
    let (table, meta) = full_fixture();
    for strategy in Strategy::ALL {
        if !strategy
            .fragments()
            .contains(&fmri_denoiseqc::confounds::Fragment::Friston24)
        {
            continue;
        }
        let sel = select_confounds(strategy, &table, &meta, &SelectOptions::default()).unwrap();
        assert_eq!(&sel.columns[..24], &FRISTON24[..], "{}", strategy);
    }
}

#[test]
fn missing_fixed_column_names_the_column() {
    let err = select_confounds(
        Strategy::Hmp6Phys2,
        &table(&["trans_x", "trans_y", "trans_z", "rot_x", "rot_y", "rot_z", "csf"]),
        &ConfoundMetadata::new(),
        &SelectOptions::default(),
    )
    .unwrap_err();
    match err {
        DenoiseError::MissingConfound { name, .. } => assert_eq!(name, "white_matter"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn acompcor_fixed_takes_first_five_per_tissue_in_table_order() {
    let (table, meta) = full_fixture();
    let sel = select_confounds(
        Strategy::Hmp24ACompCor,
        &table,
        &meta,
        &SelectOptions::default(),
    )
    .unwrap();
    let comps: Vec<&str> = sel.columns[24..].iter().map(|s| s.as_str()).collect();
    assert_eq!(
        comps,
        vec![
            "a_comp_cor_00",
            "a_comp_cor_02",
            "a_comp_cor_04",
            "a_comp_cor_06",
            "a_comp_cor_08",
            "a_comp_cor_01",
            "a_comp_cor_03",
            "a_comp_cor_05",
            "a_comp_cor_07",
            "a_comp_cor_09",
        ]
    );
}

fn short_fixture() -> (ConfoundTable, ConfoundMetadata) {
    let mut cols: Vec<String> = FRISTON24.iter().map(|s| s.to_string()).collect();
    let mut meta = ConfoundMetadata::new();
    for i in 0..3 {
        let name = format!("a_comp_cor_{:02}", i);
        meta.insert(name.clone(), tissue(Tissue::Csf, 0.1));
        cols.push(name);
    }
    for i in 3..9 {
        let name = format!("a_comp_cor_{:02}", i);
        meta.insert(name.clone(), tissue(Tissue::Wm, 0.1));
        cols.push(name);
    }
    (ConfoundTable::from_columns(&cols, 4).unwrap(), meta)
}

#[test]
fn acompcor_fixed_shortfall_fails_by_default() {
    let (table, meta) = short_fixture();
    let err = select_confounds(
        Strategy::Hmp24ACompCor,
        &table,
        &meta,
        &SelectOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DenoiseError::MissingConfound { .. }));
    assert!(err.to_string().contains("CSF"));
}

#[test]
fn acompcor_fixed_shortfall_can_warn_instead() {
    let (table, meta) = short_fixture();
    let opts = SelectOptions {
        shortfall: ComponentShortfall::Warn,
    };
    let sel = select_confounds(Strategy::Hmp24ACompCor, &table, &meta, &opts).unwrap();
    assert_eq!(sel.columns.len(), 24 + 3 + 5);
    assert_eq!(sel.warnings.len(), 1);
    assert_eq!(sel.warnings[0].kind, WarningKind::ComponentShortfall);
}

#[test]
fn acompcor_variance_resets_at_tissue_switch() {
    let mut cols: Vec<String> = FRISTON24.iter().map(|s| s.to_string()).collect();
    let mut meta = ConfoundMetadata::new();
    let spec = [
        ("a_comp_cor_00", Tissue::Csf, 0.3),
        ("a_comp_cor_01", Tissue::Csf, 0.25),
        ("a_comp_cor_02", Tissue::Csf, 0.1),
        ("a_comp_cor_03", Tissue::Wm, 0.6),
        ("a_comp_cor_04", Tissue::Wm, 0.2),
    ];
    for (name, t, v) in spec {
        meta.insert(name, tissue(t, v));
        cols.push(name.to_string());
    }
    let table = ConfoundTable::from_columns(&cols, 4).unwrap();
    let sel = select_confounds(
        Strategy::Hmp24ACompCor50,
        &table,
        &meta,
        &SelectOptions::default(),
    )
    .unwrap();
    assert_eq!(
        &sel.columns[24..],
        &["a_comp_cor_00", "a_comp_cor_01", "a_comp_cor_03"]
    );
}

#[test]
fn acompcor_variance_requires_variance_field() {
    let mut cols: Vec<String> = FRISTON24.iter().map(|s| s.to_string()).collect();
    cols.push("a_comp_cor_00".to_string());
    let mut meta = ConfoundMetadata::new();
    meta.insert(
        "a_comp_cor_00",
        ComponentMeta {
            tissue: Some(Tissue::Csf),
            ..ComponentMeta::default()
        },
    );
    let table = ConfoundTable::from_columns(&cols, 4).unwrap();
    let err = select_confounds(
        Strategy::Hmp24ACompCor50,
        &table,
        &meta,
        &SelectOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("a_comp_cor_00.VarianceExplained"));
}

#[test]
fn ica_uses_flagged_components_and_warns_on_mismatch() {
    let cols = [
        "csf",
        "white_matter",
        "aroma_motion_01",
        "aroma_motion_02",
        "aroma_motion_03",
    ];
    let meta: ConfoundMetadata = [
        ("aroma_motion_1".to_string(), noise(true)),
        ("aroma_motion_2".to_string(), noise(false)),
        ("aroma_motion_3".to_string(), noise(true)),
    ]
    .into_iter()
    .collect();
    let sel = select_confounds(
        Strategy::IcaAromaPhys2,
        &table(&cols),
        &meta,
        &SelectOptions::default(),
    )
    .unwrap();
    assert_eq!(
        sel.columns,
        vec!["aroma_motion_01", "aroma_motion_03", "csf", "white_matter"]
    );
    assert_eq!(sel.warnings.len(), 1);
    assert_eq!(sel.warnings[0].kind, WarningKind::IcaNoiseCount);
}

#[test]
fn empty_dynamic_fragment_is_fine_alongside_others() {
    let cols = ["csf", "white_matter"];
    let sel = select_confounds(
        Strategy::IcaAromaPhys2,
        &table(&cols),
        &ConfoundMetadata::new(),
        &SelectOptions::default(),
    )
    .unwrap();
    assert_eq!(sel.columns, vec!["csf", "white_matter"]);
    assert!(sel.warnings.is_empty());
}

#[test]
fn strategy_with_only_empty_dynamic_fragments_fails() {
    let err = select_confounds(
        Strategy::IcaAromaSpike,
        &table(&["csf"]),
        &ConfoundMetadata::new(),
        &SelectOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DenoiseError::MissingConfound { .. }));
}

#[test]
fn spike_columns_keep_table_order() {
    let mut cols: Vec<String> = FRISTON24.iter().map(|s| s.to_string()).collect();
    cols.extend(PHYS8.iter().map(|s| s.to_string()));
    cols.push("motion_outlier03".to_string());
    cols.push("motion_outlier01".to_string());
    let table = ConfoundTable::from_columns(&cols, 4).unwrap();
    let sel = select_confounds(
        Strategy::Hmp24Phys8Spike,
        &table,
        &ConfoundMetadata::new(),
        &SelectOptions::default(),
    )
    .unwrap();
    assert_eq!(sel.columns.len(), 34);
    assert_eq!(&sel.columns[32..], &["motion_outlier03", "motion_outlier01"]);
}

#[test]
fn confound_matrix_zero_fills_missing_values() {
    let data = array![[f64::NAN, 1.0], [0.5, 2.0], [0.25, f64::NAN]];
    let table = ConfoundTable::new(vec!["csf".into(), "white_matter".into()], data).unwrap();
    let sel = select_confounds(
        Strategy::IcaAromaPhys2,
        &table,
        &ConfoundMetadata::new(),
        &SelectOptions::default(),
    )
    .unwrap();
    let m = confound_matrix(&table, &sel).unwrap();
    assert_eq!(m, array![[0.0, 1.0], [0.5, 2.0], [0.25, 0.0]]);
}
