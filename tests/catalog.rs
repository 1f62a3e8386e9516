use std::collections::HashSet;

use fmri_denoiseqc::DenoiseError;
use fmri_denoiseqc::confounds::catalog::FRISTON24;
use fmri_denoiseqc::confounds::{Fragment, Strategy};

#[test]
fn every_strategy_parses_from_its_own_name() {
    for strategy in Strategy::ALL {
        let parsed: Strategy = strategy.name().parse().unwrap();
        assert_eq!(parsed, strategy);
    }
}

#[test]
fn catalog_names_are_unique() {
    let names: HashSet<&str> = Strategy::ALL.iter().map(|s| s.name()).collect();
    assert_eq!(names.len(), Strategy::ALL.len());
    assert_eq!(Strategy::ALL.len(), 21);
}

#[test]
fn plus_separator_and_case_are_accepted() {
    let a: Strategy = "24HMP+8Phys+4GSR+Spike".parse().unwrap();
    let b: Strategy = "24hmp-8phys-4gsr-spike".parse().unwrap();
    assert_eq!(a, Strategy::Hmp24Phys8Gsr4Spike);
    assert_eq!(a, b);
}

#[test]
fn unknown_name_is_rejected() {
    let err = "36P".parse::<Strategy>().unwrap_err();
    assert_eq!(
        err,
        DenoiseError::UnknownStrategy {
            name: "36P".to_string()
        }
    );
}

#[test]
fn fragments_follow_motion_phys_component_gsr_spike_order() {
    fn rank(f: &Fragment) -> usize {
        match f {
            Fragment::TransRot | Fragment::Hmp12 | Fragment::Friston24 => 0,
            Fragment::Phys2 | Fragment::Phys8 => 1,
            Fragment::ACompCorFixed5 | Fragment::ACompCorVar50 | Fragment::IcaAroma => 2,
            Fragment::Gsr1 | Fragment::Gsr4 => 3,
            Fragment::Spike => 4,
        }
    }
    for strategy in Strategy::ALL {
        if strategy == Strategy::ForPlottingOnly {
            continue;
        }
        let ranks: Vec<usize> = strategy.fragments().iter().map(rank).collect();
        assert!(
            ranks.windows(2).all(|w| w[0] < w[1]),
            "{} has fragments out of order",
            strategy
        );
    }
}

#[test]
fn friston24_has_24_distinct_columns() {
    let cols = Fragment::Friston24.fixed_columns().unwrap();
    assert_eq!(cols.len(), 24);
    assert_eq!(cols, FRISTON24.to_vec());
    let unique: HashSet<&str> = cols.into_iter().collect();
    assert_eq!(unique.len(), 24);
}

#[test]
fn dynamic_fragments_have_prefixes() {
    assert_eq!(Fragment::ACompCorFixed5.prefix(), Some("a_comp_cor"));
    assert_eq!(Fragment::IcaAroma.prefix(), Some("aroma_motion"));
    assert_eq!(Fragment::Spike.prefix(), Some("motion_outlier"));
    assert!(Fragment::Spike.fixed_columns().is_none());
    assert!(Fragment::Phys8.prefix().is_none());
}
