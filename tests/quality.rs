use approx::assert_relative_eq;
use fmri_denoiseqc::confounds::parse_confound_tsv;
use fmri_denoiseqc::quality::{FdOptions, framewise_displacement, global_signal, median_of, temporal_snr};
use ndarray::array;

#[test]
fn fd_percent_uses_all_frames_as_denominator() {
    let table = parse_confound_tsv(
        "framewise_displacement\ttrans_x\nn/a\t0\n0.1\t0\n0.3\t0\n0.5\t0\n0.2\t0\n",
        "fd.tsv",
    )
    .unwrap();
    let fd = framewise_displacement(&table, &FdOptions::default()).unwrap();
    assert_eq!(fd.n_frames, 5);
    assert_eq!(fd.n_above, 2);
    assert_relative_eq!(fd.percent_above, 40.0, epsilon = 1e-12);
    assert_relative_eq!(fd.mean, 0.275, epsilon = 1e-12);
    assert_eq!(fd.max, 0.5);

    let strict = FdOptions { threshold: 0.4 };
    assert_eq!(framewise_displacement(&table, &strict).unwrap().n_above, 1);
}

#[test]
fn fd_absent_column_yields_none() {
    let table = parse_confound_tsv("trans_x\n0\n1\n", "nofd.tsv").unwrap();
    assert!(framewise_displacement(&table, &FdOptions::default()).is_none());
}

#[test]
fn tsnr_is_mean_over_std_with_flat_voxels_zero() {
    let m = array![[1.0, 5.0], [3.0, 5.0]];
    let tsnr = temporal_snr(m.view());
    assert_relative_eq!(tsnr[0], 2.0, epsilon = 1e-12);
    assert_eq!(tsnr[1], 0.0);
    assert_relative_eq!(median_of(&tsnr), 1.0, epsilon = 1e-12);
}

#[test]
fn global_signal_is_mean_of_zscored_voxels() {
    // Voxel 0 and 1 z-score to the same series, voxel 2 is flat and ignored.
    let m = array![[1.0, 10.0, 7.0], [2.0, 20.0, 7.0], [3.0, 30.0, 7.0]];
    let gs = global_signal(m.view());
    let z = (1.5f64).sqrt();
    assert_relative_eq!(gs[0], -z, epsilon = 1e-12);
    assert_relative_eq!(gs[1], 0.0, epsilon = 1e-12);
    assert_relative_eq!(gs[2], z, epsilon = 1e-12);
}

#[test]
fn inexact_constant_voxels_are_flat() {
    let m = array![[0.1, 1.0], [0.1, 2.0], [0.1, 3.0]];
    let tsnr = temporal_snr(m.view());
    assert_eq!(tsnr[0], 0.0);

    // The flat voxel is left out, so the global signal is the z-scored second voxel.
    let gs = global_signal(m.view());
    let z = (1.5f64).sqrt();
    assert_relative_eq!(gs[0], -z, epsilon = 1e-12);
    assert_relative_eq!(gs[2], z, epsilon = 1e-12);
}
