use approx::assert_relative_eq;
use fmri_denoiseqc::io::nifti::{
    Geometry, geometry_from_header, read_series, read_volume, write_series, write_volume,
};
use ndarray::{Array3, Array4};
use tempfile::TempDir;

fn geometry() -> Geometry {
    Geometry {
        dims: (4, 3, 2),
        voxel_size: (2.0, 2.0, 3.0),
        affine: [
            -2.0, 0.0, 0.0, 90.0, //
            0.0, 2.0, 0.0, -126.0, //
            0.0, 0.0, 3.0, -72.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
        tr: Some(2.0),
    }
}

#[test]
fn volume_round_trips_through_gzip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("map.nii.gz");
    let volume = Array3::from_shape_fn((4, 3, 2), |(x, y, z)| (x * 100 + y * 10 + z) as f64 * 0.25);
    write_volume(&path, &volume, &geometry()).unwrap();

    let (geom, back) = read_volume(&path).unwrap();
    assert_eq!(back.dim(), (4, 3, 2));
    assert_eq!(back, volume);
    assert_eq!(geom.dims, (4, 3, 2));
    assert_eq!(geom.voxel_size, (2.0, 2.0, 3.0));
    assert_eq!(geom.affine, geometry().affine);
}

#[test]
fn series_round_trips_uncompressed() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bold.nii");
    let series = Array4::from_shape_fn((4, 3, 2, 5), |(x, y, z, t)| {
        (x + 2 * y + 3 * z) as f64 + t as f64 * 0.5
    });
    write_series(&path, &series, &geometry()).unwrap();

    let (geom, back) = read_series(&path).unwrap();
    assert_eq!(back.dim(), (4, 3, 2, 5));
    for (a, b) in back.iter().zip(series.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-6);
    }
    assert_eq!(geom.tr, Some(2.0));
}

#[test]
fn series_is_not_a_volume() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bold.nii");
    let series = Array4::<f64>::zeros((2, 2, 2, 3));
    write_series(&path, &series, &Geometry::identity((2, 2, 2))).unwrap();
    assert!(read_volume(&path).is_err());
}

fn qform_header(b: f32, c: f32, d: f32, qfac: f32) -> nifti::NiftiHeader {
    nifti::NiftiHeader {
        dim: [3, 4, 3, 2, 1, 1, 1, 1],
        pixdim: [qfac, 2.0, 2.0, 3.0, 1.0, 1.0, 1.0, 1.0],
        sform_code: 0,
        qform_code: 1,
        quatern_b: b,
        quatern_c: c,
        quatern_d: d,
        quatern_x: 90.0,
        quatern_y: -126.0,
        quatern_z: -72.0,
        ..nifti::NiftiHeader::default()
    }
}

#[test]
fn qform_is_used_without_sform() {
    let geom = geometry_from_header(&qform_header(0.0, 0.0, 0.0, 1.0));
    assert_eq!(
        geom.affine,
        [
            2.0, 0.0, 0.0, 90.0, //
            0.0, 2.0, 0.0, -126.0, //
            0.0, 0.0, 3.0, -72.0, //
            0.0, 0.0, 0.0, 1.0,
        ]
    );
}

#[test]
fn qform_rotation_and_handedness() {
    // 180 degrees about z, left-handed storage.
    let geom = geometry_from_header(&qform_header(0.0, 0.0, 1.0, -1.0));
    assert_eq!(
        geom.affine,
        [
            -2.0, 0.0, 0.0, 90.0, //
            0.0, -2.0, 0.0, -126.0, //
            0.0, 0.0, -3.0, -72.0, //
            0.0, 0.0, 0.0, 1.0,
        ]
    );
}

#[test]
fn sform_takes_precedence_over_qform() {
    let mut header = qform_header(0.0, 0.0, 1.0, 1.0);
    header.sform_code = 1;
    header.srow_x = [1.5, 0.0, 0.0, 10.0];
    header.srow_y = [0.0, 1.5, 0.0, 20.0];
    header.srow_z = [0.0, 0.0, 1.5, 30.0];
    let geom = geometry_from_header(&header);
    assert_eq!(&geom.affine[..4], &[1.5, 0.0, 0.0, 10.0]);
    assert_eq!(&geom.affine[8..12], &[0.0, 0.0, 1.5, 30.0]);
}
