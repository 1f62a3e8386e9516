//! NIfTI-1 volumes: 3-D masks/maps and 4-D time series.
//!
//! Arrays are indexed `[x, y, z]` / `[x, y, z, t]`. Files ending in `.gz`
//! are read and written gzip-compressed.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use flate2::Compression;
use flate2::write::GzEncoder;
use ndarray::{Array3, Array4, ArrayD, Ix3, Ix4};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use tracing::info;

const HEADER_SIZE: usize = 348;
const VOX_OFFSET: usize = 352;
const DT_FLOAT32: i16 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub dims: (usize, usize, usize),
    pub voxel_size: (f64, f64, f64),
    /// Row-major 4x4 voxel-to-world transform.
    pub affine: [f64; 16],
    /// Repetition time in seconds, when the file carries one.
    pub tr: Option<f64>,
}

impl Geometry {
    pub fn identity(dims: (usize, usize, usize)) -> Self {
        Self {
            dims,
            voxel_size: (1.0, 1.0, 1.0),
            affine: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
            tr: None,
        }
    }
}

fn read_object(path: &Path) -> Result<(Geometry, ArrayD<f64>)> {
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("failed to read NIfTI {}", path.display()))?;
    let geometry = geometry_from_header(obj.header());
    let data = obj
        .into_volume()
        .into_ndarray::<f64>()
        .with_context(|| format!("failed to decode NIfTI volume {}", path.display()))?;
    Ok((geometry, data))
}

/// World transform priority: sform, then qform, then voxel size alone.
pub fn geometry_from_header(header: &NiftiHeader) -> Geometry {
    let dim = header.dim;
    let pixdim = header.pixdim;
    let voxel_size = (pixdim[1] as f64, pixdim[2] as f64, pixdim[3] as f64);
    let affine = if header.sform_code > 0 {
        let (s, t, u) = (&header.srow_x, &header.srow_y, &header.srow_z);
        [
            s[0] as f64, s[1] as f64, s[2] as f64, s[3] as f64, //
            t[0] as f64, t[1] as f64, t[2] as f64, t[3] as f64, //
            u[0] as f64, u[1] as f64, u[2] as f64, u[3] as f64, //
            0.0, 0.0, 0.0, 1.0,
        ]
    } else if header.qform_code > 0 {
        qform_affine(header, voxel_size)
    } else {
        [
            voxel_size.0, 0.0, 0.0, 0.0, //
            0.0, voxel_size.1, 0.0, 0.0, //
            0.0, 0.0, voxel_size.2, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]
    };
    let tr = if dim[0] >= 4 && pixdim[4] > 0.0 {
        Some(pixdim[4] as f64)
    } else {
        None
    };
    Geometry {
        dims: (dim[1].max(1) as usize, dim[2].max(1) as usize, dim[3].max(1) as usize),
        voxel_size,
        affine,
        tr,
    }
}

/// NIfTI-1 method 2: rotation from the (b, c, d) quaternion, `pixdim[0]` as the z handedness.
fn qform_affine(header: &NiftiHeader, voxel_size: (f64, f64, f64)) -> [f64; 16] {
    let b = header.quatern_b as f64;
    let c = header.quatern_c as f64;
    let d = header.quatern_d as f64;
    let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
    let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
    let (dx, dy, dz) = (voxel_size.0, voxel_size.1, voxel_size.2 * qfac);

    let r = [
        [a * a + b * b - c * c - d * d, 2.0 * (b * c - a * d), 2.0 * (b * d + a * c)],
        [2.0 * (b * c + a * d), a * a + c * c - b * b - d * d, 2.0 * (c * d - a * b)],
        [2.0 * (b * d - a * c), 2.0 * (c * d + a * b), a * a + d * d - b * b - c * c],
    ];
    let offset = [
        header.quatern_x as f64,
        header.quatern_y as f64,
        header.quatern_z as f64,
    ];
    let mut affine = [0.0; 16];
    for row in 0..3 {
        affine[row * 4] = r[row][0] * dx;
        affine[row * 4 + 1] = r[row][1] * dy;
        affine[row * 4 + 2] = r[row][2] * dz;
        affine[row * 4 + 3] = offset[row];
    }
    affine[15] = 1.0;
    affine
}

/// 3-D volume. A 4-D file with a single frame is accepted.
pub fn read_volume(path: &Path) -> Result<(Geometry, Array3<f64>)> {
    let (geometry, data) = read_object(path)?;
    let data = match data.ndim() {
        3 => data,
        4 if data.shape()[3] == 1 => data.index_axis_move(ndarray::Axis(3), 0),
        n => bail!("{}: expected a 3-D volume, found {}-D", path.display(), n),
    };
    let volume = data
        .into_dimensionality::<Ix3>()
        .with_context(|| format!("{}: not a 3-D volume", path.display()))?;
    info!(path = %path.display(), dims = ?volume.dim(), "volume_loaded");
    Ok((geometry, volume))
}

pub fn read_series(path: &Path) -> Result<(Geometry, Array4<f64>)> {
    let (geometry, data) = read_object(path)?;
    if data.ndim() != 4 {
        bail!("{}: expected a 4-D series, found {}-D", path.display(), data.ndim());
    }
    let series = data
        .into_dimensionality::<Ix4>()
        .with_context(|| format!("{}: not a 4-D series", path.display()))?;
    info!(path = %path.display(), dims = ?series.dim(), "series_loaded");
    Ok((geometry, series))
}

pub fn write_volume(path: &Path, volume: &Array3<f64>, geometry: &Geometry) -> Result<()> {
    let (nx, ny, nz) = volume.dim();
    let mut data = Vec::with_capacity(volume.len());
    // NIfTI stores x fastest.
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                data.push(volume[[i, j, k]]);
            }
        }
    }
    let bytes = encode(&data, &[nx, ny, nz], geometry)?;
    write_bytes(path, &bytes)
}

pub fn write_series(path: &Path, series: &Array4<f64>, geometry: &Geometry) -> Result<()> {
    let (nx, ny, nz, nt) = series.dim();
    let mut data = Vec::with_capacity(series.len());
    for t in 0..nt {
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    data.push(series[[i, j, k, t]]);
                }
            }
        }
    }
    let bytes = encode(&data, &[nx, ny, nz, nt], geometry)?;
    write_bytes(path, &bytes)
}

fn encode(data: &[f64], shape: &[usize], geometry: &Geometry) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(&(HEADER_SIZE as i32).to_le_bytes());

    let mut dim = [1i16; 8];
    dim[0] = shape.len() as i16;
    for (i, &n) in shape.iter().enumerate() {
        dim[i + 1] = i16::try_from(n).with_context(|| format!("dimension {} too large for NIfTI-1", n))?;
    }
    for (i, d) in dim.iter().enumerate() {
        let offset = 40 + i * 2;
        header[offset..offset + 2].copy_from_slice(&d.to_le_bytes());
    }

    header[70..72].copy_from_slice(&DT_FLOAT32.to_le_bytes());
    header[72..74].copy_from_slice(&32i16.to_le_bytes());

    let (vx, vy, vz) = geometry.voxel_size;
    let tr = geometry.tr.unwrap_or(1.0);
    let pixdim: [f32; 8] = [1.0, vx as f32, vy as f32, vz as f32, tr as f32, 1.0, 1.0, 1.0];
    for (i, p) in pixdim.iter().enumerate() {
        let offset = 76 + i * 4;
        header[offset..offset + 4].copy_from_slice(&p.to_le_bytes());
    }

    header[108..112].copy_from_slice(&(VOX_OFFSET as f32).to_le_bytes());
    // scl_slope = 1, scl_inter = 0
    header[112..116].copy_from_slice(&1.0f32.to_le_bytes());
    header[116..120].copy_from_slice(&0.0f32.to_le_bytes());
    // xyzt_units: mm + seconds
    header[123] = 2 | 8;
    // sform_code = 1 (scanner anat)
    header[254..256].copy_from_slice(&1i16.to_le_bytes());
    for row in 0..3 {
        for col in 0..4 {
            let offset = 280 + row * 16 + col * 4;
            let v = geometry.affine[row * 4 + col] as f32;
            header[offset..offset + 4].copy_from_slice(&v.to_le_bytes());
        }
    }
    header[344..348].copy_from_slice(b"n+1\0");

    let mut buffer = Vec::with_capacity(VOX_OFFSET + data.len() * 4);
    buffer.extend_from_slice(&header);
    buffer.extend_from_slice(&[0u8; VOX_OFFSET - HEADER_SIZE]);
    for &v in data {
        buffer.extend_from_slice(&(v as f32).to_le_bytes());
    }
    Ok(buffer)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        encoder.write_all(bytes)?;
        encoder.finish()?.flush()?;
    } else {
        writer.write_all(bytes)?;
        writer.flush()?;
    }
    Ok(())
}
