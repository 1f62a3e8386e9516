//! Closed catalog of denoising strategies.
//!
//! Every strategy is an explicit, ordered list of fragments. Fragment order
//! inside a strategy is motion, physiological, component, global signal, spike.

use std::fmt;
use std::str::FromStr;

use crate::error::DenoiseError;

pub const TRANS_ROT: [&str; 6] = ["trans_x", "trans_y", "trans_z", "rot_x", "rot_y", "rot_z"];

pub const MOTION_DERIVATIVES: [&str; 6] = [
    "trans_x_derivative1",
    "trans_y_derivative1",
    "trans_z_derivative1",
    "rot_x_derivative1",
    "rot_y_derivative1",
    "rot_z_derivative1",
];

pub const FRISTON24: [&str; 24] = [
    "trans_x",
    "trans_y",
    "trans_z",
    "rot_x",
    "rot_y",
    "rot_z",
    "trans_x_derivative1",
    "trans_y_derivative1",
    "trans_z_derivative1",
    "trans_x_power2",
    "trans_y_power2",
    "trans_z_power2",
    "trans_x_derivative1_power2",
    "trans_y_derivative1_power2",
    "trans_z_derivative1_power2",
    "rot_x_derivative1",
    "rot_y_derivative1",
    "rot_z_derivative1",
    "rot_x_power2",
    "rot_y_power2",
    "rot_z_power2",
    "rot_x_derivative1_power2",
    "rot_y_derivative1_power2",
    "rot_z_derivative1_power2",
];

pub const PHYS2: [&str; 2] = ["csf", "white_matter"];

pub const PHYS8: [&str; 8] = [
    "csf",
    "csf_derivative1",
    "csf_power2",
    "csf_derivative1_power2",
    "white_matter",
    "white_matter_derivative1",
    "white_matter_power2",
    "white_matter_derivative1_power2",
];

pub const GSR1: [&str; 1] = ["global_signal"];

pub const GSR4: [&str; 4] = [
    "global_signal",
    "global_signal_derivative1",
    "global_signal_derivative1_power2",
    "global_signal_power2",
];

pub const ACOMPCOR_PREFIX: &str = "a_comp_cor";
pub const AROMA_PREFIX: &str = "aroma_motion";
pub const SPIKE_PREFIX: &str = "motion_outlier";

/// Number of components per tissue kept by the fixed-count aCompCor rule.
pub const ACOMPCOR_FIXED_COUNT: usize = 5;
/// Cumulative variance each tissue must reach under the aCompCor50 rule.
pub const ACOMPCOR_VARIANCE_TARGET: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    TransRot,
    Hmp12,
    Friston24,
    Phys2,
    Phys8,
    ACompCorFixed5,
    ACompCorVar50,
    IcaAroma,
    Gsr1,
    Gsr4,
    Spike,
}

impl Fragment {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TransRot => "trans_rot",
            Self::Hmp12 => "hmp12",
            Self::Friston24 => "friston24",
            Self::Phys2 => "phys2",
            Self::Phys8 => "phys8",
            Self::ACompCorFixed5 => "aCompCor-fixed5",
            Self::ACompCorVar50 => "aCompCor-var50",
            Self::IcaAroma => "ica-aroma",
            Self::Gsr1 => "gsr1",
            Self::Gsr4 => "gsr4",
            Self::Spike => "spike",
        }
    }

    /// Fixed column list, or `None` for fragments resolved against the table and metadata.
    pub fn fixed_columns(&self) -> Option<Vec<&'static str>> {
        match self {
            Self::TransRot => Some(TRANS_ROT.to_vec()),
            Self::Hmp12 => Some(TRANS_ROT.iter().chain(MOTION_DERIVATIVES.iter()).copied().collect()),
            Self::Friston24 => Some(FRISTON24.to_vec()),
            Self::Phys2 => Some(PHYS2.to_vec()),
            Self::Phys8 => Some(PHYS8.to_vec()),
            Self::Gsr1 => Some(GSR1.to_vec()),
            Self::Gsr4 => Some(GSR4.to_vec()),
            Self::ACompCorFixed5 | Self::ACompCorVar50 | Self::IcaAroma | Self::Spike => None,
        }
    }

    /// Column prefix scanned by dynamic fragments.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::ACompCorFixed5 | Self::ACompCorVar50 => Some(ACOMPCOR_PREFIX),
            Self::IcaAroma => Some(AROMA_PREFIX),
            Self::Spike => Some(SPIKE_PREFIX),
            _ => None,
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Hmp6,
    Hmp6Phys2,
    Hmp6Phys2Gsr,
    Hmp24,
    Hmp24Phys8,
    Hmp24Phys8Gsr4,
    Hmp24ACompCor,
    Hmp24ACompCorGsr4,
    Hmp24ACompCor50,
    Hmp24ACompCor50Gsr4,
    Hmp12ACompCor,
    Hmp12ACompCorGsr4,
    Hmp12ACompCor50,
    IcaAromaPhys2,
    IcaAromaPhys2Gsr,
    IcaAromaPhys8,
    IcaAromaPhys8Gsr4,
    Hmp24Phys8Spike,
    Hmp24Phys8Gsr4Spike,
    IcaAromaSpike,
    ForPlottingOnly,
}

impl Strategy {
    pub const ALL: [Strategy; 21] = [
        Strategy::Hmp6,
        Strategy::Hmp6Phys2,
        Strategy::Hmp6Phys2Gsr,
        Strategy::Hmp24,
        Strategy::Hmp24Phys8,
        Strategy::Hmp24Phys8Gsr4,
        Strategy::Hmp24ACompCor,
        Strategy::Hmp24ACompCorGsr4,
        Strategy::Hmp24ACompCor50,
        Strategy::Hmp24ACompCor50Gsr4,
        Strategy::Hmp12ACompCor,
        Strategy::Hmp12ACompCorGsr4,
        Strategy::Hmp12ACompCor50,
        Strategy::IcaAromaPhys2,
        Strategy::IcaAromaPhys2Gsr,
        Strategy::IcaAromaPhys8,
        Strategy::IcaAromaPhys8Gsr4,
        Strategy::Hmp24Phys8Spike,
        Strategy::Hmp24Phys8Gsr4Spike,
        Strategy::IcaAromaSpike,
        Strategy::ForPlottingOnly,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hmp6 => "6HMP",
            Self::Hmp6Phys2 => "6HMP-2Phys",
            Self::Hmp6Phys2Gsr => "6HMP-2Phys-GSR",
            Self::Hmp24 => "24HMP",
            Self::Hmp24Phys8 => "24HMP-8Phys",
            Self::Hmp24Phys8Gsr4 => "24HMP-8Phys-4GSR",
            Self::Hmp24ACompCor => "24HMP-aCompCor",
            Self::Hmp24ACompCorGsr4 => "24HMP-aCompCor-4GSR",
            Self::Hmp24ACompCor50 => "24HMP-aCompCor50",
            Self::Hmp24ACompCor50Gsr4 => "24HMP-aCompCor50-4GSR",
            Self::Hmp12ACompCor => "12HMP-aCompCor",
            Self::Hmp12ACompCorGsr4 => "12HMP-aCompCor-4GSR",
            Self::Hmp12ACompCor50 => "12HMP-aCompCor50",
            Self::IcaAromaPhys2 => "ICA-AROMA-2Phys",
            Self::IcaAromaPhys2Gsr => "ICA-AROMA-2Phys-GSR",
            Self::IcaAromaPhys8 => "ICA-AROMA-8Phys",
            Self::IcaAromaPhys8Gsr4 => "ICA-AROMA-8Phys-4GSR",
            Self::Hmp24Phys8Spike => "24HMP-8Phys-Spike",
            Self::Hmp24Phys8Gsr4Spike => "24HMP-8Phys-4GSR-Spike",
            Self::IcaAromaSpike => "ICA-AROMA-Spike",
            Self::ForPlottingOnly => "for_plotting_only",
        }
    }

    pub fn fragments(&self) -> &'static [Fragment] {
        use Fragment::*;
        match self {
            Self::Hmp6 => &[TransRot],
            Self::Hmp6Phys2 => &[TransRot, Phys2],
            Self::Hmp6Phys2Gsr => &[TransRot, Phys2, Gsr1],
            Self::Hmp24 => &[Friston24],
            Self::Hmp24Phys8 => &[Friston24, Phys8],
            Self::Hmp24Phys8Gsr4 => &[Friston24, Phys8, Gsr4],
            Self::Hmp24ACompCor => &[Friston24, ACompCorFixed5],
            Self::Hmp24ACompCorGsr4 => &[Friston24, ACompCorFixed5, Gsr4],
            Self::Hmp24ACompCor50 => &[Friston24, ACompCorVar50],
            Self::Hmp24ACompCor50Gsr4 => &[Friston24, ACompCorVar50, Gsr4],
            Self::Hmp12ACompCor => &[Hmp12, ACompCorFixed5],
            Self::Hmp12ACompCorGsr4 => &[Hmp12, ACompCorFixed5, Gsr4],
            Self::Hmp12ACompCor50 => &[Hmp12, ACompCorVar50],
            Self::IcaAromaPhys2 => &[IcaAroma, Phys2],
            Self::IcaAromaPhys2Gsr => &[IcaAroma, Phys2, Gsr1],
            Self::IcaAromaPhys8 => &[IcaAroma, Phys8],
            Self::IcaAromaPhys8Gsr4 => &[IcaAroma, Phys8, Gsr4],
            Self::Hmp24Phys8Spike => &[Friston24, Phys8, Spike],
            Self::Hmp24Phys8Gsr4Spike => &[Friston24, Phys8, Gsr4, Spike],
            Self::IcaAromaSpike => &[IcaAroma, Spike],
            Self::ForPlottingOnly => &[Friston24, Phys8, IcaAroma, Gsr4],
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = DenoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Strategy::ALL
            .iter()
            .copied()
            .find(|st| normalize_name(st.name()) == wanted)
            .ok_or_else(|| DenoiseError::UnknownStrategy {
                name: s.to_string(),
            })
    }
}

// "24HMP+8Phys+4GSR" and "24hmp-8phys-4gsr" name the same entry.
fn normalize_name(s: &str) -> String {
    s.trim().replace('+', "-").to_ascii_lowercase()
}
