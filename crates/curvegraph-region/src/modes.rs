//! Render Modes
//!
//! Backend rendering strategy a region is built for. The region itself
//! only reads these bits; pipeline choice belongs to the consumer.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{RegionError, RegionResult};

/// Texture unit used by the second pass of two-pass rendering
pub const TWO_PASS_DEFAULT_TEXTURE_UNIT: u32 = 0;

bitflags! {
    /// Render mode bits
    ///
    /// No anti-aliasing bit set means single-pass normal rendering.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RenderModes: u32 {
        /// Multisample anti-aliasing, rendered in two passes through an offscreen buffer
        const MSAA = 1 << 0;
        /// View based anti-aliasing, two passes with exact coverage
        const VBAA = 1 << 1;
        /// Non-uniform curve weights
        const VARIABLE_CURVE_WEIGHT = 1 << 8;
    }
}

impl RenderModes {
    /// Single pass, uniform weights
    pub const NORMAL: Self = Self::empty();

    pub fn is_multisample_aa(&self) -> bool {
        self.contains(Self::MSAA)
    }

    pub fn is_two_pass_aa(&self) -> bool {
        self.contains(Self::VBAA)
    }

    pub fn is_non_uniform_weight(&self) -> bool {
        self.contains(Self::VARIABLE_CURVE_WEIGHT)
    }

    /// Curve weighting implied by these modes
    pub fn curve_weighting(&self) -> CurveWeighting {
        if self.is_non_uniform_weight() {
            CurveWeighting::NonUniform
        } else {
            CurveWeighting::Uniform
        }
    }

    /// Short name such as `"vbaa-curve"`, `"msaa"` or `"norm"`
    ///
    /// VBAA takes precedence when both anti-aliasing bits are set.
    pub fn mode_string(&self) -> String {
        let aa = if self.is_two_pass_aa() {
            "vbaa"
        } else if self.is_multisample_aa() {
            "msaa"
        } else {
            "norm"
        };
        let curve = if self.is_non_uniform_weight() { "-curve" } else { "" };
        format!("{aa}{curve}")
    }
}

impl fmt::Display for RenderModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mode_string())
    }
}

/// Curve weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurveWeighting {
    /// Every curve uses weight 1.0
    #[default]
    Uniform,
    /// Per-curve weights in `[0.0, 1.9]`
    NonUniform,
}

impl CurveWeighting {
    pub const UNIFORM_WEIGHT: f32 = 1.0;
    pub const MIN_WEIGHT: f32 = 0.0;
    pub const MAX_WEIGHT: f32 = 1.9;

    /// Weight actually applied for a requested `weight`
    pub fn effective_weight(&self, weight: f32) -> f32 {
        match self {
            Self::Uniform => Self::UNIFORM_WEIGHT,
            Self::NonUniform => weight.clamp(Self::MIN_WEIGHT, Self::MAX_WEIGHT),
        }
    }
}

/// Check that two coupled multisampled buffers agree on their sample count
///
/// Returns the shared sample count.
pub fn verify_sample_pairing(left: u32, right: u32) -> RegionResult<u32> {
    if left != right {
        return Err(RegionError::InconsistentSampleConfiguration { left, right });
    }
    Ok(left)
}
