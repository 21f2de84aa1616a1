/// Depth-buffer direction of a graphics device

use crate::graphics_device::CompareOp;

/// Which end of the `[0, 1]` depth range is near.
///
/// Every projection the renderer builds goes through
/// [`DepthConvention::adjust_clip_planes`], so switching conventions only
/// touches this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthConvention {
    /// 0 = near, 1 = far
    #[default]
    Standard,
    /// 1 = near, 0 = far
    Reversed,
}

impl DepthConvention {
    /// Near/far pair to hand to a projection constructor.
    pub fn adjust_clip_planes(&self, near: f32, far: f32) -> (f32, f32) {
        match self {
            DepthConvention::Standard => (near, far),
            DepthConvention::Reversed => (far, near),
        }
    }

    /// Value a depth buffer is cleared to (the far end).
    pub fn clear_depth(&self) -> f32 {
        match self {
            DepthConvention::Standard => 1.0,
            DepthConvention::Reversed => 0.0,
        }
    }

    /// Strict "closer than" comparison, for passes that write depth.
    pub fn closer(&self) -> CompareOp {
        match self {
            DepthConvention::Standard => CompareOp::Less,
            DepthConvention::Reversed => CompareOp::Greater,
        }
    }

    /// "Closer or equal", for passes that reuse the pre-pass depth.
    pub fn closer_or_equal(&self) -> CompareOp {
        match self {
            DepthConvention::Standard => CompareOp::LessOrEqual,
            DepthConvention::Reversed => CompareOp::GreaterOrEqual,
        }
    }
}
