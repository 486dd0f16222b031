#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color-to-depth resampling module.
pub mod align;
pub use crate::align::{align_color_to_depth, FALLBACK_PIXEL};

/// camera calibration types.
pub mod calibration;
pub use crate::calibration::{CameraExtrinsic, CameraIntrinsic, RigCalibration};

/// error types for the alignment module.
pub mod error;
pub use crate::error::{AlignError, ProjectionError};

/// pinhole projection oracle producing UV maps.
pub mod projector;
pub use crate::projector::{PinholeProjector, UvMapSource};

/// per-depth-pixel UV correspondence maps.
pub mod uvmap;
pub use crate::uvmap::{UvMap, INVALID_UV};
