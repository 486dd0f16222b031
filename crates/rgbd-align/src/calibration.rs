use rgbd_image::ImageSize;

/// Represents the intrinsic parameters of a pinhole camera
///
/// # Fields
///
/// * `fx` - The focal length in the x direction
/// * `fy` - The focal length in the y direction
/// * `cx` - The x coordinate of the principal point
/// * `cy` - The y coordinate of the principal point
#[derive(Clone, Debug)]
pub struct CameraIntrinsic {
    /// The focal length in the x direction
    pub fx: f64,
    /// The focal length in the y direction
    pub fy: f64,
    /// The x coordinate of the principal point
    pub cx: f64,
    /// The y coordinate of the principal point
    pub cy: f64,
}

/// Represents the extrinsic parameters relating two camera frames
///
/// # Fields
///
/// * `rotation` - The rotation matrix of the transform 3x3
/// * `translation` - The translation vector of the transform 3x1
#[derive(Clone, Debug)]
pub struct CameraExtrinsic {
    /// The rotation matrix of the transform 3x3
    pub rotation: [[f64; 3]; 3],
    /// The translation vector of the transform 3x1
    pub translation: [f64; 3],
}

impl CameraExtrinsic {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0, 0.0, 0.0],
        }
    }

    /// Apply the rigid transform to a 3-D point.
    pub fn transform(&self, p: [f64; 3]) -> [f64; 3] {
        let r = &self.rotation;
        let t = &self.translation;
        [
            r[0][0] * p[0] + r[0][1] * p[1] + r[0][2] * p[2] + t[0],
            r[1][0] * p[0] + r[1][1] * p[1] + r[1][2] * p[2] + t[1],
            r[2][0] * p[0] + r[2][1] * p[1] + r[2][2] * p[2] + t[2],
        ]
    }
}

/// The complete calibration of a depth + color camera rig.
///
/// Constructed once per streaming session and never mutated afterwards; the
/// projector and the capture loop borrow it for the lifetime of the session.
#[derive(Clone, Debug)]
pub struct RigCalibration {
    /// Intrinsics of the depth sensor.
    pub depth: CameraIntrinsic,
    /// Intrinsics of the color sensor.
    pub color: CameraIntrinsic,
    /// Resolution of the color sensor, used to normalize projected coordinates.
    pub color_size: ImageSize,
    /// Rigid transform from the depth frame to the color frame.
    pub depth_to_color: CameraExtrinsic,
    /// Meters per depth unit (1e-3 for millimeter-scale Z16 devices).
    pub depth_scale: f64,
}
