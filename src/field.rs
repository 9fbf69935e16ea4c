// Field landmarks: AprilTag poses and playing field dimensions
//
// The static table is the fallback for when the runtime field layout cannot
// be loaded. Coordinates are in the right-handed field frame (meters) with the
// origin at one corner; each tag's yaw is the outward normal of its face.

use std::collections::HashSet;
use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const METERS_PER_INCH: f64 = 0.0254;

pub const fn inches_to_meters(inches: f64) -> f64 {
    inches * METERS_PER_INCH
}

pub const FIELD_LENGTH: f64 = inches_to_meters(54.0 * 12.0 + 3.25); // meters
pub const FIELD_WIDTH: f64 = inches_to_meters(26.0 * 12.0 + 3.5); // meters

/// Fallback tag table, ordered by id
pub const APRIL_TAGS: [AprilTag; 8] = [
    AprilTag::from_inches(1, 610.77, 42.19, 18.22, PI),
    AprilTag::from_inches(2, 610.77, 108.19, 18.22, PI),
    AprilTag::from_inches(3, 610.77, 174.19, 18.22, PI),
    AprilTag::from_inches(4, 636.96, 265.74, 27.38, PI),
    AprilTag::from_inches(5, 14.25, 265.74, 27.38, 0.0),
    AprilTag::from_inches(6, 40.45, 174.19, 18.22, 0.0),
    AprilTag::from_inches(7, 40.45, 108.19, 18.22, 0.0),
    AprilTag::from_inches(8, 40.45, 42.19, 18.22, 0.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Translation3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Rotation as extrinsic roll (X), pitch (Y), yaw (Z) in radians.
///
/// Serialized as a unit quaternion, matching the field layout file format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RotationRepr", into = "RotationRepr")]
pub struct Rotation3d {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Rotation3d {
    pub const fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    pub fn to_quaternion(self) -> Quaternion {
        let (sr, cr) = (self.roll / 2.0).sin_cos();
        let (sp, cp) = (self.pitch / 2.0).sin_cos();
        let (sy, cy) = (self.yaw / 2.0).sin_cos();

        Quaternion {
            w: cr * cp * cy + sr * sp * sy,
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
        }
    }

    pub fn from_quaternion(q: Quaternion) -> Self {
        let q = q.normalized();

        let roll = (2.0 * (q.w * q.x + q.y * q.z)).atan2(1.0 - 2.0 * (q.x * q.x + q.y * q.y));
        // Clamp guards asin against rounding just past +/-1 at gimbal lock
        let pitch = (2.0 * (q.w * q.y - q.z * q.x)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (q.w * q.z + q.x * q.y)).atan2(1.0 - 2.0 * (q.y * q.y + q.z * q.z));

        Self { roll, pitch, yaw }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    #[serde(rename = "W")]
    pub w: f64,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

impl Quaternion {
    fn normalized(self) -> Self {
        let norm = (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if norm == 0.0 {
            // Degenerate input, treat as identity
            return Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };
        }
        Self {
            w: self.w / norm,
            x: self.x / norm,
            y: self.y / norm,
            z: self.z / norm,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RotationRepr {
    quaternion: Quaternion,
}

impl From<RotationRepr> for Rotation3d {
    fn from(repr: RotationRepr) -> Self {
        Self::from_quaternion(repr.quaternion)
    }
}

impl From<Rotation3d> for RotationRepr {
    fn from(rotation: Rotation3d) -> Self {
        Self {
            quaternion: rotation.to_quaternion(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose3d {
    pub translation: Translation3d,
    pub rotation: Rotation3d,
}

impl Pose3d {
    pub const fn new(x: f64, y: f64, z: f64, rotation: Rotation3d) -> Self {
        Self {
            translation: Translation3d { x, y, z },
            rotation,
        }
    }
}

/// A fiducial marker at a known pose on the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AprilTag {
    #[serde(rename = "ID")]
    pub id: u32,
    pub pose: Pose3d,
}

impl AprilTag {
    pub const fn new(id: u32, pose: Pose3d) -> Self {
        Self { id, pose }
    }

    /// Tag standing upright (no roll or pitch), position given in inches
    const fn from_inches(id: u32, x: f64, y: f64, z: f64, yaw: f64) -> Self {
        Self::new(
            id,
            Pose3d::new(
                inches_to_meters(x),
                inches_to_meters(y),
                inches_to_meters(z),
                Rotation3d::new(0.0, 0.0, yaw),
            ),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldDimensions {
    pub length: f64,
    pub width: f64,
}

/// Errors loading a field layout
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid field layout: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tag id must be positive, got {id}")]
    InvalidId { id: u32 },

    #[error("Duplicate tag id {id} in field layout")]
    DuplicateId { id: u32 },

    #[error("Field {dimension} must be positive, got {value}")]
    InvalidDimension { dimension: &'static str, value: f64 },
}

/// Tag poses plus field size, as loaded from a layout file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldLayout {
    pub tags: Vec<AprilTag>,
    pub field: FieldDimensions,
}

impl FieldLayout {
    /// Layout built from the compiled-in table
    pub fn fallback() -> Self {
        Self {
            tags: APRIL_TAGS.to_vec(),
            field: FieldDimensions {
                length: FIELD_LENGTH,
                width: FIELD_WIDTH,
            },
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, FieldError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FieldError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let layout = Self::from_json_str(&json)?;
        debug!("Loaded {} tags from {}", layout.tags.len(), path.as_ref().display());
        Ok(layout)
    }

    /// Load a layout file, falling back to the compiled-in table on any error
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(layout) => layout,
            Err(e) => {
                warn!(
                    "Could not load field layout {}: {}, using built-in tags",
                    path.as_ref().display(),
                    e
                );
                Self::fallback()
            }
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        for (dimension, value) in [("length", self.field.length), ("width", self.field.width)] {
            // Written as a negated comparison so NaN is rejected too
            if !(value > 0.0) {
                return Err(FieldError::InvalidDimension { dimension, value });
            }
        }

        let mut seen = HashSet::with_capacity(self.tags.len());
        for tag in &self.tags {
            if tag.id == 0 {
                return Err(FieldError::InvalidId { id: tag.id });
            }
            if !seen.insert(tag.id) {
                return Err(FieldError::DuplicateId { id: tag.id });
            }
        }
        Ok(())
    }

    pub fn tag(&self, id: u32) -> Option<&AprilTag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn field_length(&self) -> f64 {
        self.field.length
    }

    pub fn field_width(&self) -> f64 {
        self.field.width
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self::fallback()
    }
}
