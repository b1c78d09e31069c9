use crate::{
    animation::tween::Lerp,
    foundation::{
        core::{Affine, Vec2},
        math::lerp,
    },
};

/// Full visual transform of the guide glyph, in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pose {
    pub x_px: f64,
    pub y_px: f64,
    pub rotation_deg: f64,
    pub scale: f64,
    /// In `[0, 1]`.
    pub opacity: f64,
}

impl Default for Pose {
    /// Off the bottom edge, unrotated and invisible.
    fn default() -> Self {
        Self {
            x_px: 0.0,
            y_px: 100.0,
            rotation_deg: 0.0,
            scale: 1.0,
            opacity: 0.0,
        }
    }
}

impl Pose {
    /// `translate * rotate * scale`, matching a CSS `translate() rotate() scale()` chain.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.x_px, self.y_px))
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale(self.scale)
    }
}

impl Lerp for Pose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x_px: lerp(a.x_px, b.x_px, t),
            y_px: lerp(a.y_px, b.y_px, t),
            rotation_deg: lerp(a.rotation_deg, b.rotation_deg, t),
            scale: lerp(a.scale, b.scale, t),
            opacity: lerp(a.opacity, b.opacity, t),
        }
    }
}
