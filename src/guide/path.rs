use crate::{
    animation::{ease::Ease, tween::Lerp},
    foundation::{
        core::Viewport,
        error::{GuideError, GuideResult},
        math::{bracket, clamp01, lerp},
    },
    guide::pose::Pose,
};

/// Authored keyframe along the guide path, in percent of the viewport.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Waypoint {
    pub x_pct: f64,
    pub y_pct: f64,
    pub rotation_deg: f64,
    pub scale: f64,
}

impl Waypoint {
    pub const fn new(x_pct: f64, y_pct: f64, rotation_deg: f64, scale: f64) -> Self {
        Self {
            x_pct,
            y_pct,
            rotation_deg,
            scale,
        }
    }
}

impl Default for Waypoint {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

impl Lerp for Waypoint {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x_pct: lerp(a.x_pct, b.x_pct, t),
            y_pct: lerp(a.y_pct, b.y_pct, t),
            rotation_deg: lerp(a.rotation_deg, b.rotation_deg, t),
            scale: lerp(a.scale, b.scale, t),
        }
    }
}

/// Eased piecewise interpolation over an arbitrary waypoint slice.
///
/// `None` for an empty slice; a single waypoint is returned as-is.
pub fn sample_waypoints(waypoints: &[Waypoint], progress: f64, ease: Ease) -> Option<Waypoint> {
    match waypoints {
        [] => None,
        [only] => Some(*only),
        _ => {
            let (i, local_t) = bracket(progress, waypoints.len() - 1);
            Some(Waypoint::lerp(
                &waypoints[i],
                &waypoints[i + 1],
                ease.apply(local_t),
            ))
        }
    }
}

/// Ordered waypoint table with at least two entries.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct GuidePath {
    waypoints: Vec<Waypoint>,
}

impl GuidePath {
    pub fn new(waypoints: Vec<Waypoint>) -> GuideResult<Self> {
        if waypoints.len() < 2 {
            return Err(GuideError::validation(
                "guide path needs at least two waypoints",
            ));
        }
        let finite = waypoints.iter().all(|w| {
            w.x_pct.is_finite()
                && w.y_pct.is_finite()
                && w.rotation_deg.is_finite()
                && w.scale.is_finite()
        });
        if !finite {
            return Err(GuideError::validation("guide waypoints must be finite"));
        }
        Ok(Self { waypoints })
    }

    /// The cobra route: in from the left near the hero call-to-action, weaving down past
    /// the portfolio, retreating during the forms and resting near the footer.
    pub fn cobra() -> Self {
        Self {
            waypoints: vec![
                Waypoint::new(-5.0, 30.0, -15.0, 1.0),
                Waypoint::new(15.0, 45.0, 10.0, 0.95),
                Waypoint::new(5.0, 60.0, -20.0, 0.9),
                Waypoint::new(20.0, 75.0, 5.0, 0.85),
                Waypoint::new(-10.0, 85.0, -25.0, 0.8),
                Waypoint::new(10.0, 95.0, 0.0, 0.7),
            ],
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn sample(&self, progress: f64, ease: Ease) -> Waypoint {
        sample_waypoints(&self.waypoints, progress, ease).unwrap_or_default()
    }
}

impl Default for GuidePath {
    fn default() -> Self {
        Self::cobra()
    }
}

impl<'de> serde::Deserialize<'de> for GuidePath {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let waypoints = Vec::<Waypoint>::deserialize(d)?;
        Self::new(waypoints).map_err(serde::de::Error::custom)
    }
}

/// Opacity ramps near the top and bottom of the page.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FadeEnvelope {
    /// Progress at which the fade-in reaches `interior`.
    pub fade_in_end: f64,
    /// Progress at which the fade-out begins.
    pub fade_out_start: f64,
    /// Opacity everywhere between the two ramps.
    pub interior: f64,
}

impl Default for FadeEnvelope {
    fn default() -> Self {
        Self {
            fade_in_end: 0.05,
            fade_out_start: 0.9,
            interior: 0.6,
        }
    }
}

impl FadeEnvelope {
    pub fn validate(&self) -> GuideResult<()> {
        let ordered = 0.0 <= self.fade_in_end
            && self.fade_in_end <= self.fade_out_start
            && self.fade_out_start <= 1.0;
        if !ordered {
            return Err(GuideError::validation(
                "fade envelope needs 0 <= fade_in_end <= fade_out_start <= 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.interior) {
            return Err(GuideError::validation("fade interior must be in [0, 1]"));
        }
        Ok(())
    }

    pub fn opacity(&self, progress: f64) -> f64 {
        let p = clamp01(progress);
        if p < self.fade_in_end {
            self.interior * p / self.fade_in_end
        } else if p > self.fade_out_start {
            self.interior * (1.0 - p) / (1.0 - self.fade_out_start)
        } else {
            self.interior
        }
    }
}

/// Scale and opacity multipliers for narrow (phone-sized) viewports.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NarrowAdjust {
    pub breakpoint_px: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl Default for NarrowAdjust {
    fn default() -> Self {
        Self {
            breakpoint_px: 768.0,
            scale: 0.6,
            opacity: 0.7,
        }
    }
}

/// Pure mapping from scroll progress to the guide's target pose.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PathInterpolator {
    pub path: GuidePath,
    /// Applied within each segment.
    pub ease: Ease,
    pub fade: FadeEnvelope,
    pub narrow: NarrowAdjust,
}

impl Default for PathInterpolator {
    fn default() -> Self {
        Self {
            path: GuidePath::cobra(),
            ease: Ease::InOutCubic,
            fade: FadeEnvelope::default(),
            narrow: NarrowAdjust::default(),
        }
    }
}

impl PathInterpolator {
    pub fn validate(&self) -> GuideResult<()> {
        self.fade.validate()
    }

    pub fn target_pose(&self, progress: f64, viewport: Viewport) -> Pose {
        let w = self.path.sample(progress, self.ease);
        let mut opacity = self.fade.opacity(progress);
        let mut scale = w.scale;
        if viewport.width < self.narrow.breakpoint_px {
            scale *= self.narrow.scale;
            opacity *= self.narrow.opacity;
        }
        Pose {
            x_px: w.x_pct * viewport.width / 100.0,
            y_px: w.y_pct * viewport.height / 100.0,
            rotation_deg: w.rotation_deg,
            scale,
            opacity,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/guide/path.rs"]
mod tests;
