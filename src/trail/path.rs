use crate::{
    animation::tween::Lerp,
    foundation::{
        core::Point,
        error::{GuideError, GuideResult},
        math::bracket,
    },
};

const MIN_SPACING_PX: f64 = 1.0;

/// Parameters of the serpentine sway.
///
/// Sample `i` sits at `y = i / n * height` and
/// `x = width / 2 + sin(i * sway_freq) * (base_amplitude_px + sin(i * amplitude_freq) * amplitude_swing_px)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PathShape {
    /// Vertical distance between samples, widened when the document would need more than
    /// `max_segments` of them.
    pub spacing_px: f64,
    pub max_segments: usize,
    pub base_amplitude_px: f64,
    pub amplitude_swing_px: f64,
    pub amplitude_freq: f64,
    pub sway_freq: f64,
}

impl Default for PathShape {
    fn default() -> Self {
        Self {
            spacing_px: 200.0,
            max_segments: 4096,
            base_amplitude_px: 150.0,
            amplitude_swing_px: 50.0,
            amplitude_freq: 0.3,
            sway_freq: 0.5,
        }
    }
}

impl PathShape {
    pub fn validate(&self) -> GuideResult<()> {
        if !(self.spacing_px.is_finite() && self.spacing_px >= MIN_SPACING_PX) {
            return Err(GuideError::validation(format!(
                "path spacing_px must be >= {MIN_SPACING_PX}"
            )));
        }
        if self.max_segments == 0 {
            return Err(GuideError::validation("path max_segments must be > 0"));
        }
        Ok(())
    }
}

/// Polyline spanning the whole document, in document pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedPath {
    points: Vec<Point>,
    document_height: f64,
    viewport_width: f64,
}

impl GeneratedPath {
    pub fn generate(document_height: f64, viewport_width: f64, shape: &PathShape) -> Self {
        let height = if document_height.is_finite() {
            document_height.max(0.0)
        } else {
            0.0
        };
        let width = if viewport_width.is_finite() {
            viewport_width.max(0.0)
        } else {
            0.0
        };
        let spacing = shape.spacing_px.max(MIN_SPACING_PX);
        let spacing = if spacing.is_finite() {
            spacing
        } else {
            PathShape::default().spacing_px
        };
        // Float-to-int casts saturate, so a huge document lands on the cap.
        let segments = ((height / spacing).floor() as usize)
            .min(shape.max_segments)
            .max(1);

        let points = (0..=segments)
            .map(|i| {
                let fi = i as f64;
                let amplitude = shape.base_amplitude_px
                    + (fi * shape.amplitude_freq).sin() * shape.amplitude_swing_px;
                Point::new(
                    width / 2.0 + (fi * shape.sway_freq).sin() * amplitude,
                    fi / segments as f64 * height,
                )
            })
            .collect();

        Self {
            points,
            document_height: height,
            viewport_width: width,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Linear sample at normalized arc index `t` in `[0, 1]`.
    pub fn sample(&self, t: f64) -> Point {
        match self.points.as_slice() {
            [] => Point::ORIGIN,
            [only] => *only,
            pts => {
                let (i, local_t) = bracket(t, pts.len() - 1);
                <Point as Lerp>::lerp(&pts[i], &pts[i + 1], local_t)
            }
        }
    }

    /// Whether the geometry moved enough that the path must be regenerated.
    pub fn is_stale(&self, document_height: f64, viewport_width: f64, threshold_px: f64) -> bool {
        (self.document_height - document_height).abs() > threshold_px
            || (self.viewport_width - viewport_width).abs() > threshold_px
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trail/path.rs"]
mod tests;
