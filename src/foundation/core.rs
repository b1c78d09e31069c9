use crate::foundation::error::{GuideError, GuideResult};

pub use kurbo::{Affine, Point, Vec2};

/// A point on the host clock, in milliseconds since the scheduler was created.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Add a delay, saturating at `u64::MAX`.
    pub fn after(self, delay_ms: u64) -> Self {
        Self(self.0.saturating_add(delay_ms))
    }

    /// Milliseconds elapsed since `earlier` (0 if `earlier` is in the future).
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Visible window size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> GuideResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(GuideError::validation(
                "Viewport dimensions must be finite and >= 0",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Document geometry as seen by the scroll tracker.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentMetrics {
    pub viewport: Viewport,
    /// Total scrollable document height in CSS pixels.
    pub document_height: f64,
}

impl DocumentMetrics {
    /// Largest reachable scroll offset; `0` when the document fits in the viewport.
    pub fn max_scroll(self) -> f64 {
        let range = self.document_height - self.viewport.height;
        if range.is_finite() && range > 0.0 {
            range
        } else {
            0.0
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
