use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::error::{GuideError, GuideResult},
    guide::{driver::TweenTiming, path::PathInterpolator, pose::Pose},
    platform::capability::CapabilityPolicy,
    present::compile::TrailStyle,
    trail::sim::TrailSettings,
};

/// Which visual renders the scroll signal. Every variant also draws the progress bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Single glyph following the authored waypoint path.
    #[default]
    Cobra,
    /// Particle trail along a generated serpentine path.
    Trail,
    ProgressOnly,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    pub interpolator: PathInterpolator,
    /// Pose the glyph is revealed at before it starts tracking.
    pub resting: Pose,
    pub tweens: TweenTiming,
}

/// Delays shared by the whole stage, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Wait for the hero section's own entrance before mounting anything.
    pub hero_settle_ms: u64,
    /// Glyph sits at its resting pose this long before tracking scroll.
    pub reveal_ms: u64,
    /// Scroll inactivity before `is_scrolling` clears.
    pub scroll_idle_ms: u64,
    /// Added to the settle delay on the first visit of a session.
    pub preloader_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            hero_settle_ms: 2000,
            reveal_ms: 500,
            scroll_idle_ms: 150,
            preloader_ms: 9000,
        }
    }
}

/// Complete stage configuration. Every section is optional in JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub variant: Variant,
    pub guide: GuideConfig,
    pub trail: TrailSettings,
    pub style: TrailStyle,
    pub capability: CapabilityPolicy,
    pub timing: TimingConfig,
}

impl StageConfig {
    pub fn from_reader(r: impl std::io::Read) -> GuideResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| GuideError::config(format!("parse stage config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> GuideResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open stage config '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> GuideResult<()> {
        self.guide.interpolator.validate()?;
        self.trail.validate()?;
        self.capability.validate()?;
        if self.timing.scroll_idle_ms == 0 {
            return Err(GuideError::config("timing.scroll_idle_ms must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.guide.resting.opacity) {
            return Err(GuideError::config("guide.resting.opacity must be in [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
