use crate::foundation::error::GuideResult;

/// Network effective connection type, ordered slowest first.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum EffectiveType {
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "4g")]
    FourG,
}

/// Best-effort read access to platform capability signals.
///
/// `Ok(None)` means the platform does not expose the signal; `Err` means the query itself
/// failed. Both are treated as "not a problem" by [`PlatformSignals::probe`].
pub trait SignalSource {
    fn prefers_reduced_motion(&self) -> GuideResult<Option<bool>>;
    fn viewport_width(&self) -> GuideResult<Option<f64>>;
    fn device_memory_gb(&self) -> GuideResult<Option<f64>>;
    fn effective_type(&self) -> GuideResult<Option<EffectiveType>>;
    fn save_data(&self) -> GuideResult<Option<bool>>;
    fn hardware_concurrency(&self) -> GuideResult<Option<u32>>;
}

/// Snapshot of every signal the capability gate reads. Absent fields are unknown.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlatformSignals {
    pub reduced_motion: Option<bool>,
    pub viewport_width: Option<f64>,
    pub device_memory_gb: Option<f64>,
    pub effective_type: Option<EffectiveType>,
    pub save_data: Option<bool>,
    pub hardware_concurrency: Option<u32>,
}

fn fail_open<T>(name: &str, res: GuideResult<Option<T>>) -> Option<T> {
    match res {
        Ok(v) => v,
        Err(err) => {
            tracing::debug!(signal = name, %err, "platform signal unavailable");
            None
        }
    }
}

impl PlatformSignals {
    /// Read every signal from `src`, substituting "unknown" for any query that fails.
    pub fn probe(src: &dyn SignalSource) -> Self {
        Self {
            reduced_motion: fail_open("reduced_motion", src.prefers_reduced_motion()),
            viewport_width: fail_open("viewport_width", src.viewport_width()),
            device_memory_gb: fail_open("device_memory", src.device_memory_gb()),
            effective_type: fail_open("effective_type", src.effective_type()),
            save_data: fail_open("save_data", src.save_data()),
            hardware_concurrency: fail_open("hardware_concurrency", src.hardware_concurrency()),
        }
    }
}

impl SignalSource for PlatformSignals {
    fn prefers_reduced_motion(&self) -> GuideResult<Option<bool>> {
        Ok(self.reduced_motion)
    }

    fn viewport_width(&self) -> GuideResult<Option<f64>> {
        Ok(self.viewport_width)
    }

    fn device_memory_gb(&self) -> GuideResult<Option<f64>> {
        Ok(self.device_memory_gb)
    }

    fn effective_type(&self) -> GuideResult<Option<EffectiveType>> {
        Ok(self.effective_type)
    }

    fn save_data(&self) -> GuideResult<Option<bool>> {
        Ok(self.save_data)
    }

    fn hardware_concurrency(&self) -> GuideResult<Option<u32>> {
        Ok(self.hardware_concurrency)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/platform/signals.rs"]
mod tests;
