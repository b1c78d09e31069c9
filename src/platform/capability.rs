use crate::{
    foundation::error::{GuideError, GuideResult},
    platform::signals::{EffectiveType, PlatformSignals},
};

/// Thresholds for the low-performance heuristic.
///
/// A device is low-performance when any of these hold:
/// - the viewport is narrow AND (memory is low OR the network is slow)
/// - the data-saver flag is set
/// - logical CPU concurrency is below `min_concurrency`
///
/// Unknown signals never count against the device.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CapabilityPolicy {
    /// Viewports strictly narrower than this are "narrow".
    pub narrow_breakpoint_px: f64,
    /// Device memory strictly below this (GiB) is "low".
    pub low_memory_gb: f64,
    /// Connections at or below this effective type are "slow".
    pub slow_network_max: EffectiveType,
    /// Concurrency strictly below this is low-performance on its own.
    pub min_concurrency: u32,
}

impl Default for CapabilityPolicy {
    fn default() -> Self {
        Self {
            narrow_breakpoint_px: 768.0,
            low_memory_gb: 4.0,
            slow_network_max: EffectiveType::TwoG,
            min_concurrency: 2,
        }
    }
}

impl CapabilityPolicy {
    pub fn validate(&self) -> GuideResult<()> {
        if !(self.narrow_breakpoint_px.is_finite() && self.narrow_breakpoint_px >= 0.0) {
            return Err(GuideError::validation(
                "narrow_breakpoint_px must be finite and >= 0",
            ));
        }
        if !(self.low_memory_gb.is_finite() && self.low_memory_gb >= 0.0) {
            return Err(GuideError::validation(
                "low_memory_gb must be finite and >= 0",
            ));
        }
        Ok(())
    }

    pub fn is_low_performance(&self, s: &PlatformSignals) -> bool {
        let narrow = s
            .viewport_width
            .is_some_and(|w| w < self.narrow_breakpoint_px);
        let low_memory = s.device_memory_gb.is_some_and(|m| m < self.low_memory_gb);
        let slow_network = s
            .effective_type
            .is_some_and(|t| t <= self.slow_network_max);
        let save_data = s.save_data.unwrap_or(false);
        let few_cores = s
            .hardware_concurrency
            .is_some_and(|c| c < self.min_concurrency);

        (narrow && (low_memory || slow_network)) || save_data || few_cores
    }
}

/// Outcome of one capability evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CapabilityDecision {
    pub reduced_motion: bool,
    pub low_performance: bool,
    pub effective: bool,
}

impl CapabilityDecision {
    pub fn evaluate(policy: &CapabilityPolicy, signals: &PlatformSignals) -> Self {
        let reduced_motion = signals.reduced_motion.unwrap_or(false);
        let low_performance = policy.is_low_performance(signals);
        Self {
            reduced_motion,
            low_performance,
            effective: !reduced_motion && !low_performance,
        }
    }
}

/// Result of feeding a signal change into the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateChange {
    Unchanged,
    /// Animation was allowed and no longer is; owners must tear down.
    Downgraded,
}

/// Session-scoped "should animate" policy.
///
/// Once animation has been switched off it stays off for the lifetime of the gate, so a
/// resize back to desktop width or re-enabling motion never flickers the guide back on.
#[derive(Clone, Debug)]
pub struct CapabilityGate {
    policy: CapabilityPolicy,
    signals: PlatformSignals,
    decision: CapabilityDecision,
    latched_off: bool,
}

impl CapabilityGate {
    pub fn new(policy: CapabilityPolicy, signals: PlatformSignals) -> Self {
        let decision = CapabilityDecision::evaluate(&policy, &signals);
        tracing::debug!(?decision, "capability evaluated");
        Self {
            policy,
            signals,
            decision,
            latched_off: !decision.effective,
        }
    }

    pub fn decision(&self) -> CapabilityDecision {
        CapabilityDecision {
            effective: self.decision.effective && !self.latched_off,
            ..self.decision
        }
    }

    pub fn should_animate(&self) -> bool {
        self.decision().effective
    }

    pub fn on_motion_preference(&mut self, reduced: bool) -> GateChange {
        self.signals.reduced_motion = Some(reduced);
        self.reevaluate()
    }

    pub fn on_resize(&mut self, viewport_width: f64) -> GateChange {
        self.signals.viewport_width = Some(viewport_width);
        self.reevaluate()
    }

    fn reevaluate(&mut self) -> GateChange {
        let was_on = self.should_animate();
        self.decision = CapabilityDecision::evaluate(&self.policy, &self.signals);
        if !self.decision.effective && !self.latched_off {
            self.latched_off = true;
            tracing::info!(decision = ?self.decision, "animation disabled for this session");
        }
        if was_on && !self.should_animate() {
            GateChange::Downgraded
        } else {
            GateChange::Unchanged
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/platform/capability.rs"]
mod tests;
