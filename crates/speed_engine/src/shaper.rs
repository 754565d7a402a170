//! Speed shaping state machine.
//!
//! Turns the smoothed score into the bounded output scalar, one tick at a
//! time. Order of operations per tick: error clamp, dead zone, linear active
//! scaling, asymmetric momentum, final clamp.

use contracts::ShapingConfig;

/// Result of one shaping tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Score the tick was computed from
    pub score: f64,

    /// Target speed before momentum
    pub target: f64,

    /// Applied speed after momentum and clamping
    pub applied: f64,

    /// Whether the score tripped the error threshold
    pub fault: bool,
}

/// Momentum-limited speed shaper
///
/// Owned exclusively by the broadcast tick loop; `previous_applied` persists
/// across ticks and stays within `[0, max_speed]`.
///
/// The momentum rule is asymmetric: a rising target is approached by
/// `diff * accel_rate`, which with `accel_rate > 1` can transiently overshoot
/// the target until the next tick recomputes it; a falling target is taken
/// immediately. Both halves are tuned behavior and are kept exactly as
/// deployed.
#[derive(Debug, Clone)]
pub struct SpeedShaper {
    config: ShapingConfig,
    previous_applied: f64,
}

impl SpeedShaper {
    /// Create a shaper starting from rest
    pub fn new(config: ShapingConfig) -> Self {
        Self {
            config,
            previous_applied: 0.0,
        }
    }

    /// Run one tick against the given smoothed score
    pub fn tick(&mut self, score: f64) -> TickOutcome {
        let (target, fault) = self.target_for(score);

        let diff = target - self.previous_applied;
        let applied = if diff > 0.0 {
            self.previous_applied + diff * self.config.accel_rate
        } else {
            self.previous_applied + diff
        };
        let applied = applied.clamp(0.0, self.config.max_speed);

        self.previous_applied = applied;

        TickOutcome {
            score,
            target,
            applied,
            fault,
        }
    }

    /// Speed applied on the most recent tick
    pub fn last_applied(&self) -> f64 {
        self.previous_applied
    }

    /// Map a score to its target speed
    ///
    /// Returns `(target, fault)`; the fault flag marks scores at or above the
    /// error threshold, which force the target to zero this tick.
    fn target_for(&self, score: f64) -> (f64, bool) {
        let config = &self.config;

        if score >= config.error_threshold {
            return (0.0, true);
        }

        if score <= config.dead_zone {
            return (0.0, false);
        }

        let active = score - config.dead_zone;
        let clamped = active.min(config.active_range());
        ((clamped / config.active_range()) * config.max_speed, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_config() -> ShapingConfig {
        // dead_zone 0.05, max_score 0.8, max_speed 7.04, accel_rate 1.5,
        // error_threshold 50.0
        ShapingConfig::default()
    }

    #[test]
    fn test_dead_zone_boundary_is_inclusive() {
        let mut shaper = SpeedShaper::new(reference_config());
        let outcome = shaper.tick(0.05);
        assert_eq!(outcome.target, 0.0);
        assert_eq!(outcome.applied, 0.0);
        assert!(!outcome.fault);
    }

    #[test]
    fn test_score_below_dead_zone_is_zero() {
        let mut shaper = SpeedShaper::new(reference_config());
        assert_eq!(shaper.tick(0.01).target, 0.0);
    }

    #[test]
    fn test_active_scaling_reference_point() {
        // score 0.4: active 0.35, range 0.75 -> target 0.35/0.75 * 7.04
        let mut shaper = SpeedShaper::new(reference_config());
        let outcome = shaper.tick(0.4);
        let expected = 0.35 / 0.75 * 7.04;
        assert!((outcome.target - expected).abs() < 1e-9);
        assert!((expected - 3.2853).abs() < 1e-4);
    }

    #[test]
    fn test_max_score_maps_to_max_speed() {
        let mut shaper = SpeedShaper::new(reference_config());
        let outcome = shaper.tick(0.8);
        assert!((outcome.target - 7.04).abs() < 1e-12);
    }

    #[test]
    fn test_scores_above_max_score_saturate() {
        let mut shaper = SpeedShaper::new(reference_config());
        let outcome = shaper.tick(2.0);
        assert!((outcome.target - 7.04).abs() < 1e-12);
    }

    #[test]
    fn test_error_threshold_forces_zero_regardless_of_state() {
        let mut shaper = SpeedShaper::new(reference_config());
        // Build up some speed first
        for _ in 0..10 {
            shaper.tick(0.4);
        }
        assert!(shaper.last_applied() > 0.0);

        let outcome = shaper.tick(50.0);
        assert!(outcome.fault);
        assert_eq!(outcome.target, 0.0);
        // Falling target is taken immediately, no ramp-down
        assert_eq!(outcome.applied, 0.0);
    }

    #[test]
    fn test_momentum_recursion_with_overshoot() {
        // Step input: target jumps from 0 to T and holds. While below T the
        // applied speed follows applied_k = applied_{k-1} + (T - applied_{k-1}) * rate,
        // clamped to [0, max_speed]. With rate 1.5 the first tick overshoots T.
        let config = reference_config();
        let mut shaper = SpeedShaper::new(config.clone());

        let score = 0.4;
        let target = (score - config.dead_zone) / config.active_range() * config.max_speed;

        let mut expected = 0.0_f64;
        for _ in 0..6 {
            let diff = target - expected;
            expected = if diff > 0.0 {
                expected + diff * config.accel_rate
            } else {
                expected + diff
            };
            expected = expected.clamp(0.0, config.max_speed);

            let outcome = shaper.tick(score);
            assert!((outcome.applied - expected).abs() < 1e-12);
        }

        // First tick: 0 + T * 1.5 overshoots, second snaps back down to T
        let mut probe = SpeedShaper::new(config.clone());
        let first = probe.tick(score).applied;
        assert!((first - target * 1.5).abs() < 1e-12);
        assert!(first > target);
        let second = probe.tick(score).applied;
        assert!((second - target).abs() < 1e-12);
    }

    #[test]
    fn test_applied_clamped_to_max_speed() {
        let mut shaper = SpeedShaper::new(reference_config());
        // Full-scale score from rest: 0 + 7.04 * 1.5 would exceed max_speed
        let outcome = shaper.tick(0.8);
        assert_eq!(outcome.applied, 7.04);
    }

    #[test]
    fn test_slowdown_snaps_without_damping() {
        let mut shaper = SpeedShaper::new(reference_config());
        for _ in 0..10 {
            shaper.tick(0.8);
        }
        assert_eq!(shaper.last_applied(), 7.04);

        // Score collapses into the dead zone: output drops to 0 in one tick
        let outcome = shaper.tick(0.0);
        assert_eq!(outcome.applied, 0.0);
    }

    #[test]
    fn test_state_persists_across_ticks() {
        let mut shaper = SpeedShaper::new(reference_config());
        let first = shaper.tick(0.4).applied;
        assert_eq!(shaper.last_applied(), first);
    }
}
