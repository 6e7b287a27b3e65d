//! Accelerometer flick detection
//!
//! Vertical-axis samples go through a low-pass stage (sensor noise) and a
//! first-order IIR high-pass stage (gravity/tilt), then a threshold with a
//! cooldown so one physical flick produces one event.

use serde::{Deserialize, Serialize};

/// Runtime-adjustable filter parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickTuning {
    /// Low-pass smoothing factor (0-1, lower = more smoothing)
    pub lowpass_alpha: f64,
    /// High-pass decay factor (0-1)
    pub highpass_alpha: f64,
    /// High-pass output above which a flick is reported
    pub threshold: f64,
    /// Minimum seconds between two flicks
    pub cooldown: f64,
}

impl Default for FlickTuning {
    fn default() -> Self {
        Self {
            lowpass_alpha: 0.6,
            highpass_alpha: 0.92,
            threshold: 1.5,
            cooldown: 0.4,
        }
    }
}

/// Flick gesture detector over the accelerometer Z axis
#[derive(Debug, Clone)]
pub struct FlickDetector {
    tuning: FlickTuning,
    baseline_z: f64,
    filtered_z: f64,
    highpass_z: f64,
    /// Low-pass output of the previous sample
    prev_z: f64,
    last_flick: Option<f64>,
}

impl FlickDetector {
    /// Create a detector seeded with a known resting value
    pub fn new(tuning: FlickTuning, baseline_z: f64) -> Self {
        Self {
            tuning,
            baseline_z,
            filtered_z: baseline_z,
            highpass_z: 0.0,
            prev_z: baseline_z,
            last_flick: None,
        }
    }

    /// Create a detector seeded with the average of resting samples
    pub fn calibrate(tuning: FlickTuning, samples: impl IntoIterator<Item = f64>) -> Self {
        let (sum, count) = samples
            .into_iter()
            .fold((0.0, 0usize), |(sum, n), z| (sum + z, n + 1));
        let baseline = if count > 0 { sum / count as f64 } else { 0.0 };
        log::info!("Accelerometer baseline Z = {:.3} ({} samples)", baseline, count);
        Self::new(tuning, baseline)
    }

    /// Feed one raw Z sample taken at `now` (seconds). Returns true on a flick.
    pub fn process(&mut self, raw_z: f64, now: f64) -> bool {
        let t = &self.tuning;

        self.filtered_z = t.lowpass_alpha * raw_z + (1.0 - t.lowpass_alpha) * self.filtered_z;
        self.highpass_z = t.highpass_alpha * (self.highpass_z + self.filtered_z - self.prev_z);
        self.prev_z = self.filtered_z;

        let cooled_down = self
            .last_flick
            .map(|last| now - last > t.cooldown)
            .unwrap_or(true);

        if self.highpass_z > t.threshold && cooled_down {
            self.last_flick = Some(now);
            log::debug!("Flick detected (hp = {:.3})", self.highpass_z);
            return true;
        }
        false
    }

    /// Adjust any subset of the filter parameters
    pub fn tune(
        &mut self,
        lowpass_alpha: Option<f64>,
        highpass_alpha: Option<f64>,
        threshold: Option<f64>,
    ) {
        if let Some(a) = lowpass_alpha {
            self.tuning.lowpass_alpha = a.clamp(0.0, 1.0);
            log::info!("Low-pass alpha set to {}", self.tuning.lowpass_alpha);
        }
        if let Some(a) = highpass_alpha {
            self.tuning.highpass_alpha = a.clamp(0.0, 1.0);
            log::info!("High-pass alpha set to {}", self.tuning.highpass_alpha);
        }
        if let Some(th) = threshold {
            self.tuning.threshold = th;
            log::info!("Flick threshold set to {}", self.tuning.threshold);
        }
    }

    pub fn tuning(&self) -> &FlickTuning {
        &self.tuning
    }

    pub fn baseline(&self) -> f64 {
        self.baseline_z
    }

    pub fn filtered(&self) -> f64 {
        self.filtered_z
    }

    pub fn highpass(&self) -> f64 {
        self.highpass_z
    }

    pub fn last_flick(&self) -> Option<f64> {
        self.last_flick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f64 = 0.005;

    #[test]
    fn test_calibrate_averages_samples() {
        let det = FlickDetector::calibrate(FlickTuning::default(), [9.0, 10.0, 11.0, 10.0]);
        assert!((det.baseline() - 10.0).abs() < 1e-12);
        assert!((det.filtered() - 10.0).abs() < 1e-12);
        assert_eq!(det.highpass(), 0.0);

        let empty = FlickDetector::calibrate(FlickTuning::default(), std::iter::empty());
        assert_eq!(empty.baseline(), 0.0);
    }

    #[test]
    fn test_step_fires_once_per_cooldown() {
        let mut det = FlickDetector::new(FlickTuning::default(), 0.0);
        assert_eq!(det.last_flick(), None);
        // Step from rest to a large sustained value, held for one second
        let fired: Vec<f64> = (0..200)
            .map(|i| i as f64 * DT)
            .filter(|&t| det.process(10.0, t))
            .collect();
        assert_eq!(fired, vec![0.0]);
        assert_eq!(det.last_flick(), Some(0.0));
    }

    #[test]
    fn test_repeated_flicks_after_cooldown() {
        let mut det = FlickDetector::new(FlickTuning::default(), 0.0);
        let mut events = 0;
        // Square wave: 10 samples high, 190 samples low (1 s period)
        for i in 0..600 {
            let z = if i % 200 < 10 { 10.0 } else { 0.0 };
            if det.process(z, i as f64 * DT) {
                events += 1;
            }
        }
        assert_eq!(events, 3);
    }

    #[test]
    fn test_small_motion_stays_below_threshold() {
        let mut det = FlickDetector::new(FlickTuning::default(), 9.8);
        for i in 0..400 {
            let z = 9.8 + 0.2 * ((i as f64) * 0.3).sin();
            assert!(!det.process(z, i as f64 * DT));
        }
    }

    #[test]
    fn test_tune_overrides_threshold() {
        let mut det = FlickDetector::new(FlickTuning::default(), 0.0);
        det.tune(None, None, Some(100.0));
        assert_eq!(det.tuning().threshold, 100.0);
        assert!(!det.process(10.0, 0.0));

        det.tune(Some(2.0), None, None);
        assert_eq!(det.tuning().lowpass_alpha, 1.0);
    }

    proptest! {
        #[test]
        fn prop_constant_signal_never_fires(level in -40.0f64..40.0, baseline in -40.0f64..40.0) {
            let mut det = FlickDetector::new(FlickTuning::default(), baseline);
            // Settle, then a flat signal must stay quiet
            for i in 0..400 {
                det.process(level, i as f64 * DT);
            }
            let quiet = (400..800).all(|i| !det.process(level, i as f64 * DT));
            prop_assert!(quiet);
        }

        #[test]
        fn prop_events_respect_cooldown(signal in proptest::collection::vec(-20.0f64..20.0, 1..500)) {
            let mut det = FlickDetector::new(FlickTuning::default(), 0.0);
            let cooldown = det.tuning().cooldown;
            let times: Vec<f64> = signal
                .iter()
                .enumerate()
                .map(|(i, &z)| (i as f64 * DT, z))
                .filter(|&(t, z)| det.process(z, t))
                .map(|(t, _)| t)
                .collect();
            for pair in times.windows(2) {
                prop_assert!(pair[1] - pair[0] > cooldown);
            }
        }
    }
}
