//! Frequency bin sampling and per-band adjustments.
//!
//! Bars and the circular view both walk `visible_count` slots; each slot reads
//! one source bin picked by the scaling curve, then runs through the same
//! fixed chain of band effects.

use crate::settings::{FrequencyScaling, VisualizationSettings};

/// Maximum magnitude of a frequency bin
pub const MAX_MAGNITUDE: f32 = 255.0;

/// Number of slots to render for a buffer of `buffer_len` bins.
///
/// Auto-scale caps very large FFT sizes so bars stay readable.
pub fn visible_count(buffer_len: usize, auto_scale: bool) -> usize {
    if !auto_scale {
        return buffer_len;
    }
    if buffer_len > 1024 {
        512
    } else if buffer_len > 512 {
        256
    } else {
        buffer_len
    }
}

/// Source bin for slot `i`, always within `[0, buffer_len - 1]`.
///
/// `buffer_len` and `visible_count` must be non-zero.
pub fn source_index(
    buffer_len: usize,
    visible_count: usize,
    i: usize,
    scaling: FrequencyScaling,
) -> usize {
    let last = buffer_len.saturating_sub(1);
    let normalized = i as f64 / visible_count as f64;

    let index = match scaling {
        FrequencyScaling::Linear => {
            let step = buffer_len.div_ceil(visible_count);
            i.saturating_mul(step)
        }
        FrequencyScaling::Logarithmic => (normalized.powf(0.5) * buffer_len as f64).floor() as usize,
        FrequencyScaling::Exponential => (normalized.powi(2) * buffer_len as f64).floor() as usize,
    };

    index.min(last)
}

/// The four band effects, as fractions of full scale
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BandAdjustments {
    pub bass_reduction: f32,
    pub high_boost: f32,
    pub vocal_enhance: f32,
    pub separation: f32,
}

impl BandAdjustments {
    pub fn from_settings(settings: &VisualizationSettings) -> Self {
        Self {
            bass_reduction: settings.bass_boost,
            high_boost: settings.high_boost,
            vocal_enhance: settings.vocal_enhance,
            separation: settings.frequency_separation,
        }
    }

    /// Apply bass, high, vocal and separation effects in that order.
    pub fn apply(&self, i: usize, visible_count: usize, value: f32) -> f32 {
        let clamp = |v: f32| v.clamp(0.0, MAX_MAGNITUDE);
        let vc = visible_count as f32;
        let fi = i as f32;
        let mut v = clamp(value);

        if fi < vc / 3.0 {
            v = clamp(v - self.bass_reduction / 100.0 * MAX_MAGNITUDE);
        }

        if fi > vc * 2.0 / 3.0 {
            v = clamp(v + self.high_boost / 100.0 * MAX_MAGNITUDE);
        }

        let vocal_start = (vc * 0.1).floor() as usize;
        let vocal_end = (vc * 0.3).floor() as usize;
        if (vocal_start..=vocal_end).contains(&i) {
            v = clamp(v + self.vocal_enhance / 100.0 * MAX_MAGNITUDE);
        }

        if self.separation > 0.0 {
            let factor = if i % 2 == 0 {
                1.0 + self.separation / 200.0
            } else {
                1.0 - self.separation / 200.0
            };
            v = clamp(v * factor);
        }

        v
    }
}

/// Reads scaled, adjusted magnitudes out of a frequency buffer.
pub struct SpectrumSampler<'a> {
    buffer: &'a [u8],
    visible_count: usize,
    scaling: FrequencyScaling,
    adjustments: BandAdjustments,
}

impl<'a> SpectrumSampler<'a> {
    pub fn new(buffer: &'a [u8], settings: &VisualizationSettings) -> Self {
        Self {
            buffer,
            visible_count: visible_count(buffer.len(), settings.auto_scale),
            scaling: settings.frequency_scaling,
            adjustments: BandAdjustments::from_settings(settings),
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Adjusted magnitude for slot `i` (0-255)
    pub fn value(&self, i: usize) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let index = source_index(self.buffer.len(), self.visible_count, i, self.scaling);
        self.adjustments
            .apply(i, self.visible_count, self.buffer[index] as f32)
    }

    /// Adjusted magnitudes for every visible slot
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.visible_count).map(move |i| self.value(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SCALINGS: [FrequencyScaling; 3] = [
        FrequencyScaling::Linear,
        FrequencyScaling::Logarithmic,
        FrequencyScaling::Exponential,
    ];

    #[test]
    fn test_visible_count_thresholds() {
        assert_eq!(visible_count(128, true), 128);
        assert_eq!(visible_count(512, true), 512);
        assert_eq!(visible_count(1024, true), 256);
        assert_eq!(visible_count(2048, true), 512);
        assert_eq!(visible_count(16384, true), 512);
        assert_eq!(visible_count(2048, false), 2048);
    }

    #[test]
    fn test_linear_is_step_decimation() {
        // 1024 bins over 256 slots -> step 4
        assert_eq!(source_index(1024, 256, 0, FrequencyScaling::Linear), 0);
        assert_eq!(source_index(1024, 256, 3, FrequencyScaling::Linear), 12);
        assert_eq!(source_index(1024, 256, 255, FrequencyScaling::Linear), 1020);
        // 1000 bins over 256 slots -> step ceil(3.9) = 4, last slots clamp
        assert_eq!(source_index(1000, 256, 255, FrequencyScaling::Linear), 999);
    }

    #[test]
    fn test_curved_scalings_span_the_buffer() {
        for scaling in [FrequencyScaling::Logarithmic, FrequencyScaling::Exponential] {
            assert_eq!(source_index(1024, 512, 0, scaling), 0);
            let last = source_index(1024, 512, 511, scaling);
            assert!(last >= 1020, "{:?} ended at {}", scaling, last);
        }
        // sqrt(0.25) * 128 = 64
        assert_eq!(source_index(128, 128, 32, FrequencyScaling::Logarithmic), 64);
        // 0.5^2 * 128 = 32
        assert_eq!(source_index(128, 128, 64, FrequencyScaling::Exponential), 32);
    }

    #[test]
    fn test_bass_reduction_floors_at_zero() {
        let adj = BandAdjustments {
            bass_reduction: 50.0,
            ..Default::default()
        };
        assert_eq!(adj.apply(0, 30, 100.0), 0.0);
        assert_eq!(adj.apply(0, 30, 200.0), 200.0 - 127.5);
        // Outside the lower third
        assert_eq!(adj.apply(10, 30, 100.0), 100.0);
    }

    #[test]
    fn test_high_boost_and_vocal_ceiling() {
        let adj = BandAdjustments {
            high_boost: 100.0,
            vocal_enhance: 20.0,
            ..Default::default()
        };
        assert_eq!(adj.apply(29, 30, 10.0), 255.0);
        // Vocal range for 30 slots is 3..=9
        assert_eq!(adj.apply(3, 30, 10.0), 61.0);
        assert_eq!(adj.apply(9, 30, 250.0), 255.0);
        assert_eq!(adj.apply(10, 30, 10.0), 10.0);
        assert_eq!(adj.apply(2, 30, 10.0), 10.0);
    }

    #[test]
    fn test_separation_exact_arithmetic() {
        let adj = BandAdjustments {
            separation: 100.0,
            ..Default::default()
        };
        assert_eq!(adj.apply(40, 100, 100.0), 150.0);
        assert_eq!(adj.apply(41, 100, 100.0), 50.0);
        assert_eq!(adj.apply(40, 100, 200.0), 255.0);
    }

    #[test]
    fn test_sampler_on_silence() {
        let buffer = vec![0u8; 128];
        let settings = VisualizationSettings {
            high_boost: 0.0,
            ..Default::default()
        };
        let sampler = SpectrumSampler::new(&buffer, &settings);
        assert_eq!(sampler.visible_count(), 128);
        assert!(sampler.values().all(|v| v == 0.0));
    }

    #[test]
    fn test_sampler_empty_buffer() {
        let settings = VisualizationSettings::default();
        let sampler = SpectrumSampler::new(&[], &settings);
        assert_eq!(sampler.visible_count(), 0);
        assert_eq!(sampler.values().count(), 0);
        assert_eq!(sampler.value(3), 0.0);
    }

    proptest! {
        #[test]
        fn prop_index_in_bounds(len in 1usize..20000, auto in any::<bool>(), seed in any::<u64>()) {
            let vc = visible_count(len, auto);
            let i = (seed as usize) % vc;
            for scaling in SCALINGS {
                prop_assert!(source_index(len, vc, i, scaling) < len);
            }
        }

        #[test]
        fn prop_curves_monotonic(len in 1usize..8192, auto in any::<bool>()) {
            let vc = visible_count(len, auto);
            for scaling in [FrequencyScaling::Logarithmic, FrequencyScaling::Exponential] {
                let mut prev = 0;
                for i in 0..vc {
                    let idx = source_index(len, vc, i, scaling);
                    prop_assert!(idx >= prev);
                    prev = idx;
                }
            }
        }

        #[test]
        fn prop_adjustments_stay_in_range(
            value in 0u8..=255,
            i in 0usize..512,
            bass in 0f32..=100.0,
            high in 0f32..=100.0,
            vocal in 0f32..=100.0,
            sep in 0f32..=100.0,
        ) {
            let adj = BandAdjustments {
                bass_reduction: bass,
                high_boost: high,
                vocal_enhance: vocal,
                separation: sep,
            };
            let v = adj.apply(i, 512, value as f32);
            prop_assert!((0.0..=255.0).contains(&v));
        }
    }
}
