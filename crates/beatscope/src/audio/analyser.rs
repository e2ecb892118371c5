//! FFT analysis producing byte spectra and waveforms.
//!
//! Behaves like a browser analyser node: Blackman-windowed FFT over the most
//! recent `fft_size` samples, per-bin exponential smoothing, and decibels
//! mapped linearly onto 0-255.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::TAU;
use std::sync::Arc;
use thiserror::Error;

pub const MIN_FFT_SIZE: usize = 32;
pub const MAX_FFT_SIZE: usize = 32768;

const DEFAULT_FFT_SIZE: usize = 256;
const DEFAULT_SMOOTHING: f32 = 0.8;

/// Decibel range mapped onto byte magnitudes
const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;

#[derive(Debug, Error, PartialEq)]
pub enum AnalyserError {
    #[error("FFT size {0} must be a power of two between 32 and 32768")]
    InvalidFftSize(usize),
    #[error("smoothing {0} must be between 0 and 1")]
    InvalidSmoothing(f32),
}

pub struct FrequencyAnalyser {
    fft_size: usize,
    smoothing: f32,
    planner: FftPlanner<f32>,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    fft_buffer: Vec<Complex<f32>>,
    // Smoothed linear magnitudes, one per bin
    magnitudes: Vec<f32>,
    frequency: Vec<u8>,
    time_domain: Vec<u8>,
}

fn validate_fft_size(fft_size: usize) -> Result<(), AnalyserError> {
    if fft_size.is_power_of_two() && (MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&fft_size) {
        Ok(())
    } else {
        Err(AnalyserError::InvalidFftSize(fft_size))
    }
}

fn validate_smoothing(smoothing: f32) -> Result<(), AnalyserError> {
    if (0.0..=1.0).contains(&smoothing) {
        Ok(())
    } else {
        Err(AnalyserError::InvalidSmoothing(smoothing))
    }
}

fn blackman_window(n: usize) -> Vec<f32> {
    const ALPHA: f32 = 0.16;
    let a0 = 0.5 * (1.0 - ALPHA);
    let a1 = 0.5;
    let a2 = 0.5 * ALPHA;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            a0 - a1 * (TAU * x).cos() + a2 * (2.0 * TAU * x).cos()
        })
        .collect()
}

/// Decibels to a byte on the analyser's fixed range
fn decibels_to_byte(db: f32) -> u8 {
    let scaled = 255.0 * (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS);
    scaled.floor().clamp(0.0, 255.0) as u8
}

/// Sample in [-1, 1] to a byte, 128 being silence
fn sample_to_byte(sample: f32) -> u8 {
    (128.0 * (1.0 + sample)).floor().clamp(0.0, 255.0) as u8
}

impl FrequencyAnalyser {
    pub fn new(fft_size: usize, smoothing: f32) -> Result<Self, AnalyserError> {
        validate_fft_size(fft_size)?;
        validate_smoothing(smoothing)?;
        Ok(Self::build(fft_size, smoothing))
    }

    fn build(fft_size: usize, smoothing: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self {
            fft_size,
            smoothing,
            planner,
            fft,
            window: blackman_window(fft_size),
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
            magnitudes: vec![0.0; fft_size / 2],
            frequency: vec![0; fft_size / 2],
            time_domain: vec![128; fft_size / 2],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Replan the FFT. Smoothing history is discarded.
    pub fn set_fft_size(&mut self, fft_size: usize) -> Result<(), AnalyserError> {
        validate_fft_size(fft_size)?;
        if fft_size == self.fft_size {
            return Ok(());
        }

        self.fft_size = fft_size;
        self.fft = self.planner.plan_fft_forward(fft_size);
        self.window = blackman_window(fft_size);
        self.fft_buffer = vec![Complex::new(0.0, 0.0); fft_size];
        self.magnitudes = vec![0.0; fft_size / 2];
        self.frequency = vec![0; fft_size / 2];
        self.time_domain = vec![128; fft_size / 2];

        tracing::info!("Analyser FFT size set to {}", fft_size);
        Ok(())
    }

    pub fn set_smoothing(&mut self, smoothing: f32) -> Result<(), AnalyserError> {
        validate_smoothing(smoothing)?;
        self.smoothing = smoothing;
        tracing::info!("Analyser smoothing set to {:.2}", smoothing);
        Ok(())
    }

    /// Analyse the most recent `fft_size` samples.
    ///
    /// Shorter input is treated as preceded by silence. The waveform keeps
    /// the first `bin_count` samples of the window.
    pub fn process(&mut self, samples: &[f32]) {
        let n = self.fft_size;
        let take = samples.len().min(n);
        let recent = &samples[samples.len() - take..];
        let pad = n - take;

        for i in 0..n {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            let sample = if sample.is_finite() { sample } else { 0.0 };
            if let Some(byte) = self.time_domain.get_mut(i) {
                *byte = sample_to_byte(sample);
            }
            self.fft_buffer[i] = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.fft_buffer);

        let scale = 1.0 / n as f32;
        let tau = self.smoothing;
        for (k, smoothed) in self.magnitudes.iter_mut().enumerate() {
            let magnitude = self.fft_buffer[k].norm() * scale;
            let next = tau * *smoothed + (1.0 - tau) * magnitude;
            *smoothed = if next.is_finite() { next } else { 0.0 };
            self.frequency[k] = decibels_to_byte(20.0 * smoothed.log10());
        }
    }

    /// Byte magnitudes from the last `process`, `fft_size / 2` bins
    pub fn byte_frequency_data(&self) -> &[u8] {
        &self.frequency
    }

    /// Byte waveform from the last `process`, `fft_size / 2` samples
    pub fn byte_time_domain_data(&self) -> &[u8] {
        &self.time_domain
    }
}

impl Default for FrequencyAnalyser {
    fn default() -> Self {
        Self::build(DEFAULT_FFT_SIZE, DEFAULT_SMOOTHING)
    }
}
