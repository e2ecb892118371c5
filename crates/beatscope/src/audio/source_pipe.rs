//! Audio device capture.
//!
//! Opens an input device with cpal and mixes every callback down to mono
//! into a ring buffer large enough for the biggest FFT window.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::analyser::MAX_FFT_SIZE;

/// Fixed-size history of the most recent mono samples
pub struct SampleRing {
    data: Vec<f32>,
    // Next write position, also the oldest sample
    head: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity.max(1)],
            head: 0,
        }
    }

    pub fn push(&mut self, sample: f32) {
        self.data[self.head] = sample;
        self.head = (self.head + 1) % self.data.len();
    }

    /// Push interleaved frames, averaging the channels of each
    pub fn push_interleaved(&mut self, data: &[f32], channels: usize) {
        let channels = channels.max(1);
        for frame in data.chunks(channels) {
            let sample = frame.iter().sum::<f32>() / frame.len() as f32;
            self.push(sample);
        }
    }

    /// The newest `count` samples, oldest first
    pub fn latest(&self, count: usize) -> Vec<f32> {
        let len = self.data.len();
        let count = count.min(len);
        let start = (self.head + len - count) % len;
        (0..count).map(|i| self.data[(start + i) % len]).collect()
    }
}

pub struct SourcePipe {
    buffer: Arc<Mutex<SampleRing>>,
    _stream: Option<Stream>,
}

impl SourcePipe {
    /// Capture from `preferred` if an input device has that name, else from
    /// the default input. With no usable device the pipe stays silent.
    pub fn open(preferred: Option<&str>, timeout: Duration) -> Self {
        let buffer = Arc::new(Mutex::new(SampleRing::new(MAX_FFT_SIZE)));
        let host = cpal::default_host();

        let device = preferred
            .and_then(|name| Self::find_input(&host, name))
            .or_else(|| {
                if let Some(name) = preferred {
                    tracing::warn!("Input device {:?} not found, using default", name);
                }
                host.default_input_device()
            });

        let Some(device) = device else {
            tracing::warn!("No audio input device available, running silent");
            return Self {
                buffer,
                _stream: None,
            };
        };

        let name = device.name().unwrap_or_else(|_| "unknown".to_string());
        let stream = Self::build_stream(&device, Arc::clone(&buffer), timeout);
        if stream.is_some() {
            tracing::info!("Capturing from {}", name);
        } else {
            tracing::warn!("Could not open {}, running silent", name);
        }

        Self {
            buffer,
            _stream: stream,
        }
    }

    pub fn list_devices() {
        let host = cpal::default_host();
        match host.input_devices() {
            Ok(devices) => {
                for (idx, device) in devices.enumerate() {
                    if let Ok(name) = device.name() {
                        tracing::info!("  [{}] {}", idx, name);
                    }
                }
            }
            Err(e) => tracing::warn!("Failed to enumerate input devices: {}", e),
        }
    }

    fn find_input(host: &cpal::Host, name: &str) -> Option<Device> {
        host.input_devices()
            .ok()?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
    }

    /// Device config with a timeout, some backends hang on bad devices
    fn get_config_with_timeout(device: &Device, timeout: Duration) -> Option<StreamConfig> {
        let device_clone = device.clone();
        let (tx, rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            let _ = tx.send(device_clone.default_input_config());
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(config)) => Some(config.into()),
            Ok(Err(e)) => {
                tracing::warn!("Failed to get input config: {}", e);
                None
            }
            Err(_) => {
                tracing::warn!("Input config timed out after {:?}", timeout);
                None
            }
        }
    }

    fn build_stream(
        device: &Device,
        buffer: Arc<Mutex<SampleRing>>,
        timeout: Duration,
    ) -> Option<Stream> {
        let stream_config = Self::get_config_with_timeout(device, timeout)?;
        let channels = stream_config.channels as usize;

        let stream = device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut ring) = buffer.lock() {
                    ring.push_interleaved(data, channels);
                }
            },
            |err| tracing::error!("Audio stream error: {}", err),
            None,
        );

        match stream {
            Ok(s) => {
                if let Err(e) = s.play() {
                    tracing::warn!("Failed to start stream: {}", e);
                    return None;
                }
                Some(s)
            }
            Err(e) => {
                tracing::warn!("Failed to build stream: {}", e);
                None
            }
        }
    }

    /// The newest `count` samples, silence if the stream is poisoned
    pub fn samples(&self, count: usize) -> Vec<f32> {
        match self.buffer.lock() {
            Ok(ring) => ring.latest(count),
            Err(_) => vec![0.0; count],
        }
    }
}
