//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::traits::{AudioError, AudioOutput};

/// Output on the default host device.
///
/// The synthesizer thread pushes samples into a lock-free ring; the device
/// callback pops one sample per device frame and copies it to every
/// channel. An empty ring plays silence.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<i16>,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Open the default device and create the sample ring (about 50 ms).
    pub fn new() -> Result<(Self, HeapCons<i16>), AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;
        let config: StreamConfig = config.into();

        let buffer_size = (config.sample_rate.0 as usize / 20).max(256);
        let rb = HeapRb::<i16>::new(buffer_size);
        let (producer, consumer) = rb.split();

        log::info!(
            "audio device {} at {} Hz, {} channels",
            device.name().unwrap_or_else(|_| "<unnamed>".into()),
            config.sample_rate.0,
            config.channels
        );

        let output = Self {
            device,
            config,
            stream: None,
            producer,
            running: Arc::new(AtomicBool::new(false)),
        };

        Ok((output, consumer))
    }

    /// Build and start the device stream.
    pub fn build_stream(&mut self, mut consumer: HeapCons<i16>) -> Result<(), AudioError> {
        let running = self.running.clone();
        let channels = self.config.channels as usize;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }

                    for frame in data.chunks_mut(channels) {
                        let value = consumer.try_pop().map_or(0.0, |s| s as f32 / 32768.0);
                        frame.fill(value);
                    }
                },
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);

        Ok(())
    }

    /// Push one sample, spinning until the ring has room.
    pub fn write_spin(&mut self, sample: i16) {
        while self.producer.try_push(sample).is_err() {
            std::hint::spin_loop();
        }
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn write(&mut self, samples: &[i16]) -> usize {
        self.producer.push_slice(samples)
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}
