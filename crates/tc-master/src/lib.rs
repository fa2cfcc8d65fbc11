//! Headless controller for the tetrachip synthesizer.
//!
//! Loads a patch, plays it live on the default audio device, or renders it
//! offline to samples and WAV. The CLI and the integration tests share it.

mod error;
mod patch;
mod wav;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use tc_audio::{AudioOutput, CpalOutput};
use tc_engine::{ChannelStatus, Driver, Synth};
use tc_ir::ChannelId;

pub use error::{MasterError, Result};
pub use patch::{ChannelSetup, EnvelopeSetup, Patch, PatchCommand, TimedCommand, VibratoSetup};
pub use wav::{samples_to_wav, write_wav};

/// Silence appended after live playback so the device drains cleanly.
const TAIL_MS: u64 = 100;

/// Result of an offline render.
#[derive(Debug, Clone)]
pub struct Render {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
    /// Channel snapshots taken after the last sample
    pub status: Vec<ChannelStatus>,
}

/// Owns a patch and manages playback of it.
pub struct Controller {
    patch: Patch,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    played: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(patch: Patch) -> Self {
        Self { patch, playback: None }
    }

    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    pub fn set_patch(&mut self, patch: Patch) {
        self.stop();
        self.patch = patch;
    }

    /// A driver with the patch scheduled at `sample_rate`.
    pub fn driver(&self, sample_rate: u32) -> Driver {
        Driver::new(Synth::new(sample_rate), self.patch.event_queue(sample_rate))
    }

    // --- Real-time playback ---

    /// Start playing on the default device. Returns once the device is open.
    pub fn play(&mut self) -> Result<()> {
        self.stop();

        let patch = self.patch.clone();
        let stop_signal = Arc::new(AtomicBool::new(false));
        let played = Arc::new(AtomicU64::new(0));
        let finished = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel();

        let stop = stop_signal.clone();
        let count = played.clone();
        let done = finished.clone();

        let thread = std::thread::spawn(move || {
            audio_thread(patch, ready_tx, stop, count, done);
        });

        let opened = ready_rx.recv().unwrap_or(Err(MasterError::AudioThread));

        self.playback = Some(PlaybackHandle {
            stop_signal,
            played,
            finished,
            thread: Some(thread),
        });

        if opened.is_err() {
            self.stop();
        }
        opened
    }

    pub fn stop(&mut self) {
        if let Some(mut pb) = self.playback.take() {
            pb.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = pb.thread.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| p.finished.load(Ordering::Relaxed))
    }

    /// Samples handed to the device so far.
    pub fn position(&self) -> Option<u64> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) {
            return None;
        }
        Some(pb.played.load(Ordering::Relaxed))
    }

    // --- Offline rendering ---

    /// Render the whole patch at its own sample rate.
    pub fn render(&self) -> Render {
        let sample_rate = self.patch.sample_rate;
        let total = self.patch.length_samples(sample_rate) as usize;
        let mut driver = self.driver(sample_rate);

        let mut samples = Vec::with_capacity(total);
        while samples.len() < total {
            samples.push(driver.next_sample());
        }

        let status = ChannelId::ALL
            .iter()
            .map(|&ch| driver.synth().channel_status(ch))
            .collect();
        Render { sample_rate, samples, status }
    }

    pub fn render_samples(&self) -> Vec<i16> {
        self.render().samples
    }

    pub fn render_to_wav(&self) -> Vec<u8> {
        let render = self.render();
        samples_to_wav(&render.samples, render.sample_rate)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Patch::demo())
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn audio_thread(
    patch: Patch,
    ready: mpsc::Sender<Result<()>>,
    stop_signal: Arc<AtomicBool>,
    played: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
) {
    let (mut output, consumer) = match CpalOutput::new() {
        Ok(opened) => opened,
        Err(err) => {
            finished.store(true, Ordering::Relaxed);
            let _ = ready.send(Err(err.into()));
            return;
        }
    };
    if let Err(err) = output.build_stream(consumer).and_then(|_| output.start()) {
        finished.store(true, Ordering::Relaxed);
        let _ = ready.send(Err(err.into()));
        return;
    }

    let sample_rate = output.sample_rate();
    let total = patch.length_samples(sample_rate);
    let mut driver = Driver::new(Synth::new(sample_rate), patch.event_queue(sample_rate));
    let report_interval = u64::from(driver.modulation_interval());
    log::info!("playing {total} samples at {sample_rate} Hz");
    let _ = ready.send(Ok(()));

    let mut count: u64 = 0;
    while count < total && !stop_signal.load(Ordering::Relaxed) {
        output.write_spin(next_sample(&mut driver));
        count += 1;
        if count % report_interval == 0 {
            played.store(count, Ordering::Relaxed);
        }
    }

    for _ in 0..TAIL_MS * sample_rate as u64 / 1000 {
        output.write_spin(0);
    }
    let _ = output.stop();

    played.store(count, Ordering::Relaxed);
    finished.store(true, Ordering::Relaxed);
}

#[cfg(feature = "alloc_check")]
fn next_sample(driver: &mut Driver) -> i16 {
    assert_no_alloc::assert_no_alloc(|| driver.next_sample())
}

#[cfg(not(feature = "alloc_check"))]
fn next_sample(driver: &mut Driver) -> i16 {
    driver.next_sample()
}
