//! Playback on the default output device through cpal.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Instant;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use parking_lot::Mutex;

use pratik_core::pcm::AudioBuffer;
use pratik_core::ports::{AudioOutput, AudioOutputFactory, PlaybackError};

/// Read position into the active buffer, in source frames.
struct Cursor {
    buffer: Option<Arc<AudioBuffer>>,
    position: f64,
    step: f64,
}

impl Cursor {
    fn fill<T>(&mut self, data: &mut [T], channels: usize)
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        for frame in data.chunks_mut(channels) {
            let source = self.buffer.as_ref().and_then(|buffer| {
                let index = self.position as usize;
                (index < buffer.frames()).then_some((buffer, index))
            });

            match source {
                Some((buffer, index)) => {
                    let source_channels = buffer.channel_count().max(1);
                    for (c, sample) in frame.iter_mut().enumerate() {
                        let value = buffer
                            .channel(c % source_channels)
                            .and_then(|ch| ch.get(index))
                            .copied()
                            .unwrap_or(0.0);
                        *sample = T::from_sample(value);
                    }
                    self.position += self.step;
                }
                None => {
                    self.buffer = None;
                    frame.fill(T::from_sample(0.0f32));
                }
            }
        }
    }
}

/// Output on the default device.
///
/// The cpal stream lives on a dedicated thread until [`AudioOutput::close`].
/// Buffers at other sample rates are resampled by nearest neighbour.
pub struct CpalAudioOutput {
    opened_at: Instant,
    device_rate: u32,
    cursor: Arc<Mutex<Cursor>>,
    shutdown: Mutex<Option<(mpsc::Sender<()>, JoinHandle<()>)>>,
}

impl CpalAudioOutput {
    pub fn open_default() -> Result<Self, PlaybackError> {
        let cursor = Arc::new(Mutex::new(Cursor {
            buffer: None,
            position: 0.0,
            step: 1.0,
        }));
        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, PlaybackError>>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let stream_cursor = cursor.clone();
        let handle = std::thread::Builder::new()
            .name("pratik-audio".to_string())
            .spawn(move || match build_stream(stream_cursor) {
                Ok((stream, rate)) => {
                    let _ = ready_tx.send(Ok(rate));
                    // Block until close or until the output is dropped.
                    let _ = shutdown_rx.recv();
                    drop(stream);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })
            .map_err(|e| PlaybackError::Output(e.to_string()))?;

        let device_rate = ready_rx
            .recv()
            .map_err(|_| PlaybackError::Output("audio thread exited".to_string()))??;
        tracing::info!(device_rate, "Audio device opened");

        Ok(Self {
            opened_at: Instant::now(),
            device_rate,
            cursor,
            shutdown: Mutex::new(Some((shutdown_tx, handle))),
        })
    }
}

fn build_stream(cursor: Arc<Mutex<Cursor>>) -> Result<(Stream, u32), PlaybackError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| PlaybackError::Output("no output device available".to_string()))?;
    let supported = device
        .default_output_config()
        .map_err(|e| PlaybackError::Output(e.to_string()))?;

    let rate = supported.sample_rate().0;
    let config: StreamConfig = supported.config();
    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => build_typed::<f32>(&device, &config, cursor)?,
        cpal::SampleFormat::I16 => build_typed::<i16>(&device, &config, cursor)?,
        cpal::SampleFormat::U16 => build_typed::<u16>(&device, &config, cursor)?,
        format => {
            return Err(PlaybackError::Output(format!(
                "unsupported sample format: {format:?}"
            )));
        }
    };
    stream
        .play()
        .map_err(|e| PlaybackError::Output(e.to_string()))?;
    Ok((stream, rate))
}

fn build_typed<T: cpal::SizedSample + cpal::FromSample<f32>>(
    device: &cpal::Device,
    config: &StreamConfig,
    cursor: Arc<Mutex<Cursor>>,
) -> Result<Stream, PlaybackError> {
    let channels = usize::from(config.channels).max(1);
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                cursor.lock().fill(data, channels);
            },
            |err| tracing::error!(error = %err, "Audio stream error"),
            None,
        )
        .map_err(|e| PlaybackError::Output(e.to_string()))
}

impl AudioOutput for CpalAudioOutput {
    fn current_time(&self) -> f64 {
        self.opened_at.elapsed().as_secs_f64()
    }

    fn start(&self, buffer: Arc<AudioBuffer>, offset_secs: f64) -> Result<(), PlaybackError> {
        if self.shutdown.lock().is_none() {
            return Err(PlaybackError::Output("output is closed".to_string()));
        }
        let mut cursor = self.cursor.lock();
        cursor.position = buffer.frame_at(offset_secs) as f64;
        cursor.step = f64::from(buffer.sample_rate()) / f64::from(self.device_rate.max(1));
        cursor.buffer = Some(buffer);
        Ok(())
    }

    fn stop(&self) {
        self.cursor.lock().buffer = None;
    }

    fn close(&self) {
        self.stop();
        if let Some((shutdown, handle)) = self.shutdown.lock().take() {
            let _ = shutdown.send(());
            if handle.join().is_err() {
                tracing::warn!("Audio thread panicked");
            }
            tracing::debug!("Audio device released");
        }
    }
}

impl Drop for CpalAudioOutput {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens [`CpalAudioOutput`]s on the default device.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalAudioOutputFactory;

impl AudioOutputFactory for CpalAudioOutputFactory {
    fn open(&self, sample_rate: u32, channels: u16) -> Result<Box<dyn AudioOutput>, PlaybackError> {
        tracing::debug!(sample_rate, channels, "Opening audio device");
        Ok(Box::new(CpalAudioOutput::open_default()?))
    }
}
