//! Text-to-speech playback for a single opened post.
//!
//! A [`PlaybackSession`] lives as long as the post view. The first toggle
//! opens an audio output and fetches speech; later toggles pause and resume
//! against the output clock. Closing (or dropping) the session releases the
//! output whatever state it is in.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{Post, PostId};
use crate::pcm::{self, AudioBuffer};
use crate::ports::{AudioOutput, AudioOutputFactory, PlaybackError, SpeechSynthesizer};
use crate::speech;

/// Notice shown when no audio could be produced.
pub const UNAVAILABLE_NOTICE: &str = "Sorry, audio generation is currently unavailable.";

/// Playback parameters.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub max_speech_chars: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            sample_rate: pcm::SPEECH_SAMPLE_RATE,
            channels: pcm::SPEECH_CHANNELS,
            max_speech_chars: speech::MAX_SPEECH_CHARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No buffer, nothing in flight.
    Idle,
    /// Speech is being fetched and decoded.
    Loading,
    /// Buffer ready, not playing.
    Paused,
    /// Buffer playing.
    Playing,
}

/// What a toggle did.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// Speech was fetched and playback started from the beginning.
    Started,
    /// Playback resumed at `offset_secs`.
    Resumed { offset_secs: f64 },
    /// Playback paused at `offset_secs`.
    Paused { offset_secs: f64 },
    /// A fetch is already in flight; nothing changed.
    Busy,
    /// No audio could be produced; the session is idle again.
    Unavailable { notice: &'static str },
    /// The session was closed; nothing changed.
    Closed,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub has_buffer: bool,
    pub is_playing: bool,
    pub is_loading: bool,
    pub paused_offset_secs: f64,
    pub playback_started_at: f64,
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
}

struct SessionState {
    phase: PlaybackState,
    buffer: Option<Arc<AudioBuffer>>,
    output: Option<Box<dyn AudioOutput>>,
    paused_offset: f64,
    started_at: f64,
    closed: bool,
}

impl SessionState {
    fn position(&self) -> f64 {
        match (&self.output, self.phase) {
            (Some(output), PlaybackState::Playing) => {
                self.paused_offset + (output.current_time() - self.started_at)
            }
            _ => self.paused_offset,
        }
    }

    fn duration(&self) -> Option<f64> {
        self.buffer.as_ref().map(|b| b.duration_secs())
    }

    /// Move a playing session that ran off the end of its buffer to Paused.
    fn settle(&mut self) {
        if self.phase != PlaybackState::Playing {
            return;
        }
        let Some(duration) = self.duration() else {
            return;
        };
        let position = self.position();
        if position >= duration {
            if let Some(output) = &self.output {
                output.stop();
            }
            self.paused_offset = position;
            self.phase = PlaybackState::Paused;
            tracing::debug!(position, duration, "Playback reached end of buffer");
        }
    }

    fn release(&mut self) {
        if let Some(output) = self.output.take() {
            output.stop();
            output.close();
        }
        self.buffer = None;
        self.phase = PlaybackState::Idle;
        self.paused_offset = 0.0;
        self.started_at = 0.0;
    }
}

/// Speech playback bound to one post view.
pub struct PlaybackSession {
    post_id: PostId,
    content: String,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    outputs: Arc<dyn AudioOutputFactory>,
    config: PlaybackConfig,
    state: Mutex<SessionState>,
}

impl PlaybackSession {
    pub fn new(
        post: &Post,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        outputs: Arc<dyn AudioOutputFactory>,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            post_id: post.id.clone(),
            content: post.content.clone(),
            synthesizer,
            outputs,
            config,
            state: Mutex::new(SessionState {
                phase: PlaybackState::Idle,
                buffer: None,
                output: None,
                paused_offset: 0.0,
                started_at: 0.0,
                closed: false,
            }),
        }
    }

    pub fn post_id(&self) -> &PostId {
        &self.post_id
    }

    pub async fn state(&self) -> PlaybackState {
        let mut state = self.state.lock().await;
        state.settle();
        state.phase
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        let mut state = self.state.lock().await;
        state.settle();
        PlaybackSnapshot {
            state: state.phase,
            has_buffer: state.buffer.is_some(),
            is_playing: state.phase == PlaybackState::Playing,
            is_loading: state.phase == PlaybackState::Loading,
            paused_offset_secs: state.paused_offset,
            playback_started_at: state.started_at,
            position_secs: state.position(),
            duration_secs: state.duration(),
        }
    }

    /// The single play/pause affordance.
    pub async fn toggle(&self) -> Result<ToggleOutcome, PlaybackError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.closed {
            return Ok(ToggleOutcome::Closed);
        }
        state.settle();

        match state.phase {
            PlaybackState::Loading => Ok(ToggleOutcome::Busy),
            PlaybackState::Playing => {
                if let Some(output) = &state.output {
                    output.stop();
                    state.paused_offset += output.current_time() - state.started_at;
                }
                state.phase = PlaybackState::Paused;
                tracing::debug!(
                    post_id = %self.post_id,
                    offset = state.paused_offset,
                    "Playback paused"
                );
                Ok(ToggleOutcome::Paused {
                    offset_secs: state.paused_offset,
                })
            }
            PlaybackState::Paused => {
                let Some(buffer) = state.buffer.clone() else {
                    state.phase = PlaybackState::Idle;
                    return Err(PlaybackError::Output("no buffer to resume".to_string()));
                };
                if state.paused_offset >= buffer.duration_secs() {
                    state.paused_offset = 0.0;
                }
                let offset = state.paused_offset;
                Self::play_from(state, buffer, offset)?;
                tracing::debug!(post_id = %self.post_id, offset, "Playback resumed");
                Ok(ToggleOutcome::Resumed { offset_secs: offset })
            }
            PlaybackState::Idle => {
                if state.output.is_none() {
                    let output = self.outputs.open(self.config.sample_rate, self.config.channels)?;
                    state.output = Some(output);
                }
                state.phase = PlaybackState::Loading;
                drop(guard);
                self.load_and_play().await
            }
        }
    }

    async fn load_and_play(&self) -> Result<ToggleOutcome, PlaybackError> {
        let text = speech::prepare_text(&self.content, self.config.max_speech_chars);
        tracing::info!(post_id = %self.post_id, chars = text.chars().count(), "Requesting speech");

        let decoded = self
            .synthesizer
            .synthesize_speech(&text)
            .await
            .map(|payload| {
                pcm::decode_base64_pcm(&payload, self.config.sample_rate, self.config.channels)
            });

        let mut state = self.state.lock().await;
        if state.closed {
            tracing::debug!(
                post_id = %self.post_id,
                "Session closed while loading; discarding audio"
            );
            return Ok(ToggleOutcome::Closed);
        }

        let buffer = match decoded {
            Some(Ok(buffer)) => Arc::new(buffer),
            Some(Err(e)) => {
                tracing::warn!(
                    post_id = %self.post_id,
                    error = %e,
                    "Speech payload could not be decoded"
                );
                state.phase = PlaybackState::Idle;
                return Ok(ToggleOutcome::Unavailable {
                    notice: UNAVAILABLE_NOTICE,
                });
            }
            None => {
                tracing::warn!(post_id = %self.post_id, "Speech synthesis returned no audio");
                state.phase = PlaybackState::Idle;
                return Ok(ToggleOutcome::Unavailable {
                    notice: UNAVAILABLE_NOTICE,
                });
            }
        };

        state.buffer = Some(buffer.clone());
        state.paused_offset = 0.0;
        if let Err(e) = Self::play_from(&mut state, buffer, 0.0) {
            state.phase = PlaybackState::Paused;
            return Err(e);
        }
        Ok(ToggleOutcome::Started)
    }

    fn play_from(
        state: &mut SessionState,
        buffer: Arc<AudioBuffer>,
        offset: f64,
    ) -> Result<(), PlaybackError> {
        let output = state
            .output
            .as_ref()
            .ok_or_else(|| PlaybackError::Output("output not opened".to_string()))?;
        output.start(buffer, offset)?;
        state.started_at = output.current_time();
        state.phase = PlaybackState::Playing;
        Ok(())
    }

    /// Tear the session down and release the output. Idempotent.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if !state.closed {
            state.closed = true;
            state.release();
            tracing::debug!(post_id = %self.post_id, "Playback session closed");
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.state.get_mut().release();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use tokio::sync::Notify;

    use super::*;
    use crate::domain::PostDraft;

    #[derive(Default)]
    struct Recorder {
        now: StdMutex<f64>,
        starts: StdMutex<Vec<f64>>,
        stops: AtomicUsize,
        closes: AtomicUsize,
        opens: AtomicUsize,
    }

    impl Recorder {
        fn advance(&self, secs: f64) {
            *self.now.lock().unwrap() += secs;
        }

        fn starts(&self) -> Vec<f64> {
            self.starts.lock().unwrap().clone()
        }
    }

    struct RecordingOutput(Arc<Recorder>);

    impl AudioOutput for RecordingOutput {
        fn current_time(&self) -> f64 {
            *self.0.now.lock().unwrap()
        }

        fn start(&self, _buffer: Arc<AudioBuffer>, offset_secs: f64) -> Result<(), PlaybackError> {
            self.0.starts.lock().unwrap().push(offset_secs);
            Ok(())
        }

        fn stop(&self) {
            self.0.stops.fetch_add(1, Ordering::SeqCst);
        }

        fn close(&self) {
            self.0.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct RecordingFactory(Arc<Recorder>);

    impl AudioOutputFactory for RecordingFactory {
        fn open(
            &self,
            sample_rate: u32,
            channels: u16,
        ) -> Result<Box<dyn AudioOutput>, PlaybackError> {
            assert_eq!(sample_rate, 24_000);
            assert_eq!(channels, 1);
            self.0.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(RecordingOutput(self.0.clone())))
        }
    }

    struct ScriptedSynth {
        payload: Option<String>,
        calls: AtomicUsize,
        texts: StdMutex<Vec<String>>,
        gate: Option<(Arc<Notify>, Arc<Notify>)>,
    }

    impl ScriptedSynth {
        fn returning(payload: Option<String>) -> Self {
            Self {
                payload,
                calls: AtomicUsize::new(0),
                texts: StdMutex::new(Vec::new()),
                gate: None,
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for ScriptedSynth {
        async fn synthesize_speech(&self, text: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.texts.lock().unwrap().push(text.to_string());
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            self.payload.clone()
        }
    }

    /// Base64 PCM of `secs` seconds of silence at 24 kHz mono.
    fn silence(secs: usize) -> String {
        STANDARD.encode(vec![0u8; secs * 24_000 * 2])
    }

    fn post(content: &str) -> Post {
        Post::from_draft(
            PostDraft {
                title: "Listen".into(),
                content: content.into(),
                author: "Reader".into(),
                ..Default::default()
            },
            chrono::Utc::now(),
        )
    }

    fn session(synth: Arc<ScriptedSynth>, recorder: Arc<Recorder>) -> PlaybackSession {
        PlaybackSession::new(
            &post("**Hello** world"),
            synth,
            Arc::new(RecordingFactory(recorder)),
            PlaybackConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_first_toggle_fetches_and_plays() {
        let recorder = Arc::new(Recorder::default());
        let synth = Arc::new(ScriptedSynth::returning(Some(silence(10))));
        let session = session(synth.clone(), recorder.clone());

        assert_eq!(session.state().await, PlaybackState::Idle);
        assert_eq!(session.toggle().await.unwrap(), ToggleOutcome::Started);

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.state, PlaybackState::Playing);
        assert!(snapshot.has_buffer);
        assert_eq!(snapshot.duration_secs, Some(10.0));
        assert_eq!(recorder.starts(), vec![0.0]);
        assert_eq!(synth.texts.lock().unwrap().as_slice(), ["Hello world"]);
    }

    #[tokio::test]
    async fn test_pause_then_resume_at_accumulated_offset() {
        let recorder = Arc::new(Recorder::default());
        let synth = Arc::new(ScriptedSynth::returning(Some(silence(10))));
        let session = session(synth.clone(), recorder.clone());

        session.toggle().await.unwrap();
        recorder.advance(2.5);
        assert_eq!(
            session.toggle().await.unwrap(),
            ToggleOutcome::Paused { offset_secs: 2.5 }
        );

        recorder.advance(100.0);
        assert_eq!(
            session.toggle().await.unwrap(),
            ToggleOutcome::Resumed { offset_secs: 2.5 }
        );

        recorder.advance(1.5);
        let outcome = session.toggle().await.unwrap();
        let ToggleOutcome::Paused { offset_secs } = outcome else {
            panic!("expected pause, got {outcome:?}");
        };
        assert!((offset_secs - 4.0).abs() < 1e-9);

        assert_eq!(recorder.starts(), vec![0.0, 2.5]);
        assert_eq!(synth.calls.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_natural_end_settles_to_paused_and_restarts() {
        let recorder = Arc::new(Recorder::default());
        let synth = Arc::new(ScriptedSynth::returning(Some(silence(3))));
        let session = session(synth, recorder.clone());

        session.toggle().await.unwrap();
        recorder.advance(5.0);
        assert_eq!(session.state().await, PlaybackState::Paused);

        assert_eq!(
            session.toggle().await.unwrap(),
            ToggleOutcome::Resumed { offset_secs: 0.0 }
        );
        assert_eq!(recorder.starts(), vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_missing_audio_returns_to_idle_with_notice() {
        let recorder = Arc::new(Recorder::default());
        let synth = Arc::new(ScriptedSynth::returning(None));
        let session = session(synth.clone(), recorder.clone());

        assert_eq!(
            session.toggle().await.unwrap(),
            ToggleOutcome::Unavailable {
                notice: UNAVAILABLE_NOTICE
            }
        );
        assert_eq!(session.state().await, PlaybackState::Idle);
        assert!(recorder.starts().is_empty());

        // A later toggle tries again.
        session.toggle().await.unwrap();
        assert_eq!(synth.calls.load(Ordering::SeqCst), 2);
        assert_eq!(recorder.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_undecodable_audio_is_unavailable() {
        let recorder = Arc::new(Recorder::default());
        let synth = Arc::new(ScriptedSynth::returning(Some("AA==".to_string())));
        let session = session(synth, recorder);

        assert!(matches!(
            session.toggle().await.unwrap(),
            ToggleOutcome::Unavailable { .. }
        ));
    }

    #[tokio::test]
    async fn test_close_releases_output_once() {
        let recorder = Arc::new(Recorder::default());
        let synth = Arc::new(ScriptedSynth::returning(Some(silence(10))));
        let session = session(synth, recorder.clone());

        session.toggle().await.unwrap();
        session.close().await;
        session.close().await;

        assert_eq!(recorder.closes.load(Ordering::SeqCst), 1);
        assert_eq!(session.state().await, PlaybackState::Idle);
        assert_eq!(session.toggle().await.unwrap(), ToggleOutcome::Closed);

        drop(session);
        assert_eq!(recorder.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_releases_playing_output() {
        let recorder = Arc::new(Recorder::default());
        let synth = Arc::new(ScriptedSynth::returning(Some(silence(10))));
        let session = session(synth, recorder.clone());

        session.toggle().await.unwrap();
        drop(session);

        assert_eq!(recorder.closes.load(Ordering::SeqCst), 1);
        assert!(recorder.stops.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_untouched_session_never_opens_output() {
        let recorder = Arc::new(Recorder::default());
        let synth = Arc::new(ScriptedSynth::returning(Some(silence(1))));
        drop(session(synth, recorder.clone()));

        assert_eq!(recorder.opens.load(Ordering::SeqCst), 0);
        assert_eq!(recorder.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_result_after_close_is_discarded() {
        let recorder = Arc::new(Recorder::default());
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let mut synth = ScriptedSynth::returning(Some(silence(10)));
        synth.gate = Some((entered.clone(), release.clone()));
        let session = Arc::new(session(Arc::new(synth), recorder.clone()));

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.toggle().await }
        });

        entered.notified().await;
        assert_eq!(session.toggle().await.unwrap(), ToggleOutcome::Busy);
        assert!(session.snapshot().await.is_loading);

        session.close().await;
        release.notify_one();

        assert_eq!(pending.await.unwrap().unwrap(), ToggleOutcome::Closed);
        assert!(recorder.starts().is_empty());
        assert_eq!(recorder.closes.load(Ordering::SeqCst), 1);
    }
}
