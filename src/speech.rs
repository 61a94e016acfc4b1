use std::io::Cursor;
use std::thread;

use log::warn;
use thiserror::Error;

const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("synthesis request failed: {0}")]
    Synthesis(#[from] reqwest::Error),
    #[error("synthesis returned {0}")]
    BadStatus(reqwest::StatusCode),
    #[error("audio output failed: {0}")]
    Playback(String),
}

/// An in-memory encoded audio clip (MP3), ready for one-shot playback.
#[derive(Debug, Clone)]
pub struct AudioClip(pub Vec<u8>);

/// Produces spoken audio for a single line of text.
///
/// Every call re-synthesizes, even for a word the user replays back to back;
/// clips are short and never cached.
pub trait SpeechSynthesizer {
    fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError>;
}

/// Google Translate's speech endpoint, the same voice the gTTS tooling uses.
pub struct GoogleSynthesizer {
    http: reqwest::blocking::Client,
    lang: String,
}

impl GoogleSynthesizer {
    pub fn new() -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            lang: "en".to_string(),
        }
    }
}

impl Default for GoogleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSynthesizer for GoogleSynthesizer {
    fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError> {
        let response = self
            .http
            .get(TTS_ENDPOINT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.lang.as_str()),
                ("q", text),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(SpeechError::BadStatus(response.status()));
        }

        Ok(AudioClip(response.bytes()?.to_vec()))
    }
}

/// Plays a clip once. Must not hold up the caller while audio runs.
pub trait AudioPlayer {
    fn play(&self, clip: AudioClip);
}

/// Speaker output through the default audio device.
pub struct RodioPlayer;

impl AudioPlayer for RodioPlayer {
    fn play(&self, clip: AudioClip) {
        // A throwaway thread per clip keeps the event loop free and keeps the
        // output stream alive until the clip ends. Failures are logged and
        // swallowed; read-aloud is a convenience, not a required step.
        let AudioClip(bytes) = clip;
        thread::spawn(move || {
            if let Err(e) = play_blocking(bytes) {
                warn!("audio playback failed: {e}");
            }
        });
    }
}

fn play_blocking(bytes: Vec<u8>) -> Result<(), SpeechError> {
    let stream = rodio::OutputStreamBuilder::open_default_stream()
        .map_err(|e| SpeechError::Playback(e.to_string()))?;
    let sink = rodio::Sink::connect_new(stream.mixer());
    let source = rodio::Decoder::new(Cursor::new(bytes))
        .map_err(|e| SpeechError::Playback(e.to_string()))?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
