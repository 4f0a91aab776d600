//! Simulated voice input. There is no recogniser: a capture lasts a fixed
//! time and always yields the same transcript.

use std::time::Duration;

pub const CAPTURE_DURATION: Duration = Duration::from_secs(2);
pub const SIMULATED_TRANSCRIPT: &str = "Je voudrais prendre rendez-vous";

#[derive(Debug, Default)]
pub struct VoiceInput {
    listening: bool,
    capture: u64,
}

/// Identifies one capture so a stale timer can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureId(u64);

impl VoiceInput {
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Start listening, or stop if already listening.
    /// Returns the capture to finish after `CAPTURE_DURATION` when starting.
    pub fn toggle(&mut self) -> Option<CaptureId> {
        if self.listening {
            self.listening = false;
            None
        } else {
            self.listening = true;
            self.capture += 1;
            Some(CaptureId(self.capture))
        }
    }

    /// Called when a capture's timer fires. Yields the transcript unless the
    /// capture was stopped or superseded meanwhile.
    pub fn finish(&mut self, id: CaptureId) -> Option<&'static str> {
        if !self.listening || id.0 != self.capture {
            return None;
        }
        self.listening = false;
        Some(SIMULATED_TRANSCRIPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_yields_transcript_once() {
        let mut voice = VoiceInput::default();
        let id = voice.toggle().unwrap();
        assert!(voice.is_listening());
        assert_eq!(voice.finish(id), Some(SIMULATED_TRANSCRIPT));
        assert!(!voice.is_listening());
        assert_eq!(voice.finish(id), None);
    }

    #[test]
    fn stopping_early_discards_the_pending_capture() {
        let mut voice = VoiceInput::default();
        let first = voice.toggle().unwrap();
        assert_eq!(voice.toggle(), None);
        let second = voice.toggle().unwrap();
        assert_eq!(voice.finish(first), None);
        assert!(voice.is_listening());
        assert_eq!(voice.finish(second), Some(SIMULATED_TRANSCRIPT));
    }
}
