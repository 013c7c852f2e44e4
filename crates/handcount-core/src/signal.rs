use serde::Serialize;
use std::sync::mpsc::Sender;

/// Events the core reports to whatever is presenting the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    WarningThresholdReached { remaining: u32 },
    DangerThresholdReached { remaining: u32 },
    TimerExpired,
    RoundComplete { round_number: usize },
    MatchReadyForResult,
}

impl Signal {
    /// Sound the presentation layer should play alongside this signal.
    pub const fn cue(self) -> Option<AudioCue> {
        match self {
            Signal::WarningThresholdReached { .. } => Some(AudioCue::WarningPulse),
            Signal::TimerExpired => Some(AudioCue::ExpiryPulse),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    WarningPulse,
    ExpiryPulse,
}

/// Square-wave tone description; producing audio is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSpec {
    pub frequency_hz: u32,
    pub duration_ms: u32,
}

impl AudioCue {
    pub const fn tone(self) -> ToneSpec {
        match self {
            AudioCue::WarningPulse => ToneSpec {
                frequency_hz: 1500,
                duration_ms: 300,
            },
            AudioCue::ExpiryPulse => ToneSpec {
                frequency_hz: 400,
                duration_ms: 1000,
            },
        }
    }
}

pub trait SignalSink {
    fn emit(&mut self, signal: Signal);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SignalSink for NullSink {
    fn emit(&mut self, _signal: Signal) {}
}

/// In-memory sink, handy for tests and polling front-ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalLog {
    signals: Vec<Signal>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn drain(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub fn count(&self, predicate: impl Fn(&Signal) -> bool) -> usize {
        self.signals.iter().filter(|signal| predicate(signal)).count()
    }
}

impl SignalSink for SignalLog {
    fn emit(&mut self, signal: Signal) {
        self.signals.push(signal);
    }
}

impl SignalSink for Sender<Signal> {
    fn emit(&mut self, signal: Signal) {
        // A dropped receiver just means nobody is watching any more.
        let _ = self.send(signal);
    }
}
