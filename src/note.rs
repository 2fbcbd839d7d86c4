//! Mapping frequencies to note names.
//!
//! Two policies exist and a profile uses exactly one of them:
//!
//! * [NotePolicy::LogDistance] rounds to the nearest equal-tempered semitone
//!   (A4 = 440 Hz) and works for every octave.
//! * [NotePolicy::NearestTable] picks the closest entry of a one-octave table
//!   (C4 to B4), so notes outside that octave snap to its edges.

use serde::{Deserialize, Serialize};

/// Chromatic note names starting at C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Reference frequencies of the fourth octave, in Hz.
pub const NOTE_TABLE: [(&str, f32); 12] = [
    ("C", 261.63),
    ("C#", 277.18),
    ("D", 293.66),
    ("D#", 311.13),
    ("E", 329.63),
    ("F", 349.23),
    ("F#", 369.99),
    ("G", 392.00),
    ("G#", 415.30),
    ("A", 440.00),
    ("A#", 466.16),
    ("B", 493.88),
];

/// Returned by [NotePolicy::LogDistance] for frequencies of zero or below.
pub const TOO_LOW: &str = "Too Low";
/// Returned by [NotePolicy::NearestTable] for frequencies of 20 Hz or below.
pub const TABLE_TOO_LOW: &str = "Too low";
/// Lowest frequency [NotePolicy::NearestTable] maps to a note, exclusive.
pub const TABLE_MIN_FREQUENCY: f32 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotePolicy {
    #[default]
    LogDistance,
    NearestTable,
}

impl NotePolicy {
    pub fn note_name(self, frequency: f32) -> &'static str {
        match self {
            NotePolicy::LogDistance => frequency_to_note(frequency),
            NotePolicy::NearestTable => nearest_table_note(frequency),
        }
    }
}

/// Fractional MIDI note number of `frequency`; 69 is A4.
pub fn midi_from_hz(frequency: f32) -> f32 {
    69.0 + 12.0 * (frequency / 440.0).log2()
}

/// Name of the equal-tempered note nearest to `frequency`.
pub fn frequency_to_note(frequency: f32) -> &'static str {
    if !(frequency > 0.0) || !frequency.is_finite() {
        return TOO_LOW;
    }
    let midi = midi_from_hz(frequency).round() as i64;
    NOTE_NAMES[(midi + 12).rem_euclid(12) as usize]
}

/// Name of the [NOTE_TABLE] entry closest to `frequency`. Ties go to the
/// lower note.
pub fn nearest_table_note(frequency: f32) -> &'static str {
    if !(frequency > TABLE_MIN_FREQUENCY) {
        return TABLE_TOO_LOW;
    }
    let mut best = NOTE_TABLE[0];
    for &entry in &NOTE_TABLE[1..] {
        if (entry.1 - frequency).abs() < (best.1 - frequency).abs() {
            best = entry;
        }
    }
    best.0
}
