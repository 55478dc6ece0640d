//! # Note Mapping Module
//!
//! Maps a detected frequency to the nearest note on the standard music
//! scale. Pure lookup against a static equal-temperament table; the
//! analysis pipeline works entirely in Hz and only the display layer
//! consumes these names.

use once_cell::sync::Lazy;

/// A single musical note with its name and target frequency.
#[derive(Debug, Clone)]
pub struct Note {
    /// Note name (e.g., "A4", "C#3").
    pub name: String,
    /// Frequency in Hz.
    pub frequency: f32,
}

/// The 88 keys of a standard piano (A0 to C8), equal temperament with
/// A4 = 440 Hz, computed once at first use.
static NOTES: Lazy<Vec<Note>> = Lazy::new(|| {
    const NOTE_NAMES: [&str; 12] = [
        "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
    ];
    (0..88)
        .map(|i| {
            // A4 is key 49, index 48; f = 440 * 2^(n/12) with n the
            // semitone distance from A4. The octave number rolls over
            // at C, nine keys above each A.
            let frequency = 440.0 * 2.0_f32.powf((i as f32 - 48.0) / 12.0);
            let name = format!("{}{}", NOTE_NAMES[i % 12], (i + 9) / 12);
            Note { name, frequency }
        })
        .collect()
});

/// Finds the note closest to a frequency by minimum absolute difference.
///
/// Returns the note name and its equal-temperament target frequency.
pub fn find_nearest_note(freq: f32) -> (String, f32) {
    let closest = NOTES
        .iter()
        .min_by(|a, b| {
            let diff_a = (a.frequency - freq).abs();
            let diff_b = (b.frequency - freq).abs();
            diff_a.partial_cmp(&diff_b).unwrap()
        })
        .unwrap(); // NOTES is never empty.

    (closest.name.clone(), closest.frequency)
}

/// Deviation of a measured frequency from a target, in cents.
/// 100 cents per semitone; positive means sharp.
pub fn cents_deviation(freq: f32, target_freq: f32) -> f32 {
    1200.0 * (freq / target_freq).log2()
}
