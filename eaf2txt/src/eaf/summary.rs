//! Per-participant statistics over a converted transcript

use eaf2txt_common::OutputRow;
use std::collections::BTreeMap;
use std::fmt;

/// Annotation value marking a turn without speech
pub const NON_SPEECH_MARKER: &str = "0.";

/// Aggregates for one participant, subtier rows excluded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantSummary {
    /// Number of rows
    pub turns: usize,
    /// Sum of durations of rows not marked as non-speech, in milliseconds.
    /// Saturates at the `i64` bounds.
    pub speaking_duration: i64,
    /// Counts every row of the participant, exactly like `turns`.
    /// Kept as observed; not restricted to non-speech rows.
    pub non_speaking_turns: usize,
}

/// Statistics for every participant of one transcript
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    participants: BTreeMap<String, ParticipantSummary>,
}

/// Summarize output rows, ignoring subtier rows
pub fn summarize(rows: &[OutputRow]) -> Summary {
    let mut participants: BTreeMap<String, ParticipantSummary> = BTreeMap::new();

    for row in rows.iter().filter(|row| !row.is_subtier()) {
        let entry = participants.entry(row.participant.clone()).or_default();
        entry.turns += 1;
        entry.non_speaking_turns += 1;
        if row.value != NON_SPEECH_MARKER {
            entry.speaking_duration = entry.speaking_duration.saturating_add(row.duration);
        }
    }

    Summary { participants }
}

impl Summary {
    /// Per-participant aggregates, sorted by participant
    pub fn participants(&self) -> &BTreeMap<String, ParticipantSummary> {
        &self.participants
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Participant with the most turns
    pub fn most_turns(&self) -> Option<(&str, usize)> {
        self.leader(|p| p.turns)
    }

    /// Participant with the longest total speaking time
    pub fn longest_speaking(&self) -> Option<(&str, i64)> {
        self.leader(|p| p.speaking_duration)
    }

    /// Participant with the most non-speaking turns
    pub fn most_non_speaking_turns(&self) -> Option<(&str, usize)> {
        self.leader(|p| p.non_speaking_turns)
    }

    /// Maximum of `stat`; on ties the participant that sorts first wins
    fn leader<T: Ord + Copy>(&self, stat: impl Fn(&ParticipantSummary) -> T) -> Option<(&str, T)> {
        let mut best: Option<(&str, T)> = None;
        for (participant, summary) in &self.participants {
            let value = stat(summary);
            if best.map_or(true, |(_, current)| value > current) {
                best = Some((participant.as_str(), value));
            }
        }
        best
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(turns), Some(speaking), Some(non_speaking)) = (
            self.most_turns(),
            self.longest_speaking(),
            self.most_non_speaking_turns(),
        ) else {
            return write!(f, "No annotations to summarize");
        };

        writeln!(f, "Most turns: {} ({})", turns.0, turns.1)?;
        writeln!(f, "Longest speaking time: {} ({} ms)", speaking.0, speaking.1)?;
        write!(f, "Most non-speaking turns: {} ({})", non_speaking.0, non_speaking.1)
    }
}
