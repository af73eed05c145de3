//! Annotation row model shared by the converter and the database sink

use serde::{Deserialize, Serialize};

/// Marks a tier as a child of another tier (`A1@P2` is a subtier of `A1`)
pub const SUBTIER_DELIMITER: char = '@';

/// One exported annotation: `tier_id, participant, start, end, duration, value`.
///
/// Times are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRow {
    pub tier_id: String,
    pub participant: String,
    pub start: i64,
    pub end: i64,
    pub duration: i64,
    pub value: String,
}

impl OutputRow {
    /// True if the row belongs to a subtier
    pub fn is_subtier(&self) -> bool {
        self.tier_id.contains(SUBTIER_DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(tier_id: &str) -> OutputRow {
        OutputRow {
            tier_id: tier_id.to_string(),
            participant: "P1".to_string(),
            start: 0,
            end: 10,
            duration: 10,
            value: String::new(),
        }
    }

    #[test]
    fn test_is_subtier() {
        assert!(!row("A1").is_subtier());
        assert!(row("A1@P2").is_subtier());
        assert!(row("@").is_subtier());
    }
}
