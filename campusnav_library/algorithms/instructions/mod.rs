//! Instruction phrasing and glyph selection
//!
//! All business logic for instruction wording lives here; no other component
//! is allowed to phrase directions. Presentation collaborators (AR overlay,
//! speech) interpret the resulting strings purely by keyword match, so the
//! vocabulary produced by [`edge_instruction`] and the matching rules in
//! [`Glyph::for_instruction`] must stay in sync.

/// Sentinel instruction carried by the first step of every route.
pub const START_INSTRUCTION: &str = "Start";

/// Instruction for a route whose start equals its destination.
pub const ALREADY_HERE_INSTRUCTION: &str = "You are already here.";

/// Announcement once the final route step is reached.
pub const ARRIVED_INSTRUCTION: &str = "You have arrived!";

/// Map an edge's direction token to a human-readable instruction.
///
/// The default phrasing is `"Go {direction}"`; the `"exit"` token maps to
/// the fixed phrase `"Exit the room"`.
pub fn edge_instruction(direction: &str) -> String {
    if direction == "exit" {
        "Exit the room".to_string()
    } else {
        format!("Go {}", direction)
    }
}

/// Visual glyph a presentation layer draws for an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Forward,
    Left,
    Right,
    Back,
    Finish,
}

impl Glyph {
    /// Select a glyph by keyword match, the only channel presentation
    /// collaborators have for direction semantics. Checked in order:
    /// forward/straight/go to, left, right, back/u-turn,
    /// finish/arrived/here.
    pub fn for_instruction(instruction: &str) -> Option<Glyph> {
        let lower = instruction.to_lowercase();
        if lower.contains("forward") || lower.contains("straight") || lower.contains("go to") {
            Some(Glyph::Forward)
        } else if lower.contains("left") {
            Some(Glyph::Left)
        } else if lower.contains("right") {
            Some(Glyph::Right)
        } else if lower.contains("back") || lower.contains("u-turn") {
            Some(Glyph::Back)
        } else if lower.contains("finish") || lower.contains("arrived") || lower.contains("here") {
            Some(Glyph::Finish)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_phrasing() {
        assert_eq!(edge_instruction("straight"), "Go straight");
        assert_eq!(edge_instruction("left"), "Go left");
        assert_eq!(edge_instruction("front"), "Go front");
    }

    #[test]
    fn test_exit_is_fixed_phrase() {
        assert_eq!(edge_instruction("exit"), "Exit the room");
    }

    #[test]
    fn test_glyph_selection() {
        assert_eq!(Glyph::for_instruction("Go straight"), Some(Glyph::Forward));
        assert_eq!(Glyph::for_instruction("Go left"), Some(Glyph::Left));
        assert_eq!(Glyph::for_instruction("Go right"), Some(Glyph::Right));
        assert_eq!(Glyph::for_instruction("Go back"), Some(Glyph::Back));
        assert_eq!(Glyph::for_instruction("Make a U-turn"), Some(Glyph::Back));
    }

    #[test]
    fn test_sentinels_stay_within_vocabulary() {
        // The presentation contract has no other channel than these keywords.
        assert_eq!(
            Glyph::for_instruction(ARRIVED_INSTRUCTION),
            Some(Glyph::Finish)
        );
        assert_eq!(
            Glyph::for_instruction(ALREADY_HERE_INSTRUCTION),
            Some(Glyph::Finish)
        );
    }

    #[test]
    fn test_unknown_vocabulary_yields_no_glyph() {
        assert_eq!(Glyph::for_instruction("Teleport"), None);
    }
}
