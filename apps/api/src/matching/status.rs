use std::fmt;

use serde::{Deserialize, Serialize};

/// Review lifecycle of a job match.
///
/// Scoring is re-triggered by creating a new analysis, never by rewinding
/// status: once `Completed` is reached there is no path back toward
/// `NotStarted`/`InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    Completed,
    Flagged,
    Proceed,
    Rejected,
    Waitlisted,
    Expired,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::NotStarted => "not_started",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Flagged => "flagged",
            MatchStatus::Proceed => "proceed",
            MatchStatus::Rejected => "rejected",
            MatchStatus::Waitlisted => "waitlisted",
            MatchStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(MatchStatus::NotStarted),
            "in_progress" => Some(MatchStatus::InProgress),
            "completed" => Some(MatchStatus::Completed),
            "flagged" => Some(MatchStatus::Flagged),
            "proceed" => Some(MatchStatus::Proceed),
            "rejected" => Some(MatchStatus::Rejected),
            "waitlisted" => Some(MatchStatus::Waitlisted),
            "expired" => Some(MatchStatus::Expired),
            _ => None,
        }
    }

    /// States reachable from `self` in one reviewer- or system-driven step.
    /// `Expired` is reachable from every non-terminal state (retention
    /// cutoffs and administrative closure).
    pub fn allowed_next(self) -> &'static [MatchStatus] {
        use MatchStatus::*;
        match self {
            NotStarted => &[InProgress, Expired],
            InProgress => &[Completed, Expired],
            Completed => &[Flagged, Proceed, Rejected, Waitlisted, Expired],
            Flagged => &[Proceed, Rejected, Waitlisted, Expired],
            // Semi-terminal: a waitlisted candidate can still be decided.
            Waitlisted => &[Proceed, Rejected, Expired],
            Proceed | Rejected | Expired => &[],
        }
    }

    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MatchStatus::Proceed | MatchStatus::Rejected | MatchStatus::Expired
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MatchStatus::*;

    const ALL: [MatchStatus; 8] = [
        NotStarted, InProgress, Completed, Flagged, Proceed, Rejected, Waitlisted, Expired,
    ];

    #[test]
    fn test_parse_as_str_roundtrip() {
        for status in ALL {
            assert_eq!(MatchStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_parse_unknown_is_none() {
        assert_eq!(MatchStatus::parse("archived"), None);
        assert_eq!(MatchStatus::parse("NOT_STARTED"), None);
        assert_eq!(MatchStatus::parse(""), None);
    }

    #[test]
    fn test_happy_path_chain() {
        assert!(NotStarted.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Proceed));
    }

    #[test]
    fn test_review_chain_through_flag_and_waitlist() {
        // completed -> flagged -> waitlisted -> proceed
        assert!(Completed.can_transition_to(Flagged));
        assert!(Flagged.can_transition_to(Waitlisted));
        assert!(Waitlisted.can_transition_to(Proceed));
    }

    #[test]
    fn test_not_started_cannot_be_rejected() {
        assert!(!NotStarted.can_transition_to(Rejected));
    }

    #[test]
    fn test_cannot_skip_to_completed() {
        assert!(!NotStarted.can_transition_to(Completed));
    }

    #[test]
    fn test_every_non_terminal_state_can_expire() {
        for status in ALL {
            if !status.is_terminal() {
                assert!(
                    status.can_transition_to(Expired),
                    "{status} should be able to expire"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for status in [Proceed, Rejected, Expired] {
            assert!(status.is_terminal());
            assert!(status.allowed_next().is_empty());
        }
    }

    #[test]
    fn test_waitlisted_is_semi_terminal() {
        assert!(!Waitlisted.is_terminal());
        assert!(Waitlisted.can_transition_to(Proceed));
        assert!(Waitlisted.can_transition_to(Rejected));
        assert!(!Waitlisted.can_transition_to(Flagged));
    }

    #[test]
    fn test_no_backward_transition_after_completed() {
        for status in [Completed, Flagged, Proceed, Rejected, Waitlisted, Expired] {
            assert!(!status.can_transition_to(NotStarted));
            assert!(!status.can_transition_to(InProgress));
        }
    }

    #[test]
    fn test_self_transition_is_never_allowed() {
        for status in ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&NotStarted).unwrap();
        assert_eq!(json, "\"not_started\"");
        let back: MatchStatus = serde_json::from_str("\"waitlisted\"").unwrap();
        assert_eq!(back, Waitlisted);
    }
}
