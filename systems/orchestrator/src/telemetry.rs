//! Parsing of mid-turn action frames.

use line_defence_core::Cell;
use serde::de::IgnoredAny;
use serde::Deserialize;
use thiserror::Error;

/// Frame owner code for units we launched.
const OWNER_SELF: u8 = 1;
/// Frame owner code for units the opponent launched.
const OWNER_OPPONENT: u8 = 2;

/// Errors raised while reading an action frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The frame is not valid JSON or lacks the expected structure.
    #[error("malformed action frame: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A breach names an owner other than 1 (self) or 2 (opponent).
    #[error("breach reported for unknown owner {0}")]
    UnknownOwner(u8),
}

#[derive(Deserialize)]
struct Frame {
    events: FrameEvents,
}

#[derive(Deserialize)]
struct FrameEvents {
    #[serde(default)]
    breach: Vec<Breach>,
}

/// `[[x, y], damage, unit_type, id, owner]`
type Breach = ([i32; 2], f32, IgnoredAny, IgnoredAny, u8);

/// Location and damage of a unit that reached our edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct OpponentBreach {
    pub(crate) cell: Cell,
    pub(crate) damage: f32,
}

/// Extracts the breaches scored against us from a raw frame.
pub(crate) fn opponent_breaches(frame: &str) -> Result<Vec<OpponentBreach>, FrameError> {
    let frame: Frame = serde_json::from_str(frame)?;
    let mut breaches = Vec::new();
    for ([x, y], damage, _, _, owner) in frame.events.breach {
        match owner {
            OWNER_SELF => {}
            OWNER_OPPONENT => breaches.push(OpponentBreach {
                cell: Cell::new(x, y),
                damage,
            }),
            other => return Err(FrameError::UnknownOwner(other)),
        }
    }
    Ok(breaches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_opponent_breaches_are_kept() {
        let frame = r#"{
            "events": {
                "breach": [
                    [[13, 0], 1, 3, "17", 2],
                    [[14, 27], 1, 3, "18", 1],
                    [[0, 13], 2, 4, "19", 2]
                ],
                "damage": []
            }
        }"#;

        let breaches = opponent_breaches(frame).expect("valid frame");
        assert_eq!(
            breaches.iter().map(|breach| breach.cell).collect::<Vec<_>>(),
            vec![Cell::new(13, 0), Cell::new(0, 13)]
        );
        assert!((breaches[1].damage - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn frames_without_breaches_are_empty() {
        let breaches = opponent_breaches(r#"{"events": {"spawn": []}}"#).expect("valid frame");
        assert!(breaches.is_empty());
    }

    #[test]
    fn malformed_frames_are_rejected() {
        assert!(matches!(
            opponent_breaches(r#"{"turnInfo": [1]}"#),
            Err(FrameError::Malformed(_))
        ));
        assert!(matches!(
            opponent_breaches(r#"{"events": {"breach": [[[1, 2], 1, 3, "4", 7]]}}"#),
            Err(FrameError::UnknownOwner(7))
        ));
    }
}
