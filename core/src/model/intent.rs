use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A resolved point in time, or an ordered pair of them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemporalValue {
    Single { at: DateTime<FixedOffset> },
    Range {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

impl TemporalValue {
    pub fn start(&self) -> DateTime<FixedOffset> {
        match self {
            TemporalValue::Single { at } => *at,
            TemporalValue::Range { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            TemporalValue::Single { .. } => None,
            TemporalValue::Range { end, .. } => Some(*end),
        }
    }
}

/// What a recognized command asks for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommandIntent {
    pub task: String,
    pub due: Option<TemporalValue>,
}

impl CommandIntent {
    pub fn new(task: String, due: Option<TemporalValue>) -> Self {
        Self { task, due }
    }

    /// Start time handed to the calendar, if any date was resolved.
    pub fn start(&self) -> Option<DateTime<FixedOffset>> {
        self.due.as_ref().map(TemporalValue::start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_start_of_range_and_single() {
        let single = TemporalValue::Single { at: at("2026-01-05T00:00:00+03:00") };
        assert_eq!(single.start(), at("2026-01-05T00:00:00+03:00"));
        assert_eq!(single.end(), None);

        let range = TemporalValue::Range {
            start: at("2026-01-05T00:00:00+03:00"),
            end: at("2026-01-07T00:00:00+03:00"),
        };
        assert_eq!(range.start(), at("2026-01-05T00:00:00+03:00"));
        assert_eq!(range.end(), Some(at("2026-01-07T00:00:00+03:00")));
    }

    #[test]
    fn test_intent_without_due_has_no_start() {
        let intent = CommandIntent::new("помыть посуду".to_string(), None);
        assert_eq!(intent.start(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let intent = CommandIntent::new(
            "встреча".to_string(),
            Some(TemporalValue::Single { at: at("2026-01-05T10:00:00+03:00") }),
        );
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["task"], "встреча");
        assert_eq!(json["due"]["kind"], "single");
        assert_eq!(json["due"]["at"], "2026-01-05T10:00:00+03:00");
    }
}
