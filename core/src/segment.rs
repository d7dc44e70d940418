//! Splits an utterance into a task title and a date expression.
//!
//! Rules are tried in a fixed order and the first one that matches wins, even
//! when a later rule would also match with a different split.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::{normalize, strip_quoted};
use crate::numerals::{DAY_ORDINALS, MONTHS_GENITIVE};

/// Substrings that mark an utterance as a possible command.
pub const TRIGGERS: &[&str] = &["задач", "событие", "запись", "создай"];

/// Separators between title and date, in precedence order.
const SEPARATORS: &[&str] = &[r"\s+на\s+дату\s+", r"\s+на\s+", r"\s+к\s+", r"\s+до\s+"];

static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).expect("valid quoted regex"));

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:создай|запиши)\s+(?:задачу|событие)\s+(.+?)\s+с\s+(.+?)\s+по\s+(.+)")
        .expect("valid range regex")
});

static SEPARATOR_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    SEPARATORS
        .iter()
        .map(|sep| {
            Regex::new(&format!(
                r"(?:создай|запиши)\s+(?:задачу|событие|запись)\s+(.+?){}(.+)",
                sep
            ))
            .expect("valid separator regex")
        })
        .collect()
});

static TRAILING_LITERAL_RE: Lazy<Regex> = Lazy::new(|| {
    let literals: Vec<&str> = DAY_ORDINALS
        .iter()
        .map(|(word, _)| *word)
        .chain(MONTHS_GENITIVE.iter().copied())
        .collect();
    Regex::new(&format!(
        r"(?:создай|запиши)\s+(?:задачу|событие|запись)\s+(.+?)\s+(\b(?:{})\b.*)",
        literals.join("|")
    ))
    .expect("valid trailing literal regex")
});

static TASK_ONLY_RES: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?:создай|запиши)\s+(?:задачу|событие|запись)\s+(.+)")
            .expect("valid task-only regex"),
        Regex::new(r"(?:задачу|событие|запись)\s+(.+?)(?:\s+(?:на|к|до)|$)")
            .expect("valid task-only regex"),
    ]
});

/// A spoken command as recognized, plus its normalized form.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub raw: String,
    pub normalized: String,
}

impl Utterance {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_string(),
            normalized: normalize(raw),
        }
    }

    pub fn has_trigger(&self) -> bool {
        TRIGGERS.iter().any(|t| self.normalized.contains(t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleRole {
    Quoted,
    Range,
    Separator,
    TrailingDateLiteral,
    TaskOnly,
}

/// Raw halves captured by a rule, before cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub role: RuleRole,
    pub title: Option<String>,
    pub date: Option<String>,
}

impl Segment {
    fn new(role: RuleRole, title: &str, date: Option<String>) -> Self {
        Self {
            role,
            title: Some(title.to_string()),
            date,
        }
    }
}

pub struct ExtractionRule {
    pub role: RuleRole,
    pub apply: fn(&Utterance) -> Option<Segment>,
}

pub const CASCADE: &[ExtractionRule] = &[
    ExtractionRule { role: RuleRole::Quoted, apply: quoted_title },
    ExtractionRule { role: RuleRole::Range, apply: explicit_range },
    ExtractionRule { role: RuleRole::Separator, apply: separated_date },
    ExtractionRule { role: RuleRole::TrailingDateLiteral, apply: trailing_date_literal },
    ExtractionRule { role: RuleRole::TaskOnly, apply: task_only },
];

/// Runs the cascade. `None` means no rule matched at all.
pub fn segment(utterance: &Utterance) -> Option<Segment> {
    CASCADE.iter().find_map(|rule| (rule.apply)(utterance))
}

fn quoted_title(u: &Utterance) -> Option<Segment> {
    let caps = QUOTED_RE.captures(&u.raw)?;
    let rest = strip_quoted(&u.normalized);
    Some(Segment::new(RuleRole::Quoted, &caps[1], Some(rest.trim().to_string())))
}

fn explicit_range(u: &Utterance) -> Option<Segment> {
    let caps = RANGE_RE.captures(&u.normalized)?;
    let date = format!("{} - {}", &caps[2], &caps[3]);
    Some(Segment::new(RuleRole::Range, &caps[1], Some(date)))
}

fn separated_date(u: &Utterance) -> Option<Segment> {
    SEPARATOR_RES.iter().find_map(|re| {
        let caps = re.captures(&u.normalized)?;
        Some(Segment::new(RuleRole::Separator, &caps[1], Some(caps[2].to_string())))
    })
}

fn trailing_date_literal(u: &Utterance) -> Option<Segment> {
    let caps = TRAILING_LITERAL_RE.captures(&u.normalized)?;
    Some(Segment::new(
        RuleRole::TrailingDateLiteral,
        &caps[1],
        Some(caps[2].to_string()),
    ))
}

fn task_only(u: &Utterance) -> Option<Segment> {
    TASK_ONLY_RES.iter().find_map(|re| {
        let caps = re.captures(&u.normalized)?;
        Some(Segment::new(RuleRole::TaskOnly, &caps[1], None))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(raw: &str) -> Segment {
        segment(&Utterance::new(raw)).expect("some rule should match")
    }

    #[test]
    fn test_trigger_gate() {
        assert!(Utterance::new("Создай что-нибудь").has_trigger());
        assert!(Utterance::new("новая задача").has_trigger());
        assert!(!Utterance::new("какая сегодня погода").has_trigger());
    }

    #[test]
    fn test_cascade_order_matches_roles() {
        let roles: Vec<RuleRole> = CASCADE.iter().map(|r| r.role).collect();
        assert_eq!(
            roles,
            vec![
                RuleRole::Quoted,
                RuleRole::Range,
                RuleRole::Separator,
                RuleRole::TrailingDateLiteral,
                RuleRole::TaskOnly,
            ]
        );
    }

    #[test]
    fn test_quoted_wins_over_separator() {
        let seg = run("создай задачу \"Купить молоко\" на завтра");
        assert_eq!(seg.role, RuleRole::Quoted);
        assert_eq!(seg.title.as_deref(), Some("Купить молоко"));
        assert_eq!(seg.date.as_deref(), Some("создай задачу  на завтра"));
    }

    #[test]
    fn test_range() {
        let seg = run("создай событие встреча с понедельника по среду");
        assert_eq!(seg.role, RuleRole::Range);
        assert_eq!(seg.title.as_deref(), Some("встреча"));
        assert_eq!(seg.date.as_deref(), Some("понедельника - среду"));
    }

    #[test]
    fn test_range_needs_task_or_event() {
        // the range rule only accepts "задачу" or "событие"
        let seg = run("создай запись отпуск с понедельника по среду");
        assert_ne!(seg.role, RuleRole::Range);
    }

    #[test]
    fn test_separator_precedence() {
        let seg = run("создай задачу позвонить маме на 5 января");
        assert_eq!(seg.role, RuleRole::Separator);
        assert_eq!(seg.title.as_deref(), Some("позвонить маме"));
        assert_eq!(seg.date.as_deref(), Some("5 января"));

        let seg = run("запиши задачу отчет на дату пятое марта");
        assert_eq!(seg.title.as_deref(), Some("отчет"));
        assert_eq!(seg.date.as_deref(), Some("пятое марта"));

        let seg = run("создай задачу сдать отчет до пятницы");
        assert_eq!(seg.title.as_deref(), Some("сдать отчет"));
        assert_eq!(seg.date.as_deref(), Some("пятницы"));
    }

    #[test]
    fn test_trailing_date_literal() {
        let seg = run("создай задачу купить подарок двадцать первое декабря");
        assert_eq!(seg.role, RuleRole::TrailingDateLiteral);
        assert_eq!(seg.title.as_deref(), Some("купить подарок"));
        assert_eq!(seg.date.as_deref(), Some("двадцать первое декабря"));
    }

    #[test]
    fn test_task_only() {
        let seg = run("создай задачу помыть посуду");
        assert_eq!(seg.role, RuleRole::TaskOnly);
        assert_eq!(seg.title.as_deref(), Some("помыть посуду"));
        assert_eq!(seg.date, None);

        let seg = run("новую задачу полить цветы");
        assert_eq!(seg.role, RuleRole::TaskOnly);
        assert_eq!(seg.title.as_deref(), Some("полить цветы"));
    }

    #[test]
    fn test_no_rule_matches() {
        assert_eq!(segment(&Utterance::new("создай")), None);
        assert_eq!(segment(&Utterance::new("задачи нет")), None);
    }
}
