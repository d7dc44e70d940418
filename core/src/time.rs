use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::model::intent::TemporalValue;
use crate::numerals::preprocess;

static RANGE_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[-—]\s*").expect("valid range delimiter regex"));
static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid clock regex"));
static DOTTED_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})(?:\.(\d{4}|\d{2}))?$").expect("valid dotted date regex")
});
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid iso date regex"));

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("Empty date expression")]
    Empty,
    #[error("Unrecognized token '{0}'")]
    Unrecognized(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid time: {0}")]
    InvalidTime(String),
    #[error("Local time is skipped or ambiguous: {0}")]
    AmbiguousLocalTime(String),
    #[error("Range '{0}' has an unresolvable endpoint")]
    IncompleteRange(String),
}

/// Turns a single natural-language date into a zoned date-time.
///
/// `now` anchors relative expressions and carries the target time zone.
pub trait DateParser {
    fn parse(&self, expr: &str, now: DateTime<Tz>) -> Result<DateTime<Tz>, ResolutionError>;
}

pub struct TemporalResolver<P: DateParser> {
    parser: P,
    tz: Tz,
}

impl<P: DateParser> TemporalResolver<P> {
    pub fn new(parser: P, tz: Tz) -> Self {
        Self { parser, tz }
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    pub fn resolve(&self, expr: &str) -> Option<TemporalValue> {
        self.resolve_at(expr, self.now())
    }

    /// Best-effort resolution: failures are logged and reported as `None`.
    pub fn resolve_at(&self, expr: &str, now: DateTime<Tz>) -> Option<TemporalValue> {
        match self.try_resolve_at(expr, now) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(expr, error = %err, "could not resolve date expression");
                None
            }
        }
    }

    pub fn try_resolve_at(
        &self,
        expr: &str,
        now: DateTime<Tz>,
    ) -> Result<TemporalValue, ResolutionError> {
        let now = now.with_timezone(&self.tz);
        let prepared = preprocess(expr, now.year());
        if prepared.is_empty() {
            return Err(ResolutionError::Empty);
        }

        if let Some((start, end)) = split_range(&prepared) {
            return match (self.parser.parse(start, now), self.parser.parse(end, now)) {
                (Ok(start), Ok(end)) => Ok(TemporalValue::Range {
                    start: start.fixed_offset(),
                    end: end.fixed_offset(),
                }),
                (Err(err), _) | (_, Err(err)) => {
                    tracing::debug!(range = %prepared, error = %err, "range endpoint failed");
                    Err(ResolutionError::IncompleteRange(prepared))
                }
            };
        }

        let at = self.parser.parse(&prepared, now)?;
        Ok(TemporalValue::Single { at: at.fixed_offset() })
    }
}

fn split_range(s: &str) -> Option<(&str, &str)> {
    let delimiter = RANGE_DELIMITER_RE.find(s)?;
    Some((&s[..delimiter.start()], &s[delimiter.end()..]))
}

/// Parses a duration such as `90m`, `2h`, `1d`, `1w`. A bare number is hours.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty duration string"));
    }

    let out_of_range = || anyhow!("Duration out of range: {}", input);

    if let Ok(hours) = input.parse::<i64>() {
        return Duration::try_hours(hours).ok_or_else(out_of_range);
    }

    let unit = input.chars().last().map(|c| c.to_ascii_lowercase()).unwrap_or_default();
    let num_str = &input[..input.len() - unit.len_utf8()];
    let num: i64 = num_str.parse().map_err(|_| anyhow!("Invalid duration number: {}", input))?;

    let duration = match unit {
        'm' => Duration::try_minutes(num),
        'h' => Duration::try_hours(num),
        'd' => Duration::try_days(num),
        'w' => Duration::try_weeks(num),
        _ => return Err(anyhow!("Unknown duration unit: {}", unit)),
    };
    duration.ok_or_else(out_of_range)
}

// --- Russian locale parser ---

const NOISE: &[&str] = &[
    "на", "в", "во", "к", "до", "с", "со", "по", "около",
    "следующий", "следующую", "следующее", "следующей", "ближайший", "ближайшую",
];

const DAY_WORDS: &[(&str, i64)] = &[
    ("позавчера", -2),
    ("вчера", -1),
    ("сегодня", 0),
    ("завтра", 1),
    ("послезавтра", 2),
];

const MONTHS: &[(&str, u32)] = &[
    ("января", 1), ("февраля", 2), ("марта", 3), ("апреля", 4),
    ("мая", 5), ("июня", 6), ("июля", 7), ("августа", 8),
    ("сентября", 9), ("октября", 10), ("ноября", 11), ("декабря", 12),
    ("январь", 1), ("февраль", 2), ("март", 3), ("апрель", 4),
    ("май", 5), ("июнь", 6), ("июль", 7), ("август", 8),
    ("сентябрь", 9), ("октябрь", 10), ("ноябрь", 11), ("декабрь", 12),
];

const WEEKDAYS: &[(&str, Weekday)] = &[
    ("понедельник", Weekday::Mon), ("понедельника", Weekday::Mon),
    ("вторник", Weekday::Tue), ("вторника", Weekday::Tue),
    ("среда", Weekday::Wed), ("среду", Weekday::Wed), ("среды", Weekday::Wed),
    ("четверг", Weekday::Thu), ("четверга", Weekday::Thu),
    ("пятница", Weekday::Fri), ("пятницу", Weekday::Fri), ("пятницы", Weekday::Fri),
    ("суббота", Weekday::Sat), ("субботу", Weekday::Sat), ("субботы", Weekday::Sat),
    ("воскресенье", Weekday::Sun), ("воскресенья", Weekday::Sun),
    ("понедельнику", Weekday::Mon), ("вторнику", Weekday::Tue), ("среде", Weekday::Wed),
    ("четвергу", Weekday::Thu), ("пятнице", Weekday::Fri), ("субботе", Weekday::Sat),
    ("воскресенью", Weekday::Sun),
];

const HOUR_WORDS: &[&str] = &["час", "часа", "часов"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum DayPart {
    Morning,
    Afternoon,
    Night,
}

const DAY_PARTS: &[(&str, DayPart)] = &[
    ("утра", DayPart::Morning),
    ("дня", DayPart::Afternoon),
    ("вечера", DayPart::Afternoon),
    ("ночи", DayPart::Night),
];

#[derive(Debug, Clone, Copy)]
enum Shift {
    Span(Duration),
    Months(u32),
}

fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    table.iter().find(|(word, _)| *word == key).map(|(_, v)| *v)
}

/// Built-in Russian date parser.
///
/// Relative days keep the current time of day; explicit dates and weekdays
/// default to midnight unless a time is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuDateParser;

#[derive(Debug, Default)]
struct Parts {
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    anchor: Option<NaiveDateTime>,
    /// A standalone year that follows the date it belongs to.
    year: Option<i32>,
    keep_clock: bool,
}

impl Parts {
    fn into_datetime(self, now: DateTime<Tz>) -> Result<DateTime<Tz>, ResolutionError> {
        let date = match (self.date, self.year) {
            (Some(date), Some(year)) => Some(
                date.with_year(year)
                    .ok_or_else(|| ResolutionError::InvalidDate(format!("{} {}", date, year)))?,
            ),
            (date, _) => date,
        };

        let naive = match (self.anchor, date, self.time) {
            (Some(anchor), _, Some(time)) => anchor.date().and_time(time),
            (Some(anchor), _, None) => anchor,
            (None, Some(date), Some(time)) => date.and_time(time),
            (None, Some(date), None) if self.keep_clock => date.and_time(now.time()),
            (None, Some(date), None) => date.and_time(NaiveTime::MIN),
            (None, None, Some(time)) => now.date_naive().and_time(time),
            (None, None, None) => return Err(ResolutionError::Empty),
        };

        now.timezone()
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| ResolutionError::AmbiguousLocalTime(naive.to_string()))
    }
}

impl DateParser for RuDateParser {
    fn parse(&self, expr: &str, now: DateTime<Tz>) -> Result<DateTime<Tz>, ResolutionError> {
        let tokens: Vec<&str> = expr
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| matches!(c, ',' | ';' | '!' | '?')))
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err(ResolutionError::Empty);
        }

        let today = now.date_naive();
        let mut parts = Parts::default();
        let mut i = 0;

        while i < tokens.len() {
            let token = tokens[i];
            let prev = i.checked_sub(1).map(|p| tokens[p]);
            i += 1;

            if NOISE.contains(&token) {
                continue;
            }
            if let Some(offset) = lookup(DAY_WORDS, token) {
                parts.date = Some(today + Duration::days(offset));
                parts.keep_clock = true;
                continue;
            }
            if token == "через" {
                let (shift, used) = parse_shift(&tokens[i..])?
                    .ok_or_else(|| ResolutionError::Unrecognized(token.to_string()))?;
                i += used;
                let base = now.naive_local();
                let anchor = match shift {
                    Shift::Span(span) => base.checked_add_signed(span),
                    Shift::Months(n) => base.checked_add_months(Months::new(n)),
                };
                parts.anchor =
                    Some(anchor.ok_or_else(|| ResolutionError::InvalidDate(expr.to_string()))?);
                continue;
            }
            if let Some(weekday) = lookup(WEEKDAYS, token) {
                parts.date = Some(next_weekday(today, weekday));
                continue;
            }
            if let Some(time) = parse_clock(token)? {
                parts.time = Some(time);
                continue;
            }
            if let Some(date) = parse_numeric_date(token, today.year())? {
                parts.date = Some(date);
                continue;
            }
            if let Ok(n) = token.parse::<u32>() {
                if let Some(month) = tokens.get(i).and_then(|t| lookup(MONTHS, t)) {
                    i += 1;
                    let year = match tokens.get(i).and_then(|t| parse_year(t)) {
                        Some(year) => {
                            i += 1;
                            year
                        }
                        None => tokens[i..]
                            .iter()
                            .find_map(|t| full_year(t))
                            .unwrap_or(today.year()),
                    };
                    parts.date = Some(
                        NaiveDate::from_ymd_opt(year, month, n)
                            .ok_or_else(|| ResolutionError::InvalidDate(expr.to_string()))?,
                    );
                    continue;
                }

                if let Some(year) = full_year(token) {
                    parts.year = Some(year);
                    continue;
                }

                let hour_marker = tokens.get(i).is_some_and(|t| HOUR_WORDS.contains(t));
                if hour_marker {
                    i += 1;
                }
                let day_part = tokens.get(i).and_then(|t| lookup(DAY_PARTS, t));
                if day_part.is_some() {
                    i += 1;
                }
                if hour_marker || day_part.is_some() || matches!(prev, Some("в") | Some("во")) {
                    parts.time = Some(hour_of_day(n, day_part)?);
                    continue;
                }

                // A lone number is a day of the current month.
                parts.date = Some(
                    NaiveDate::from_ymd_opt(today.year(), today.month(), n)
                        .ok_or_else(|| ResolutionError::InvalidDate(expr.to_string()))?,
                );
                continue;
            }

            return Err(ResolutionError::Unrecognized(token.to_string()));
        }

        parts.into_datetime(now)
    }
}

fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let mut days_needed =
        target.num_days_from_monday() as i64 - today.weekday().num_days_from_monday() as i64;
    if days_needed <= 0 {
        days_needed += 7;
    }
    today + Duration::days(days_needed)
}

/// Reads `[N] <unit>` after "через". `Ok(None)` means no unit follows.
fn parse_shift(tokens: &[&str]) -> Result<Option<(Shift, usize)>, ResolutionError> {
    let Some(first) = tokens.first() else {
        return Ok(None);
    };
    let (count, unit_at) = match first.parse::<i64>() {
        Ok(n) => (n, 1),
        Err(_) => (1, 0),
    };
    let Some(unit) = tokens.get(unit_at) else {
        return Ok(None);
    };
    let out_of_range = || ResolutionError::InvalidDate(format!("через {} {}", count, unit));

    let span = match *unit {
        "минуту" | "минуты" | "минут" => Duration::try_minutes(count),
        "час" | "часа" | "часов" => Duration::try_hours(count),
        "день" | "дня" | "дней" => Duration::try_days(count),
        "неделю" | "недели" | "недель" => Duration::try_weeks(count),
        "месяц" | "месяца" | "месяцев" => {
            let months = u32::try_from(count).map_err(|_| out_of_range())?;
            return Ok(Some((Shift::Months(months), unit_at + 1)));
        }
        _ => return Ok(None),
    };
    let span = span.ok_or_else(out_of_range)?;
    Ok(Some((Shift::Span(span), unit_at + 1)))
}

fn hour_of_day(hour: u32, part: Option<DayPart>) -> Result<NaiveTime, ResolutionError> {
    let hour = match part {
        Some(DayPart::Afternoon) if hour < 12 => hour + 12,
        Some(DayPart::Night) if hour == 12 => 0,
        _ => hour,
    };
    NaiveTime::from_hms_opt(hour, 0, 0)
        .ok_or_else(|| ResolutionError::InvalidTime(format!("{} h", hour)))
}

fn parse_clock(token: &str) -> Result<Option<NaiveTime>, ResolutionError> {
    let Some(caps) = CLOCK_RE.captures(token) else {
        return Ok(None);
    };
    let hour: u32 = caps[1].parse().map_err(|_| ResolutionError::InvalidTime(token.to_string()))?;
    let minute: u32 = caps[2].parse().map_err(|_| ResolutionError::InvalidTime(token.to_string()))?;
    NaiveTime::from_hms_opt(hour, minute, 0)
        .map(Some)
        .ok_or_else(|| ResolutionError::InvalidTime(token.to_string()))
}

fn parse_numeric_date(token: &str, current_year: i32) -> Result<Option<NaiveDate>, ResolutionError> {
    let invalid = || ResolutionError::InvalidDate(token.to_string());

    if let Some(caps) = ISO_DATE_RE.captures(token) {
        let year: i32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        let day: u32 = caps[3].parse().map_err(|_| invalid())?;
        return NaiveDate::from_ymd_opt(year, month, day).map(Some).ok_or_else(invalid);
    }

    if let Some(caps) = DOTTED_DATE_RE.captures(token) {
        let day: u32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        let year = match caps.get(3) {
            Some(y) => parse_year(y.as_str()).ok_or_else(invalid)?,
            None => current_year,
        };
        return NaiveDate::from_ymd_opt(year, month, day).map(Some).ok_or_else(invalid);
    }

    Ok(None)
}

fn full_year(token: &str) -> Option<i32> {
    (token.len() == 4).then(|| parse_year(token)).flatten()
}

fn parse_year(token: &str) -> Option<i32> {
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match token.len() {
        4 => token.parse().ok(),
        2 => token.parse::<i32>().ok().map(|y| 2000 + y),
        _ => None,
    }
}
