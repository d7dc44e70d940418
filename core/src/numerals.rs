//! Rewrites spoken Russian day-of-month ordinals into digits and pins month
//! dates to a year before they reach the date parser.
//!
//! Replacement is plain substring substitution over a flat table. Entries are
//! applied longest-first so that the `первое` inside `двадцать первое` is not
//! consumed by the shorter entry. This only holds while no entry is a
//! substring of a *shorter* one; adding vocabulary needs a check against that.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DAY_ORDINALS: &[(&str, &str)] = &[
    ("первое", "1"),
    ("второе", "2"),
    ("третье", "3"),
    ("четвертое", "4"),
    ("пятое", "5"),
    ("шестое", "6"),
    ("седьмое", "7"),
    ("восьмое", "8"),
    ("девятое", "9"),
    ("десятое", "10"),
    ("одиннадцатое", "11"),
    ("двенадцатое", "12"),
    ("двенадцатая", "12"),
    ("двенадцатый", "12"),
    ("тринадцатое", "13"),
    ("четырнадцатое", "14"),
    ("пятнадцатое", "15"),
    ("шестнадцатое", "16"),
    ("семнадцатое", "17"),
    ("восемнадцатое", "18"),
    ("девятнадцатое", "19"),
    ("двадцатое", "20"),
    ("двадцать первое", "21"),
    ("двадцать второе", "22"),
    ("двадцать третье", "23"),
    ("двадцать четвертое", "24"),
    ("двадцать пятое", "25"),
    ("двадцать шестое", "26"),
    ("двадцать седьмое", "27"),
    ("двадцать восьмое", "28"),
    ("двадцать девятое", "29"),
    ("тридцатое", "30"),
    ("тридцать первое", "31"),
];

pub const MONTHS_GENITIVE: &[&str] = &[
    "января", "февраля", "марта", "апреля", "мая", "июня",
    "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

static ORDINALS_LONGEST_FIRST: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut table = DAY_ORDINALS.to_vec();
    table.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    table
});

static MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?:{})\b", MONTHS_GENITIVE.join("|"))).expect("valid month regex")
});
static FOUR_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}\b").expect("valid year regex"));

pub fn rewrite_numerals(s: &str) -> String {
    ORDINALS_LONGEST_FIRST
        .iter()
        .fold(s.to_string(), |acc, (word, digits)| acc.replace(word, digits))
}

/// Appends `year` when a month is named but no year is given.
pub fn inject_year(s: &str, year: i32) -> String {
    if !MONTH_RE.is_match(s) || has_year(s, year) {
        return s.to_string();
    }
    format!("{} {}", s.trim_end(), year)
}

fn has_year(s: &str, year: i32) -> bool {
    if FOUR_DIGIT_RE.is_match(s) {
        return true;
    }
    let short = format!("{:02}", year.rem_euclid(100));
    s.split_whitespace().last() == Some(short.as_str())
}

/// Full normalization applied before a date expression is resolved.
pub fn preprocess(s: &str, year: i32) -> String {
    let rewritten = rewrite_numerals(&s.to_lowercase());
    inject_year(&rewritten, year).trim().to_string()
}
