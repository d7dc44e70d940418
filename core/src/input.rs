use once_cell::sync::Lazy;
use regex::Regex;

static QUOTED_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"][^'"]*['"]"#).expect("valid quoted span regex"));
static LEADING_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:на|к|до)\s+)+").expect("valid leading link regex"));

/// Words that name what is being created.
pub const ROLE_WORDS: &[&str] = &["задачу", "событие", "запись"];

/// Stripped from titles wherever they occur as a whole token.
pub const TITLE_STOP_WORDS: &[&str] = &[
    "на", "к", "в", "до", "с", "по", "для", "от", "из", "под", "над", "между", "перед",
    "после", "через", "за", "при", "без", "против", "среди", "вокруг", "около", "вместо",
    "кроме", "сверх", "внутри", "снаружи", "вдоль", "поперек", "напротив", "позади",
    "впереди", "слева", "справа", "сверху", "снизу", "внизу", "вверху", "дату", "время",
];

/// Stripped from date expressions wherever they occur as a whole token.
pub const DATE_STOP_WORDS: &[&str] = &["создай", "задачу", "событие", "запись", "дату", "время"];

pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Removes every single- or double-quoted span.
pub fn strip_quoted(s: &str) -> String {
    QUOTED_SPAN_RE.replace_all(s, "").into_owned()
}

pub fn clean_task_title(title: &str) -> Option<String> {
    // Prepositions go first so a role word uncovered by their removal is
    // still stripped, keeping the filter idempotent.
    let mut tokens: Vec<&str> = title
        .split_whitespace()
        .filter(|t| !TITLE_STOP_WORDS.contains(t))
        .collect();

    let leading_roles = tokens.iter().take_while(|t| ROLE_WORDS.contains(t)).count();
    tokens.drain(..leading_roles);

    non_empty(tokens.join(" "))
}

pub fn clean_date_expression(expr: &str) -> Option<String> {
    let joined = expr
        .split_whitespace()
        .filter(|t| !DATE_STOP_WORDS.contains(t))
        .collect::<Vec<_>>()
        .join(" ");

    non_empty(LEADING_LINK_RE.replace(&joined, "").trim().to_string())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
