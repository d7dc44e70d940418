use chrono::DateTime;
use chrono_tz::Tz;

use crate::input::{clean_date_expression, clean_task_title};
use crate::model::intent::CommandIntent;
use crate::segment::{segment, RuleRole, Utterance};
use crate::time::{DateParser, RuDateParser, TemporalResolver};

/// Cleans both halves of whatever the cascade captured.
///
/// A quoted title is kept verbatim. Returns `(None, None)` when the utterance
/// is not a command or no rule matched.
pub fn extract_task_and_date(utterance: &Utterance) -> (Option<String>, Option<String>) {
    if !utterance.has_trigger() {
        return (None, None);
    }
    let Some(segment) = segment(utterance) else {
        return (None, None);
    };

    let title = match segment.role {
        RuleRole::Quoted => segment.title,
        _ => segment.title.as_deref().and_then(clean_task_title),
    };
    let date = segment.date.as_deref().and_then(clean_date_expression);
    (title, date)
}

/// Turns a recognized utterance into a [`CommandIntent`].
pub struct CommandInterpreter<P: DateParser = RuDateParser> {
    resolver: TemporalResolver<P>,
}

impl CommandInterpreter<RuDateParser> {
    pub fn with_time_zone(tz: Tz) -> Self {
        Self::new(TemporalResolver::new(RuDateParser, tz))
    }
}

impl<P: DateParser> CommandInterpreter<P> {
    pub fn new(resolver: TemporalResolver<P>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &TemporalResolver<P> {
        &self.resolver
    }

    pub fn interpret(&self, raw: &str) -> Option<CommandIntent> {
        self.interpret_at(raw, self.resolver.now())
    }

    /// Same as [`interpret`](Self::interpret) with an explicit "now".
    pub fn interpret_at(&self, raw: &str, now: DateTime<Tz>) -> Option<CommandIntent> {
        let utterance = Utterance::new(raw);
        let (task, date_expr) = extract_task_and_date(&utterance);
        let Some(task) = task else {
            tracing::debug!(utterance = %utterance.normalized, "not a command");
            return None;
        };

        let due = date_expr
            .as_deref()
            .and_then(|expr| self.resolver.resolve_at(expr, now));

        tracing::info!(task = %task, date_expr = ?date_expr, due = ?due, "command extracted");
        Some(CommandIntent::new(task, due))
    }
}
