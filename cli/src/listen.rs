use std::io::{BufRead, Write};

use anyhow::Result;
use voxtask_core::{
    CommandInterpreter, DateParser, DispatchReport, DispatchService, DispatchStatus,
    EventRepository, TaskRepository, TemporalValue,
};

const STOP_WORD: &str = "стоп";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Reads one transcribed utterance per line until EOF or the stop word.
pub fn run<P, T, E, R, W>(
    interpreter: &CommandInterpreter<P>,
    service: &DispatchService<T, E>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    P: DateParser,
    T: TaskRepository,
    E: EventRepository,
    R: BufRead,
    W: Write,
{
    writeln!(out, "Готов к команде. Скажите '{}' для выхода.", STOP_WORD)?;

    for line in input.lines() {
        let line = line?;
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }

        if utterance.to_lowercase().contains(STOP_WORD) {
            writeln!(out, "Программа завершена")?;
            break;
        }

        tracing::debug!(utterance, "utterance received");

        let Some(intent) = interpreter.interpret(utterance) else {
            writeln!(out, "Не могу распознать команду. Попробуйте: 'Создай задачу название задачи на дату'")?;
            continue;
        };

        writeln!(out, "Задача: '{}'", intent.task)?;
        writeln!(out, "{}", describe_due(intent.due.as_ref()))?;

        let report = service.dispatch(&intent);
        writeln!(out, "{}", summarize(&report))?;
    }

    Ok(())
}

pub fn describe_due(due: Option<&TemporalValue>) -> String {
    match due {
        Some(TemporalValue::Single { at }) => format!("Дата: {}", at.format(DATE_FORMAT)),
        Some(TemporalValue::Range { start, end }) => format!(
            "Период: с {} по {}",
            start.format(DATE_FORMAT),
            end.format(DATE_FORMAT)
        ),
        None => "Дата: не указана".to_string(),
    }
}

pub fn summarize(report: &DispatchReport) -> &'static str {
    match report.status {
        DispatchStatus::Completed => "Задача и событие созданы",
        DispatchStatus::TaskOnly => "Задача создана, дата не указана, событие в календаре не создано",
        DispatchStatus::CalendarFailed => "Задача создана, но не удалось создать событие в календаре",
        DispatchStatus::TaskFailed => "Не удалось создать задачу",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use voxtask_core::{FileEventRepository, FileTaskRepository, Settings};

    fn run_script(script: &str) -> (String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        let tasks = FileTaskRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let events = FileEventRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let service = DispatchService::new(tasks, events, &settings);
        let interpreter = CommandInterpreter::with_time_zone(settings.time_zone);

        let mut out = Vec::new();
        run(&interpreter, &service, Cursor::new(script.to_string()), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), dir)
    }

    #[test]
    fn test_loop_dispatches_until_stop() {
        let (out, dir) = run_script(
            "создай задачу помыть посуду\n\nкакая погода\nсоздай задачу отчет на 5 января 2030\nстоп\nсоздай задачу после стопа\n",
        );

        assert!(out.contains("Задача: 'помыть посуду'"));
        assert!(out.contains("Дата: не указана"));
        assert!(out.contains("Не могу распознать команду"));
        assert!(out.contains("Дата: 2030-01-05 00:00"));
        assert!(out.contains("Задача и событие созданы"));
        assert!(out.contains("Программа завершена"));
        assert!(!out.contains("после стопа"));

        let tasks = FileTaskRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let names: Vec<String> = tasks.list().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["помыть посуду", "отчет"]);

        let events = FileEventRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(events.list().unwrap().len(), 1);
    }

    #[test]
    fn test_describe_range() {
        let start = chrono::DateTime::parse_from_rfc3339("2026-10-19T00:00:00+03:00").unwrap();
        let end = chrono::DateTime::parse_from_rfc3339("2026-10-21T00:00:00+03:00").unwrap();
        assert_eq!(
            describe_due(Some(&TemporalValue::Range { start, end })),
            "Период: с 2026-10-19 00:00 по 2026-10-21 00:00"
        );
    }
}
