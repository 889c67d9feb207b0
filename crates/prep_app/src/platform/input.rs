use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use chrono::{Local, NaiveDate};
use prep_core::{parse_date_input, Msg};
use prep_logging::prep_debug;

use super::app::LoopEvent;

/// Read one date per line from stdin until EOF or `q`.
pub fn spawn_stdin_reader(tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let Some(event) = interpret_line(&line, Local::now().date_naive()) else {
                continue;
            };
            let quit = matches!(event, LoopEvent::Quit);
            if tx.send(event).is_err() || quit {
                return;
            }
        }
        prep_debug!("stdin closed");
        let _ = tx.send(LoopEvent::InputClosed);
    });
}

pub fn interpret_line(line: &str, today: NaiveDate) -> Option<LoopEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return Some(LoopEvent::Quit);
    }
    let msg = match parse_date_input(trimmed, today) {
        Some(date) => Msg::DateSelected(Some(date)),
        None => Msg::DateInputRejected(trimmed.to_string()),
    };
    Some(LoopEvent::Msg(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 4).unwrap()
    }

    #[test]
    fn dates_become_selections() {
        let expected = NaiveDate::from_ymd_opt(2024, 4, 5);
        assert!(matches!(
            interpret_line("2024-04-05", today()),
            Some(LoopEvent::Msg(Msg::DateSelected(date))) if date == expected
        ));
        assert!(matches!(
            interpret_line("  tomorrow ", today()),
            Some(LoopEvent::Msg(Msg::DateSelected(date))) if date == expected
        ));
    }

    #[test]
    fn quit_blank_and_garbage() {
        assert!(matches!(interpret_line("Q", today()), Some(LoopEvent::Quit)));
        assert!(interpret_line("   ", today()).is_none());
        assert!(matches!(
            interpret_line("next week", today()),
            Some(LoopEvent::Msg(Msg::DateInputRejected(text))) if text == "next week"
        ));
    }
}
