use colored::Color;
use prep_core::{AppViewModel, COMPANY_EVENT_ICON};

use super::constants::{DATE_PLACEHOLDER, EMPTY_REPORT, LOADING_DOTS, TITLE};
use super::markdown::MarkdownRenderer;

/// Compose one full frame from the view model.
pub fn render_frame(view: &AppViewModel, renderer: &MarkdownRenderer) -> String {
    let mut sections: Vec<String> = Vec::new();

    let date_line = match &view.date_label {
        Some(label) => format!("📅 {}", renderer.paint(label, Some(Color::Cyan), false)),
        None => renderer.paint(DATE_PLACEHOLDER, Some(Color::BrightBlack), false),
    };
    sections.push(format!(
        "{}\n{}",
        renderer.paint(TITLE, Some(Color::BrightWhite), true),
        date_line
    ));

    if !view.company_events.is_empty() {
        let banners: Vec<String> = view
            .company_events
            .iter()
            .map(|event| {
                renderer.paint(&format!("{COMPANY_EVENT_ICON} {event}"), Some(Color::Yellow), false)
            })
            .collect();
        sections.push(banners.join("\n"));
    }

    if view.loading {
        sections.push(renderer.paint(LOADING_DOTS, Some(Color::BrightBlack), false));
    }

    if let Some(status) = &view.status {
        sections.push(format!(
            "{} {}",
            status.icon,
            renderer.paint(status.label, Some(Color::BrightBlue), false)
        ));
    }

    if let Some(error) = &view.error {
        sections.push(renderer.paint(error, Some(Color::Red), true));
    }

    if let Some(hint) = &view.input_hint {
        sections.push(renderer.paint(hint, Some(Color::Magenta), false));
    }

    if let Some(report) = &view.report {
        let body = renderer.render(report);
        if !body.is_empty() {
            sections.push(body);
        }
    } else if view.empty_report {
        sections.push(renderer.paint(EMPTY_REPORT, Some(Color::BrightBlack), false));
    }

    sections.join("\n\n")
}
