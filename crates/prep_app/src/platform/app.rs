use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use anyhow::{anyhow, Context};
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::LevelFilter;
use prep_core::{parse_date_input, update, AppState, Msg, Phase};
use prep_logging::{prep_info, prep_warn};

use super::cli::Cli;
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::constants::RENDER_TICK;
use super::ui::markdown::{MarkdownRenderer, StyleTable};
use super::ui::terminal::TerminalView;
use super::{input, logging};

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum LoopEvent {
    Msg(Msg),
    /// User asked to leave.
    Quit,
    /// Stdin reached EOF; exit once the current request settles.
    InputClosed,
}

pub fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let (config, config_error) = match AppConfig::load(&cli.config) {
        Ok(loaded) => (loaded.unwrap_or_default(), None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    let config = config.with_overrides(&cli);

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(config.log, level);
    if let Some(err) = config_error {
        prep_warn!("{}; using defaults", err);
    }

    let one_shot = cli
        .date
        .as_deref()
        .map(|text| {
            parse_date_input(text, Local::now().date_naive())
                .ok_or_else(|| anyhow!("unrecognized date {text:?}"))
        })
        .transpose()?;

    let live = std::io::stdout().is_terminal();
    let color = live && !cli.no_color;
    colored::control::set_override(color);
    let renderer = MarkdownRenderer::new(StyleTable::default(), color);
    let mut terminal = TerminalView::new(renderer, std::io::stdout(), live, one_shot.is_none());

    let (tx, rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(config.analyze_settings(), tx.clone())
        .context("failed to start analysis engine")?;
    prep_info!(
        "meeting-prep started: server={} endpoint={}",
        config.server_url,
        config.endpoint
    );

    spawn_ticker(tx.clone());
    match one_shot {
        Some(date) => select_date(&tx, date),
        None => input::spawn_stdin_reader(tx.clone()),
    }
    drop(tx);

    let mut state = AppState::new();
    terminal.draw(&state.view())?;

    let mut input_closed = false;
    while let Ok(event) = rx.recv() {
        match event {
            LoopEvent::Quit => break,
            LoopEvent::InputClosed => input_closed = true,
            LoopEvent::Msg(msg) => {
                let tick = matches!(msg, Msg::Tick);
                let (next, effects) = update(state, msg);
                state = next;
                runner.enqueue(effects);
                if tick && state.consume_dirty() {
                    terminal.draw(&state.view())?;
                }
            }
        }

        let one_shot_done = one_shot.is_some() && state.is_settled();
        if one_shot_done || (input_closed && !state.is_in_flight()) {
            break;
        }
    }

    terminal.finish(&state.view())?;
    prep_info!("meeting-prep exiting in phase {:?}", state.phase());

    if one_shot.is_some() && state.phase() == Phase::Failed {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn select_date(tx: &mpsc::Sender<LoopEvent>, date: NaiveDate) {
    let _ = tx.send(LoopEvent::Msg(Msg::DateSelected(Some(date))));
}

// Drives redraws; stops when the loop has gone.
fn spawn_ticker(tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        while tx.send(LoopEvent::Msg(Msg::Tick)).is_ok() {
            thread::sleep(RENDER_TICK);
        }
    });
}
