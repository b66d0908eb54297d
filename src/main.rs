// src/main.rs

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::{Stdout, stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::info;

mod app;
mod config;
mod core;
mod logging;
mod ui;

use app::{App, AppState};
use config::Config;
use crate::core::models::ScanEvent;

const TICK_RATE: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    let config = Arc::new(Config::load());
    info!(
        config_file = ?config.source(),
        geofences = config.checkin.geofences.len(),
        tick_ms = config.simulation.tick_ms,
        "horizon-rs-sim starting"
    );

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = run(&mut terminal, App::new(config)).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;

    info!("horizon-rs-sim shutdown complete");
    result
}

async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut app: App) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(64);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            handle_events(&mut app, &tx)?;
        }

        while let Ok(scan_event) = rx.try_recv() {
            app.apply_event(scan_event);
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Single entry point for terminal events.
fn handle_events(app: &mut App, tx: &mpsc::Sender<ScanEvent>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            if app.show_disclaimer {
                handle_disclaimer_input(app, key.code);
                return Ok(());
            }
            match app.state {
                AppState::Idle => handle_idle_input(app, key.code, tx),
                AppState::Finished => handle_finished_input(app, key.code),
                AppState::Scanning => {
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        app.quit();
                    }
                }
            }
        }
    }
    Ok(())
}

fn handle_disclaimer_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Enter => app.show_disclaimer = false,
        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

/// Handles input while the user is typing (Idle). Letters go to the input box.
fn handle_idle_input(app: &mut App, key_code: KeyCode, tx: &mpsc::Sender<ScanEvent>) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab => app.switch_screen(),
        KeyCode::Left => app.previous_option(),
        KeyCode::Right => app.next_option(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => {
            if let Some(request) = app.start_scan() {
                let config = app.config.clone();
                tokio::spawn(crate::core::scanner::run_scan(request, config, tx.clone()));
            }
        }
        _ => {}
    }
}

/// Handles input while a result is displayed (Finished).
fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Char('e') => app.export(),
        KeyCode::Char('l') => app.toggle_logs(),
        KeyCode::Tab => app.switch_screen(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::Left => app.scroll_logs_left(),
        KeyCode::Right => app.scroll_logs_right(),
        _ => {}
    }
}
