mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;
mod report;
mod ui;

use app::App;
use chrono::{Datelike, Local};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::OpenMeteoArchiveClient;
use error::Result;
use logic::classifier::threshold_text;
use logic::{selectable_years, PredictionService};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::PredictorScreen;

type Service = PredictionService<OpenMeteoArchiveClient>;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Some(Commands::Init) = cli.command {
        Config::setup_interactive()?;
        return Ok(());
    }

    // Load configuration
    let config = match Config::load(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Run `ricecast init` to write a fresh config");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Predict { year, json }) => run_predict(config, year, json).await,
        Some(Commands::Check) => run_check(config).await,
        Some(Commands::Init) => Ok(()),
        None => run_tui(config).await,
    }
}

fn build_service(config: Config) -> Service {
    let client = OpenMeteoArchiveClient::new(&config.archive);
    PredictionService::new(config, client)
}

async fn run_predict(config: Config, year: Option<i32>, json: bool) -> Result<()> {
    let now = Local::now();
    let year = year.unwrap_or_else(|| now.year());

    let years = selectable_years(now.year());
    if !years.contains(&year) {
        eprintln!(
            "Year {} is outside the selectable range {}-{}",
            year,
            years[0],
            years[years.len() - 1]
        );
        std::process::exit(2);
    }

    let service = build_service(config);
    match service.predict(year, now.naive_local()).await {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", report::render(&result));
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run_check(config: Config) -> Result<()> {
    println!("Configuration OK");
    println!(
        "  Location: {}, {} ({}, {}) [{}]",
        config.location.name,
        config.location.region,
        config.location.latitude,
        config.location.longitude,
        config.location.timezone
    );
    println!(
        "  Thresholds: early < {} mm, late > {} mm",
        threshold_text(config.thresholds.early_mm),
        threshold_text(config.thresholds.late_mm)
    );

    let client = OpenMeteoArchiveClient::new(&config.archive);
    match client.test_connection(&config.location).await {
        Ok(true) => println!("Open-Meteo archive: OK"),
        Ok(false) => println!("Open-Meteo archive: unexpected response format"),
        Err(e) => println!("Open-Meteo archive: OFFLINE ({})", e),
    }

    Ok(())
}

async fn run_tui(config: Config) -> Result<()> {
    let service = build_service(config);
    let mut app = App::new(service.config().clone(), Local::now().year());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &service).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    service: &Service,
) -> Result<()> {
    loop {
        terminal.draw(|f| f.render_widget(PredictorScreen::new(app), f.area()))?;

        // Run a pending prediction after the screen shows the fetch status
        if app.needs_prediction {
            let year = app.selected_year();
            let status = match service.reference_period(year) {
                Ok(period) => format!(
                    "Fetching rainfall data for {} ({})...",
                    service.config().location.name,
                    period
                ),
                Err(_) => "Fetching rainfall data...".to_string(),
            };
            app.begin_prediction(&status);
            terminal.draw(|f| f.render_widget(PredictorScreen::new(app), f.area()))?;

            let outcome = service.predict(year, Local::now().naive_local()).await;
            app.finish_prediction(outcome);
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_input(app, key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_year(),
        KeyCode::Right | KeyCode::Char('l') => app.next_year(),
        KeyCode::Enter | KeyCode::Char('p') => app.request_prediction(),
        _ => {}
    }
}
