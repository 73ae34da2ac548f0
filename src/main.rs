mod api;
mod app;
mod config;
mod pager;
mod theme;
mod ui;
mod view;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{GraphqlClient, QueryClient};
use app::{App, Popup};
use config::AppConfig;
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(version)]
#[command(about = "Browse Rick and Morty episodes from the terminal")]
struct Args {
    /// Page to start on
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,

    /// GraphQL endpoint (overrides the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Print the page as JSON and exit
    #[arg(short, long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so --json output stays clean)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = AppConfig::load().unwrap_or_default();

    let endpoint = args.endpoint.clone().unwrap_or_else(|| config.endpoint.clone());
    let client = GraphqlClient::new(endpoint, Duration::from_secs(config.request_timeout_secs))?;

    if args.json {
        return print_page(&client, args.page).await;
    }

    tracing::info!("Starting portal on page {}", args.page);
    let theme = Theme::from_overrides(&config.colors);
    run_tui(Arc::new(client), args.page, theme).await
}

async fn print_page(client: &dyn QueryClient, page: u32) -> Result<()> {
    let episodes = client.fetch_episodes(page).await?;

    let output = serde_json::json!({
        "page": page,
        "info": episodes.info,
        "results": episodes.results,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_tui(client: Arc<dyn QueryClient>, start_page: u32, theme: Theme) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state; this issues the first fetch
    let mut app = App::new(client, start_page, theme);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key).await {
                                app.set_status(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        // Pick up finished fetches
        let _ = app.tick().await;
    }
}
