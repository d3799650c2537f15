use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{error::Error, io};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use citywx::app::{run_app, Action, App, Form};
use citywx::cli::Args;
use citywx::config::{Config, FileConfig};
use citywx::{logging, HttpStore, WeatherApi};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_file = args.log_file.clone().unwrap_or_else(logging::default_path);
    logging::init(&log_file)?;

    let file = FileConfig::load(args.config.as_deref())?;
    let config = Config::resolve(file, args.overrides())?;
    info!(store = %config.store_url, weather = %config.weather_url, "starting");

    let store = HttpStore::new(&config.store_url)?;
    let remote = WeatherApi::new(&config.weather_url, &config.api_key)?;
    let mut app = App::new(&store, &remote);

    if let Some(ref city) = args.city {
        app.form.fields[Form::CITY] = city.clone();
        app.dispatch(Action::Search);
    }

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}
