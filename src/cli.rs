use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

use crate::config::FileConfig;

const ABOUT: &str = "City weather lookup TUI";

const LONG_ABOUT: &str = "
TUI for looking up and editing per-city weather records.

Cities are looked up in a local json-server collection first (e.g. `json-server db.json` serving
http://localhost:3000/cities). Cities missing locally are fetched from weatherapi.com and shown
without being saved. New cities can be added and existing ones partially updated from the form.

Settings are read from the config file, then overridden by the options below.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "City to search for at startup")]
    pub city: Option<String>,

    #[arg(long, help = "Config file (default: <config dir>/citywx/config.toml)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Local city collection URL")]
    pub store_url: Option<String>,

    #[arg(long, help = "Weather service base URL")]
    pub weather_url: Option<String>,

    #[arg(long, env = "WEATHERAPI_KEY", hide_env_values = true, help = "weatherapi.com API key")]
    pub api_key: Option<String>,

    #[arg(long, help = "Log file (default: <cache dir>/citywx/citywx.log)")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> FileConfig {
        FileConfig {
            store_url: self.store_url.clone(),
            weather_url: self.weather_url.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

#[test]
fn test_parse_args() {
    let args = Args::try_parse_from([
        "citywx",
        "--store-url",
        "http://localhost:4000/cities",
        "--api-key",
        "abc",
        "Paris",
    ])
    .unwrap();
    assert_eq!(args.city.as_deref(), Some("Paris"));
    let overrides = args.overrides();
    assert_eq!(overrides.store_url.as_deref(), Some("http://localhost:4000/cities"));
    assert_eq!(overrides.api_key.as_deref(), Some("abc"));
    assert_eq!(overrides.weather_url, None);
}
