//! Maps a resolved city onto what the output panel shows.

use chrono::{DateTime, Local};
use ratatui::style::Color;

use crate::city::{CityRecord, Source};
use crate::units::{humidity, temperature};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Default,
    Sunny,
    Cloudy,
    Rainy,
    Clear,
    Overcast,
}

/// Checked in order; the first keyword found in the condition wins.
pub const THEME_KEYWORDS: [(&str, Theme); 5] = [
    ("sunny", Theme::Sunny),
    ("cloudy", Theme::Cloudy),
    ("rainy", Theme::Rainy),
    ("clear", Theme::Clear),
    ("overcast", Theme::Overcast),
];

impl Theme {
    pub fn from_condition(condition: &str) -> Self {
        let condition = condition.to_lowercase();
        THEME_KEYWORDS
            .iter()
            .find(|(keyword, _)| condition.contains(keyword))
            .map_or(Theme::Default, |&(_, theme)| theme)
    }

    /// (border, accent)
    pub fn palette(self) -> (Color, Color) {
        match self {
            Theme::Default => (Color::Cyan, Color::Green),
            Theme::Sunny => (Color::Yellow, Color::LightYellow),
            Theme::Cloudy => (Color::Gray, Color::White),
            Theme::Rainy => (Color::Blue, Color::LightBlue),
            Theme::Clear => (Color::LightCyan, Color::LightGreen),
            Theme::Overcast => (Color::DarkGray, Color::Gray),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Sunny => "sunny",
            Theme::Cloudy => "cloudy",
            Theme::Rainy => "rainy",
            Theme::Clear => "clear",
            Theme::Overcast => "overcast",
        }
    }
}

/// State of the output panel. Hidden until a successful resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Display {
    pub visible: bool,
    pub name: String,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub source: Option<Source>,
    pub shown_at: Option<DateTime<Local>>,
    theme: Theme,
}

impl Display {
    /// Overwrites whatever was shown before.
    pub fn show(&mut self, city: &CityRecord, source: Source) {
        self.visible = true;
        self.name = city.name.clone();
        self.temperature = temperature::celsius(city.temperature);
        self.condition = city.condition.clone();
        self.humidity = humidity::percent(city.humidity);
        self.source = Some(source);
        self.shown_at = Some(Local::now());
        self.apply_theme(Theme::from_condition(&city.condition));
    }

    /// Back to idle. The underlying record is untouched.
    pub fn clear(&mut self) {
        *self = Display::default();
    }

    /// Replaces the active theme; only one is ever active.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }
}
