use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;

use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tracing::{error, info};

use crate::city::Source;
use crate::display::Display;
use crate::error::{Error, Result};
use crate::flow::{self, CityInput};
use crate::remote::WeatherSource;
use crate::store::CityStore;
use crate::units::input;

const MISSING: &str = "--";

/// The four things a user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Search,
    Add,
    Update,
    Clear,
}

/// Key bindings. Each entry triggers exactly one flow through [`App::dispatch`].
pub const BINDINGS: [(KeyCode, KeyModifiers, Action); 7] = [
    (KeyCode::Enter, KeyModifiers::NONE, Action::Search),
    (KeyCode::Char('a'), KeyModifiers::CONTROL, Action::Add),
    (KeyCode::F(2), KeyModifiers::NONE, Action::Add),
    (KeyCode::Char('u'), KeyModifiers::CONTROL, Action::Update),
    (KeyCode::F(3), KeyModifiers::NONE, Action::Update),
    (KeyCode::Char('l'), KeyModifiers::CONTROL, Action::Clear),
    (KeyCode::F(4), KeyModifiers::NONE, Action::Clear),
];

pub fn action_for(key: &KeyEvent) -> Option<Action> {
    BINDINGS
        .iter()
        .find(|(code, modifiers, _)| *code == key.code && *modifiers == key.modifiers)
        .map(|&(_, _, action)| action)
}

const LABELS: [&str; 4] = ["City", "Temperature", "Condition", "Humidity"];

#[derive(Debug, Default)]
pub struct Form {
    pub fields: [String; 4],
    pub focus: usize,
}

impl Form {
    pub const CITY: usize = 0;
    pub const TEMPERATURE: usize = 1;
    pub const CONDITION: usize = 2;
    pub const HUMIDITY: usize = 3;

    pub fn next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn previous(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push(&mut self, c: char) {
        self.fields[self.focus].push(c);
    }

    pub fn pop(&mut self) {
        self.fields[self.focus].pop();
    }

    /// Blank fields become `None`; a number that does not parse, or is not
    /// finite, is reported before anything is sent.
    pub fn to_input(&self) -> Result<CityInput> {
        let number_error =
            |field: &str| Error::IncompleteInput(format!("{field} must be a number"));
        let temperature = match input::optional_number::<f64>(&self.fields[Self::TEMPERATURE]) {
            Ok(t) if t.map_or(true, f64::is_finite) => t,
            _ => return Err(number_error("temperature")),
        };
        Ok(CityInput {
            name: self.fields[Self::CITY].clone(),
            temperature,
            condition: input::optional_text(&self.fields[Self::CONDITION]),
            humidity: input::optional_number(&self.fields[Self::HUMIDITY])
                .map_err(|_| number_error("humidity"))?,
        })
    }
}

/// Transient popup; any key dismisses it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

pub struct App<'a> {
    store: &'a dyn CityStore,
    remote: &'a dyn WeatherSource,
    pub form: Form,
    pub display: Display,
    pub notice: Option<Notice>,
    pub quit: bool,
}

impl<'a> App<'a> {
    pub fn new(store: &'a dyn CityStore, remote: &'a dyn WeatherSource) -> Self {
        Self {
            store,
            remote,
            form: Form::default(),
            display: Display::default(),
            notice: None,
            quit: false,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        let outcome = match action {
            Action::Search => self.search(),
            Action::Add => self.add(),
            Action::Update => self.update(),
            Action::Clear => {
                self.display.clear();
                self.form.fields[Form::CITY].clear();
                info!("city data cleared from display");
                Ok(())
            }
        };

        if let Err(err) = outcome {
            error!(?action, %err, "action failed");
            self.notify(err.user_message(), true);
        }
    }

    fn search(&mut self) -> Result<()> {
        let (city, source) = flow::resolve(&self.form.fields[Form::CITY], self.store, self.remote)?;
        self.display.show(&city, source);
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        flow::add_city(&self.form.to_input()?, self.store)?;
        self.notify("City added successfully", false);
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        flow::update_city(&self.form.to_input()?, self.store)?;
        self.notify("City updated successfully", false);
        Ok(())
    }

    fn notify(&mut self, text: impl Into<String>, is_error: bool) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error,
        });
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.notice.take().is_some() {
            return;
        }
        if let Some(action) = action_for(&key) {
            self.dispatch(action);
            return;
        }

        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Tab | KeyCode::Down => self.form.next(),
            KeyCode::BackTab | KeyCode::Up => self.form.previous(),
            KeyCode::Backspace => self.form.pop(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.form.push(c),
            _ => {}
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.on_key(key);
        }
    }
    Ok(())
}

fn display_headline(display: &Display, border: Color) -> Paragraph<'_> {
    let shown = match display.shown_at {
        Some(at) => format!(" {}", at.format("%d-%m-%Y %H:%M")),
        None => format!(" {MISSING}"),
    };
    let source = display
        .source
        .map_or_else(|| MISSING.to_string(), |s: Source| s.to_string());

    Paragraph::new(vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled("City Weather", Style::default().fg(Color::Yellow)),
            Span::raw(" : "),
            Span::styled(source, Style::default().fg(Color::Blue)),
        ]),
        Line::from(shown),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .border_type(BorderType::Rounded),
    )
}

fn display_form(form: &Form, border: Color) -> Table<'_> {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Search / Edit ", Style::default().fg(Color::Yellow)))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(border))
        .border_type(BorderType::Rounded);

    let rows = LABELS.iter().zip(&form.fields).enumerate().map(|(i, (label, value))| {
        let style = if i == form.focus {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        };
        let value = if i == form.focus {
            format!("{value}_")
        } else {
            value.clone()
        };
        Row::new(vec![Cell::from(format!(" {label}")), Cell::from(value).style(style)])
    });

    Table::new(rows, [Constraint::Length(13), Constraint::Min(10)]).block(block)
}

fn display_city(display: &Display, border: Color, accent: Color) -> Table<'_> {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" Current Conditions ({}) ", display.theme().label()),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(border))
        .border_type(BorderType::Rounded);

    let rows = vec![
        Row::new(vec![Cell::from("")]),
        Row::new(vec![
            Cell::from(" City"),
            Cell::from(display.name.as_str())
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        ]),
        Row::new(vec![
            Cell::from(" Temperature"),
            Cell::from(display.temperature.as_str()).style(Style::default().fg(accent)),
        ]),
        Row::new(vec![
            Cell::from(" Conditions"),
            Cell::from(display.condition.as_str()).style(Style::default().fg(accent)),
        ]),
        Row::new(vec![
            Cell::from(" Humidity"),
            Cell::from(display.humidity.as_str()).style(Style::default().fg(accent)),
        ]),
    ];

    Table::new(rows, [Constraint::Length(13), Constraint::Min(10)]).block(block)
}

fn help_line() -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Green)),
        Span::raw(" search  "),
        Span::styled("^A/F2", Style::default().fg(Color::Green)),
        Span::raw(" add  "),
        Span::styled("^U/F3", Style::default().fg(Color::Green)),
        Span::raw(" update  "),
        Span::styled("^L/F4", Style::default().fg(Color::Green)),
        Span::raw(" clear  "),
        Span::styled("Tab", Style::default().fg(Color::Green)),
        Span::raw(" next field  "),
        Span::styled("Esc", Style::default().fg(Color::Green)),
        Span::raw(" quit"),
    ]))
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    area
}

pub fn ui(f: &mut Frame, app: &App) {
    let (border, accent) = app.display.theme().palette();

    let [headline, body, help] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(f.area());

    f.render_widget(display_headline(&app.display, border), headline);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
    let [form_area, _] = Layout::vertical([Constraint::Length(6), Constraint::Min(0)]).areas(left);
    f.render_widget(display_form(&app.form, border), form_area);

    if app.display.visible {
        let [city_area, _] =
            Layout::vertical([Constraint::Length(7), Constraint::Min(0)]).areas(right);
        f.render_widget(display_city(&app.display, border, accent), city_area);
    }

    f.render_widget(help_line(), help);

    if let Some(ref notice) = app.notice {
        let color = if notice.is_error { Color::Red } else { Color::Green };
        let area = popup_area(f.area(), 50u16.min(f.area().width), 5);
        let popup = Paragraph::new(vec![
            Line::from(notice.text.as_str()),
            Line::from(Span::styled("press any key", Style::default().fg(Color::DarkGray))),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .border_type(BorderType::Rounded),
        );
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}
