//! Look up and edit per-city weather records.
//!
//! A city is served from the local store when it is there and from the
//! weather service otherwise. Remote results are shown, never saved.

pub mod app;
pub mod city;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod flow;
pub mod logging;
pub mod remote;
pub mod store;
pub mod units;

pub use city::{CityId, CityPatch, CityRecord, NewCity, Source};
pub use error::{Error, Result};
pub use remote::{WeatherApi, WeatherSource};
pub use store::{CityStore, HttpStore};
