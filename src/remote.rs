//! Client for the weatherapi.com current-conditions endpoint.

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::city::CityRecord;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("citywx/", env!("CARGO_PKG_VERSION"));

/// Read-only source of current conditions for cities missing locally.
pub trait WeatherSource {
    /// Snapshot for one city. Never carries a store identifier.
    fn fetch_current(&self, city: &str) -> Result<CityRecord>;
}

pub struct WeatherApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherApi {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl WeatherSource for WeatherApi {
    fn fetch_current(&self, city: &str) -> Result<CityRecord> {
        let url = format!("{}/current.json", self.base_url);
        debug!(%url, city, "querying weather service");
        let body = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .and_then(Response::error_for_status)
            .and_then(Response::text)
            .map_err(|e| Error::RemoteUnavailable(e.to_string()))?;
        current::parse(&body)
    }
}

pub mod current {
    use super::*;

    #[derive(Deserialize, Debug)]
    pub struct Current {
        pub location: Option<Location>,

        pub current: Option<Conditions>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Location {
        pub name: String,
    }

    #[derive(Deserialize, Debug)]
    pub struct Conditions {
        pub temp_c: f64,

        pub condition: Condition,

        pub humidity: u32,
    }

    #[derive(Deserialize, Debug)]
    pub struct Condition {
        pub text: String,
    }

    /// Both nested blocks must be present; anything else is a shape failure,
    /// distinct from a transport failure.
    pub fn parse(body: &str) -> Result<CityRecord> {
        let data: Current =
            serde_json::from_str(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;
        match (data.location, data.current) {
            (Some(location), Some(current)) => Ok(CityRecord {
                id: None,
                name: location.name,
                temperature: current.temp_c,
                condition: current.condition.text,
                humidity: current.humidity,
            }),
            (None, _) => Err(Error::MalformedResponse("missing location block".into())),
            (_, None) => Err(Error::MalformedResponse("missing current block".into())),
        }
    }

    #[test]
    fn test_parse_tokyo() {
        let record = parse(
            r#"{"location": {"name": "Tokyo", "country": "Japan"},
                "current": {"temp_c": 22.0, "humidity": 40, "condition": {"text": "Sunny", "code": 1000}}}"#,
        )
        .unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.name, "Tokyo");
        assert_eq!(record.temperature, 22.0);
        assert_eq!(record.condition, "Sunny");
        assert_eq!(record.humidity, 40);
    }

    #[test]
    fn test_parse_missing_blocks() {
        assert!(matches!(
            parse(r#"{"location": {"name": "Tokyo"}}"#),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            parse(r#"{"error": {"code": 1006, "message": "No matching location found."}}"#),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(parse("not json"), Err(Error::MalformedResponse(_))));
    }
}
