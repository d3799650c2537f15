//! Client for the local city collection (a json-server style REST resource).

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use tracing::{debug, warn};

use crate::city::{CityId, CityPatch, CityRecord, NewCity};
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("citywx/", env!("CARGO_PKG_VERSION"));

/// The local system of record for user-added cities.
pub trait CityStore {
    /// The whole collection, in store order.
    fn list_all(&self) -> Result<Vec<CityRecord>>;

    fn create(&self, city: &NewCity) -> Result<CityRecord>;

    fn patch(&self, id: &CityId, fields: &CityPatch) -> Result<CityRecord>;

    /// Removes one record by identifier. No user action calls this.
    fn delete(&self, id: &CityId) -> Result<()>;
}

pub struct HttpStore {
    client: Client,
    base_url: Url,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("store URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("store URL {base_url} cannot hold item paths")));
        }
        Ok(Self { client, base_url })
    }

    /// The id becomes a single percent-encoded path segment.
    fn item_url(&self, id: &CityId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }

    fn write(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .map_err(|e| Error::StoreWriteError(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| Error::StoreWriteError(e.to_string()))
    }

    /// A 2xx status means the store took the write, even when the body that
    /// came back cannot be read as a record.
    fn written_record(response: Response, op: &str) -> Result<CityRecord> {
        response.json().map_err(|e| {
            warn!(op, %e, "store accepted the write but replied with an unreadable record");
            Error::StoreWriteError(format!(
                "{op} returned success but the reply is not a city record, the write may have been applied: {e}"
            ))
        })
    }
}

impl CityStore for HttpStore {
    fn list_all(&self) -> Result<Vec<CityRecord>> {
        debug!(url = %self.base_url, "listing local cities");
        self.client
            .get(self.base_url.clone())
            .send()
            .and_then(Response::error_for_status)
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?
            .json()
            .map_err(|e| Error::StoreUnavailable(format!("collection is not a list of cities: {e}")))
    }

    fn create(&self, city: &NewCity) -> Result<CityRecord> {
        debug!(name = %city.name, "creating local city");
        let response = self.write(self.client.post(self.base_url.clone()).json(city))?;
        Self::written_record(response, "create")
    }

    fn patch(&self, id: &CityId, fields: &CityPatch) -> Result<CityRecord> {
        debug!(%id, "patching local city");
        let response = self.write(self.client.patch(self.item_url(id)).json(fields))?;
        Self::written_record(response, "patch")
    }

    fn delete(&self, id: &CityId) -> Result<()> {
        debug!(%id, "deleting local city");
        self.write(self.client.delete(self.item_url(id)))?;
        Ok(())
    }
}
