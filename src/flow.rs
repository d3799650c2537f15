//! The find-or-fetch read path and the add/update write paths.
//!
//! Each flow is a plain function of the user's input and the two clients.
//! Nothing here holds state between calls.

use tracing::info;

use crate::city::{normalize_name, CityPatch, CityRecord, NewCity, Source};
use crate::error::{Error, Result};
use crate::store::CityStore;
use crate::remote::WeatherSource;

/// Fields typed by the user. Blank inputs are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityInput {
    pub name: String,
    pub temperature: Option<f64>,
    pub condition: Option<String>,
    pub humidity: Option<u32>,
}

/// Serves `name` from the local store when present, otherwise from the
/// weather service. The remote snapshot is never written back.
pub fn resolve(
    name: &str,
    store: &dyn CityStore,
    remote: &dyn WeatherSource,
) -> Result<(CityRecord, Source)> {
    let key = required_name(name)?;
    let cities = store
        .list_all()
        .map_err(|e| Error::DataUnavailable(e.to_string()))?;

    if let Some(city) = cities.into_iter().find(|c| c.matches(&key)) {
        info!(city = %key, "city found locally");
        return Ok((city, Source::Local));
    }

    info!(city = %key, "city not in local store, asking weather service");
    let city = remote.fetch_current(&key)?;
    Ok((city, Source::Remote))
}

/// Creates a local record. All four fields must be supplied.
pub fn add_city(input: &CityInput, store: &dyn CityStore) -> Result<CityRecord> {
    let name = required_name(&input.name)?;
    let (Some(temperature), Some(condition), Some(humidity)) =
        (input.temperature, input.condition.clone(), input.humidity)
    else {
        return Err(Error::IncompleteInput(
            "all fields are needed to add a new city".into(),
        ));
    };

    let created = store.create(&NewCity {
        name,
        temperature,
        condition,
        humidity,
    })?;
    info!(city = %created.name, id = ?created.id, "city added");
    Ok(created)
}

/// Patches the supplied fields of an existing local record.
///
/// The target is found with its own scan of the local collection, never
/// through [`resolve`], so an update cannot reach the weather service.
pub fn update_city(input: &CityInput, store: &dyn CityStore) -> Result<CityRecord> {
    let key = required_name(&input.name)?;
    let fields = CityPatch {
        temperature: input.temperature,
        condition: input.condition.clone(),
        humidity: input.humidity,
    };

    let id = store
        .list_all()?
        .into_iter()
        .find(|c| c.matches(&key))
        .and_then(|c| c.id)
        .ok_or_else(|| Error::RecordNotFound(key.clone()))?;

    let updated = store.patch(&id, &fields)?;
    info!(city = %key, %id, "city updated");
    Ok(updated)
}

fn required_name(name: &str) -> Result<String> {
    let key = normalize_name(name);
    if key.is_empty() {
        return Err(Error::IncompleteInput("city name".into()));
    }
    Ok(key)
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory stand-ins for the two clients that count their calls.

    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::city::CityId;

    #[derive(Default)]
    pub struct MemoryStore {
        pub cities: RefCell<Vec<CityRecord>>,
        pub unavailable: bool,
        pub lists: Cell<usize>,
        pub writes: Cell<usize>,
    }

    impl MemoryStore {
        pub fn with(cities: Vec<CityRecord>) -> Self {
            Self {
                cities: RefCell::new(cities),
                ..Default::default()
            }
        }
    }

    impl CityStore for MemoryStore {
        fn list_all(&self) -> Result<Vec<CityRecord>> {
            self.lists.set(self.lists.get() + 1);
            if self.unavailable {
                return Err(Error::StoreUnavailable("connection refused".into()));
            }
            Ok(self.cities.borrow().clone())
        }

        fn create(&self, city: &NewCity) -> Result<CityRecord> {
            self.writes.set(self.writes.get() + 1);
            let mut cities = self.cities.borrow_mut();
            let record = CityRecord {
                id: Some(CityId::new((cities.len() + 1).to_string())),
                name: city.name.clone(),
                temperature: city.temperature,
                condition: city.condition.clone(),
                humidity: city.humidity,
            };
            cities.push(record.clone());
            Ok(record)
        }

        fn patch(&self, id: &CityId, fields: &CityPatch) -> Result<CityRecord> {
            self.writes.set(self.writes.get() + 1);
            let mut cities = self.cities.borrow_mut();
            let record = cities
                .iter_mut()
                .find(|c| c.id.as_ref() == Some(id))
                .ok_or_else(|| Error::StoreWriteError(format!("404 for {id}")))?;
            fields.apply_to(record);
            Ok(record.clone())
        }

        fn delete(&self, id: &CityId) -> Result<()> {
            self.writes.set(self.writes.get() + 1);
            self.cities.borrow_mut().retain(|c| c.id.as_ref() != Some(id));
            Ok(())
        }
    }

    pub struct FixedWeather {
        pub reply: Result<CityRecord>,
        pub calls: Cell<usize>,
    }

    impl FixedWeather {
        pub fn new(reply: Result<CityRecord>) -> Self {
            Self {
                reply,
                calls: Cell::new(0),
            }
        }
    }

    impl WeatherSource for FixedWeather {
        fn fetch_current(&self, _city: &str) -> Result<CityRecord> {
            self.calls.set(self.calls.get() + 1);
            self.reply.clone()
        }
    }

    pub fn paris() -> CityRecord {
        CityRecord {
            id: Some(CityId::new("1")),
            name: "paris".into(),
            temperature: 18.0,
            condition: "cloudy".into(),
            humidity: 60,
        }
    }

    pub fn tokyo() -> CityRecord {
        CityRecord {
            id: None,
            name: "Tokyo".into(),
            temperature: 22.0,
            condition: "Sunny".into(),
            humidity: 40,
        }
    }
}
