//! TheCatAPI breed source.

use log::debug;
use reqwest::blocking::Client;
use spycat_core::{Breed, BreedError, BreedSource};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches `GET <url>` and decodes the JSON breed array.
///
/// Blocking; callers run it on the blocking pool. A client is built per
/// fetch, which only happens on breed cache misses.
pub struct TheCatApiSource {
    url: String,
}

impl TheCatApiSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl BreedSource for TheCatApiSource {
    fn fetch_breeds(&self) -> Result<Vec<Breed>, BreedError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| BreedError::Unavailable(err.to_string()))?;

        let response = client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| BreedError::Unavailable(err.to_string()))?;

        let breeds: Vec<Breed> = response
            .json()
            .map_err(|err| BreedError::InvalidResponse(err.to_string()))?;
        if breeds.is_empty() {
            return Err(BreedError::InvalidResponse("empty breed list".to_string()));
        }
        debug!(
            "event=breed_fetch module=breeds status=ok url={} count={}",
            self.url,
            breeds.len()
        );
        Ok(breeds)
    }
}
