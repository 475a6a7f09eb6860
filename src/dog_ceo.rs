use std::collections::HashMap;

use serde::de::Error as _;

use crate::error::{ApiError, Result};
use crate::http::HttpClient;
use crate::types::DogResponse;

pub const DOG_CEO_BASE: &str = "https://dog.ceo/api";

/// Dog CEO client.
///
/// Answers are memoized per exact input for the lifetime of the client. The
/// caches never shrink, which is fine for the handful of breeds a run touches.
pub struct DogCeoApi {
    http: HttpClient,
    sub_breeds: HashMap<String, Vec<String>>,
    urls: HashMap<(String, Vec<String>), Vec<String>>,
}

impl DogCeoApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(base_url),
            sub_breeds: HashMap::new(),
            urls: HashMap::new(),
        }
    }

    /// Sub-breeds of `breed`, empty when it has none.
    pub fn get_sub_breeds(&mut self, breed: &str) -> Result<Vec<String>> {
        if let Some(cached) = self.sub_breeds.get(breed) {
            return Ok(cached.clone());
        }
        let resp: DogResponse<Vec<String>> =
            self.http.get_json(&format!("/breed/{}/list", breed), &[])?;
        let sub_breeds = resp.message.unwrap_or_default();
        log::debug!("{} has sub-breeds {:?}", breed, sub_breeds);
        self.sub_breeds.insert(breed.to_string(), sub_breeds.clone());
        Ok(sub_breeds)
    }

    /// One random image URL per sub-breed, or a single one for `breed` itself.
    pub fn get_urls(&mut self, breed: &str, sub_breeds: &[String]) -> Result<Vec<String>> {
        let key = (breed.to_string(), sub_breeds.to_vec());
        if let Some(cached) = self.urls.get(&key) {
            return Ok(cached.clone());
        }
        let urls = if sub_breeds.is_empty() {
            vec![self.random_image(&format!("/breed/{}/images/random", breed))?]
        } else {
            sub_breeds
                .iter()
                .map(|sub| self.random_image(&format!("/breed/{}/{}/images/random", breed, sub)))
                .collect::<Result<Vec<_>>>()?
        };
        self.urls.insert(key, urls.clone());
        Ok(urls)
    }

    fn random_image(&self, endpoint: &str) -> Result<String> {
        let resp: DogResponse<String> = self.http.get_json(endpoint, &[])?;
        resp.message
            .ok_or_else(|| ApiError::Mapping(serde_json::Error::missing_field("message")))
    }
}
