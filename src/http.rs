use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};

/// Blocking client bound to one API root.
pub struct HttpClient {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_headers(base_url, HeaderMap::new())
    }

    pub fn with_headers(base_url: &str, default_headers: HeaderMap) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `method` to `endpoint` relative to the base URL.
    ///
    /// `headers` are merged under the default headers, so a default always
    /// wins over a caller-supplied value with the same name. Any non-2xx
    /// answer becomes [`ApiError::Status`].
    pub fn send(
        &self,
        method: Method,
        endpoint: &str,
        headers: Option<&HeaderMap>,
        params: &[(&str, &str)],
    ) -> Result<Response> {
        let url = self.url_for(endpoint);
        log::debug!("{} {} {:?}", method, url, params);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(extra) = headers {
            request = request.headers(extra.clone());
        }
        let resp = request
            .headers(self.default_headers.clone())
            .query(params)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let url = resp.url().to_string();
            let body = resp.text().unwrap_or_default();
            return Err(ApiError::Status { method, url, status, body });
        }
        Ok(resp)
    }

    pub fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        read_json(self.send(Method::GET, endpoint, None, params)?)
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

/// Decodes a response body, reporting shape mismatches as [`ApiError::Mapping`].
pub fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let body = resp.text()?;
    Ok(serde_json::from_str(&body)?)
}

/// Default headers for the storage API: JSON in and out, OAuth when a token is known.
pub fn oauth_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("OAuth {}", token))
            .map_err(|e| ApiError::Config(format!("invalid OAuth token: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}
