use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::sanitize;

pub const ID_PLACEHOLDER: &str = "{id}";

/// Fetches detail pages over HTTP from a URL template such as
/// `https://www.osha.gov/ords/imis/establishment.inspection_detail?id={id}`.
pub struct HttpFetcher {
    client: Client,
    url_template: String,
    request_pause: Duration,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            url_template: config.url_template.clone(),
            request_pause: Duration::from_millis(config.request_pause_ms),
        })
    }

    pub fn url_for(&self, identifier: &str) -> String {
        self.url_template.replace(ID_PLACEHOLDER, identifier)
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        let identifier = sanitize::validate_identifier(identifier)?;
        let url = self.url_for(identifier);
        debug!("GET {}", url);

        let request_error = |source| FetchError::Request {
            identifier: identifier.to_string(),
            source,
        };

        let response = self.client.get(&url).send().map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                identifier: identifier.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().map_err(request_error)?;

        if !self.request_pause.is_zero() {
            std::thread::sleep(self.request_pause);
        }
        Ok(body)
    }
}
