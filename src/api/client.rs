use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{EkilexError, Result};
use crate::types::{
    ApiEnvelope, Classifier, ClassifierType, Dataset, Domain, MeaningDetails, MeaningSearchResult,
    WordDetails, WordSearchResult,
};

use super::routes::Route;
use super::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError, UreqTransport};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "ekilex-api-key";

/// Substrings of transport failures that mean the service cannot be reached.
const UNREACHABLE_MARKERS: &[&str] = &[
    "ECONNREFUSED",
    "ENOTFOUND",
    "connection refused",
    "host not found",
    "failed to lookup address",
];

/// Construction parameters for [`EkilexClient`].
pub struct ClientOptions {
    pub api_key: String,
    pub base_url: String,
    pub timeout_ms: u64,
    /// Transport override; defaults to [`UreqTransport`].
    pub transport: Option<Arc<dyn HttpTransport>>,
}

/// Stateless client for the Ekilex REST API.
///
/// Holds only immutable configuration, so one instance can be shared by every
/// concurrent tool and resource invocation.
pub struct EkilexClient {
    api_key: String,
    base_url: String,
    timeout_ms: u64,
    transport: Arc<dyn HttpTransport>,
}

impl EkilexClient {
    pub fn new(options: ClientOptions) -> Self {
        let timeout_ms = options.timeout_ms;
        let transport = options
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new(Duration::from_millis(timeout_ms))));
        Self {
            api_key: options.api_key,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            timeout_ms,
            transport,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ClientOptions {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            timeout_ms: config.timeout_ms,
            transport: None,
        })
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Searches words. Supports `*` and `?` wildcards.
    pub async fn search_word(
        &self,
        query: &str,
        datasets: Option<&str>,
    ) -> Result<Vec<WordSearchResult>> {
        let route = Route::SearchWord { query, datasets };
        Ok(self.request(route).await?.unwrap_or_default())
    }

    /// Fetches a word entry. `Ok(None)` means the word does not exist.
    pub async fn get_word_details(
        &self,
        word_id: u64,
        datasets: Option<&str>,
    ) -> Result<Option<WordDetails>> {
        self.request(Route::WordDetails { word_id, datasets }).await
    }

    pub async fn search_meaning(
        &self,
        query: &str,
        datasets: Option<&str>,
    ) -> Result<Vec<MeaningSearchResult>> {
        let route = Route::SearchMeaning { query, datasets };
        Ok(self.request(route).await?.unwrap_or_default())
    }

    /// Fetches a meaning entry. `Ok(None)` means the meaning does not exist.
    pub async fn get_meaning_details(
        &self,
        meaning_id: u64,
        datasets: Option<&str>,
    ) -> Result<Option<MeaningDetails>> {
        self.request(Route::MeaningDetails {
            meaning_id,
            datasets,
        })
        .await
    }

    pub async fn get_datasets(&self) -> Result<Vec<Dataset>> {
        Ok(self.request(Route::Datasets).await?.unwrap_or_default())
    }

    pub async fn get_classifiers(&self, classifier_type: ClassifierType) -> Result<Vec<Classifier>> {
        let route = Route::Classifiers {
            classifier_type: classifier_type.as_str(),
        };
        Ok(self.request(route).await?.unwrap_or_default())
    }

    pub async fn get_domains(&self, origin: &str) -> Result<Vec<Domain>> {
        Ok(self
            .request(Route::Domains { origin })
            .await?
            .unwrap_or_default())
    }

    pub async fn get_domain_origins(&self) -> Result<Vec<String>> {
        Ok(self.request(Route::DomainOrigins).await?.unwrap_or_default())
    }

    /// Issues one GET and decodes the envelope.
    ///
    /// The deadline future is dropped on every exit path, so no timer outlives
    /// the call.
    async fn request<T: DeserializeOwned>(&self, route: Route<'_>) -> Result<Option<T>> {
        let path = route.path();
        let request = HttpRequest::get(format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header("Accept", "application/json");

        debug!(path = %path, "ekilex request");

        let deadline = Duration::from_millis(self.timeout_ms);
        let outcome = tokio::time::timeout(deadline, self.transport.get(request)).await;

        let response = match outcome {
            Err(_) | Ok(Err(TransportError::Aborted)) => {
                warn!(path = %path, timeout_ms = self.timeout_ms, "ekilex request timed out");
                return Err(EkilexError::Timeout {
                    timeout_ms: self.timeout_ms,
                });
            }
            Ok(Err(TransportError::Failed(message))) => {
                warn!(path = %path, error = %message, "ekilex request failed");
                return Err(translate_transport_failure(message));
            }
            Ok(Ok(response)) => response,
        };

        if !response.is_success() {
            let err = error_from_status(&response);
            warn!(path = %path, status = response.status, error = %err, "ekilex returned an error status");
            return Err(err);
        }

        decode_envelope(&response.body)
    }
}

fn translate_transport_failure(message: String) -> EkilexError {
    let lowered = message.to_lowercase();
    let unreachable = UNREACHABLE_MARKERS
        .iter()
        .any(|marker| lowered.contains(&marker.to_lowercase()));
    if unreachable {
        EkilexError::ServiceUnavailable {
            cause: Some(message),
        }
    } else {
        EkilexError::Transport(message)
    }
}

/// Maps a non-2xx response to the error taxonomy. Order matters: auth, rate
/// limit and server failures are decided on status alone.
fn error_from_status(response: &HttpResponse) -> EkilexError {
    match response.status {
        401 | 403 => EkilexError::InvalidApiKey,
        429 => EkilexError::RateLimited {
            retry_after: response
                .header_value("Retry-After")
                .and_then(|v| v.trim().parse::<u64>().ok()),
        },
        status if status >= 500 => EkilexError::ServiceUnavailable { cause: None },
        status => {
            let message = serde_json::from_str::<serde_json::Value>(&response.body)
                .ok()
                .and_then(|body| {
                    body.get("message")
                        .and_then(|m| m.as_str())
                        .filter(|m| !m.is_empty())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("HTTP {}: {}", status, response.status_text));
            EkilexError::Api {
                message,
                status: Some(status),
            }
        }
    }
}

fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<Option<T>> {
    let envelope: ApiEnvelope<T> = serde_json::from_str(body)
        .map_err(|e| EkilexError::api(format!("Invalid response from Ekilex API: {}", e)))?;

    if !envelope.success {
        return Err(EkilexError::api(
            envelope
                .message
                .unwrap_or_else(|| "API request failed".to_string()),
        ));
    }

    Ok(envelope.data)
}
