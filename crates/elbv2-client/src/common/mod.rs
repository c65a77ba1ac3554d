//! Common utilities for the ELBv2 Query API client
//!
//! Provides request building, status mapping and XML decoding shared by every
//! API action.

use crate::attributes::Attributes;
use crate::error::Elbv2Error;
use crate::models::{ErrorResponse, API_VERSION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client wrapper bound to one Query API endpoint
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    endpoint: String,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, endpoint: String) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the query string for an action; `Action` and `Version` come first
    pub fn build_query_string(&self, action: &str, params: &[(String, String)]) -> String {
        [("Action", action), ("Version", API_VERSION)]
            .into_iter()
            .chain(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Build a full request URL for an action
    pub fn build_url(&self, action: &str, params: &[(String, String)]) -> String {
        format!("{}/?{}", self.endpoint, self.build_query_string(action, params))
    }

    /// Invoke a Query API action and decode its XML response
    pub async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(String, String)],
    ) -> Result<T, Elbv2Error> {
        let url = self.build_url(action, params);
        debug!("GET {}", url);

        let response = self.client
            .get(&url)
            .header("Accept", "text/xml")
            .send()
            .await
            .map_err(Elbv2Error::Http)?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(map_error_response(action, status, &body));
        }

        quick_xml::de::from_str(&body).map_err(|e| {
            debug!(
                "{} response did not decode: {} - Response (first 500 chars): {}",
                action,
                e,
                body.chars().take(500).collect::<String>()
            );
            Elbv2Error::Serialization(e)
        })
    }
}

/// Encode attributes as `Attributes.member.N.Key` / `Attributes.member.N.Value`
pub fn attribute_params(attributes: &Attributes) -> Vec<(String, String)> {
    attributes
        .iter()
        .enumerate()
        .flat_map(|(i, attr)| {
            let n = i + 1;
            [
                (format!("Attributes.member.{n}.Key"), attr.key.clone()),
                (format!("Attributes.member.{n}.Value"), attr.value.clone()),
            ]
        })
        .collect()
}

/// Map a non-2xx response to an error, using the `ErrorResponse` code when present
pub fn map_error_response(action: &str, status: StatusCode, body: &str) -> Elbv2Error {
    let Ok(parsed) = quick_xml::de::from_str::<ErrorResponse>(body) else {
        let message = format!(
            "{} failed: {} - {}",
            action,
            status,
            body.chars().take(500).collect::<String>()
        );
        return match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Elbv2Error::Authentication(message),
            StatusCode::NOT_FOUND => Elbv2Error::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Elbv2Error::Throttled(message),
            _ => Elbv2Error::Api(message),
        };
    };

    let code = parsed.error.code.as_str();
    let message = format!(
        "{} failed: {} {} - {} (request id: {})",
        action,
        status,
        code,
        parsed.error.message,
        parsed.request_id.as_deref().unwrap_or("unknown")
    );
    match code {
        "LoadBalancerNotFound" => Elbv2Error::NotFound(message),
        "Throttling" | "ThrottlingException" | "RequestLimitExceeded" => Elbv2Error::Throttled(message),
        "AuthFailure" | "AccessDenied" | "InvalidClientTokenId" | "SignatureDoesNotMatch"
        | "ExpiredToken" | "UnrecognizedClientException" => Elbv2Error::Authentication(message),
        "ValidationError" | "InvalidConfigurationRequest" => Elbv2Error::InvalidRequest(message),
        _ if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN => {
            Elbv2Error::Authentication(message)
        }
        _ => Elbv2Error::Api(message),
    }
}
