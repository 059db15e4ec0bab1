//! HTTP client utilities shared by every endpoint.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::warn;

use crate::client::ClientError;
use crate::options::ClientOptions;

/// Build a configured HTTP client from options.
///
/// # Example
/// ```ignore
/// let client = build_http_client(&options)?;
/// ```
pub fn build_http_client(options: &ClientOptions) -> Result<Client, ClientError> {
    let mut builder = Client::builder();

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &options.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| ClientError::Config(format!("invalid proxy {}: {}", proxy_url, e)))?;
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

/// Add extra headers to a request if specified in options.
///
/// # Example
/// ```ignore
/// let mut req = client.post(url);
/// req = add_extra_headers(req, &options.extra_headers);
/// ```
pub fn add_extra_headers(
    mut request: RequestBuilder,
    extra_headers: &Option<HashMap<String, String>>,
) -> RequestBuilder {
    if let Some(headers) = extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}

/// Turn a non-2xx response into [`ClientError::Status`].
pub fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!(status = status.as_u16(), url = %response.url(), "request failed");
        Err(ClientError::Status(status.as_u16()))
    }
}

/// Check the status and deserialize a JSON body.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = ensure_success(response)?.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
