use crate::{HttpConfig, HttpError, HttpErrorExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
const XML_CONTENT_TYPE: &str = "application/xml;charset=UTF-8";

/// Shares one connection pool between all calls; clones are cheap.
///
/// `max_connections` caps requests in flight across clones, `max_per_route` caps idle
/// connections kept per host.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    in_flight: Arc<Semaphore>,
}

impl HttpClient {
    /// # Errors
    /// [`HttpError::Request`] when the TLS backend cannot be initialised.
    pub fn new(config: &HttpConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.max_per_route)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .read_timeout(Duration::from_millis(config.socket_timeout_ms))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .context("Building HTTP client")?;
        let permits = config.max_connections.max(1);
        debug!(max_connections = permits, max_per_route = config.max_per_route, "http client ready");
        Ok(Self { client, in_flight: Arc::new(Semaphore::new(permits)) })
    }

    fn url(raw: &str) -> Result<Url, HttpError> {
        Url::parse(raw).map_err(|e| HttpError::InvalidUrl {
            message: e.to_string().into(),
            context: Some(raw.to_owned().into()),
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), HttpError> {
        let _permit = self.in_flight.acquire().await.map_err(|_| HttpError::from("client is closed"))?;
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.context("Reading response body")?;
        Ok((status, body))
    }

    /// GETs `url` with `params` query-encoded; the body is returned only for `200 OK`.
    ///
    /// # Errors
    /// [`HttpError::InvalidUrl`] for unparsable URLs, [`HttpError::Request`] for transport failures.
    #[instrument(skip(self, params), err)]
    pub async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<String, HttpError> {
        let request = self.client.get(Self::url(url)?).query(params);
        let (status, body) = self.send(request).await?;
        if status == StatusCode::OK {
            Ok(body)
        } else {
            warn!(%status, "GET returned a non-200 status");
            Ok(String::new())
        }
    }

    /// POSTs `params` as `application/x-www-form-urlencoded`; `None` values are left out.
    ///
    /// # Errors
    /// [`HttpError::InvalidUrl`] for unparsable URLs, [`HttpError::Request`] for transport failures.
    #[instrument(skip(self, params), err)]
    pub async fn post_form(&self, url: &str, params: &[(&str, Option<&str>)]) -> Result<String, HttpError> {
        let form: Vec<(&str, &str)> = params.iter().filter_map(|(k, v)| v.map(|v| (*k, v))).collect();
        let request = self.client.post(Self::url(url)?).form(&form);
        Ok(self.send(request).await?.1)
    }

    /// # Errors
    /// [`HttpError::InvalidUrl`] for unparsable URLs, [`HttpError::Request`] for transport failures.
    #[instrument(skip(self, json), err)]
    pub async fn post_json(&self, url: &str, json: &str) -> Result<String, HttpError> {
        self.post_body(url, json, JSON_CONTENT_TYPE).await
    }

    /// # Errors
    /// [`HttpError::InvalidUrl`] for unparsable URLs, [`HttpError::Request`] for transport failures.
    #[instrument(skip(self, xml), err)]
    pub async fn post_xml(&self, url: &str, xml: &str) -> Result<String, HttpError> {
        self.post_body(url, xml, XML_CONTENT_TYPE).await
    }

    async fn post_body(&self, url: &str, body: &str, content_type: &'static str) -> Result<String, HttpError> {
        let request =
            self.client.post(Self::url(url)?).header(CONTENT_TYPE, content_type).body(body.to_owned());
        Ok(self.send(request).await?.1)
    }
}
