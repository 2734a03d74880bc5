// Cloud Vision text detection client
// Author: kelexine (https://github.com/kelexine)

use super::models::ImageFormat;
use super::request::{create_body, ImageContext, DEFAULT_MAX_RESULTS};
use crate::config::VisionConfig;
use crate::error::{Result, VisionError};
use crate::source::{classify, is_file, ImageSource};
use crate::utils::logging::sanitize;
use crate::utils::strings::{decode_base64, is_binary, is_http_url};
use once_cell::sync::OnceCell;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL, CONTENT_TYPE, ORIGIN, PRAGMA,
    REFERER, USER_AGENT,
};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing::{debug, error, info};
use zeroize::Zeroize;

const NOT_A_BINARY: &str = "Argument image source is not a binary.";
const NOT_AN_IMAGE: &str = "Argument image source is not an image file.";

/// Google API key. Redacted in `Debug` output and wiped on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(VisionError::Config(
                "A Google API key is required".to_string(),
            ));
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Per-call options shared by every `read_*` entry point.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub max_results: u32,
    pub context: Option<ImageContext>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            context: None,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn context(mut self, context: ImageContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Client for the Cloud Vision `images:annotate` endpoint.
///
/// Accepts an image as a URL, a path on disk, raw bytes or base64 text and
/// returns the provider's JSON response untouched. The underlying HTTP client
/// is built on first use and shared by every later call on this instance.
pub struct VisionClient {
    api_key: ApiKey,
    config: VisionConfig,
    http_client: OnceCell<Client>,
}

impl fmt::Debug for VisionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionClient")
            .field("api_key", &self.api_key)
            .field("endpoint_url", &self.config.endpoint_url)
            .finish()
    }
}

impl VisionClient {
    /// Create a client with the default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, VisionConfig::default())
    }

    /// Create a client with an explicit configuration. `config.api_key` is ignored.
    pub fn with_config(api_key: impl Into<String>, config: VisionConfig) -> Result<Self> {
        Ok(Self {
            api_key: ApiKey::new(api_key)?,
            config,
            http_client: OnceCell::new(),
        })
    }

    /// Create a client from configuration, taking the key from `config.api_key`.
    pub fn from_config(config: &VisionConfig) -> Result<Self> {
        Self::with_config(config.api_key.clone(), config.clone())
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose()
    }

    pub fn endpoint_url(&self) -> &str {
        &self.config.endpoint_url
    }

    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.config.connect_timeout_seconds)
    }

    /// Full annotate URL including the API key.
    pub fn annotate_url(&self) -> String {
        format!(
            "{}?key={}&alt=json",
            self.config.endpoint_url,
            urlencoding::encode(self.api_key.expose())
        )
    }

    /// Headers sent with every request made by this client.
    pub fn base_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(
            HeaderName::from_static("language"),
            header_value(&self.config.language)?,
        );
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(
            HeaderName::from_static("upgrade-insecure-request"),
            HeaderValue::from_static("1"),
        );
        headers.insert(USER_AGENT, header_value(&self.config.user_agent)?);
        Ok(headers)
    }

    /// Headers specific to annotate requests.
    pub fn default_request_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, header_value(&self.config.referer)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-origin"),
            header_value(&self.config.explorer_origin)?,
        );
        headers.insert(ORIGIN, header_value(&self.config.origin)?);
        headers.insert(
            HeaderName::from_static("x-referer"),
            header_value(&self.config.explorer_referer)?,
        );
        Ok(headers)
    }

    /// Base headers with the annotate headers layered on top; on a clash the
    /// annotate header wins.
    pub fn annotate_headers(&self) -> Result<HeaderMap> {
        Ok(merge_headers(
            self.base_headers()?,
            self.default_request_headers()?,
        ))
    }

    /// The shared HTTP client, built on the first call and reused afterwards.
    pub fn http_client(&self) -> Result<&Client> {
        self.http_client.get_or_try_init(|| {
            let mut builder = Client::builder()
                .timeout(self.timeout())
                .connect_timeout(self.connect_timeout())
                .default_headers(self.base_headers()?)
                .danger_accept_invalid_certs(self.config.accept_invalid_certs)
                .cookie_store(self.config.cookie_store)
                .use_rustls_tls();

            if self.config.force_ipv4 {
                builder = builder.local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
            }

            let client = builder
                .build()
                .map_err(|e| VisionError::Config(format!("Failed to create HTTP client: {}", e)))?;

            debug!(
                "Created HTTP client (timeout {:?}, connect timeout {:?}, ipv4 {})",
                self.timeout(),
                self.connect_timeout(),
                self.config.force_ipv4
            );
            Ok(client)
        })
    }

    /// Run text detection on any supported image reference.
    ///
    /// The input is classified first (URL, file path, raw binary, base64) and
    /// handed to the matching reader.
    pub async fn read_image(&self, input: impl AsRef<[u8]>, options: &ReadOptions) -> Result<Value> {
        let source = classify(input);
        if let Ok(source) = &source {
            debug!("Classified image input as {}", source.kind());
        }

        match source {
            Ok(ImageSource::Url(url)) => self.read_from_url(&url, options).await,
            Ok(ImageSource::FilePath(path)) => self.read_from_file(&path, options).await,
            Ok(ImageSource::Base64(text)) => self.read_from_binary(text.as_bytes(), options).await,
            Ok(ImageSource::RawBinary(bytes)) => self.read_from_binary(&bytes, options).await,
            Err(e) => Err(VisionError::InvalidArgument {
                message: NOT_A_BINARY.to_string(),
                source: Some(Box::new(e)),
            }),
        }
    }

    /// Download an image and run text detection on it.
    ///
    /// Every failure past the URL check, whether from the download or from
    /// the annotate call, is returned as `InvalidArgument` with the original
    /// error as its source.
    pub async fn read_from_url(&self, url: &str, options: &ReadOptions) -> Result<Value> {
        if !is_http_url(url.as_bytes()) {
            return Err(VisionError::invalid_argument("Arguments is not an url."));
        }

        self.download_and_read(url, options)
            .await
            .map_err(VisionError::into_invalid_argument)
    }

    async fn download_and_read(&self, url: &str, options: &ReadOptions) -> Result<Value> {
        let client = self.http_client()?;
        let referer = referer_for(url);

        debug!("Downloading image from {} (referer {})", sanitize(url), referer);

        let response = client
            .get(url)
            .header(REFERER, referer)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;

        debug!("Downloaded {} bytes", bytes.len());
        self.read_from_binary(&bytes, options).await
    }

    /// Read an image file from disk and run text detection on it.
    pub async fn read_from_file(&self, path: &str, options: &ReadOptions) -> Result<Value> {
        if !is_file(path.as_bytes()) {
            return Err(VisionError::invalid_argument("Arguments is not a file."));
        }

        let is_regular_file = tokio::fs::metadata(path)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false);
        if !is_regular_file {
            return Err(VisionError::invalid_argument(format!(
                "{} is not exists or not a file.",
                path
            )));
        }

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| VisionError::InvalidArgument {
                message: format!("Can not read {}.", path),
                source: Some(Box::new(VisionError::Io(e))),
            })?;

        debug!("Read {} bytes from {}", data.len(), path);
        self.read_from_binary(&data, options).await
    }

    /// Run text detection on raw image bytes or base64 text.
    pub async fn read_from_binary(&self, data: &[u8], options: &ReadOptions) -> Result<Value> {
        let decoded;
        let image: &[u8] = if is_binary(data) {
            data
        } else {
            decoded = decode_base64(data)
                .ok_or_else(|| VisionError::invalid_argument(NOT_A_BINARY))?;
            &decoded
        };

        let info = ImageFormat::inspect(image)
            .ok_or_else(|| VisionError::invalid_argument(NOT_AN_IMAGE))?;

        let body = create_body(image, options.max_results, options.context.as_ref())?;
        let headers = self.annotate_headers()?;
        let url = self.annotate_url();
        let client = self.http_client()?;

        info!(
            "Requesting text detection for {} image ({}x{}, {} bytes, maxResults {})",
            info.format.mime_type(),
            info.width,
            info.height,
            image.len(),
            options.max_results
        );
        debug!("POST {}", sanitize(&url));

        let response = client.post(&url).headers(headers).body(body).send().await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Vision API error: HTTP {} - {}", status, response_text);
            return Err(VisionError::VisionApi {
                status: status.as_u16(),
                message: extract_error_message(&response_text).unwrap_or(response_text),
            });
        }

        let result: Value = serde_json::from_str(&response_text)?;
        debug!("Received text detection response");
        Ok(result)
    }
}

/// Layer `overrides` on top of `base`; a key present in both keeps the
/// `overrides` value.
fn merge_headers(mut base: HeaderMap, overrides: HeaderMap) -> HeaderMap {
    base.extend(overrides);
    base
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| VisionError::Config(format!("Invalid header value {:?}: {}", value, e)))
}

/// Referer for an image download: the URL without its query string and
/// without its final path segment.
pub fn referer_for(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    match without_query.rfind('/') {
        Some(pos) => without_query[..=pos].to_string(),
        None => String::new(),
    }
}

/// Extract error message from API response JSON
fn extract_error_message(response_text: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorResponse {
        error: Option<ErrorDetail>,
    }

    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
        status: Option<String>,
    }

    if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(response_text) {
        if let Some(error) = error_resp.error {
            return error.message.or(error.status);
        }
    }
    None
}
