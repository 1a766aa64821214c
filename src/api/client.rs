//! Purpose: Blocking HTTP client for the osu! API v2 that binds responses into instances.
//! Exports: `ClientConfig`, `Client`, `DEFAULT_BASE_URL`, `DEFAULT_TIMEOUT`.
//! Role: The owning client behind instance relations; implements `Fetch` synchronously.
//! Invariants: Every request carries `x-api-version`; the same version drives selectors.
//! Invariants: Instances bound here hold a weak handle to the client, never a strong one.
//! Invariants: Mode is fixed per client; changing it means building a new client.
#![allow(clippy::result_large_err)]

use crate::core::bind::{BindContext, bind};
use crate::core::context::{ApiContext, Mode};
use crate::core::error::{Error, ErrorKind};
use crate::core::instance::{ClientHandle, Instance};
use crate::core::relation::{EntityKind, Fetch, FetchRequest};
use crate::json;
use crate::models::registry;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

type ApiResult<T> = Result<T, Error>;

pub const DEFAULT_BASE_URL: &str = "https://osu.ppy.sh/api/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_BASE_URL: &str = "OSSBIND_BASE_URL";
pub const ENV_TOKEN: &str = "OSSBIND_TOKEN";
pub const ENV_API_VERSION: &str = "OSSBIND_API_VERSION";
pub const ENV_STRICT: &str = "OSSBIND_STRICT";

#[derive(Clone)]
pub struct ClientConfig {
    base_url: Url,
    token: Option<String>,
    api_version: u32,
    mode: Mode,
    timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .field("mode", &self.mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(&format!("{DEFAULT_BASE_URL}/"))
                .unwrap_or_else(|_| unreachable!("default base url is valid")),
            token: None,
            api_version: ApiContext::DEFAULT_VERSION,
            mode: Mode::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `OSSBIND_*` variables on top of the defaults.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|value| !value.is_empty()) {
            config = config.with_base_url(&base_url)?;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|value| !value.is_empty()) {
            config = config.with_token(token);
        }
        if let Some(version) = lookup(ENV_API_VERSION).filter(|value| !value.is_empty()) {
            config = config.with_api_version(parse_api_version(&version)?);
        }
        if let Some(strict) = lookup(ENV_STRICT) {
            config = config.with_mode(Mode::from_strict_flag(parse_flag(ENV_STRICT, &strict)?));
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> ApiResult<Self> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

pub(crate) fn parse_api_version(value: &str) -> ApiResult<u32> {
    value.trim().parse::<u32>().map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid api version {value:?}"))
            .with_hint("api versions are dates written as YYYYMMDD, e.g. 20220705")
            .with_source(err)
    })
}

fn parse_flag(name: &str, value: &str) -> ApiResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::new(ErrorKind::Usage)
            .with_message(format!("invalid boolean {value:?} in {name}"))
            .with_hint("use 1/0, true/false, yes/no or on/off")),
    }
}

fn normalize_base_url(input: &str) -> ApiResult<Url> {
    let mut url = Url::parse(input.trim()).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid base url {input:?}"))
            .with_source(err)
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!("base url must be http or https, got {}", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Blocking osu! API client. Construct with [`Client::new`], which hands back the `Arc`
/// that bound instances keep a weak handle to.
pub struct Client {
    config: ClientConfig,
    agent: ureq::Agent,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    authentication: Option<String>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Arc<Self> {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(concat!("ossbind/", env!("CARGO_PKG_VERSION")))
            .build();
        Arc::new(Self { config, agent })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Binding context whose instances hold a handle back to this client.
    pub fn bind_context(self: &Arc<Self>) -> BindContext<'static> {
        BindContext::new(registry())
            .with_mode(self.config.mode)
            .with_api_version(self.config.api_version)
            .with_client(ClientHandle::attach(self))
    }

    pub fn bind(self: &Arc<Self>, payload: &Value, model: &str) -> ApiResult<Instance> {
        bind(payload, model, &self.bind_context())
    }

    pub fn user(self: &Arc<Self>, id: i64) -> ApiResult<Instance> {
        self.fetch_entity(FetchRequest {
            entity: EntityKind::User,
            id,
        })
    }

    pub fn beatmap(self: &Arc<Self>, id: i64) -> ApiResult<Instance> {
        self.fetch_entity(FetchRequest {
            entity: EntityKind::Beatmap,
            id,
        })
    }

    pub fn beatmapset(self: &Arc<Self>, id: i64) -> ApiResult<Instance> {
        self.fetch_entity(FetchRequest {
            entity: EntityKind::Beatmapset,
            id,
        })
    }

    pub fn score(self: &Arc<Self>, id: i64) -> ApiResult<Instance> {
        let payload = self.get_json(&format!("scores/{id}"))?;
        self.bind(&payload, "Score")
    }

    pub fn fetch_entity(self: &Arc<Self>, request: FetchRequest) -> ApiResult<Instance> {
        let payload = self.get_json(&entity_path(request))?;
        self.bind(&payload, request.entity.model())
    }

    /// GETs a path relative to the base url and decodes the JSON body.
    pub fn get_json(&self, path: &str) -> ApiResult<Value> {
        let url = self.config.base_url.join(path).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid request path {path:?}"))
                .with_source(err)
        })?;
        tracing::debug!(url = url.as_str(), "GET");
        let response = self.request("GET", &url).call();
        match response {
            Ok(resp) => read_json_response(resp, path),
            Err(ureq::Error::Status(code, resp)) => Err(parse_error_response(code, resp, path)),
            Err(ureq::Error::Transport(err)) => Err(Error::new(ErrorKind::Transport)
                .with_message("request failed")
                .with_value(path)
                .with_source(err)),
        }
    }

    fn request(&self, method: &str, url: &Url) -> ureq::Request {
        let mut request = self
            .agent
            .request(method, url.as_str())
            .set("Accept", "application/json")
            .set("x-api-version", &self.config.api_version.to_string());
        if let Some(token) = &self.config.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        request
    }
}

impl Fetch for Client {
    type Output = ApiResult<Instance>;

    fn fetch(self: Arc<Self>, request: FetchRequest) -> Self::Output {
        self.fetch_entity(request)
    }
}

pub(crate) fn entity_path(request: FetchRequest) -> String {
    let collection = match request.entity {
        EntityKind::User => "users",
        EntityKind::Beatmap => "beatmaps",
        EntityKind::Beatmapset => "beatmapsets",
    };
    format!("{collection}/{}", request.id)
}

fn read_json_response(response: ureq::Response, path: &str) -> ApiResult<Value> {
    let body = response.into_string().map_err(|err| {
        Error::new(ErrorKind::Transport)
            .with_message("failed to read response body")
            .with_value(path)
            .with_source(err)
    })?;
    json::decode(&body, &format!("GET {path}"))
}

fn parse_error_response(status: u16, response: ureq::Response, path: &str) -> Error {
    let body = response.into_string().unwrap_or_default();
    let detail = json::parse::from_str::<ErrorEnvelope>(&body)
        .ok()
        .and_then(|envelope| envelope.error.or(envelope.authentication));
    let message = match detail {
        Some(detail) => format!("osu! API returned status {status}: {detail}"),
        None => format!("osu! API returned status {status}"),
    };
    let err = Error::new(error_kind_from_status(status))
        .with_message(message)
        .with_value(path);
    match status {
        401 => err.with_hint(format!("set {ENV_TOKEN} to a valid OAuth bearer token")),
        404 => err.with_hint("check the id; deleted and restricted entities return 404"),
        429 => err.with_hint("rate limited; retry later"),
        _ => err,
    }
}

fn error_kind_from_status(status: u16) -> ErrorKind {
    match status {
        400 | 422 => ErrorKind::Usage,
        _ => ErrorKind::Transport,
    }
}
