// API client module: contains a small blocking HTTP client that talks to
// the smart-home server. It is intentionally small and synchronous: the
// shell issues one request at a time and blocks on the answer.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::model::{Alert, Device, Room, Routine};

/// Simple API client that holds a reqwest blocking client and the base URL
/// of the smart-home server. One instance lives for the whole session; the
/// base URL is fixed at startup and never mutated.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Body of a successful response. The server is expected to answer JSON,
/// but a body that fails to parse is handed back as the raw text instead
/// of being treated as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Unwrap the parsed JSON value, erroring when the server answered
    /// something that was not JSON at all.
    fn into_value(self) -> Result<Value> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Text(text) => bail!("resposta nao-JSON do servidor: {text}"),
        }
    }
}

impl ApiClient {
    /// Create an ApiClient pointed at `http://{host}:{port}`.
    pub fn new(host: &str, port: u16) -> Result<Self> {
        Self::with_base_url(format!("http://{host}:{port}"))
    }

    /// Create an ApiClient from a full base URL. Also the seam the
    /// integration tests use to point the client at a local fixture.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("falha ao construir o cliente HTTP")?;
        Ok(ApiClient {
            client,
            base_url: base_url.into(),
        })
    }

    /// Base URL this client sends requests to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and collect the full response body.
    ///
    /// Always asks for JSON back; when a payload is present it is sent as
    /// JSON with an explicit length. A non-2xx status becomes an error
    /// carrying the status and whatever text the server sent. A 2xx body
    /// that fails to parse as JSON degrades to `ResponseBody::Text`.
    pub fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<ResponseBody> {
        let url = format!("{}{}", &self.base_url, endpoint);
        debug!(%method, endpoint, "sending request");

        let mut request = self
            .client
            .request(method, &url)
            .header(ACCEPT, "application/json");
        if let Some(value) = body {
            let payload = serde_json::to_vec(&value).context("falha ao serializar o corpo JSON")?;
            request = request
                .header(CONTENT_TYPE, "application/json")
                .header(CONTENT_LENGTH, payload.len())
                .body(payload);
        }

        let response = request
            .send()
            .with_context(|| format!("falha ao conectar ao servidor em {}", self.base_url))?;
        let status = response.status();
        let text = response
            .text()
            .context("falha ao ler a resposta do servidor")?;
        if !status.is_success() {
            bail!("erro HTTP {} - {}", status.as_u16(), text);
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(ResponseBody::Json(value)),
            Err(_) => Ok(ResponseBody::Text(text)),
        }
    }

    /// GET a collection endpoint and decode it as an array of `T`.
    fn fetch_list<T>(&self, endpoint: &str, what: &str) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let value = self.execute(Method::GET, endpoint, None)?.into_value()?;
        serde_json::from_value(value)
            .with_context(|| format!("resposta inesperada ao listar {what}"))
    }

    /// POST an endpoint that answers a single entity or JSON null for
    /// "not found".
    fn fetch_optional<T>(&self, endpoint: &str, body: Value, what: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let value = self
            .execute(Method::POST, endpoint, Some(body))?
            .into_value()?;
        if value.is_null() {
            return Ok(None);
        }
        let entity = serde_json::from_value(value)
            .with_context(|| format!("resposta inesperada de {what}"))?;
        Ok(Some(entity))
    }

    /// List every registered device.
    pub fn list_devices(&self) -> Result<Vec<Device>> {
        self.fetch_list("/api/dispositivos", "dispositivos")
    }

    /// Fetch one device by id. `None` when the server does not know it.
    pub fn get_device(&self, id: &str) -> Result<Option<Device>> {
        self.fetch_optional(
            "/api/dispositivos/obter",
            Value::String(id.to_string()),
            "dispositivo",
        )
    }

    /// Replace a device's state. The server expects a two-element payload
    /// of id plus the full device object.
    pub fn update_device(&self, id: &str, device: &Device) -> Result<Option<Device>> {
        let payload = serde_json::json!([id, device]);
        self.fetch_optional("/api/dispositivos/atualizar", payload, "dispositivo")
    }

    /// Run a command against a device; answers the device's new state.
    pub fn execute_action(&self, id: &str, command: &str) -> Result<Option<Device>> {
        let payload = serde_json::json!([id, command]);
        self.fetch_optional("/api/dispositivos/acao", payload, "dispositivo")
    }

    /// List every registered routine.
    pub fn list_routines(&self) -> Result<Vec<Routine>> {
        self.fetch_list("/api/rotinas", "rotinas")
    }

    /// Create a routine; answers the stored routine with its server id.
    pub fn create_routine(&self, routine: &Routine) -> Result<Option<Routine>> {
        let payload = serde_json::to_value(routine).context("falha ao serializar a rotina")?;
        self.fetch_optional("/api/rotinas/criar", payload, "rotina")
    }

    /// List every active alert.
    pub fn list_alerts(&self) -> Result<Vec<Alert>> {
        self.fetch_list("/api/alertas", "alertas")
    }

    /// Fetch one room by name. `None` when the server does not know it.
    pub fn get_room(&self, name: &str) -> Result<Option<Room>> {
        self.fetch_optional(
            "/api/comodos/obter",
            Value::String(name.to_string()),
            "comodo",
        )
    }
}
