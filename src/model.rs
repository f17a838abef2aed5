// Data model: serde records for the payloads exchanged with the smart-home
// server. Field renames mirror the server's wire keys exactly; the Rust
// side keeps idiomatic names.
//
// Every display field is optional because the server omits fields it does
// not know; the UI falls back to "N/A" for anything absent. `None` fields
// are skipped on serialization so request payloads only carry known data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A controllable smart-home unit as the server reports it.
///
/// `kind` is the server-side type tag (e.g. "light", "sensor"); the client
/// treats it as an opaque label.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "comodo", default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
}

/// One step of a routine: a command addressed to a device.
///
/// Built locally when creating a routine, so `device_id` and `command` are
/// plain strings; `parameters` stays a free-form JSON object because the
/// server defines per-command parameter shapes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Action {
    #[serde(rename = "dispositivoId", default)]
    pub device_id: String,
    #[serde(rename = "comando", default)]
    pub command: String,
    #[serde(rename = "parametros", default)]
    pub parameters: Map<String, Value>,
}

/// A named, ordered list of device actions triggerable as a unit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Routine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "acoes", default)]
    pub actions: Vec<Action>,
    /// Server-formatted start timestamp; echoed on display, never computed
    /// with and never sent on create.
    #[serde(rename = "horarioInicio", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

/// A server-originated notification tied to a room.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Alert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "titulo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "mensagem", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "comodo", default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A named grouping of devices.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Room {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "dispositivos", default)]
    pub devices: Vec<Device>,
}
