// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive client.
//
// Module responsibilities:
// - `api`: Encapsulates HTTP interactions with the smart-home server
//   (devices, routines, alerts, rooms) over a single blocking client.
// - `model`: Serde records for the payloads the server exchanges, with
//   renames matching its wire keys.
// - `ui`: Implements the terminal menu flows and the render functions,
//   delegating requests to `api`.
//
// Keeping this separation makes it possible to test the API contract and
// the rendered output without a terminal attached.
pub mod api;
pub mod model;
pub mod ui;
