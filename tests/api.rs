//! Integration tests for the HTTP transport and the domain operations,
//! exercised against a canned single-connection HTTP server on loopback.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;

use reqwest::Method;
use serde_json::{json, Value};
use smarthome_cli::api::{ApiClient, ResponseBody};
use smarthome_cli::model::Device;

const DEVICE_JSON: &str =
    r#"{"id":"d1","nome":"Lamp","tipo":"light","online":true,"comodo":"Kitchen"}"#;

/// Serve exactly one HTTP request with the canned status line and body,
/// handing the raw request text back through the channel.
fn serve_once(status: &str, body: &str) -> (ApiClient, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    let status = status.to_string();
    let body = body.to_string();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len(),
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        let _ = tx.send(request);
    });
    let client = ApiClient::with_base_url(format!("http://{addr}")).unwrap();
    (client, rx)
}

/// Read the request head plus any Content-Length body.
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before request head");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before request body");
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn header_present(request: &str, name: &str, value: &str) -> bool {
    request.lines().any(|line| {
        line.split_once(':')
            .map(|(n, v)| n.eq_ignore_ascii_case(name) && v.trim().eq_ignore_ascii_case(value))
            .unwrap_or(false)
    })
}

fn request_json_body(request: &str) -> Value {
    let (_, body) = request.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

#[test]
fn list_devices_decodes_array_and_asks_for_json() {
    let (client, rx) = serve_once("200 OK", &format!("[{DEVICE_JSON}]"));
    let devices = client.list_devices().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id.as_deref(), Some("d1"));
    assert_eq!(devices[0].name.as_deref(), Some("Lamp"));
    assert_eq!(devices[0].online, Some(true));

    let request = rx.recv().unwrap();
    assert!(request.starts_with("GET /api/dispositivos HTTP/1.1\r\n"));
    assert!(header_present(&request, "accept", "application/json"));
}

#[test]
fn get_device_sends_json_string_body() {
    let (client, rx) = serve_once("200 OK", DEVICE_JSON);
    let device = client.get_device("d1").unwrap().unwrap();
    assert_eq!(device.room.as_deref(), Some("Kitchen"));

    let request = rx.recv().unwrap();
    assert!(request.starts_with("POST /api/dispositivos/obter HTTP/1.1\r\n"));
    assert!(header_present(&request, "content-type", "application/json"));
    assert!(header_present(&request, "content-length", "4"));
    assert_eq!(request_json_body(&request), json!("d1"));
}

#[test]
fn get_device_null_means_not_found() {
    let (client, _rx) = serve_once("200 OK", "null");
    assert_eq!(client.get_device("missing").unwrap(), None);
}

#[test]
fn update_device_sends_id_and_device_pair() {
    let (client, rx) = serve_once("200 OK", "null");
    let device = Device {
        id: Some("d1".into()),
        name: Some("Lamp".into()),
        ..Device::default()
    };
    assert_eq!(client.update_device("d1", &device).unwrap(), None);

    let request = rx.recv().unwrap();
    assert!(request.starts_with("POST /api/dispositivos/atualizar HTTP/1.1\r\n"));
    assert_eq!(
        request_json_body(&request),
        json!(["d1", {"id": "d1", "nome": "Lamp"}])
    );
}

#[test]
fn execute_action_sends_id_and_command_pair() {
    let (client, rx) = serve_once("200 OK", DEVICE_JSON);
    let device = client.execute_action("d1", "ligar").unwrap().unwrap();
    assert_eq!(device.name.as_deref(), Some("Lamp"));

    let request = rx.recv().unwrap();
    assert!(request.starts_with("POST /api/dispositivos/acao HTTP/1.1\r\n"));
    assert_eq!(request_json_body(&request), json!(["d1", "ligar"]));
}

#[test]
fn create_routine_sends_wire_keys_and_decodes_created() {
    use smarthome_cli::model::{Action, Routine};

    let (client, rx) = serve_once(
        "200 OK",
        r#"{"id":"r9","nome":"Boa noite","acoes":[{"dispositivoId":"d1","comando":"desligar"}]}"#,
    );
    let routine = Routine {
        id: None,
        name: Some("Boa noite".into()),
        actions: vec![Action {
            device_id: "d1".into(),
            command: "desligar".into(),
            parameters: serde_json::Map::new(),
        }],
        start_time: None,
    };
    let created = client.create_routine(&routine).unwrap().unwrap();
    assert_eq!(created.id.as_deref(), Some("r9"));

    let request = rx.recv().unwrap();
    assert!(request.starts_with("POST /api/rotinas/criar HTTP/1.1\r\n"));
    assert_eq!(
        request_json_body(&request),
        json!({
            "nome": "Boa noite",
            "acoes": [{"dispositivoId": "d1", "comando": "desligar", "parametros": {}}]
        })
    );
}

#[test]
fn list_alerts_and_get_room_round_trip() {
    let (client, _rx) = serve_once(
        "200 OK",
        r#"[{"titulo":"Fumaca","mensagem":"Sensor disparou","comodo":"Cozinha"}]"#,
    );
    let alerts = client.list_alerts().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title.as_deref(), Some("Fumaca"));

    let (client, rx) = serve_once(
        "200 OK",
        &format!(r#"{{"nome":"Kitchen","dispositivos":[{DEVICE_JSON}]}}"#),
    );
    let room = client.get_room("Kitchen").unwrap().unwrap();
    assert_eq!(room.name.as_deref(), Some("Kitchen"));
    assert_eq!(room.devices.len(), 1);

    let request = rx.recv().unwrap();
    assert!(request.starts_with("POST /api/comodos/obter HTTP/1.1\r\n"));
    assert_eq!(request_json_body(&request), json!("Kitchen"));
}

#[test]
fn malformed_json_body_degrades_to_raw_text() {
    let (client, _rx) = serve_once("200 OK", "surpresa: isto nao e JSON {");
    let body = client
        .execute(Method::GET, "/api/dispositivos", None)
        .unwrap();
    assert_eq!(
        body,
        ResponseBody::Text("surpresa: isto nao e JSON {".to_string())
    );
}

#[test]
fn http_error_status_surfaces_status_and_body() {
    let (client, _rx) = serve_once("500 Internal Server Error", "falha interna");
    let err = client.list_devices().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("500"), "unexpected error: {message}");
    assert!(message.contains("falha interna"), "unexpected error: {message}");
}

#[test]
fn connection_refused_surfaces_transport_error() {
    // Bind then drop to get a port with nothing listening on it.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::with_base_url(format!("http://{addr}")).unwrap();
    let err = client.list_devices().unwrap_err();
    assert!(
        err.to_string().contains("falha ao conectar"),
        "unexpected error: {err}"
    );
}
