//! Notion database store.
//!
//! Each record becomes a page in the configured database:
//!
//! | record field      | default property | Notion type    |
//! |-------------------|------------------|----------------|
//! | `name`            | `Empresa`        | `title`        |
//! | `identifier`      | `CNPJ`           | `rich_text`    |
//! | `phone_primary`   | `Telefone`       | `phone_number` |
//! | `phone_secondary` | `Telefone 2`     | `phone_number` |
//! | `email`           | `Email`          | `email`        |
//! | `status`          | `Status`         | `select`       |
//!
//! Absent optional fields are left out of the request instead of being cleared with `null`.

use reqwest::blocking::Client;
use serde_json::{Map, Value, json};

use crate::config::NotionConfig;
use crate::error::{ImportError, ImportResult, StoreError};
use crate::types::TargetRecord;

use super::RecordStore;

/// Database property names the record fields are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionProperties {
    pub name: String,
    pub identifier: String,
    pub phone_primary: String,
    pub phone_secondary: String,
    pub email: String,
    pub status: String,
}

impl Default for NotionProperties {
    fn default() -> Self {
        Self {
            name: "Empresa".to_string(),
            identifier: "CNPJ".to_string(),
            phone_primary: "Telefone".to_string(),
            phone_secondary: "Telefone 2".to_string(),
            email: "Email".to_string(),
            status: "Status".to_string(),
        }
    }
}

/// Build the `properties` object of a create-page request.
pub fn page_properties(record: &TargetRecord, props: &NotionProperties) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert(
        props.name.clone(),
        json!({ "title": [{ "text": { "content": record.name } }] }),
    );
    if let Some(identifier) = &record.identifier {
        out.insert(
            props.identifier.clone(),
            json!({ "rich_text": [{ "text": { "content": identifier } }] }),
        );
    }
    if let Some(phone) = &record.phone_primary {
        out.insert(props.phone_primary.clone(), json!({ "phone_number": phone }));
    }
    if let Some(phone) = &record.phone_secondary {
        out.insert(props.phone_secondary.clone(), json!({ "phone_number": phone }));
    }
    if let Some(email) = &record.email {
        out.insert(props.email.clone(), json!({ "email": email }));
    }
    out.insert(
        props.status.clone(),
        json!({ "select": { "name": record.status } }),
    );
    out
}

/// Extract a readable reason from a failed Notion API response.
///
/// Notion answers errors with `{"object":"error","code":...,"message":...}`; the message is
/// used when present, otherwise the status code and raw body.
pub fn api_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {body}")
            }
        })
}

/// [`RecordStore`] backed by the Notion REST API (blocking client).
pub struct NotionStore {
    client: Client,
    config: NotionConfig,
    properties: NotionProperties,
}

impl NotionStore {
    /// Create a store with the default property names.
    pub fn new(config: NotionConfig) -> ImportResult<Self> {
        let client = Client::builder().build().map_err(ImportError::Http)?;
        Ok(Self {
            client,
            config,
            properties: NotionProperties::default(),
        })
    }

    /// Override the database property names.
    pub fn with_properties(mut self, properties: NotionProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Full JSON body sent for `record`.
    pub fn page_payload(&self, record: &TargetRecord) -> Value {
        json!({
            "parent": { "database_id": self.config.database_id },
            "properties": page_properties(record, &self.properties),
        })
    }
}

impl RecordStore for NotionStore {
    fn create_record(&self, record: &TargetRecord) -> Result<(), StoreError> {
        let response = self
            .client
            .post(format!("{}/v1/pages", self.config.api_base))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.notion_version)
            .json(&self.page_payload(record))
            .send()
            .map_err(|e| StoreError::new(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(StoreError::new(api_error_message(status.as_u16(), &body)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    use serde_json::json;

    use super::{NotionProperties, NotionStore, api_error_message, page_properties};
    use crate::config::NotionConfig;
    use crate::store::RecordStore;
    use crate::types::TargetRecord;

    const VALIDATION_ERROR: &str = r#"{"object":"error","status":400,"code":"validation_error",
"message":"Email is not a valid email."}"#;

    /// Serve one scripted `(status, body)` answer per connection and hand back each raw request.
    fn spawn_server(answers: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for (status, body) in answers {
                let Ok((socket, _peer)) = listener.accept() else {
                    return;
                };
                let mut reader = BufReader::new(socket);

                let mut request = String::new();
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            content_length = value.trim().parse().unwrap_or(0);
                        }
                    }
                    request.push_str(&line);
                }
                let mut payload = vec![0u8; content_length];
                let _ = reader.read_exact(&mut payload);
                request.push_str("\r\n");
                request.push_str(&String::from_utf8_lossy(&payload));
                let _ = tx.send(request);

                let reason = if status < 300 { "OK" } else { "Bad Request" };
                let answer = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let mut socket = reader.into_inner();
                let _ = socket.write_all(answer.as_bytes());
                let _ = socket.flush();
            }
        });

        (format!("http://{addr}"), rx)
    }

    fn store_at(api_base: &str) -> NotionStore {
        let config = NotionConfig::from_lookup(|key| match key {
            "NOTION_TOKEN" => Some("secret".to_string()),
            "NOTION_DATABASE_ID" => Some("db-42".to_string()),
            "NOTION_API_BASE" => Some(api_base.to_string()),
            _ => None,
        })
        .unwrap();
        NotionStore::new(config).unwrap()
    }

    fn record() -> TargetRecord {
        TargetRecord {
            name: "ACME Ltda".to_string(),
            identifier: Some("123".to_string()),
            phone_primary: Some("11988887777".to_string()),
            phone_secondary: None,
            email: None,
            status: "Entrada".to_string(),
        }
    }

    #[test]
    fn properties_omit_absent_fields() {
        let props = page_properties(&record(), &NotionProperties::default());
        assert_eq!(
            serde_json::Value::Object(props),
            json!({
                "Empresa": { "title": [{ "text": { "content": "ACME Ltda" } }] },
                "CNPJ": { "rich_text": [{ "text": { "content": "123" } }] },
                "Telefone": { "phone_number": "11988887777" },
                "Status": { "select": { "name": "Entrada" } },
            })
        );
    }

    #[test]
    fn payload_targets_configured_database() {
        let config = NotionConfig::from_lookup(|key| match key {
            "NOTION_TOKEN" => Some("secret".to_string()),
            "NOTION_DATABASE_ID" => Some("db-42".to_string()),
            _ => None,
        })
        .unwrap();
        let store = NotionStore::new(config).unwrap();
        let payload = store.page_payload(&record());
        assert_eq!(payload["parent"]["database_id"], "db-42");
        assert!(payload["properties"].get("Email").is_none());
    }

    #[test]
    fn api_errors_prefer_notion_message() {
        assert_eq!(api_error_message(400, VALIDATION_ERROR), "Email is not a valid email.");
        assert_eq!(api_error_message(502, ""), "HTTP 502");
        assert_eq!(api_error_message(500, "upstream down"), "HTTP 500: upstream down");
    }

    #[test]
    fn create_record_posts_page_and_surfaces_notion_message() {
        let (base, requests) =
            spawn_server(vec![(201, r#"{"object":"page"}"#), (400, VALIDATION_ERROR)]);
        let store = store_at(&base);

        assert_eq!(store.create_record(&record()), Ok(()));
        let err = store.create_record(&record()).unwrap_err();
        assert_eq!(err.message, "Email is not a valid email.");

        let first = requests.recv().unwrap();
        let head = first.to_ascii_lowercase();
        assert!(head.starts_with("post /v1/pages http/1.1\r\n"), "{first}");
        assert!(head.contains("authorization: bearer secret\r\n"), "{first}");
        assert!(head.contains("notion-version: 2022-06-28\r\n"), "{first}");

        let (_, body) = first.split_once("\r\n\r\n").unwrap();
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["parent"]["database_id"], "db-42");
        assert_eq!(body["properties"]["Empresa"]["title"][0]["text"]["content"], "ACME Ltda");
        assert!(requests.recv().is_ok());
    }

    #[test]
    fn unreachable_api_becomes_store_error() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = store_at(&base).create_record(&record()).unwrap_err();
        assert!(!err.message.is_empty());
    }
}
