use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::Serialize;
use tracing::{debug, instrument};

use eventdesk_core::{ApiError, Event, EventApi, EventDraft, EventId, ListPayload};

const JSON: &str = "application/json";

/// Connection settings for [`HttpEventApi`].
#[derive(Clone, Debug)]
pub struct HttpApiConfig {
    /// Collection URL, e.g. `http://localhost:8080/project/events`.
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl HttpApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// [`EventApi`] over a REST collection resource.
pub struct HttpEventApi {
    client: Client,
    base: Url,
    endpoint: String,
}

impl HttpEventApi {
    pub fn new(config: HttpApiConfig) -> Result<Self, ClientBuildError> {
        let raw = config.base_url.trim();
        let base = Url::parse(raw).map_err(|e| ClientBuildError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientBuildError::InvalidBaseUrl {
                url: raw.to_string(),
                reason: "expected an http(s) URL".into(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: base.as_str().trim_end_matches('/').to_string(),
            base,
        })
    }

    fn item_url(&self, id: &EventId) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    /// Send one request and return the body of a 2xx response.
    async fn send(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<Vec<u8>, ApiError> {
        let body_text = body.as_deref().map(String::from_utf8_lossy).unwrap_or_default();
        debug!(%method, %url, body = %body_text, "sending request");

        let mut req = self.client.request(method.clone(), url.clone()).header(ACCEPT, JSON);
        if let Some(body) = body {
            req = req.header(CONTENT_TYPE, JSON).body(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        debug!(%method, %url, status = status.as_u16(), "got response");

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            return Err(ApiError::from_status(status.as_u16(), body));
        }
        Ok(bytes.to_vec())
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ApiError> {
    Ok(serde_json::to_vec(value)?)
}

/// Mutation responses are informational; an undecodable one is not a failure.
fn decode_echo(bytes: &[u8]) -> Option<Event> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(event) => Some(event),
        Err(e) => {
            debug!(error = %e, "ignoring undecodable mutation response");
            None
        }
    }
}

#[async_trait]
impl EventApi for HttpEventApi {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn list(&self) -> Result<ListPayload, ApiError> {
        let bytes = self.send(Method::GET, self.base.clone(), None).await?;
        ListPayload::from_slice(&bytes)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get(&self, id: &EventId) -> Result<Event, ApiError> {
        let bytes = self.send(Method::GET, self.item_url(id), None).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    #[instrument(skip(self, draft))]
    async fn create(&self, draft: &EventDraft) -> Result<Option<Event>, ApiError> {
        let body = encode(draft)?;
        let bytes = self.send(Method::POST, self.base.clone(), Some(body)).await?;
        Ok(decode_echo(&bytes))
    }

    #[instrument(skip(self, event), fields(id = %id))]
    async fn update(&self, id: &EventId, event: &Event) -> Result<Option<Event>, ApiError> {
        let body = encode(event)?;
        let bytes = self.send(Method::PUT, self.item_url(id), Some(body)).await?;
        Ok(decode_echo(&bytes))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &EventId) -> Result<(), ApiError> {
        self.send(Method::DELETE, self.item_url(id), None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COLLECTION: &str = "/project/events";

    async fn api_for(server: &MockServer) -> HttpEventApi {
        HttpEventApi::new(HttpApiConfig::new(format!("{}{COLLECTION}", server.uri()))).unwrap()
    }

    // ── construction ──────────────────────────────────────────────────

    #[test]
    fn rejects_unparseable_base_url() {
        let err = HttpEventApi::new(HttpApiConfig::new("not a url")).err().unwrap();
        assert!(matches!(err, ClientBuildError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = HttpEventApi::new(HttpApiConfig::new("mailto:events@example.com")).err().unwrap();
        assert!(matches!(err, ClientBuildError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn endpoint_drops_trailing_slash() {
        let api = HttpEventApi::new(HttpApiConfig::new("http://localhost:8080/project/events/")).unwrap();
        assert_eq!(api.endpoint(), "http://localhost:8080/project/events");
    }

    #[test]
    fn item_url_appends_encoded_id() {
        let api = HttpEventApi::new(HttpApiConfig::new("http://localhost:8080/project/events")).unwrap();
        assert_eq!(
            api.item_url(&EventId::from(3)).as_str(),
            "http://localhost:8080/project/events/3"
        );
        assert_eq!(
            api.item_url(&EventId::from("a b")).as_str(),
            "http://localhost:8080/project/events/a%20b"
        );
    }

    #[test]
    fn item_url_with_trailing_slash_base() {
        let api = HttpEventApi::new(HttpApiConfig::new("http://localhost:8080/project/events/")).unwrap();
        assert_eq!(
            api.item_url(&EventId::from(9)).as_str(),
            "http://localhost:8080/project/events/9"
        );
    }

    // ── list ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn list_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(COLLECTION))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Alpha"},
                {"id": 2, "name": "Beta"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let payload = api_for(&server).await.list().await.unwrap();
        assert_eq!(
            payload,
            ListPayload::Bare(vec![Event::new(1, "Alpha"), Event::new(2, "Beta")])
        );
    }

    #[tokio::test]
    async fn list_embedded_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(COLLECTION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": {"events": [{"id": "a1", "name": "Alpha"}]}
            })))
            .mount(&server)
            .await;

        let payload = api_for(&server).await.list().await.unwrap();
        assert_eq!(payload, ListPayload::Embedded(vec![Event::new("a1", "Alpha")]));
    }

    #[tokio::test]
    async fn list_unrecognized_shape_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(COLLECTION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
            .mount(&server)
            .await;

        let payload = api_for(&server).await.list().await.unwrap();
        assert!(!payload.is_recognized());
    }

    #[tokio::test]
    async fn list_html_body_is_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(COLLECTION))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = api_for(&server).await.list().await.unwrap_err();
        assert_eq!(err.error_kind(), "format");
    }

    #[tokio::test]
    async fn list_server_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(COLLECTION))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&server)
            .await;

        let err = api_for(&server).await.list().await.unwrap_err();
        assert_eq!(err, ApiError::from_status(500, "database down".into()));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let server = MockServer::start().await;
        let api = api_for(&server).await;
        drop(server);

        let err = api.list().await.unwrap_err();
        assert_eq!(err.error_kind(), "transport");
    }

    // ── get ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn get_one_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/events/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "Gala"})))
            .mount(&server)
            .await;

        let event = api_for(&server).await.get(&EventId::from(7)).await.unwrap();
        assert_eq!(event, Event::new(7, "Gala"));
    }

    #[tokio::test]
    async fn get_missing_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/events/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Event not found"))
            .mount(&server)
            .await;

        let err = api_for(&server).await.get(&EventId::from(404)).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    // ── mutations ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn create_posts_name_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COLLECTION))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"name": "Meetup"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "name": "Meetup"})))
            .expect(1)
            .mount(&server)
            .await;

        let echo = api_for(&server)
            .await
            .create(&EventDraft::new("Meetup"))
            .await
            .unwrap();
        assert_eq!(echo, Some(Event::new(9, "Meetup")));
    }

    #[tokio::test]
    async fn create_ignores_undecodable_echo() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COLLECTION))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .mount(&server)
            .await;

        let echo = api_for(&server)
            .await
            .create(&EventDraft::new("Meetup"))
            .await
            .unwrap();
        assert!(echo.is_none());
    }

    #[tokio::test]
    async fn create_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COLLECTION))
            .respond_with(ResponseTemplate::new(500).set_body_string("Failed to create event"))
            .mount(&server)
            .await;

        let err = api_for(&server)
            .await
            .create(&EventDraft::new("Meetup"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn update_puts_full_event_including_extras() {
        let server = MockServer::start().await;
        let sent = json!({"id": 3, "name": "New", "venue": "Hall B"});
        Mock::given(method("PUT"))
            .and(path("/project/events/3"))
            .and(body_json(sent.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let event: Event = serde_json::from_value(sent).unwrap();
        let echo = api_for(&server)
            .await
            .update(&event.id, &event)
            .await
            .unwrap();
        assert_eq!(echo.as_ref().map(|e| e.name.as_str()), Some("New"));
    }

    #[tokio::test]
    async fn delete_by_id_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/project/events/0b4f5a38-4d0e-4b8e-9a55-1f2d3c4b5a69"))
            .respond_with(ResponseTemplate::new(200).set_body_string("whatever"))
            .expect(1)
            .mount(&server)
            .await;

        api_for(&server)
            .await
            .delete(&EventId::from("0b4f5a38-4d0e-4b8e-9a55-1f2d3c4b5a69"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_failure_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/project/events/1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Failed to delete event"))
            .mount(&server)
            .await;

        let err = api_for(&server).await.delete(&EventId::from(1)).await.unwrap_err();
        assert_eq!(err.error_kind(), "server");
    }
}
