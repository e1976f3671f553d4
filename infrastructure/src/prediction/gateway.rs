//! HTTP implementation of the prediction gateway.

use super::protocol::{CreatedPrediction, classify_event, rejection_detail, resolve_stream_url};
use crate::config::FileApiConfig;
use async_trait::async_trait;
use basilisk_application::{
    GatewayError, PredictionGateway, PredictionHandle, PredictionRequest, StreamSink,
    StreamSubscription,
};
use basilisk_domain::StreamEvent;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, StatusCode, Url, header};
use reqwest_eventsource::{Event, EventSource, retry::Never};
use tracing::{debug, info, warn};

/// Buffered events between the SSE reader task and the session
const STREAM_CHANNEL_CAPACITY: usize = 64;

/// Prediction gateway speaking JSON over HTTP and reading answers as
/// server-sent events.
pub struct HttpPredictionGateway {
    client: Client,
    endpoint: Url,
    api_token: Option<String>,
}

impl HttpPredictionGateway {
    /// Create a gateway posting to `predictions_path` under `base_url`.
    pub fn new(base_url: &str, predictions_path: &str) -> Result<Self, GatewayError> {
        let base = Url::parse(base_url)
            .map_err(|e| GatewayError::ConnectionError(format!("bad base URL '{base_url}': {e}")))?;
        let endpoint = base.join(predictions_path).map_err(|e| {
            GatewayError::ConnectionError(format!("bad predictions path '{predictions_path}': {e}"))
        })?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            api_token: None,
        })
    }

    pub fn from_config(config: &FileApiConfig) -> Result<Self, GatewayError> {
        let (base_url, _) = config.parse_base_url();
        let gateway = Self::new(&base_url, &config.predictions_path)?;
        Ok(match config.token() {
            Some(token) => gateway.with_api_token(token),
            None => gateway,
        })
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl PredictionGateway for HttpPredictionGateway {
    async fn create_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionHandle, GatewayError> {
        debug!(
            "Creating prediction at {} (version {}, {} prompt chars)",
            self.endpoint,
            request.version,
            request.prompt.chars().count()
        );

        let response = self
            .authorize(self.client.post(self.endpoint.clone()))
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        if status != StatusCode::CREATED {
            let detail = rejection_detail(status, &body);
            warn!("Prediction rejected with status {}: {}", status, detail);
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let created: CreatedPrediction = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(format!("{e}: {body}")))?;
        let stream_url = resolve_stream_url(&self.endpoint, &created)?;

        info!(
            "Prediction {} created",
            created.id.as_deref().unwrap_or("<unnamed>")
        );
        Ok(PredictionHandle::new(created.id, stream_url))
    }

    async fn subscribe(
        &self,
        handle: &PredictionHandle,
    ) -> Result<StreamSubscription, GatewayError> {
        let builder = self
            .authorize(self.client.get(&handle.stream_url))
            .header(header::ACCEPT, "text/event-stream");

        let mut source =
            EventSource::new(builder).map_err(|e| GatewayError::StreamError(e.to_string()))?;
        // A dropped stream is reported, never silently re-opened
        source.set_retry_policy(Box::new(Never));

        let (sink, subscription) = StreamSubscription::channel(STREAM_CHANNEL_CAPACITY);
        debug!("Subscribed to {}", handle.stream_url);
        tokio::spawn(pump_events(source, sink));

        Ok(subscription)
    }
}

/// Forward server-sent events into the sink until a terminal event, the end
/// of the response body, a transport failure, or the subscriber going away.
async fn pump_events(mut source: EventSource, sink: StreamSink) {
    loop {
        let next = tokio::select! {
            _ = sink.cancelled() => {
                debug!("Subscription closed, dropping stream");
                break;
            }
            next = source.next() => next,
        };

        let event = match next {
            None => break,
            // `event: done` carries no data, and a data-less event is never
            // dispatched by the parser; the server closing the body after a
            // 200 response is how the prediction finishes.
            Some(Err(reqwest_eventsource::Error::StreamEnded)) => StreamEvent::Done,
            Some(Ok(Event::Open)) => continue,
            Some(Ok(Event::Message(message))) => {
                match classify_event(&message.event, &message.data) {
                    Some(event) => event,
                    None => {
                        debug!("Ignoring stream event '{}'", message.event);
                        continue;
                    }
                }
            }
            Some(Err(reqwest_eventsource::Error::InvalidStatusCode(status, response))) => {
                let body = response.text().await.unwrap_or_default();
                StreamEvent::Error(format!(
                    "Stream request failed with status {}: {}",
                    status,
                    rejection_detail(status, &body)
                ))
            }
            Some(Err(e)) => StreamEvent::Error(format!("Stream error: {e}")),
        };

        let terminal = event.is_terminal();
        if !sink.send(event).await || terminal {
            break;
        }
    }

    source.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use basilisk_domain::Settings;
    use mockito::Matcher;

    const SSE_BODY: &str = "event: output\ndata: Hel\n\n\
                            event: logs\ndata: warming up\n\n\
                            event: output\ndata: lo\n\n\
                            event: done\n\n";

    fn request() -> PredictionRequest {
        PredictionRequest::new(&Settings::default(), "[INST] hi [/INST]\nAssistant:")
    }

    async fn drain(mut subscription: StreamSubscription) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = subscription.recv().await {
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn test_create_prediction_returns_stream_handle() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/predictions")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "prompt": "[INST] hi [/INST]\nAssistant:",
                "topP": 0.9,
                "maxTokens": 800,
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "abc", "urls": {"stream": "/streams/abc"}}"#)
            .create_async()
            .await;

        let gateway = HttpPredictionGateway::new(&server.url(), "/api/predictions")
            .unwrap()
            .with_api_token("tok");
        let handle = gateway.create_prediction(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(handle.id.as_deref(), Some("abc"));
        assert_eq!(handle.stream_url, format!("{}/streams/abc", server.url()));
    }

    #[tokio::test]
    async fn test_non_201_is_rejected_with_backend_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/predictions")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "Invalid version or not permitted"}"#)
            .create_async()
            .await;

        let gateway = HttpPredictionGateway::new(&server.url(), "/api/predictions").unwrap();
        let err = gateway.create_prediction(&request()).await.unwrap_err();

        assert_eq!(
            err,
            GatewayError::Rejected {
                status: 422,
                detail: "Invalid version or not permitted".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_200_is_not_treated_as_created() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/predictions")
            .with_status(200)
            .with_body(r#"{"id": "abc", "urls": {"stream": "/streams/abc"}}"#)
            .create_async()
            .await;

        let gateway = HttpPredictionGateway::new(&server.url(), "/api/predictions").unwrap();
        let err = gateway.create_prediction(&request()).await.unwrap_err();

        assert!(matches!(err, GatewayError::Rejected { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_created_without_stream_url_is_invalid() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/predictions")
            .with_status(201)
            .with_body(r#"{"id": "abc"}"#)
            .create_async()
            .await;

        let gateway = HttpPredictionGateway::new(&server.url(), "/api/predictions").unwrap();
        let err = gateway.create_prediction(&request()).await.unwrap_err();

        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_error() {
        let gateway = HttpPredictionGateway::new("http://127.0.0.1:1", "/api/predictions").unwrap();
        let err = gateway.create_prediction(&request()).await.unwrap_err();

        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }

    #[tokio::test]
    async fn test_subscribe_forwards_output_until_done() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/streams/abc")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(SSE_BODY)
            .create_async()
            .await;

        let gateway = HttpPredictionGateway::new(&server.url(), "/api/predictions").unwrap();
        let handle = PredictionHandle::new(None, format!("{}/streams/abc", server.url()));
        let events = drain(gateway.subscribe(&handle).await.unwrap()).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::Output("Hel".to_string()),
                StreamEvent::Output("lo".to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_done_without_data_still_finishes_the_answer() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/streams/abc")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body("event: output\ndata: Hel\n\nevent: output\ndata: lo\n\nevent: done\n\n")
            .create_async()
            .await;

        let gateway = HttpPredictionGateway::new(&server.url(), "/api/predictions").unwrap();
        let handle = PredictionHandle::new(None, format!("{}/streams/abc", server.url()));
        let events = drain(gateway.subscribe(&handle).await.unwrap()).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::Output("Hel".to_string()),
                StreamEvent::Output("lo".to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_subscribe_forwards_error_event() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/streams/abc")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body("event: output\ndata: Par\n\nevent: error\ndata: model crashed\n\n")
            .create_async()
            .await;

        let gateway = HttpPredictionGateway::new(&server.url(), "/api/predictions").unwrap();
        let handle = PredictionHandle::new(None, format!("{}/streams/abc", server.url()));
        let events = drain(gateway.subscribe(&handle).await.unwrap()).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::Output("Par".to_string()),
                StreamEvent::Error("model crashed".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_stream_http_failure_becomes_error_event() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/streams/gone")
            .with_status(404)
            .with_body("no such prediction")
            .create_async()
            .await;

        let gateway = HttpPredictionGateway::new(&server.url(), "/api/predictions").unwrap();
        let handle = PredictionHandle::new(None, format!("{}/streams/gone", server.url()));
        let events = drain(gateway.subscribe(&handle).await.unwrap()).await;

        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::Error(reason) => {
                assert!(reason.contains("404"));
                assert!(reason.contains("no such prediction"));
            }
            other => panic!("expected error event, got {other:?}"),
        }
    }

    #[test]
    fn test_from_config_uses_base_url_and_path() {
        let config = FileApiConfig {
            base_url: "https://chat.example.com/".to_string(),
            predictions_path: "/v2/predictions".to_string(),
            api_token: Some("tok".to_string()),
        };
        let gateway = HttpPredictionGateway::from_config(&config).unwrap();

        assert_eq!(
            gateway.endpoint().as_str(),
            "https://chat.example.com/v2/predictions"
        );
        assert_eq!(gateway.api_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        assert!(HttpPredictionGateway::new("not a url", "/api/predictions").is_err());
    }
}
