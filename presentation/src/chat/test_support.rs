//! Scripted prediction gateway for presentation tests.

use async_trait::async_trait;
use basilisk_application::{
    GatewayError, PredictionGateway, PredictionHandle, PredictionRequest, StreamSubscription,
};
use basilisk_domain::StreamEvent;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replays the same events for every prediction, or rejects every creation.
pub(crate) struct ScriptedGateway {
    events: Vec<StreamEvent>,
    reject: Option<GatewayError>,
    created: AtomicUsize,
}

impl ScriptedGateway {
    pub fn streaming(events: Vec<StreamEvent>) -> Arc<Self> {
        Arc::new(Self {
            events,
            reject: None,
            created: AtomicUsize::new(0),
        })
    }

    pub fn rejecting(error: GatewayError) -> Arc<Self> {
        Arc::new(Self {
            events: Vec::new(),
            reject: Some(error),
            created: AtomicUsize::new(0),
        })
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionGateway for ScriptedGateway {
    async fn create_prediction(
        &self,
        _request: &PredictionRequest,
    ) -> Result<PredictionHandle, GatewayError> {
        if let Some(error) = &self.reject {
            return Err(error.clone());
        }
        let n = self.created.fetch_add(1, Ordering::SeqCst);
        Ok(PredictionHandle::new(
            Some(format!("p{n}")),
            format!("mock://stream/{n}"),
        ))
    }

    async fn subscribe(
        &self,
        _handle: &PredictionHandle,
    ) -> Result<StreamSubscription, GatewayError> {
        let (sink, subscription) = StreamSubscription::channel(self.events.len().max(1));
        for event in &self.events {
            sink.send(event.clone()).await;
        }
        Ok(subscription)
    }
}
