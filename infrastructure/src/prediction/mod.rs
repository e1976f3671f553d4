//! Prediction backend adapter.
//!
//! [`HttpPredictionGateway`] implements the
//! [`PredictionGateway`](basilisk_application::PredictionGateway) port:
//! it creates predictions with a JSON `POST` and relays the resulting
//! server-sent event stream into a
//! [`StreamSubscription`](basilisk_application::StreamSubscription).

mod gateway;
mod protocol;

pub use gateway::HttpPredictionGateway;
