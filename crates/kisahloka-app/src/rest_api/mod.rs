pub mod bookmark;
pub mod genre;
pub mod home;
mod macros;
pub mod origin;
mod paging;
pub mod role;
pub mod story;
pub mod story_type;
pub mod user;

use axum::{routing::get, Json, Router};
use http::StatusCode;
pub use paging::Paging;
use serde::Serialize;

use crate::state::AppState;

/// Body of every response, `data` is null on error and `error` empty on success
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: String,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Envelope {
            data: Some(data),
            error: String::new(),
        }
    }
}

impl Envelope<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Envelope {
            data: None,
            error: message.into(),
        }
    }
}

pub fn respond<T: Serialize>(status: StatusCode, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (status, Json(Envelope::data(data)))
}

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Hello, this is Kisahloka API" }))
        .nest("/type", story_type::router())
        .nest("/origin", origin::router())
        .nest("/genre", genre::router())
        .nest("/role", role::router())
        .nest("/user", user::router())
        .nest("/story", story::router())
        .nest("/bookmark", bookmark::router())
        .route("/home", get(home::get))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(Envelope::data(vec![1, 2])).unwrap();
        assert_eq!(ok, serde_json::json!({"data": [1, 2], "error": ""}));
        let err = serde_json::to_value(Envelope::<()>::error("Story not found")).unwrap();
        assert_eq!(err, serde_json::json!({"data": null, "error": "Story not found"}));
    }
}
