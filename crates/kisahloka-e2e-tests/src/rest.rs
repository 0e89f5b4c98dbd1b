use anyhow::{Result, anyhow};
use kisahloka_dal::Created;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::info;

/// Response body as sent by every API endpoint
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: String,
}

pub async fn read<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<(StatusCode, Envelope<T>)> {
    let status = response.status();
    let body = response.text().await?;
    info!("Response {status}: {body}");
    let envelope: Envelope<T> = serde_json::from_str(&body)?;
    Ok((status, envelope))
}

pub async fn get_data<T: DeserializeOwned>(
    client: &reqwest::Client,
    base_url: &Url,
    path: &str,
) -> Result<T> {
    let response = client.get(base_url.join(path)?).send().await?;
    let (status, envelope) = read::<T>(response).await?;
    if !status.is_success() {
        return Err(anyhow!("GET {path} failed with {status}: {}", envelope.error));
    }
    envelope
        .data
        .ok_or_else(|| anyhow!("GET {path} returned no data"))
}

pub async fn create(
    client: &reqwest::Client,
    base_url: &Url,
    path: &str,
    payload: &Value,
) -> Result<Created> {
    let response = client.post(base_url.join(path)?).json(payload).send().await?;
    let (status, envelope) = read::<Created>(response).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(envelope.error, "");
    envelope
        .data
        .ok_or_else(|| anyhow!("POST {path} returned no data"))
}

pub async fn create_named(
    client: &reqwest::Client,
    base_url: &Url,
    entity: &str,
    name: &str,
) -> Result<i64> {
    let mut payload = serde_json::Map::new();
    payload.insert(format!("{entity}_name"), json!(name));
    let payload = Value::Object(payload);
    let created = create(client, base_url, &format!("api/{entity}"), &payload).await?;
    Ok(created.id)
}

/// Type, origin and genres needed by a story, returns their ids
pub async fn create_catalog(
    client: &reqwest::Client,
    base_url: &Url,
) -> Result<(i64, i64, Vec<i64>)> {
    let type_id = create_named(client, base_url, "type", "Fable").await?;
    let origin_id = create_named(client, base_url, "origin", "Sumatera Barat").await?;
    let mut genre_ids = Vec::new();
    for genre in ["Legend", "Moral"] {
        genre_ids.push(create_named(client, base_url, "genre", genre).await?);
    }
    Ok((type_id, origin_id, genre_ids))
}

pub fn story_payload(type_id: i64, origin_id: i64, title: &str, genre_ids: &[i64]) -> Value {
    json!({
        "type_id": type_id,
        "origin_id": origin_id,
        "title": title,
        "released_date": "2022-11-10",
        "synopsis": format!("Synopsis of {title}"),
        "thumbnail_image": "cover.png",
        "genre_ids": genre_ids,
        "contents": [
            {"order": 1, "image": "1.png", "content_indo": "Dahulu kala", "content_eng": "Long ago"},
            {"order": 2, "image": "2.png", "content_indo": "Tamat", "content_eng": "The end"}
        ]
    })
}
