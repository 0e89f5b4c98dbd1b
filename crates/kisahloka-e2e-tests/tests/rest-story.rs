use kisahloka_e2e_tests::{
    prepare_env,
    rest::{create, create_catalog, get_data, read, story_payload},
};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_story_endpoints() {
    let (client, base_url, _guard) = prepare_env("rest-story").await.unwrap();
    let (type_id, origin_id, genre_ids) = create_catalog(&client, &base_url).await.unwrap();

    let malin = create(
        &client,
        &base_url,
        "api/story",
        &story_payload(type_id, origin_id, "Malin Kundang", &genre_ids),
    )
    .await
    .unwrap();
    let no_genre = create(
        &client,
        &base_url,
        "api/story",
        &story_payload(type_id, origin_id, "Siti Nurbaya", &[]),
    )
    .await
    .unwrap();

    let story: Value = get_data(&client, &base_url, &format!("api/story/{}", malin.id))
        .await
        .unwrap();
    assert_eq!(story["title"], "Malin Kundang");
    assert_eq!(story["total_content"], 2);
    assert_eq!(story["released_date"], "2022-11-10");
    assert_eq!(story["genre_name"], json!(["Legend", "Moral"]));
    assert_eq!(story["is_bookmarked"], 0);
    assert_eq!(story["bookmark_id"], 0);
    assert!(story["created_at"].as_str().unwrap().ends_with("+08:00"));

    let plain: Value = get_data(&client, &base_url, &format!("api/story/{}", no_genre.id))
        .await
        .unwrap();
    assert_eq!(plain["genre_id"], json!([]));
    assert_eq!(plain["genre_name"], json!([]));

    let contents: Value = get_data(
        &client,
        &base_url,
        &format!("api/story/{}/contents", malin.id),
    )
    .await
    .unwrap();
    assert_eq!(contents["story_content"][0]["content_eng"], "Long ago");
    assert_eq!(contents["story_content"][1]["order"], 2);

    let list: Value = get_data(&client, &base_url, "api/story?keyword=Malin")
        .await
        .unwrap();
    assert_eq!(list["meta"]["total_items"], 1);
    assert_eq!(
        list["rows"][0]["story_content"].as_array().map(|c| c.len()),
        Some(2)
    );

    let previews: Value = get_data(
        &client,
        &base_url,
        &format!("api/story/preview?type_id={type_id}"),
    )
    .await
    .unwrap();
    assert_eq!(previews["meta"]["total_items"], 2);

    let random: Vec<Value> = get_data(
        &client,
        &base_url,
        &format!("api/story/recommendation/random/{}?limit=3", malin.id),
    )
    .await
    .unwrap();
    assert_eq!(random.len(), 1);
    assert_eq!(random[0]["story_id"], no_genre.id);

    let response = client
        .put(base_url.join(&format!("api/story/{}", malin.id)).unwrap())
        .json(&json!({"is_highlighted": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let home: Value = get_data(&client, &base_url, "api/home").await.unwrap();
    assert_eq!(home["highlight_stories"][0]["title"], "Malin Kundang");
    assert_eq!(home["favorite_stories"], json!([]));
    assert_eq!(home["story_types"][0]["type_name"], "Fable");

    let response = client
        .get(base_url.join("api/story/9999/contents").unwrap())
        .send()
        .await
        .unwrap();
    let (status, _) = read::<Value>(response).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = client
        .delete(base_url.join(&format!("api/story/{}", malin.id)).unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[traced_test]
async fn test_story_validation() {
    let (client, base_url, _guard) = prepare_env("rest-story-validation").await.unwrap();
    let (type_id, origin_id, _) = create_catalog(&client, &base_url).await.unwrap();

    let response = client
        .post(base_url.join("api/story").unwrap())
        .json(&story_payload(type_id, origin_id, "", &[]))
        .send()
        .await
        .unwrap();
    let (status, envelope) = read::<Value>(response).await.unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(envelope.data.is_none());
    assert!(envelope.error.contains("title"));

    let response = client
        .get(base_url.join("api/story/not-a-number").unwrap())
        .send()
        .await
        .unwrap();
    let (status, envelope) = read::<Value>(response).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(envelope.data.is_none());
    assert!(!envelope.error.is_empty());
}
