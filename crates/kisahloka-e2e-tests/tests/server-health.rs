use kisahloka_e2e_tests::prepare_env;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_health() {
    let (client, base_url, _guard) = prepare_env("server-health").await.unwrap();

    let response = client
        .get(base_url.join("health").unwrap())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");

    let response = client.get(base_url.join("api").unwrap()).send().await.unwrap();
    assert!(response.status().is_success());
    assert!(response.text().await.unwrap().contains("Kisahloka"));
}
