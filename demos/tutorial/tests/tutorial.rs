use routebind_rs::TestClient;
use serde_json::json;

fn client() -> TestClient {
    TestClient::new(tutorial::app().unwrap())
}

#[tokio::test]
async fn root_says_hello() {
    client()
        .get("/")
        .await
        .assert_status(200)
        .assert_json(&json!({ "message": "Hello World" }));
}

#[tokio::test]
async fn item_with_only_required_query() {
    client()
        .get("/items/42?needy=yes")
        .await
        .assert_status(200)
        .assert_json(&json!({
            "item_id": "42",
            "needy": "yes",
            "skip": 0,
            "limit": null
        }));
}

#[tokio::test]
async fn item_with_every_query_parameter() {
    client()
        .get("/items/foo?needy=a&skip=5&limit=10")
        .await
        .assert_status(200)
        .assert_json(&json!({
            "item_id": "foo",
            "needy": "a",
            "skip": 5,
            "limit": 10
        }));
}

#[tokio::test]
async fn item_without_needy_is_rejected() {
    let response = client().get("/items/42").await;
    response.assert_status(422);

    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["error"]["fields"][0]["field"], "needy");
    assert_eq!(body["error"]["fields"][0]["code"], "missing");
}

#[tokio::test]
async fn item_with_non_integer_skip_is_rejected() {
    client()
        .get("/items/42?needy=x&skip=abc")
        .await
        .assert_status(422)
        .assert_body_contains("\"field\":\"skip\"");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    client().get("/users/1").await.assert_status(404);
}
