use std::time::Duration;

use snapfeed::{get_random_free_port, make_router, run_app};

// One end-to-end pass over the HTTP surface: liveness probe, signup,
// login and an authorized read. Kept as a single test because the server
// configuration comes from process-wide environment variables.
#[tokio::test]
async fn health_check_and_account_flow() {
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}", dir.path().join("api.db").display());
    std::env::set_var("DATABASE_URL", &db_url);
    std::env::set_var("JWT_SECRET", "integration-test-secret");

    let (_, addr) = get_random_free_port();
    tokio::spawn(async move {
        if let Err(error) = run_app(make_router(), addr).await {
            eprintln!("server exited: {}", error);
        }
    });

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let mut attempts = 0;
    let health = loop {
        match client.get(format!("{}/check_health", base)).send().await {
            Ok(response) => break response,
            Err(error) => {
                attempts += 1;
                if attempts > 50 {
                    panic!("server never came up: {}", error);
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    };
    assert!(health.status().is_success());
    let body: serde_json::Value = health.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    // Sign up.
    let response = client
        .post(format!("{}/users", base))
        .json(&serde_json::json!({
            "user": {
                "username": "mina",
                "password": "correct horse",
                "display_name": "Mina"
            }
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["username"], "mina");
    assert!(body["user"]["token"].as_str().is_some());

    // A second signup with the same username conflicts.
    let response = client
        .post(format!("{}/users", base))
        .json(&serde_json::json!({
            "user": {
                "username": "mina",
                "password": "another",
                "display_name": "Impostor"
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);

    // Wrong password is rejected without saying which half was wrong.
    let response = client
        .post(format!("{}/users/login", base))
        .json(&serde_json::json!({
            "user": { "username": "mina", "password": "wrong horse" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // The right one works and the token opens /user.
    let response = client
        .post(format!("{}/users/login", base))
        .json(&serde_json::json!({
            "user": { "username": "mina", "password": "correct horse" }
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    let token = body["user"]["token"].as_str().unwrap().to_owned();

    let response = client
        .get(format!("{}/user", base))
        .header("Authorization", format!("Token {}", token))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["display_name"], "Mina");

    // Without a token the same route is unauthorized.
    let response = client.get(format!("{}/user", base)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // The feed is publicly readable and currently empty.
    let response = client.get(format!("{}/posts", base)).send().await.unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["posts_count"], 0);
}
