use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over an empty in-memory backend, bound to an
        // ephemeral port. Data is populated through the HTTP surface.
        let state = statsvc_api::app::state::empty_in_memory().expect("state");
        let app = statsvc_api::app::build_app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn quake(id: &str, magnitude: f64) -> Value {
    json!({
        "id": id,
        "magnitude": magnitude,
        "place": "Northern California",
        "magnitudeType": "md",
    })
}

fn player(name: &str, team: &str, height: i32) -> Value {
    json!({
        "name": name,
        "team": team,
        "position": "Catcher",
        "heightInches": height,
        "weightLbs": 200,
        "age": 27.5,
    })
}

async fn create_quake(client: &reqwest::Client, srv: &TestServer, body: Value) -> StatusCode {
    client
        .post(srv.url("/api/earthquakes"))
        .basic_auth("admin", Some("admin"))
        .json(&body)
        .send()
        .await
        .unwrap()
        .status()
}

async fn create_player(client: &reqwest::Client, srv: &TestServer, body: Value) -> StatusCode {
    client
        .post(srv.url("/api/players"))
        .basic_auth("admin", Some("admin"))
        .json(&body)
        .send()
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_credentials() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/earthquakes"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res
        .headers()
        .get("www-authenticate")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic")));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let srv = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .get(srv.url("/api/earthquakes"))
        .basic_auth("user", Some("nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_role_cannot_mutate() {
    let srv = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .post(srv.url("/api/earthquakes"))
        .basic_auth("user", Some("password"))
        .json(&quake("nc1", 5.5))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn earthquake_crud_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    assert_eq!(create_quake(&client, &srv, quake("nc1", 5.5)).await, StatusCode::CREATED);
    // Duplicate id conflicts, empty id is a bad request.
    assert_eq!(create_quake(&client, &srv, quake("nc1", 6.5)).await, StatusCode::CONFLICT);
    assert_eq!(create_quake(&client, &srv, quake("", 6.5)).await, StatusCode::BAD_REQUEST);

    // USER can read.
    let res = client
        .get(srv.url("/api/earthquakes/nc1"))
        .basic_auth("user", Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["magnitude"], 5.5);
    assert_eq!(body["magnitudeType"], "md");

    // PUT is a full overwrite under the path id.
    let res = client
        .put(srv.url("/api/earthquakes/nc1"))
        .basic_auth("admin", Some("admin"))
        .json(&json!({ "id": "ignored", "magnitude": 6.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], "nc1");
    assert_eq!(body["place"], Value::Null);

    // Delete once, then the record is gone.
    let res = client
        .delete(srv.url("/api/earthquakes/nc1"))
        .basic_auth("admin", Some("admin"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .delete(srv.url("/api/earthquakes/nc1"))
        .basic_auth("admin", Some("admin"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn average_magnitude_is_public_and_correct() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Empty store: the average is 0.0, not an error.
    let res = reqwest::get(srv.url("/api/earthquakes/stats/avg-magnitude"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<f64>().await.unwrap(), 0.0);

    create_quake(&client, &srv, quake("a", 5.5)).await;
    create_quake(&client, &srv, quake("b", 6.5)).await;

    let avg: f64 = reqwest::get(srv.url("/api/earthquakes/stats/avg-magnitude"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!((avg - 6.0).abs() < 1e-9);
}

#[tokio::test]
async fn player_statistics_and_top10() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_player(&client, &srv, player("Adam Donachie", "BAL", 74)).await;
    create_player(&client, &srv, player("Paul Bako", "BAL", 75)).await;
    create_player(&client, &srv, player("Ramon Hernandez", "NYY", 72)).await;

    let avg: f64 = reqwest::get(srv.url("/api/players/stats/average-height"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!((avg - 73.666_666).abs() < 1e-3);

    let res = client
        .get(srv.url("/api/players/top10/tallest"))
        .basic_auth("user", Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let tallest: Vec<Value> = res.json().await.unwrap();
    let heights: Vec<i64> = tallest
        .iter()
        .map(|p| p["heightInches"].as_i64().unwrap())
        .collect();
    assert_eq!(heights, vec![75, 74, 72]);

    // Derived fields appear on the wire.
    assert!(tallest[0]["heightMeters"].as_f64().unwrap() > 1.9);
    assert!(tallest[0]["bmi"].as_f64().is_some());

    let res = client
        .get(srv.url("/api/players/stats/team-composition/BAL"))
        .basic_auth("user", Some("password"))
        .send()
        .await
        .unwrap();
    let stats: Value = res.json().await.unwrap();
    assert_eq!(stats["totalPlayers"], 2);
    assert!((stats["averageHeight"].as_f64().unwrap() - 74.5).abs() < 1e-9);
}

#[tokio::test]
async fn player_filters_respect_roles() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_player(&client, &srv, player("Adam Donachie", "BAL", 74)).await;

    // Filter routes need authentication.
    let res = client
        .get(srv.url("/api/players/team/BAL"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/api/players/team/BAL"))
        .basic_auth("user", Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let players: Vec<Value> = res.json().await.unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["id"], "BAL_Adam_Donachie");

    let res = client
        .get(srv.url("/api/players/search?name=donachie"))
        .basic_auth("user", Some("password"))
        .send()
        .await
        .unwrap();
    let players: Vec<Value> = res.json().await.unwrap();
    assert_eq!(players.len(), 1);
}

#[tokio::test]
async fn csv_admin_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Template download is a csv attachment.
    let res = client
        .get(srv.url("/api/admin/csv/template"))
        .basic_auth("admin", Some("admin"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/csv"
    );
    let template = res.text().await.unwrap();
    assert!(template.starts_with("Name,Team,Position"));

    // The template passes validation; a reshuffled file does not.
    let form = || {
        reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(template.clone().into_bytes())
                .file_name("players.csv"),
        )
    };
    let res = client
        .post(srv.url("/api/admin/csv/validate"))
        .basic_auth("admin", Some("admin"))
        .multipart(form())
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["valid"], true);

    let bad_form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(b"name,club\nAdam,BAL\n".to_vec()).file_name("bad.csv"),
    );
    let res = client
        .post(srv.url("/api/admin/csv/validate"))
        .basic_auth("admin", Some("admin"))
        .multipart(bad_form)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["valid"], false);
    assert!(body["expectedHeaders"].is_array());

    // Upload imports every row; a second upload counts duplicates.
    let res = client
        .post(srv.url("/api/admin/csv/upload"))
        .basic_auth("admin", Some("admin"))
        .multipart(form())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let report: Value = res.json().await.unwrap();
    assert_eq!(report["total"], 3);
    assert_eq!(report["imported"], 3);
    assert_eq!(report["duplicates"], 0);

    let res = client
        .post(srv.url("/api/admin/csv/upload"))
        .basic_auth("admin", Some("admin"))
        .multipart(form())
        .send()
        .await
        .unwrap();
    let report: Value = res.json().await.unwrap();
    assert_eq!(report["imported"], 0);
    assert_eq!(report["duplicates"], 3);

    // Admin endpoints are off-limits to plain users.
    let res = client
        .get(srv.url("/api/admin/csv/info"))
        .basic_auth("user", Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(srv.url("/api/admin/csv/info"))
        .basic_auth("admin", Some("admin"))
        .send()
        .await
        .unwrap();
    let info: Value = res.json().await.unwrap();
    assert_eq!(info["backend"], "memory");

    // Clear wipes the player store and reports the count.
    let res = client
        .delete(srv.url("/api/admin/csv/clear"))
        .basic_auth("admin", Some("admin"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["deletedRecords"], 3);

    let res = client
        .get(srv.url("/api/players"))
        .basic_auth("user", Some("password"))
        .send()
        .await
        .unwrap();
    let players: Vec<Value> = res.json().await.unwrap();
    assert!(players.is_empty());
}
