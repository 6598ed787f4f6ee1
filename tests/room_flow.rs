mod common;

use axum::Router;
use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{degraded_app, get, json, post_json, test_app};

async fn create_room(app: &Router) -> (String, String) {
    let (status, body) = post_json(app, "/rooms", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let room = json(&body);
    (
        room["id"].as_str().unwrap_or_default().to_string(),
        room["code"].as_str().unwrap_or_default().to_string(),
    )
}

async fn join(app: &Router, code: &str, name: &str) -> String {
    let (status, body) = post_json(
        app,
        &format!("/rooms/code/{code}/players"),
        Some(&json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    json(&body)["player"]["id"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

/// Guess sheet for the nine built-in babies; `right` babies get the correct couple.
fn sheet(right: &[usize]) -> Value {
    let answers = [
        ("Daddy", "Halle Berry"),
        ("Daddy", "Mindy Kaling"),
        ("Daddy", "Priyanka Chopra"),
        ("Daddy", "Zendaya"),
        ("Mommy", "Benedict Cumberbatch"),
        ("Mommy", "Owen Wilson"),
        ("Mommy", "Rupert Grint"),
        ("Mommy", "Timothee Chalamet"),
        ("Mommy", "Daddy"),
    ];
    let guesses: Vec<Value> = answers
        .iter()
        .enumerate()
        .map(|(index, (mom, dad))| {
            if right.contains(&index) {
                json!({ "baby_index": index, "mom": mom, "dad": dad })
            } else {
                json!({ "baby_index": index, "mom": "Mommy", "dad": "Zendaya" })
            }
        })
        .collect();
    json!({ "guesses": guesses })
}

async fn post_ok(app: &Router, uri: &str) -> Value {
    let (status, body) = post_json(app, uri, None).await;
    assert_eq!(status, StatusCode::OK, "{uri}: {body}");
    json(&body)
}

#[tokio::test]
async fn full_game_from_lobby_to_leaderboard() {
    let app = test_app().await;
    let (room_id, code) = create_room(&app).await;

    let (status, body) = get(&app, &format!("/rooms/code/{}", code.to_lowercase())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["phase"], "LOBBY");

    let alice = join(&app, &code, "Alice").await;
    let bob = join(&app, &code, "Bob").await;

    post_ok(&app, &format!("/rooms/{room_id}/guessing")).await;

    let (status, _) = post_json(
        &app,
        &format!("/players/{alice}/guesses"),
        Some(&sheet(&[0, 1, 2])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, &format!("/rooms/{room_id}/players")).await;
    assert_eq!(json(&body)["waiting_on"], 1);

    let (status, _) = post_json(&app, &format!("/players/{bob}/guesses"), Some(&sheet(&[2]))).await;
    assert_eq!(status, StatusCode::OK);

    let reveal = post_ok(&app, &format!("/rooms/{room_id}/reveal")).await;
    assert_eq!(reveal["reveal_cursor"], 0);

    for baby in 0..9 {
        let scored = post_ok(&app, &format!("/rooms/{room_id}/babies/{baby}/score")).await;
        assert_eq!(scored["baby_index"], baby);

        let (status, body) = get(&app, &format!("/rooms/{room_id}/reveal")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["baby_index"], baby);

        if baby < 8 {
            post_ok(&app, &format!("/rooms/{room_id}/reveal/next")).await;
        }
    }

    let (status, _) = post_json(&app, &format!("/rooms/{room_id}/reveal/next"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let results = post_ok(&app, &format!("/rooms/{room_id}/results")).await;
    assert_eq!(results["phase"], "RESULTS");

    let (_, body) = get(&app, &format!("/rooms/{room_id}/leaderboard")).await;
    let board = json(&body);
    assert_eq!(board["entries"][0]["name"], "Alice");
    assert_eq!(board["entries"][0]["score"], 3);
    assert_eq!(board["entries"][1]["name"], "Bob");
    assert_eq!(board["entries"][1]["score"], 1);

    let recomputed = post_ok(&app, &format!("/rooms/{room_id}/scores/recompute")).await;
    assert_eq!(recomputed["scores"][0]["score"], 3);
    assert_eq!(recomputed["scores"][1]["score"], 1);
}

#[tokio::test]
async fn tally_groups_guesses_for_current_baby() {
    let app = test_app().await;
    let (room_id, code) = create_room(&app).await;
    for (name, right) in [("A", vec![0]), ("B", vec![0]), ("C", vec![])] {
        let player = join(&app, &code, name).await;
        let (status, _) =
            post_json(&app, &format!("/players/{player}/guesses"), Some(&sheet(&right))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = get(&app, &format!("/rooms/{room_id}/reveal")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    post_ok(&app, &format!("/rooms/{room_id}/guessing")).await;
    post_ok(&app, &format!("/rooms/{room_id}/reveal")).await;

    let (_, body) = get(&app, &format!("/rooms/{room_id}/reveal")).await;
    let tally = json(&body);
    assert_eq!(tally["total_guesses"], 3);
    assert_eq!(tally["groups"][0]["couple"], "Daddy & Halle Berry");
    assert_eq!(tally["groups"][0]["count"], 2);
    assert_eq!(tally["groups"][0]["correct"], true);
    assert_eq!(tally["groups"][0]["players"], json!(["A", "B"]));
    assert_eq!(tally["groups"][1]["count"], 1);
    assert_eq!(tally["answer"]["mom"], "Daddy");
}

#[tokio::test]
async fn second_submission_conflicts() {
    let app = test_app().await;
    let (_, code) = create_room(&app).await;
    let player = join(&app, &code, "Alice").await;

    let uri = format!("/players/{player}/guesses");
    let (status, _) = post_json(&app, &uri, Some(&sheet(&[]))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&app, &uri, Some(&sheet(&[0]))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json(&body)["message"]
        .as_str()
        .unwrap_or_default()
        .contains("already submitted"));
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let app = test_app().await;
    let (room_id, code) = create_room(&app).await;

    let (status, _) = get(&app, "/rooms/code/AB1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        &format!("/rooms/code/{code}/players"),
        Some(&json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let player = join(&app, &code, "Alice").await;
    let short = json!({ "guesses": [{ "baby_index": 0, "mom": "Daddy", "dad": "Zendaya" }] });
    let (status, _) = post_json(&app, &format!("/players/{player}/guesses"), Some(&short)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&app, &format!("/rooms/{room_id}/results"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post_json(&app, &format!("/rooms/{room_id}/babies/8/score"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = get(&app, "/rooms/00000000-0000-0000-0000-000000000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_room_roster_is_empty() {
    let app = test_app().await;
    let (room_id, _) = create_room(&app).await;

    let (status, body) = get(&app, &format!("/rooms/{room_id}/players")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["players"], json!([]));
}

#[tokio::test]
async fn catalog_withholds_answers() {
    let app = test_app().await;
    let (status, body) = get(&app, "/catalog").await;
    assert_eq!(status, StatusCode::OK);

    let catalog = json(&body);
    assert_eq!(catalog["babies"].as_array().map(Vec::len), Some(9));
    assert_eq!(catalog["parents"], json!(["Mommy", "Daddy"]));
    assert!(catalog["babies"][0].get("answer").is_none());
}

#[tokio::test]
async fn degraded_mode_reports_unavailable() {
    let app = degraded_app();

    let (status, body) = get(&app, "/healthcheck").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "degraded");

    let (status, _) = post_json(&app, "/rooms", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn healthcheck_is_ok_with_store() {
    let app = test_app().await;
    let (status, body) = get(&app, "/healthcheck").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "ok");
}
