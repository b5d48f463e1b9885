use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use scraper::{Html, Selector};
use serde_json::{Value, json};

use rusty_darts::configure;
use rusty_darts::model::LegSheet;
use rusty_darts::storage::{MatchStore, MemoryStore};

mod common;

fn body_html(bytes: &[u8]) -> Html {
    Html::parse_document(std::str::from_utf8(bytes).expect("response should be UTF-8"))
}

#[actix_web::test]
async fn test7_entry_hx_routes_are_relative() -> Result<(), Box<dyn std::error::Error>> {
    let sessions = common::sessions_over(MemoryStore::with_players(common::roster()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(sessions))
            .service(web::scope("/darts").configure(configure)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/darts/match/match_42")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(
        resp.status().is_success(),
        "Unexpected status from entry page: {}",
        resp.status()
    );
    let document = body_html(&test::read_body(resp).await);

    let selector = Selector::parse("[hx-post]").expect("valid selector");
    let mut hx_targets = Vec::new();
    for element in document.select(&selector) {
        if let Some(value) = element.value().attr("hx-post") {
            assert!(
                !value.starts_with('/'),
                "hx-post attribute should be relative but found '{value}'"
            );
            hx_targets.push(value.to_string());
        }
    }
    assert!(hx_targets.iter().any(|t| t == "match_42/adjust"));
    assert!(hx_targets.iter().any(|t| t == "match_42/field"));
    assert!(hx_targets.iter().any(|t| t == "match_42/submit"));

    // relative to /darts/match/ the targets land on real routes
    let req = test::TestRequest::post()
        .uri("/darts/match/match_42/adjust")
        .set_form([("leg", "0"), ("field", "miss"), ("step", "inc")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fragment = body_html(&test::read_body(resp).await);
    let value = Selector::parse(r#"tr[data-leg="1"] .tally-value[data-field="miss"]"#).expect("valid selector");
    let shown: Vec<String> = fragment
        .select(&value)
        .map(|e| e.text().collect::<String>())
        .collect();
    assert_eq!(shown, vec!["1".to_string()]);
    Ok(())
}

#[actix_web::test]
async fn test7_entry_table_layout() -> Result<(), Box<dyn std::error::Error>> {
    let sessions = common::sessions_over(MemoryStore::with_players(common::roster()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(sessions))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/match/m7").to_request();
    let document = body_html(&test::call_and_read_body(&app, req).await);

    let rows = Selector::parse("tbody tr.leg-row").expect("valid selector");
    assert_eq!(document.select(&rows).count(), 9);
    let doubles = Selector::parse("tbody tr.doubles").expect("valid selector");
    assert_eq!(document.select(&doubles).count(), 4);
    let selects = Selector::parse("select.player-select").expect("valid selector");
    assert_eq!(document.select(&selects).count(), 9);

    let options = Selector::parse("select.player-select option").expect("valid selector");
    let first_select: Vec<String> = document
        .select(&options)
        .take(5)
        .map(|e| e.text().collect::<String>())
        .collect();
    assert_eq!(
        first_select,
        vec![
            "--Select Player--",
            "Alice Archer",
            "Bob Bullseye",
            "Carol Checkout",
            "Dave Double"
        ]
    );

    let fine_rates = Selector::parse(".fine-rates").expect("valid selector");
    let text: String = document
        .select(&fine_rates)
        .flat_map(|e| e.text())
        .collect();
    assert!(text.contains("26s: £0.26 each"));
    assert!(text.contains("DOTD: £2.50 each"));
    Ok(())
}

#[actix_web::test]
async fn test7_duplicate_flow_over_http() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::with_players(common::roster());
    let sessions = common::sessions_over(store.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(sessions))
            .configure(configure),
    )
    .await;

    for leg in ["0", "2"] {
        let req = test::TestRequest::post()
            .uri("/match/m1/field")
            .set_form([("leg", leg), ("field", "player1_id"), ("value", "p2")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/match/m1/submit")
        .set_form([("confirmed", "0")])
        .to_request();
    let document = body_html(&test::call_and_read_body(&app, req).await);
    assert_eq!(document.select(&Selector::parse(".modal").expect("valid selector")).count(), 1);
    assert_eq!(
        document
            .select(&Selector::parse("select.duplicate-player").expect("valid selector"))
            .count(),
        2
    );
    assert!(store.load_submission("m1").await?.is_empty());

    let req = test::TestRequest::post()
        .uri("/match/m1/submit")
        .set_form([("confirmed", "1")])
        .to_request();
    let document = body_html(&test::call_and_read_body(&app, req).await);
    let banner: String = document
        .select(&Selector::parse(".banner-success").expect("valid selector"))
        .flat_map(|e| e.text())
        .collect();
    assert!(banner.contains("saved successfully"));
    assert_eq!(store.load_submission("m1").await?.stats.len(), 2);

    let req = test::TestRequest::get()
        .uri("/match/m1?json=1")
        .to_request();
    let sheet: LegSheet = test::call_and_read_body_json(&app, req).await;
    assert_eq!(sheet, LegSheet::new());
    Ok(())
}

#[actix_web::test]
async fn test7_bad_input_is_a_client_error() {
    let sessions = common::sessions_over(MemoryStore::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(sessions))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/match/m1/field")
        .set_form([("leg", "0"), ("field", "score_99"), ("value", "1")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("score_99"));

    let req = test::TestRequest::post()
        .uri("/match/m1/adjust")
        .set_form([("leg", "0"), ("field", "tens"), ("step", "inc")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/match/bad%20id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test7_api_players_and_create_match() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::with_players(common::roster());
    let sessions = common::sessions_over(store.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(sessions))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/players").to_request();
    let players: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(players.as_array().map(Vec::len), Some(4));
    assert_eq!(players[0]["id"], "p1");

    let req = test::TestRequest::post()
        .uri("/api/createMatch")
        .set_json(json!({"match_id": "league_night"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        created,
        json!({"status": "created", "match_id": "league_night"})
    );

    let req = test::TestRequest::post()
        .uri("/api/createMatch")
        .set_json(json!({"matchId": "league_night"}))
        .to_request();
    let again: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(again["status"], "already_exists");

    assert_eq!(
        store.create_match("league_night").await?,
        rusty_darts::model::CreateOutcome::AlreadyExists
    );
    Ok(())
}

#[actix_web::test]
async fn test7_api_players_failure_is_json() {
    let store = MemoryStore::new().failing_directory("sheet unavailable");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::sessions_over(store)))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/players").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("sheet unavailable"));
}

#[actix_web::test]
async fn test7_dashboard_creates_and_redirects() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::sessions_over(MemoryStore::new())))
            .service(web::scope("/darts").configure(configure)),
    )
    .await;

    let req = test::TestRequest::get().uri("/darts/").to_request();
    let document = body_html(&test::call_and_read_body(&app, req).await);
    let form = Selector::parse("form[method=post]").expect("valid selector");
    let action = document
        .select(&form)
        .next()
        .and_then(|f| f.value().attr("action"))
        .map(str::to_string);
    assert_eq!(action.as_deref(), Some("matches"));

    let req = test::TestRequest::post().uri("/darts/matches").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(location.starts_with("match/match_"), "{location}");

    let req = test::TestRequest::get()
        .uri(&format!("/darts/{location}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get().uri("/darts/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}
