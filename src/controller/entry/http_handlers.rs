use actix_web::http::header;
use actix_web::web::{self, Data};
use actix_web::{HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{error, warn};

use crate::controller::matches::{create_match, validate_match_id};
use crate::controller::session::Sessions;
use crate::error::AppError;
use crate::model::{FieldPath, FieldValue, Step};
use crate::mvu::entry::{EntryModel, Msg};
use crate::view::entry::{render_entry, render_entry_page};
use crate::view::index::{DEFAULT_INDEX_TITLE, render_index_template};

fn get_param_str<'a>(params: &'a HashMap<String, String>, key: &str) -> &'a str {
    params.get(key).map_or("", |s| s.trim())
}

fn flag(params: &HashMap<String, String>, key: &str) -> bool {
    match get_param_str(params, key) {
        "1" => true,
        "0" | "" => false,
        other => other.parse().unwrap_or(false),
    }
}

fn error_response(e: &AppError) -> HttpResponse {
    if e.is_client_error() {
        HttpResponse::BadRequest().json(json!({"error": e.to_string()}))
    } else {
        error!(error = %e, "request failed");
        HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
    }
}

fn html(markup: maud::Markup) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html")
        .body(markup.into_string())
}

fn fragment(model: &EntryModel) -> HttpResponse {
    html(render_entry(model))
}

fn match_id_from(path: &str) -> Result<String, AppError> {
    validate_match_id(path).map(str::to_string)
}

fn leg_from(params: &HashMap<String, String>) -> Result<usize, AppError> {
    let raw = get_param_str(params, "leg");
    raw.parse()
        .map_err(|_| AppError::Validation(format!("leg '{raw}' is not a leg index")))
}

fn field_from(params: &HashMap<String, String>) -> Result<FieldPath, AppError> {
    Ok(FieldPath::from_str(get_param_str(params, "field"))?)
}

pub async fn index() -> impl Responder {
    html(render_index_template(DEFAULT_INDEX_TITLE, None))
}

/// Dashboard button. Creates a fresh match and sends the browser to its entry form.
pub async fn create_match_form(sessions: Data<Sessions>) -> impl Responder {
    match create_match(sessions.store(), None).await {
        Ok((match_id, _)) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, format!("match/{match_id}")))
            .finish(),
        Err(e) => {
            error!(error = %e, "dashboard match creation failed");
            HttpResponse::InternalServerError()
                .content_type("text/html")
                .body(render_index_template(DEFAULT_INDEX_TITLE, Some(&e.to_string())).into_string())
        }
    }
}

pub async fn entry_page(
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    sessions: Data<Sessions>,
) -> impl Responder {
    let match_id = match match_id_from(&path) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };
    let model = sessions.dispatch(&match_id, Msg::PageLoad).await;

    if flag(&query, "json") {
        HttpResponse::Ok().json(&model.legs)
    } else {
        html(render_entry_page(&model))
    }
}

fn field_update(path: &str, form: &HashMap<String, String>) -> Result<(String, Msg), AppError> {
    let match_id = match_id_from(path)?;
    let leg = leg_from(form)?;
    let field = field_from(form)?;
    let raw = form.get("value").map_or("", String::as_str);
    let value = FieldValue::parse_for(field, raw)?;
    Ok((match_id, Msg::FieldSet { leg, field, value }))
}

fn tally_step(path: &str, form: &HashMap<String, String>) -> Result<(String, Msg), AppError> {
    let match_id = match_id_from(path)?;
    let leg = leg_from(form)?;
    let FieldPath::Counter(side, counter) = field_from(form)? else {
        return Err(AppError::Validation(format!(
            "field '{}' has no tally",
            get_param_str(form, "field")
        )));
    };
    let step = Step::from_str(get_param_str(form, "step")).map_err(AppError::Validation)?;
    Ok((
        match_id,
        Msg::Adjusted {
            leg,
            side,
            counter,
            step,
        },
    ))
}

pub async fn set_field(
    path: web::Path<String>,
    form: web::Form<HashMap<String, String>>,
    sessions: Data<Sessions>,
) -> impl Responder {
    match field_update(&path, &form) {
        Ok((match_id, msg)) => fragment(&sessions.dispatch(&match_id, msg).await),
        Err(e) => {
            warn!(error = %e, "rejected field update");
            error_response(&e)
        }
    }
}

pub async fn adjust_field(
    path: web::Path<String>,
    form: web::Form<HashMap<String, String>>,
    sessions: Data<Sessions>,
) -> impl Responder {
    match tally_step(&path, &form) {
        Ok((match_id, msg)) => fragment(&sessions.dispatch(&match_id, msg).await),
        Err(e) => {
            warn!(error = %e, "rejected tally adjustment");
            error_response(&e)
        }
    }
}

/// `confirmed=1` means the duplicate-player warning was acknowledged.
pub async fn submit(
    path: web::Path<String>,
    form: web::Form<HashMap<String, String>>,
    sessions: Data<Sessions>,
) -> impl Responder {
    let match_id = match match_id_from(&path) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };
    let confirmed = flag(&form, "confirmed");
    let model = sessions
        .dispatch(&match_id, Msg::SubmitRequested { confirmed })
        .await;
    fragment(&model)
}

pub async fn cancel(path: web::Path<String>, sessions: Data<Sessions>) -> impl Responder {
    match match_id_from(&path) {
        Ok(match_id) => fragment(&sessions.dispatch(&match_id, Msg::SubmitCancelled).await),
        Err(e) => error_response(&e),
    }
}

pub async fn api_players(sessions: Data<Sessions>) -> impl Responder {
    match sessions.store().list_players().await {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => error_response(&AppError::from(e)),
    }
}

#[derive(Deserialize)]
pub struct CreateMatchRequest {
    #[serde(default, alias = "matchId")]
    pub match_id: Option<String>,
}

pub async fn api_create_match(
    body: web::Json<CreateMatchRequest>,
    sessions: Data<Sessions>,
) -> impl Responder {
    match create_match(sessions.store(), body.match_id.as_deref()).await {
        Ok((match_id, outcome)) => {
            HttpResponse::Ok().json(json!({"status": outcome, "match_id": match_id}))
        }
        Err(e) => error_response(&e),
    }
}

/// Every route of the app, relative to wherever it is mounted.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/matches", web::post().to(create_match_form))
        .route("/match/{id}", web::get().to(entry_page))
        .route("/match/{id}/field", web::post().to(set_field))
        .route("/match/{id}/adjust", web::post().to(adjust_field))
        .route("/match/{id}/submit", web::post().to(submit))
        .route("/match/{id}/cancel", web::post().to(cancel))
        .route("/api/players", web::get().to(api_players))
        .route("/api/createMatch", web::post().to(api_create_match))
        .route("/health", web::get().to(HttpResponse::Ok));
}
