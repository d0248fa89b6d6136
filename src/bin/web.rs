//! Single binary web server: REST API over the session store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT,
//! SESSION_TTL_HOURS, CLEANUP_INTERVAL_MINUTES.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use court_rotation_web::config::ServerConfig;
use court_rotation_web::{
    cancel_round, end_session, history_csv, rankings, start_round, submit_scores, ErrorKind,
    MatchId, PlayerId, ScoreSubmission, Session, SessionError, SessionId, SessionStore, StoreError,
};
use serde::Deserialize;

type AppState = Data<SessionStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateSessionBody {
    #[serde(default)]
    player_names: Vec<String>,
    #[serde(default = "default_num_courts")]
    num_courts: u32,
}

fn default_num_courts() -> u32 {
    1
}

#[derive(Deserialize)]
struct PlayerNameBody {
    name: String,
}

#[derive(Deserialize)]
struct CourtsBody {
    num_courts: u32,
}

/// A score as typed into the kiosk: a number, a numeric string, or blank.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreField {
    Number(u32),
    Text(String),
}

#[derive(Deserialize)]
struct ScoreBody {
    match_id: MatchId,
    #[serde(default)]
    team_1_score: Option<ScoreField>,
    #[serde(default)]
    team_2_score: Option<ScoreField>,
}

#[derive(Deserialize)]
struct SubmitScoresBody {
    scores: Vec<ScoreBody>,
}

/// Path segment: session id (e.g. /api/sessions/{id})
#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

/// Path segments: session id and player id (e.g. /api/sessions/{id}/players/{player_id})
#[derive(Deserialize)]
struct SessionPlayerPath {
    id: SessionId,
    player_id: PlayerId,
}

/// Blank means "not entered"; anything else must be a non-negative integer.
fn parse_score(field: Option<ScoreField>) -> Result<Option<u32>, String> {
    match field {
        None => Ok(None),
        Some(ScoreField::Number(n)) => Ok(Some(n)),
        Some(ScoreField::Text(t)) if t.trim().is_empty() => Ok(None),
        Some(ScoreField::Text(t)) => t
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("Score {:?} is not a non-negative whole number", t)),
    }
}

fn to_submissions(body: SubmitScoresBody) -> Result<Vec<ScoreSubmission>, String> {
    body.scores
        .into_iter()
        .map(|s| {
            Ok(ScoreSubmission {
                match_id: s.match_id,
                team_1_score: parse_score(s.team_1_score)?,
                team_2_score: parse_score(s.team_2_score)?,
            })
        })
        .collect()
}

/// Map a failed call to a response. A state conflict also returns the current
/// session so a client that lost a race can replace its view.
fn error_response(store: &SessionStore, id: Option<SessionId>, err: StoreError) -> HttpResponse {
    let e = match err {
        StoreError::Session(e) => e,
        StoreError::LockPoisoned => {
            log::error!("session store lock poisoned");
            return HttpResponse::InternalServerError().body("lock error");
        }
    };
    log::warn!("rejected: {}", e);
    let body = serde_json::json!({ "error": e.to_string(), "kind": e.kind() });
    match e.kind() {
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::StateConflict => {
            let current = id.and_then(|id| store.get(id).ok());
            HttpResponse::Conflict().json(serde_json::json!({
                "error": e.to_string(),
                "kind": e.kind(),
                "session": current,
            }))
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Apply a session operation through the store and answer with the updated session.
fn mutate<F>(store: &SessionStore, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Session) -> Result<(), SessionError>,
{
    match store.update(id, f) {
        Ok((session, ())) => HttpResponse::Ok().json(session),
        Err(e) => error_response(store, Some(id), e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "court-rotation-web",
    })
}

/// Create a session (returns it with id; clients poll it by id or via /active).
#[post("/api/sessions")]
async fn api_create_session(state: AppState, body: Json<CreateSessionBody>) -> HttpResponse {
    let body = body.into_inner();
    match Session::new(body.player_names.as_slice(), body.num_courts) {
        Ok(session) => match state.insert(session) {
            Ok(s) => HttpResponse::Ok().json(s),
            Err(e) => error_response(&state, None, e),
        },
        Err(e) => error_response(&state, None, e.into()),
    }
}

/// The session every kiosk screen should show: latest one not ended.
#[get("/api/sessions/active")]
async fn api_active_session(state: AppState) -> HttpResponse {
    match state.active() {
        Ok(Some(s)) => HttpResponse::Ok().json(s),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No active session" })),
        Err(e) => error_response(&state, None, e),
    }
}

#[get("/api/sessions/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    match state.get(path.id) {
        Ok(s) => HttpResponse::Ok().json(s),
        Err(e) => error_response(&state, Some(path.id), e),
    }
}

#[delete("/api/sessions/{id}")]
async fn api_delete_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    match state.delete(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&state, Some(path.id), e),
    }
}

#[post("/api/sessions/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<PlayerNameBody>,
) -> HttpResponse {
    mutate(&state, path.id, |s| s.add_player(&body.name).map(|_| ()))
}

#[delete("/api/sessions/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<SessionPlayerPath>) -> HttpResponse {
    mutate(&state, path.id, |s| s.remove_player(path.player_id))
}

#[put("/api/sessions/{id}/players/{player_id}")]
async fn api_rename_player(
    state: AppState,
    path: Path<SessionPlayerPath>,
    body: Json<PlayerNameBody>,
) -> HttpResponse {
    mutate(&state, path.id, |s| s.rename_player(path.player_id, &body.name))
}

#[post("/api/sessions/{id}/players/{player_id}/sit-out")]
async fn api_toggle_sit_out(state: AppState, path: Path<SessionPlayerPath>) -> HttpResponse {
    mutate(&state, path.id, |s| s.toggle_sit_out(path.player_id).map(|_| ()))
}

#[put("/api/sessions/{id}/courts")]
async fn api_set_courts(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<CourtsBody>,
) -> HttpResponse {
    mutate(&state, path.id, |s| s.set_num_courts(body.num_courts))
}

/// Start the first round or advance to the next.
#[post("/api/sessions/{id}/rounds")]
async fn api_start_round(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    mutate(&state, path.id, start_round)
}

#[delete("/api/sessions/{id}/rounds/current")]
async fn api_cancel_round(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    mutate(&state, path.id, cancel_round)
}

/// Submit scores for some or all matches of the current round.
#[post("/api/sessions/{id}/scores")]
async fn api_submit_scores(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<SubmitScoresBody>,
) -> HttpResponse {
    let scores = match to_submissions(body.into_inner()) {
        Ok(s) => s,
        Err(msg) => {
            return HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": msg, "kind": ErrorKind::ScoreValidation }))
        }
    };
    mutate(&state, path.id, |s| submit_scores(s, &scores).map(|_| ()))
}

#[post("/api/sessions/{id}/end")]
async fn api_end_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    mutate(&state, path.id, end_session)
}

#[get("/api/sessions/{id}/rankings")]
async fn api_rankings(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    match state.get(path.id) {
        Ok(s) => HttpResponse::Ok().json(rankings(&s)),
        Err(e) => error_response(&state, Some(path.id), e),
    }
}

#[get("/api/sessions/{id}/history.csv")]
async fn api_history_csv(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let session = match state.get(path.id) {
        Ok(s) => s,
        Err(e) => return error_response(&state, Some(path.id), e),
    };
    match history_csv(&session.game_history) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"session-{}.csv\"", session.id),
            ))
            .body(bytes),
        Err(e) => {
            log::error!("csv export failed: {}", e);
            HttpResponse::InternalServerError().body("export error")
        }
    }
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(SessionStore::new(config.session_ttl));

    // Background task: periodically drop sessions nobody has touched within the TTL
    let state_cleanup = state.clone();
    let cleanup_interval = config.cleanup_interval;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            match state_cleanup.purge_inactive() {
                Ok(0) => {}
                Ok(removed) => log::info!("Cleaned up {} inactive session(s)", removed),
                Err(e) => log::error!("cleanup skipped: {}", e),
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_session)
            .service(api_active_session)
            .service(api_get_session)
            .service(api_delete_session)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_rename_player)
            .service(api_toggle_sit_out)
            .service(api_set_courts)
            .service(api_start_round)
            .service(api_cancel_round)
            .service(api_submit_scores)
            .service(api_end_session)
            .service(api_rankings)
            .service(api_history_csv)
    })
    .bind(bind)?
    .run()
    .await
}
