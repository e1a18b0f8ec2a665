//! Single binary web server: JSON API over the championship engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use championship_engine::{
    compute_standings, on_round_complete, parse_roster_csv, preview_championship,
    record_match_result, Championship, ChampionshipError, ChampionshipId, ChampionshipStore,
    ConfigInput, GenerateOptions, MatchId, MatchResult, Participant, ParticipantId,
    TournamentPreset,
};
use serde::{Deserialize, Serialize};

type AppState = Data<ChampionshipStore>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateChampionshipBody {
    name: String,
    #[serde(default = "default_config")]
    config: ConfigInput,
}

fn default_config() -> ConfigInput {
    ConfigInput::Preset(TournamentPreset::SmallTournament)
}

#[derive(Deserialize)]
struct AddParticipantBody {
    name: String,
    rating: i32,
}

#[derive(Deserialize)]
struct PreviewBody {
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct SetResultBody {
    result: MatchResult,
}

/// Path segment: championship id (e.g. /api/championships/{id})
#[derive(Deserialize)]
struct ChampionshipPath {
    id: ChampionshipId,
}

#[derive(Deserialize)]
struct ParticipantPath {
    id: ChampionshipId,
    participant_id: ParticipantId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: ChampionshipId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct RoundPath {
    id: ChampionshipId,
    round: u32,
}

/// Map engine errors onto HTTP status codes.
fn error_response(e: ChampionshipError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        ChampionshipError::ChampionshipNotFound(_)
        | ChampionshipError::MatchNotFound(_)
        | ChampionshipError::ParticipantNotFound(_) => HttpResponse::NotFound().json(body),
        ChampionshipError::AlreadyGenerated
        | ChampionshipError::CannotRegenerateInProgress { .. }
        | ChampionshipError::ConcurrentModification
        | ChampionshipError::DependencyIncomplete { .. }
        | ChampionshipError::RosterLocked => HttpResponse::Conflict().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond<T: Serialize>(result: Result<T, ChampionshipError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "championship-engine",
    })
}

/// Create a championship from a preset name or a custom config.
#[post("/api/championships")]
async fn api_create_championship(state: AppState, body: Json<CreateChampionshipBody>) -> HttpResponse {
    let body = body.into_inner();
    let result = body.config.into_config().and_then(|config| {
        let championship = Championship::new(body.name.trim(), config);
        let id = state.insert(championship)?;
        state.snapshot(id)
    });
    respond(result)
}

#[get("/api/championships/{id}")]
async fn api_get_championship(state: AppState, path: Path<ChampionshipPath>) -> HttpResponse {
    respond(state.snapshot(path.id))
}

/// Register a participant (before generation only).
#[post("/api/championships/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<ChampionshipPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    respond(state.with_championship(path.id, |t| {
        t.add_participant(Participant::new(body.name.trim(), body.rating))?;
        Ok(t.clone())
    }))
}

/// Import participants from a CSV body (`name,rating[,registered_at]`).
#[post("/api/championships/{id}/participants/import")]
async fn api_import_participants(state: AppState, path: Path<ChampionshipPath>, body: Bytes) -> HttpResponse {
    respond(state.with_championship(path.id, |t| {
        for participant in parse_roster_csv(body.as_ref())? {
            t.add_participant(participant)?;
        }
        Ok(t.clone())
    }))
}

#[delete("/api/championships/{id}/participants/{participant_id}")]
async fn api_remove_participant(state: AppState, path: Path<ParticipantPath>) -> HttpResponse {
    respond(state.with_championship(path.id, |t| {
        t.remove_participant(path.participant_id)?;
        Ok(t.clone())
    }))
}

/// Generate every round (pass `force_regenerate` to replace an existing schedule).
#[post("/api/championships/{id}/generate")]
async fn api_generate(
    state: AppState,
    path: Path<ChampionshipPath>,
    body: Option<Json<GenerateOptions>>,
) -> HttpResponse {
    let options = body.map(|b| b.into_inner()).unwrap_or_default();
    respond(state.generate(path.id, options))
}

/// What generation would produce, without storing anything.
#[post("/api/championships/{id}/preview")]
async fn api_preview(state: AppState, path: Path<ChampionshipPath>, body: Option<Json<PreviewBody>>) -> HttpResponse {
    let seed = body.and_then(|b| b.seed);
    respond(state.with_championship(path.id, |t| preview_championship(t, seed)))
}

#[put("/api/championships/{id}/matches/{match_id}/result")]
async fn api_set_result(state: AppState, path: Path<MatchPath>, body: Json<SetResultBody>) -> HttpResponse {
    respond(state.with_championship(path.id, |t| {
        record_match_result(t, path.match_id, body.result)?;
        Ok(t.clone())
    }))
}

/// Signal that a round's results are final; resolves the rounds waiting on it.
#[post("/api/championships/{id}/rounds/{round}/complete")]
async fn api_round_complete(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    respond(state.with_championship(path.id, |t| {
        let resolved = on_round_complete(t, path.round)?;
        Ok(serde_json::json!({ "resolved_rounds": resolved, "championship": t }))
    }))
}

#[get("/api/championships/{id}/standings")]
async fn api_standings(state: AppState, path: Path<ChampionshipPath>) -> HttpResponse {
    respond(state.with_championship(path.id, |t| {
        Ok(compute_standings(&t.participants, &t.matches, t.config.bye_points))
    }))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(ChampionshipStore::new());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_championship)
            .service(api_get_championship)
            .service(api_add_participant)
            .service(api_import_participants)
            .service(api_remove_participant)
            .service(api_generate)
            .service(api_preview)
            .service(api_set_result)
            .service(api_round_complete)
            .service(api_standings)
    })
    .bind(bind)?
    .run()
    .await
}
