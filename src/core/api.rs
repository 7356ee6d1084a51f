//! HTTP + WebSocket API for RepCoach
//!
//! Endpoints:
//! - POST /session/new - Create and start a session
//! - GET /session/{id} - Get session status
//! - DELETE /session/{id} - Tear down a session
//! - POST /session/{id}/frame - Evaluate one landmark frame
//! - POST /session/{id}/start | /stop | /reset - Session commands
//! - POST /session/{id}/exercise - Switch exercise
//! - POST /session/{id}/voice - Route a speech transcript
//! - WS /ws/{id} - Live updates
//! - GET /health - Health check

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, RwLock};

use crate::core::rules::RuleTable;
use crate::core::session::{Cue, SessionCommand, WorkoutSession};
use crate::core::voice::VoiceIntent;
use crate::types::{EvaluationOutput, Landmark, Phase, ReasonCode};
use crate::DEFAULT_EXERCISE;

/// Session state
#[derive(Debug)]
pub struct ApiSession {
    pub id: String,
    pub workout: WorkoutSession,
    pub update_tx: broadcast::Sender<SessionUpdate>,
}

/// Live update message
#[derive(Debug, Clone, Serialize)]
pub struct SessionUpdate {
    pub exercise: String,
    pub reps: u32,
    pub phase: Phase,
    pub rep_completed: bool,
    pub active: bool,
    pub cues: Vec<Cue>,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, ApiSession>>,
    pub rules: RuleTable,
    next_id: AtomicU64,
}

/// Create new session request
#[derive(Debug, Deserialize)]
pub struct NewSessionRequest {
    pub exercise: Option<String>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
    pub exercise: String,
    pub cues: Vec<Cue>,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub exercise: String,
    pub reps: u32,
    pub phase: Phase,
    pub reason: ReasonCode,
    pub active: bool,
    pub frames_evaluated: u64,
    pub frames_skipped: u64,
}

/// Frame request
#[derive(Debug, Deserialize)]
pub struct FrameRequest {
    pub landmarks: Vec<Landmark>,
}

/// Frame response
#[derive(Debug, Serialize)]
pub struct FrameResponse {
    #[serde(flatten)]
    pub output: EvaluationOutput,
    pub cues: Vec<Cue>,
}

/// Command response (start / stop / reset)
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub reps: u32,
    pub phase: Phase,
    pub active: bool,
    pub cues: Vec<Cue>,
}

/// Exercise switch request
#[derive(Debug, Deserialize)]
pub struct ExerciseRequest {
    pub exercise: String,
}

/// Voice request
#[derive(Debug, Deserialize)]
pub struct VoiceRequest {
    pub transcript: String,
}

/// Voice response
#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub intent: VoiceIntent,
    pub reps: u32,
    pub phase: Phase,
    pub active: bool,
    pub cues: Vec<Cue>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
    pub exercises: Vec<String>,
}

/// Create the API router
pub fn create_router(rules: RuleTable) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        rules,
        next_id: AtomicU64::new(1),
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/frame", post(post_frame))
        .route("/session/:id/start", post(start_session))
        .route("/session/:id/stop", post(stop_session))
        .route("/session/:id/reset", post(reset_session))
        .route("/session/:id/exercise", post(set_exercise))
        .route("/session/:id/voice", post(post_voice))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
        exercises: state.rules.exercises().into_iter().map(String::from).collect(),
    })
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSessionRequest>,
) -> Result<Json<NewSessionResponse>, StatusCode> {
    let exercise = req.exercise.unwrap_or_else(|| DEFAULT_EXERCISE.to_string());
    if let Err(e) = state.rules.require(&exercise) {
        warn!("rejecting session: {}", e);
        return Err(StatusCode::BAD_REQUEST);
    }

    let session_id = generate_session_id(&state.next_id);
    let (tx, _) = broadcast::channel(100);

    let mut workout = WorkoutSession::new(&exercise, state.rules.clone());
    let cues = workout.start();

    let session = ApiSession {
        id: session_id.clone(),
        workout,
        update_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);
    info!("session {} created ({})", session_id, exercise);

    Ok(Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
        exercise,
        cues,
    }))
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(status_of(session)))
}

/// Tear down a session, returning its final status.
///
/// Dropping the broadcast sender ends any open WebSocket.
async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    info!("session {} removed after {} reps", id, session.workout.reps());
    Ok(Json(status_of(&session)))
}

fn status_of(session: &ApiSession) -> SessionStatusResponse {
    let workout = &session.workout;
    SessionStatusResponse {
        session_id: session.id.clone(),
        exercise: workout.exercise().to_string(),
        reps: workout.reps(),
        phase: workout.phase(),
        reason: workout.holding_reason(),
        active: workout.is_active(),
        frames_evaluated: workout.counter().frames_evaluated(),
        frames_skipped: workout.counter().frames_skipped(),
    }
}

/// Evaluate one frame
async fn post_frame(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FrameRequest>,
) -> Result<Json<FrameResponse>, StatusCode> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    let report = session
        .workout
        .handle_frame(&req.landmarks)
        .ok_or(StatusCode::CONFLICT)?;

    broadcast_update(session, report.output.rep_completed, report.cues.clone());

    Ok(Json(FrameResponse {
        output: report.output,
        cues: report.cues,
    }))
}

async fn start_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>, StatusCode> {
    run_command(&state, &id, SessionCommand::Start).await
}

async fn stop_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>, StatusCode> {
    run_command(&state, &id, SessionCommand::Stop).await
}

async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>, StatusCode> {
    run_command(&state, &id, SessionCommand::Reset).await
}

/// Apply a command to one session
async fn run_command(
    state: &AppState,
    id: &str,
    command: SessionCommand,
) -> Result<Json<CommandResponse>, StatusCode> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(id).ok_or(StatusCode::NOT_FOUND)?;

    let cues = session.workout.apply(command);
    broadcast_update(session, false, cues.clone());

    Ok(Json(CommandResponse {
        reps: session.workout.reps(),
        phase: session.workout.phase(),
        active: session.workout.is_active(),
        cues,
    }))
}

/// Switch exercise
async fn set_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ExerciseRequest>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    {
        let mut sessions = state.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
        if let Err(e) = state.rules.require(&req.exercise) {
            warn!("session {}: {}", id, e);
            return Err(StatusCode::BAD_REQUEST);
        }
        session.workout.set_exercise(&req.exercise);
    }
    get_session(State(state), Path(id)).await
}

/// Route a speech transcript
async fn post_voice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<VoiceRequest>,
) -> Result<Json<VoiceResponse>, StatusCode> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    let (intent, cues) = session.workout.hear(&req.transcript);
    if intent != VoiceIntent::None {
        broadcast_update(session, false, cues.clone());
    }

    Ok(Json(VoiceResponse {
        intent,
        reps: session.workout.reps(),
        phase: session.workout.phase(),
        active: session.workout.is_active(),
        cues,
    }))
}

/// Push the session's current state to WebSocket subscribers
fn broadcast_update(session: &ApiSession, rep_completed: bool, cues: Vec<Cue>) {
    let update = SessionUpdate {
        exercise: session.workout.exercise().to_string(),
        reps: session.workout.reps(),
        phase: session.workout.phase(),
        rep_completed,
        active: session.workout.is_active(),
        cues,
    };
    // No subscribers is fine
    let _ = session.update_tx.send(update);
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Handle WebSocket connection until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<SessionUpdate>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            update = rx.recv() => {
                let update = match update {
                    Ok(update) => update,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let json = serde_json::to_string(&update).unwrap_or_default();
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

/// Generate session ID
fn generate_session_id(counter: &AtomicU64) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let seq = counter.fetch_add(1, Ordering::Relaxed);
    format!("session_{:x}_{}", nanos, seq)
}

/// Run the API server
pub async fn run_server(addr: &str, rules: RuleTable) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(rules);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("RepCoach API running on {}", addr);
    info!("  POST /session/new            - Create session");
    info!("  GET  /session/:id            - Get status");
    info!("  DEL  /session/:id            - Remove session");
    info!("  POST /session/:id/frame      - Evaluate frame");
    info!("  POST /session/:id/reset      - Reset counter");
    info!("  POST /session/:id/start|stop - Start / stop");
    info!("  POST /session/:id/exercise   - Switch exercise");
    info!("  POST /session/:id/voice      - Voice transcript");
    info!("  WS   /ws/:id                 - Live updates");
    info!("  GET  /health                 - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
