//! WebSocket study session. Each client message is parsed as JSON and
//! forwarded to core logic; replies are single JSON messages.
//!
//! Navigation requests (`open_level`, `open_lesson`) run as background tasks so
//! a slow fetch never blocks the socket. Only the most recent request per kind
//! is answered: when the user clicks through lessons quickly, results for
//! lessons they already left are dropped instead of overwriting the current one.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::supersede::{Generations, Ticket};

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "ws", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state), fields(session = %Uuid::new_v4()))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "ws", "WebSocket connected");
  let generations = Generations::new();
  let (tx, mut rx) = mpsc::unbounded_channel::<ServerWsMessage>();

  loop {
    tokio::select! {
      incoming = socket.recv() => {
        let Some(Ok(msg)) = incoming else { break };
        match msg {
          Message::Text(txt) => match serde_json::from_str::<ClientWsMessage>(&txt) {
            Ok(parsed) => {
              debug!(target: "ws", "WS received: {:?}", &parsed);
              dispatch(parsed, &state, &generations, &tx);
            }
            Err(e) => {
              let _ = tx.send(ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) });
            }
          },
          Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
          Message::Close(_) => break,
          _ => {}
        }
      }
      Some(reply) = rx.recv() => {
        let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });
        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "ws", error = %e, "WS send error");
          break;
        }
      }
    }
  }
  info!(target: "ws", "WebSocket disconnected");
}

/// Start work for one client message. Replies arrive on `tx`.
fn dispatch(
  msg: ClientWsMessage,
  state: &Arc<AppState>,
  generations: &Generations,
  tx: &mpsc::UnboundedSender<ServerWsMessage>,
) {
  match msg {
    ClientWsMessage::Ping => {
      let _ = tx.send(ServerWsMessage::Pong);
    }

    ClientWsMessage::OpenLevel { difficulty_id } => {
      let ticket = generations.begin("level");
      spawn_latest(state, generations, tx, ticket, move |state| async move {
        let level = load_level(&state, &difficulty_id).await;
        info!(target: "ws", %difficulty_id, found = level.is_some(), "WS level loaded");
        ServerWsMessage::Level { difficulty_id, level }
      });
    }

    ClientWsMessage::OpenLesson { difficulty_id, lesson_id } => {
      let ticket = generations.begin("lesson");
      spawn_latest(state, generations, tx, ticket, move |state| async move {
        let lesson = load_lesson(&state, &difficulty_id, &lesson_id).await;
        info!(target: "ws", %difficulty_id, %lesson_id, found = lesson.is_some(), "WS lesson loaded");
        ServerWsMessage::Lesson { lesson }
      });
    }

    ClientWsMessage::Chat { messages } => {
      let state = state.clone();
      let tx = tx.clone();
      tokio::spawn(async move {
        let reply = match chat_reply(&state, messages).await {
          Ok(text) => ServerWsMessage::ChatReply { text },
          Err(e) => ServerWsMessage::Error { message: e.to_string() },
        };
        let _ = tx.send(reply);
      });
    }
  }
}

/// Run `work` in the background and deliver its reply only if `ticket` is
/// still the newest one for its kind.
fn spawn_latest<F, Fut>(
  state: &Arc<AppState>,
  generations: &Generations,
  tx: &mpsc::UnboundedSender<ServerWsMessage>,
  ticket: Ticket,
  work: F,
) where
  F: FnOnce(Arc<AppState>) -> Fut + Send + 'static,
  Fut: std::future::Future<Output = ServerWsMessage> + Send + 'static,
{
  let state = state.clone();
  let generations = generations.clone();
  let tx = tx.clone();
  tokio::spawn(async move {
    let reply = work(state).await;
    if generations.is_current(&ticket) {
      let _ = tx.send(reply);
    } else {
      debug!(target: "ws", generation = ticket.generation(), "Dropping superseded result");
    }
  });
}
