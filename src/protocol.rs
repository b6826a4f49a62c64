//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Lesson payloads themselves are the `domain` / `study` types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::domain::Lesson;
use crate::study::StudyLevel;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    OpenLevel {
        #[serde(rename = "difficultyId")]
        difficulty_id: String,
    },
    OpenLesson {
        #[serde(rename = "difficultyId")]
        difficulty_id: String,
        #[serde(rename = "lessonId")]
        lesson_id: String,
    },
    Chat {
        messages: Vec<ChatMessage>,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Level {
        #[serde(rename = "difficultyId")]
        difficulty_id: String,
        level: Option<StudyLevel>,
    },
    Lesson {
        lesson: Option<Lesson>,
    },
    ChatReply {
        text: String,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Deserialize)]
pub struct ChatIn {
    pub messages: Vec<ChatMessage>,
}
#[derive(Serialize)]
pub struct ChatOut {
    pub reply: String,
}

#[derive(Deserialize)]
pub struct ExamIn {
    /// Exam id → chosen option index.
    #[serde(default)]
    pub answers: HashMap<String, usize>,
}

#[derive(Serialize)]
pub struct MessageOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOut {
    pub ok: bool,
    pub backend_url: String,
    pub chat_enabled: bool,
}
