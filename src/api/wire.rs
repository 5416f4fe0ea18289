//! JSON payloads exchanged with the backend.
//!
//! Mutating endpoints answer with a `success` flag and either data or an
//! `error` string. Parsers turn that envelope into `Result`s so callers never
//! look at `success` themselves.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;

pub type GameId = u64;
pub type CommentId = u64;
pub type UserId = u64;

/// Shown when the server refuses an action without saying why.
const UNSPECIFIED_REJECTION: &str = "Неизвестная ошибка";

/// A comment as the server stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    /// Author display name.
    pub user: String,
    pub user_id: UserId,
    pub text: String,
    /// ISO-8601, usually without an offset.
    pub timestamp: String,
}

/// The slice of a game record this client reads from `/api/games`.
/// Other fields of the record are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Server-confirmed like state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub likes: u32,
    pub liked: bool,
}

#[derive(Deserialize)]
struct LikeReply {
    success: bool,
    likes: Option<u32>,
    is_liked: Option<bool>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct CommentReply {
    success: bool,
    comment: Option<Comment>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct AckReply {
    success: bool,
    error: Option<String>,
}

fn rejection(error: Option<String>) -> ActionError {
    ActionError::Rejected(error.unwrap_or_else(|| UNSPECIFIED_REJECTION.to_string()))
}

/// Parse the `/like/{id}` reply.
pub fn parse_like(body: &str) -> Result<LikeState, ActionError> {
    let reply: LikeReply = serde_json::from_str(body)?;
    if !reply.success {
        return Err(rejection(reply.error));
    }
    Ok(LikeState {
        likes: reply.likes.ok_or(ActionError::Incomplete("likes"))?,
        liked: reply.is_liked.ok_or(ActionError::Incomplete("is_liked"))?,
    })
}

/// Parse the `/api/games` collection.
pub fn parse_games(body: &str) -> Result<Vec<GameRecord>, ActionError> {
    Ok(serde_json::from_str(body)?)
}

/// Parse the `/comment/{id}` reply into the server-created comment.
pub fn parse_new_comment(body: &str) -> Result<Comment, ActionError> {
    let reply: CommentReply = serde_json::from_str(body)?;
    if !reply.success {
        return Err(rejection(reply.error));
    }
    reply.comment.ok_or(ActionError::Incomplete("comment"))
}

/// Parse a bare `{success, error?}` acknowledgement.
pub fn parse_ack(body: &str) -> Result<(), ActionError> {
    let reply: AckReply = serde_json::from_str(body)?;
    if reply.success {
        Ok(())
    } else {
        Err(rejection(reply.error))
    }
}
