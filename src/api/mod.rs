//! Backend access: the four endpoints this page talks to.
//!
//! `Transport` is the seam between request building/parsing (here) and the
//! actual network (`web::fetch` in the browser, an in-memory server in
//! tests). It moves a method, a path and an optional form body, and hands
//! back the response text.

pub mod form;
pub mod wire;

use std::rc::Rc;

use crate::error::ActionError;
use wire::{Comment, CommentId, GameId, GameRecord, LikeState};

/// Content type of every request body this client sends.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One request to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Form-encoded body, POST only.
    pub body: Option<String>,
}

impl ApiRequest {
    fn get(path: String) -> Self {
        Self {
            method: Method::Get,
            path,
            body: None,
        }
    }

    fn post_form(path: String, pairs: &[(&str, &str)]) -> Self {
        Self {
            method: Method::Post,
            path,
            body: Some(form::encode_form(pairs)),
        }
    }
}

/// Sends a request and returns the body of a successful (2xx) response.
/// Non-2xx statuses map to `ActionError::Status`, network failures to
/// `ActionError::Network`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<String, ActionError>;
}

impl<T: Transport> Transport for Rc<T> {
    async fn send(&self, request: ApiRequest) -> Result<String, ActionError> {
        (**self).send(request).await
    }
}

/// Typed client for the backend endpoints.
pub struct GameApi<T> {
    transport: T,
    base: String,
}

impl<T: Transport> GameApi<T> {
    pub fn new(transport: T, base: impl Into<String>) -> Self {
        Self {
            transport,
            base: base.into(),
        }
    }

    fn path(&self, tail: &str) -> String {
        format!("{}{}", self.base, tail)
    }

    async fn send(&self, request: ApiRequest) -> Result<String, ActionError> {
        log::debug!("{} {}", request.method.as_str(), request.path);
        self.transport.send(request).await
    }

    /// `GET /like/{game_id}`: the server toggles the session viewer's like.
    pub async fn toggle_like(&self, game_id: GameId) -> Result<LikeState, ActionError> {
        let body = self
            .send(ApiRequest::get(self.path(&format!("/like/{}", game_id))))
            .await?;
        wire::parse_like(&body)
    }

    /// `GET /api/games`: every game with its comments.
    pub async fn list_games(&self) -> Result<Vec<GameRecord>, ActionError> {
        let body = self.send(ApiRequest::get(self.path("/api/games"))).await?;
        wire::parse_games(&body)
    }

    /// Comments of one game, or `None` if the collection doesn't have it.
    pub async fn comments_of(&self, game_id: GameId) -> Result<Option<Vec<Comment>>, ActionError> {
        let games = self.list_games().await?;
        Ok(games
            .into_iter()
            .find(|g| g.id == game_id)
            .map(|g| g.comments))
    }

    /// `POST /comment/{game_id}` with form field `comment`.
    pub async fn add_comment(&self, game_id: GameId, text: &str) -> Result<Comment, ActionError> {
        let request = ApiRequest::post_form(
            self.path(&format!("/comment/{}", game_id)),
            &[("comment", text)],
        );
        let body = self.send(request).await?;
        wire::parse_new_comment(&body)
    }

    /// `GET /delete_comment/{game_id}/{comment_id}`.
    pub async fn delete_comment(
        &self,
        game_id: GameId,
        comment_id: CommentId,
    ) -> Result<(), ActionError> {
        let path = self.path(&format!("/delete_comment/{}/{}", game_id, comment_id));
        let body = self.send(ApiRequest::get(path)).await?;
        wire::parse_ack(&body)
    }
}
