//! In-memory stand-in for the MindMingle rest backend, served over a real
//! http transport so [`ApiTest`] exercises reqwest end to end.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{delete, get, post};
use axum_test::TestServer;
use http::Method;
use mindmingle_shared::{
    Comment, CommentId, Like, NewComment, PostId, PostStats, Reaction, ShareCount, SharePlatform,
    ShareReq, UserSummary,
};
use reqwest::RequestBuilder;
use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

use crate::path::{
    PATH_API, PATH_API_POST, PATH_API_POST_COMMENT, PATH_API_POST_COMMENTS, PATH_API_POST_LIKE,
    PATH_API_POST_LIKES, PATH_API_POST_REACT, PATH_API_POST_SHARE, PATH_API_POST_SHARES,
    PATH_API_POST_STATS,
};
use crate::{Api, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum MockRoute {
    AddLike,
    DeleteLike,
    GetLikes,
    React,
    GetComments,
    AddComment,
    DeleteComment,
    AddShare,
    GetShares,
    GetStats,
    DeletePost,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    users: HashMap<String, UserSummary>,
    posts: HashMap<PostId, MockPost>,
    failing: HashSet<MockRoute>,
    calls: HashMap<MockRoute, usize>,
    next_comment_id: CommentId,
    clock: i64,
}

#[derive(Default)]
struct MockPost {
    author: String,
    likes: Vec<Like>,
    comments: Vec<Comment>,
    shares: Vec<SharePlatform>,
    reactions: Vec<(String, String)>,
}

impl MockState {
    fn enter(&mut self, route: MockRoute) -> Result<(), StatusCode> {
        *self.calls.entry(route).or_default() += 1;
        if self.failing.contains(&route) {
            trace!("mock {route} failing on purpose");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        Ok(())
    }

    fn viewer(&self, headers: &HeaderMap) -> Result<UserSummary, StatusCode> {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| token.strip_prefix("token-"))
            .and_then(|username| self.users.get(username))
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }

    fn post(&mut self, id: PostId) -> Result<&mut MockPost, StatusCode> {
        self.posts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)
    }

    fn tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().await
    }

    pub async fn add_user(&self, username: impl Into<String>, display_name: impl Into<String>) {
        let user = UserSummary::new(username, display_name);
        self.lock().await.users.insert(user.username.clone(), user);
    }

    /// Session the mock accepts for `username`.
    pub fn session(&self, username: impl Into<String>) -> Session {
        let username = username.into();
        let token = format!("token-{username}");
        Session::logged_in(username, token)
    }

    pub async fn add_post(&self, id: PostId, author: impl Into<String>) {
        let post = MockPost {
            author: author.into(),
            ..Default::default()
        };
        self.lock().await.posts.insert(id, post);
    }

    /// Like recorded behind the client's back.
    pub async fn add_like(&self, id: PostId, username: impl Into<String>) {
        let username = username.into();
        let mut state = self.lock().await;
        let like = state
            .users
            .get(&username)
            .map(Like::from)
            .unwrap_or(Like {
                display_name: Some(username.clone()),
                username,
            });
        if let Some(post) = state.posts.get_mut(&id) {
            post.likes.push(like);
        }
    }

    pub async fn add_comment(
        &self,
        id: PostId,
        username: impl Into<String>,
        content: impl Into<String>,
        reply_to_id: Option<CommentId>,
    ) -> Option<Comment> {
        let username = username.into();
        let mut state = self.lock().await;
        let user = state
            .users
            .get(&username)
            .cloned()
            .unwrap_or_else(|| UserSummary::new(username.clone(), username));
        let timestamp = state.tick();
        state.next_comment_id += 1;
        let comment = Comment {
            id: state.next_comment_id,
            user,
            content: content.into(),
            timestamp,
            reply_to_id,
        };
        let post = state.posts.get_mut(&id)?;
        post.comments.push(comment.clone());
        Some(comment)
    }

    pub async fn fail(&self, route: MockRoute) {
        self.lock().await.failing.insert(route);
    }

    pub async fn heal(&self, route: MockRoute) {
        self.lock().await.failing.remove(&route);
    }

    pub async fn calls(&self, route: MockRoute) -> usize {
        self.lock()
            .await
            .calls
            .get(&route)
            .copied()
            .unwrap_or_default()
    }

    pub async fn like_count(&self, id: PostId) -> usize {
        self.lock()
            .await
            .posts
            .get(&id)
            .map(|post| post.likes.len())
            .unwrap_or_default()
    }

    pub async fn shares(&self, id: PostId) -> Vec<SharePlatform> {
        self.lock()
            .await
            .posts
            .get(&id)
            .map(|post| post.shares.clone())
            .unwrap_or_default()
    }

    pub async fn reactions(&self, id: PostId) -> Vec<(String, String)> {
        self.lock()
            .await
            .posts
            .get(&id)
            .map(|post| post.reactions.clone())
            .unwrap_or_default()
    }

    pub async fn has_post(&self, id: PostId) -> bool {
        self.lock().await.posts.contains_key(&id)
    }

    pub fn router(&self) -> Router {
        let api = Router::new()
            .route(PATH_API_POST, delete(delete_post))
            .route(PATH_API_POST_LIKE, post(add_like).delete(delete_like))
            .route(PATH_API_POST_LIKES, get(get_likes))
            .route(PATH_API_POST_REACT, post(react))
            .route(
                PATH_API_POST_COMMENTS,
                get(get_comments).post(add_comment),
            )
            .route(PATH_API_POST_COMMENT, delete(delete_comment))
            .route(PATH_API_POST_SHARE, post(add_share))
            .route(PATH_API_POST_SHARES, get(get_shares))
            .route(PATH_API_POST_STATS, get(get_stats))
            .with_state(self.clone());

        Router::new().nest(PATH_API, api)
    }

    pub fn api(&self) -> anyhow::Result<ApiTest> {
        let server = TestServer::builder()
            .http_transport()
            .build(self.router())?;

        Ok(ApiTest {
            server: Arc::new(server),
            session: Session::guest(),
        })
    }
}

async fn add_like(
    State(backend): State<MockBackend>,
    Path(id): Path<PostId>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::AddLike)?;
    let viewer = state.viewer(&headers)?;
    let post = state.post(id)?;
    if !post.likes.iter().any(|like| like.username == viewer.username) {
        post.likes.push(Like::from(&viewer));
    }
    Ok(StatusCode::OK)
}

async fn delete_like(
    State(backend): State<MockBackend>,
    Path(id): Path<PostId>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::DeleteLike)?;
    let viewer = state.viewer(&headers)?;
    let post = state.post(id)?;
    post.likes.retain(|like| like.username != viewer.username);
    Ok(StatusCode::OK)
}

async fn get_likes(
    State(backend): State<MockBackend>,
    Path(id): Path<PostId>,
) -> Result<Json<Vec<Like>>, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::GetLikes)?;
    let post = state.post(id)?;
    Ok(Json(post.likes.clone()))
}

async fn react(
    State(backend): State<MockBackend>,
    Path(id): Path<PostId>,
    headers: HeaderMap,
    Json(reaction): Json<Reaction>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::React)?;
    let viewer = state.viewer(&headers)?;
    let post = state.post(id)?;
    post.reactions.push((viewer.username, reaction.emoji));
    Ok(StatusCode::OK)
}

async fn get_comments(
    State(backend): State<MockBackend>,
    Path(id): Path<PostId>,
) -> Result<Json<Vec<Comment>>, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::GetComments)?;
    let post = state.post(id)?;
    Ok(Json(post.comments.clone()))
}

async fn add_comment(
    State(backend): State<MockBackend>,
    Path(id): Path<PostId>,
    headers: HeaderMap,
    Json(new_comment): Json<NewComment>,
) -> Result<Json<Comment>, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::AddComment)?;
    let viewer = state.viewer(&headers)?;
    state.post(id)?;
    let timestamp = state.tick();
    state.next_comment_id += 1;
    let comment = Comment {
        id: state.next_comment_id,
        user: viewer,
        content: new_comment.content,
        timestamp,
        reply_to_id: new_comment.reply_to_id,
    };
    state.post(id)?.comments.push(comment.clone());
    Ok(Json(comment))
}

async fn delete_comment(
    State(backend): State<MockBackend>,
    Path((id, comment_id)): Path<(PostId, CommentId)>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::DeleteComment)?;
    let viewer = state.viewer(&headers)?;
    let post = state.post(id)?;
    let index = post
        .comments
        .iter()
        .position(|comment| comment.id == comment_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let allowed =
        post.author == viewer.username || post.comments[index].user.username == viewer.username;
    if !allowed {
        return Err(StatusCode::FORBIDDEN);
    }
    post.comments.remove(index);
    Ok(StatusCode::OK)
}

async fn add_share(
    State(backend): State<MockBackend>,
    Path(id): Path<PostId>,
    headers: HeaderMap,
    Json(share): Json<ShareReq>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::AddShare)?;
    state.viewer(&headers)?;
    let post = state.post(id)?;
    post.shares.push(share.platform);
    Ok(StatusCode::OK)
}

async fn get_shares(
    State(backend): State<MockBackend>,
    Path(id): Path<PostId>,
) -> Result<Json<ShareCount>, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::GetShares)?;
    let post = state.post(id)?;
    Ok(Json(ShareCount {
        count: post.shares.len() as u64,
    }))
}

async fn get_stats(
    State(backend): State<MockBackend>,
    Path(id): Path<PostId>,
) -> Result<Json<PostStats>, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::GetStats)?;
    let post = state.post(id)?;
    Ok(Json(PostStats {
        like_count: post.likes.len() as u64,
        comment_count: post.comments.len() as u64,
        share_count: post.shares.len() as u64,
    }))
}

async fn delete_post(
    State(backend): State<MockBackend>,
    Path(id): Path<PostId>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock().await;
    state.enter(MockRoute::DeletePost)?;
    let viewer = state.viewer(&headers)?;
    let post = state.post(id)?;
    if post.author != viewer.username {
        return Err(StatusCode::FORBIDDEN);
    }
    state.posts.remove(&id);
    Ok(StatusCode::OK)
}

#[derive(Clone)]
pub struct ApiTest {
    pub server: Arc<TestServer>,
    pub session: Session,
}

impl ApiTest {
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }
}

impl Api for ApiTest {
    fn provide_builder(&self, method: Method, path: impl AsRef<str>) -> RequestBuilder {
        let path = path.as_ref();
        let url = format!("{PATH_API}{path}");
        self.server.reqwest_method(method, &url)
    }

    fn provide_session(&self) -> &Session {
        &self.session
    }
}
