use std::time::Duration;

use http::Method;
use http::header::AUTHORIZATION;
use mindmingle_shared::{
    Comment, CommentId, Like, NewComment, PostId, PostStats, Reaction, ShareCount, SharePlatform,
    ShareReq,
};
use reqwest::RequestBuilder;
use thiserror::Error;
use tracing::{debug, error, trace};

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod path;
pub mod session;
pub mod settings;

pub use session::Session;

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq)]
pub enum ServerReq {
    Reaction(Reaction),
    Comment(NewComment),
    Share(ShareReq),
    None,
}

#[derive(Debug, Clone, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(ServerResKind), derive(strum::Display))]
pub enum ServerRes {
    Likes(Vec<Like>),
    Comments(Vec<Comment>),
    Comment(Comment),
    ShareCount(ShareCount),
    Stats(PostStats),
    Ok,
}

impl ServerRes {
    pub fn into_ok(self) -> Result<(), ApiErr> {
        match self {
            ServerRes::Ok => Ok(()),
            res => Err(ApiErr::Unexpected {
                expected: ServerResKind::Ok,
                received: ServerResKind::from(&res),
            }),
        }
    }
}

/// Any transport or server failure. Callers treat every variant the same way;
/// the variants only exist to make logs readable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiErr {
    #[error("failed to build client {0}")]
    Build(String),

    #[error("failed to send req {0}")]
    Send(String),

    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to deserialize res {0}")]
    Des(String),

    #[error("expected {expected}, received {received}")]
    Unexpected {
        expected: ServerResKind,
        received: ServerResKind,
    },
}

pub trait Api {
    fn provide_builder(&self, method: Method, path: impl AsRef<str>) -> RequestBuilder;
    fn provide_session(&self) -> &Session;

    fn into_req(
        &self,
        method: Method,
        path: impl AsRef<str>,
        req: ServerReq,
        expect: ServerResKind,
    ) -> ApiReq {
        ApiReq::from_api(self, method, path, req, expect)
    }

    // post like

    fn add_post_like(&self, post_id: PostId) -> ApiReq {
        self.into_req(
            Method::POST,
            path::link_post_like(post_id),
            ServerReq::None,
            ServerResKind::Ok,
        )
    }

    fn delete_post_like(&self, post_id: PostId) -> ApiReq {
        self.into_req(
            Method::DELETE,
            path::link_post_like(post_id),
            ServerReq::None,
            ServerResKind::Ok,
        )
    }

    fn get_post_likes(&self, post_id: PostId) -> ApiReq {
        self.into_req(
            Method::GET,
            path::link_post_likes(post_id),
            ServerReq::None,
            ServerResKind::Likes,
        )
    }

    fn add_post_reaction(&self, post_id: PostId, emoji: impl Into<String>) -> ApiReq {
        self.into_req(
            Method::POST,
            path::link_post_react(post_id),
            ServerReq::Reaction(Reaction {
                emoji: emoji.into(),
            }),
            ServerResKind::Ok,
        )
    }

    // post comment

    fn get_post_comments(&self, post_id: PostId) -> ApiReq {
        self.into_req(
            Method::GET,
            path::link_post_comments(post_id),
            ServerReq::None,
            ServerResKind::Comments,
        )
    }

    fn add_post_comment(&self, post_id: PostId, comment: NewComment) -> ApiReq {
        self.into_req(
            Method::POST,
            path::link_post_comments(post_id),
            ServerReq::Comment(comment),
            ServerResKind::Comment,
        )
    }

    fn delete_post_comment(&self, post_id: PostId, comment_id: CommentId) -> ApiReq {
        self.into_req(
            Method::DELETE,
            path::link_post_comment(post_id, comment_id),
            ServerReq::None,
            ServerResKind::Ok,
        )
    }

    // post share

    fn add_post_share(&self, post_id: PostId, platform: SharePlatform) -> ApiReq {
        self.into_req(
            Method::POST,
            path::link_post_share(post_id),
            ServerReq::Share(ShareReq { platform }),
            ServerResKind::Ok,
        )
    }

    fn get_post_shares(&self, post_id: PostId) -> ApiReq {
        self.into_req(
            Method::GET,
            path::link_post_shares(post_id),
            ServerReq::None,
            ServerResKind::ShareCount,
        )
    }

    //

    fn get_post_stats(&self, post_id: PostId) -> ApiReq {
        self.into_req(
            Method::GET,
            path::link_post_stats(post_id),
            ServerReq::None,
            ServerResKind::Stats,
        )
    }

    fn delete_post(&self, post_id: PostId) -> ApiReq {
        self.into_req(
            Method::DELETE,
            path::link_post(post_id),
            ServerReq::None,
            ServerResKind::Ok,
        )
    }
}

pub struct ApiReq {
    pub builder: RequestBuilder,
    pub server_req: ServerReq,
    pub expect: ServerResKind,
}

impl ApiReq {
    pub fn from_api<A>(
        api: &A,
        method: Method,
        path: impl AsRef<str>,
        req: ServerReq,
        expect: ServerResKind,
    ) -> Self
    where
        A: Api + ?Sized,
    {
        let mut builder = api.provide_builder(method, path.as_ref());
        if let Some(bearer) = api.provide_session().bearer() {
            builder = builder.header(AUTHORIZATION, bearer);
        }
        ApiReq {
            builder,
            server_req: req,
            expect,
        }
    }

    pub async fn send_native(self) -> Result<ServerRes, ApiErr> {
        send(self.builder, self.server_req, self.expect).await
    }
}

pub async fn send(
    req_builder: RequestBuilder,
    req: ServerReq,
    expect: ServerResKind,
) -> Result<ServerRes, ApiErr> {
    debug!("CLIENT SEND:\n{req:?}");
    let req_builder = match &req {
        ServerReq::Reaction(body) => req_builder.json(body),
        ServerReq::Comment(body) => req_builder.json(body),
        ServerReq::Share(body) => req_builder.json(body),
        ServerReq::None => req_builder,
    };
    let res = req_builder
        .send()
        .await
        .inspect_err(|err| error!("client failed to send {err}"))
        .map_err(|err| ApiErr::Send(err.to_string()))?;

    let status = res.status();
    let bytes = res
        .bytes()
        .await
        .inspect_err(|err| error!("client byte stream status {status}\nerr: {err}"))
        .map_err(|err| ApiErr::Des(err.to_string()))?;

    if !status.is_success() {
        let body = String::from_utf8_lossy(&bytes).into_owned();
        debug!("CLIENT RECV:\nstatus: {status}\n{body}");
        return Err(ApiErr::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = decode(expect, &bytes);
    debug!("CLIENT RECV:\nstatus: {status}\n{body:?}");

    body
}

fn decode(expect: ServerResKind, bytes: &[u8]) -> Result<ServerRes, ApiErr> {
    fn json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiErr> {
        serde_json::from_slice(bytes)
            .inspect_err(|err| error!("{err} CLIENT RECV:\n{}", String::from_utf8_lossy(bytes)))
            .map_err(|err| ApiErr::Des(err.to_string()))
    }

    let res = match expect {
        ServerResKind::Likes => ServerRes::Likes(json(bytes)?),
        ServerResKind::Comments => ServerRes::Comments(json(bytes)?),
        ServerResKind::Comment => ServerRes::Comment(json(bytes)?),
        ServerResKind::ShareCount => ServerRes::ShareCount(json(bytes)?),
        ServerResKind::Stats => ServerRes::Stats(json(bytes)?),
        ServerResKind::Ok => {
            trace!("ignoring {} byte body", bytes.len());
            ServerRes::Ok
        }
    };

    Ok(res)
}

#[derive(Clone, Debug)]
pub struct ApiNative {
    pub origin: String,
    pub session: Session,
    client: reqwest::Client,
}

impl Api for ApiNative {
    fn provide_builder(&self, method: Method, path: impl AsRef<str>) -> RequestBuilder {
        let origin = self.origin.trim_end_matches('/');
        let path = path.as_ref();
        let url = format!("{origin}{}{path}", path::PATH_API);
        self.client.request(method, url)
    }

    fn provide_session(&self) -> &Session {
        &self.session
    }
}

impl ApiNative {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            session: Session::guest(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiErr> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.client.timeout_ms))
            .build()
            .map_err(|err| ApiErr::Build(err.to_string()))?;

        Ok(Self {
            origin: settings.site.api_origin.clone(),
            session: Session::guest(),
            client,
        })
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }
}
