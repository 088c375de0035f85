use std::sync::Arc;
use std::time::Duration;

use mindmingle_api::{Api, ServerRes};
use mindmingle_api::settings::{Features, Settings};
use mindmingle_shared::Post;
use tokio::sync::watch;
use tracing::{error, trace};

pub mod comment;
pub mod like;
pub mod reconcile;
pub mod share;
pub mod store;

pub use comment::CommentOutcome;
pub use like::LikeOutcome;
pub use share::ShareOutcome;
pub use store::{CardStore, InteractionState, PostLikeStage};

#[derive(Debug, Clone, PartialEq)]
pub struct CardConfig {
    pub site_address: String,
    pub share_flash: Duration,
    pub features: Features,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self::from(&Settings::new_testing())
    }
}

impl From<&Settings> for CardConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            site_address: settings.site.address.clone(),
            share_flash: Duration::from_millis(settings.client.share_flash_ms),
            features: settings.features,
        }
    }
}

/// Interaction controls of one post. The card owns its [`InteractionState`]
/// exclusively and stops applying responses once it is unmounted or dropped.
pub struct PostCard<A: Api> {
    api: A,
    post: Post,
    config: CardConfig,
    store: Arc<CardStore>,
}

impl<A: Api> PostCard<A> {
    pub fn new(api: A, post: Post, config: CardConfig) -> Self {
        Self {
            api,
            post,
            config,
            store: Arc::new(CardStore::default()),
        }
    }

    /// Creates the card and pulls its counters from the server.
    pub async fn mount(api: A, post: Post, config: CardConfig) -> Self {
        let card = Self::new(api, post, config);
        trace!("mounting post card {}", card.post.id);
        card.hydrate().await;
        card
    }

    pub fn unmount(&self) {
        trace!("unmounting post card {}", self.post.id);
        self.store.kill();
    }

    pub fn is_mounted(&self) -> bool {
        self.store.is_alive()
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn state(&self) -> InteractionState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<InteractionState> {
        self.store.subscribe()
    }

    pub fn viewer(&self) -> Option<&str> {
        self.api.provide_session().username()
    }

    pub fn is_owner(&self) -> bool {
        self.post.is_owned_by(self.viewer())
    }

    fn is_logged_in(&self) -> bool {
        self.api.provide_session().is_logged_in()
    }

    /// Deletes the post for its owner and unmounts the card on success.
    pub async fn delete_post(&self) -> bool {
        let post_id = self.post.id;
        if !self.is_owner() || !self.store.is_alive() {
            trace!("delete_post: viewer does not own post {post_id}");
            return false;
        }
        let result = self
            .api
            .delete_post(post_id)
            .send_native()
            .await
            .and_then(ServerRes::into_ok);
        match result {
            Ok(()) => {
                trace!("post {post_id} deleted");
                self.unmount();
                true
            }
            Err(err) => {
                error!("delete_post: post {post_id}: {err}");
                false
            }
        }
    }
}

impl<A: Api> Drop for PostCard<A> {
    fn drop(&mut self) {
        self.store.kill();
    }
}
