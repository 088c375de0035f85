use mindmingle_api::{Api, ServerRes};
use mindmingle_shared::{LikeSummary, PostStats};
use tracing::{error, trace};

use super::PostCard;
use super::store::InteractionState;

impl<A: Api> PostCard<A> {
    /// Fetches likes and shares concurrently and overwrites the local counters.
    pub async fn hydrate(&self) {
        futures::join!(self.fetch_likes(), self.fetch_share_count());
    }

    pub async fn fetch_likes(&self) -> Option<LikeSummary> {
        if !self.store.is_alive() {
            return None;
        }
        let post_id = self.post.id;
        let res = self.api.get_post_likes(post_id).send_native().await;
        match res {
            Ok(ServerRes::Likes(likes)) => {
                let summary = LikeSummary::from_likes(&likes, self.viewer());
                trace!("post {post_id} likes {summary:?}");
                self.store
                    .update(|state| state.set_likes(summary))
                    .map(|_| summary)
            }
            Ok(res) => {
                error!("fetch_likes: expected ServerRes::Likes, received: {res:?}");
                None
            }
            Err(err) => {
                error!("fetch_likes: post {post_id}: {err}");
                None
            }
        }
    }

    pub async fn fetch_share_count(&self) -> Option<u64> {
        if !self.store.is_alive() {
            return None;
        }
        let post_id = self.post.id;
        let res = self.api.get_post_shares(post_id).send_native().await;
        match res {
            Ok(ServerRes::ShareCount(share_count)) => self
                .store
                .update(|state| state.set_share_count(share_count.count))
                .map(|_| share_count.count),
            Ok(res) => {
                error!("fetch_share_count: expected ServerRes::ShareCount, received: {res:?}");
                None
            }
            Err(err) => {
                error!("fetch_share_count: post {post_id}: {err}");
                None
            }
        }
    }

    /// Replaces the comment list with the server's. Returns how many
    /// comments were applied.
    pub async fn fetch_comments(&self) -> Option<usize> {
        if !self.store.is_alive() {
            return None;
        }
        let post_id = self.post.id;
        let res = self.api.get_post_comments(post_id).send_native().await;
        let applied = match res {
            Ok(ServerRes::Comments(comments)) => {
                let len = comments.len();
                trace!("post {post_id} has {len} comments");
                self.store
                    .update(|state| state.replace_comments(comments))
                    .map(|_| len)
            }
            Ok(res) => {
                error!("fetch_comments: expected ServerRes::Comments, received: {res:?}");
                None
            }
            Err(err) => {
                error!("fetch_comments: post {post_id}: {err}");
                None
            }
        };
        self.store.update(InteractionState::end_comment_fetch);

        applied
    }

    pub async fn fetch_stats(&self) -> Option<PostStats> {
        if !self.store.is_alive() {
            return None;
        }
        let post_id = self.post.id;
        let res = self.api.get_post_stats(post_id).send_native().await;
        match res {
            Ok(ServerRes::Stats(stats)) => self
                .store
                .update(|state| state.set_stats(stats))
                .map(|_| stats),
            Ok(res) => {
                error!("fetch_stats: expected ServerRes::Stats, received: {res:?}");
                None
            }
            Err(err) => {
                error!("fetch_stats: post {post_id}: {err}");
                None
            }
        }
    }
}
