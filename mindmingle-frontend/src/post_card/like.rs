use mindmingle_api::{Api, ServerRes};
use mindmingle_shared::valid;
use tracing::{error, trace, warn};

use super::PostCard;
use super::store::{InteractionState, PostLikeStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIs)]
#[strum(serialize_all = "lowercase")]
pub enum LikeOutcome {
    /// no request was sent
    Skipped,
    Committed,
    /// the server refused and the counters were resynced
    RolledBack,
}

impl<A: Api> PostCard<A> {
    pub fn like_stage(&self) -> PostLikeStage {
        self.store.read(InteractionState::like_stage)
    }

    /// Likes or unlikes the post for the viewer, showing the result before
    /// the server confirms it.
    pub async fn toggle_like(&self) -> LikeOutcome {
        let post_id = self.post.id;
        if !self.config.features.likes {
            trace!("toggle_like: likes disabled");
            return LikeOutcome::Skipped;
        }
        if !self.is_logged_in() {
            trace!("toggle_like: viewer not logged in");
            return LikeOutcome::Skipped;
        }
        let liked = match self.store.update(InteractionState::begin_like_toggle) {
            Some(Some(liked)) => liked,
            Some(None) => {
                warn!("toggle_like: post {post_id} like already pending");
                return LikeOutcome::Skipped;
            }
            None => return LikeOutcome::Skipped,
        };

        let req = if liked {
            self.api.add_post_like(post_id)
        } else {
            self.api.delete_post_like(post_id)
        };
        let result = req.send_native().await.and_then(ServerRes::into_ok);

        let outcome = match result {
            Ok(()) => {
                trace!("post {post_id} liked: {liked}");
                LikeOutcome::Committed
            }
            Err(err) => {
                error!("toggle_like: post {post_id} liked: {liked}: {err}");
                self.fetch_likes().await;
                LikeOutcome::RolledBack
            }
        };
        self.store.update(InteractionState::end_like_toggle);

        outcome
    }

    /// Sends an emoji reaction, then refetches likes whatever the outcome.
    /// Returns false when nothing was sent.
    pub async fn react(&self, emoji: impl AsRef<str>) -> bool {
        let post_id = self.post.id;
        if !self.config.features.reactions {
            trace!("react: reactions disabled");
            return false;
        }
        if !self.is_logged_in() || !self.store.is_alive() {
            trace!("react: viewer not logged in or card unmounted");
            return false;
        }
        let emoji = match valid::process_emoji(emoji) {
            Ok(emoji) => emoji,
            Err(err) => {
                trace!("react: {err}");
                return false;
            }
        };

        let result = self
            .api
            .add_post_reaction(post_id, emoji)
            .send_native()
            .await
            .and_then(ServerRes::into_ok);
        if let Err(err) = result {
            error!("react: post {post_id}: {err}");
        }
        self.fetch_likes().await;

        true
    }
}

#[cfg(test)]
mod like_tests {
    use mindmingle_api::mock::MockRoute;
    use mindmingle_api::settings::Features;
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::LikeOutcome;
    use crate::post_card::CardConfig;
    use crate::post_card::card_test_util::{POST_ID, backend, card, card_with};
    use crate::post_card::store::PostLikeStage;

    #[test(tokio::test)]
    async fn like_optimistic_then_committed() {
        let backend = backend(5).await;
        let card = card(&backend, Some("hey")).await;

        let (outcome, in_flight) = tokio::join!(card.toggle_like(), async { card.state() });
        assert_eq!(outcome, LikeOutcome::Committed);
        assert_eq!((in_flight.like_count, in_flight.user_liked), (6, true));
        assert_eq!(in_flight.like_stage(), PostLikeStage::Pending);

        let state = card.state();
        assert_eq!((state.like_count, state.user_liked), (6, true));
        assert_eq!(card.like_stage(), PostLikeStage::Liked);
        assert_eq!(backend.like_count(POST_ID).await, 6);
        assert_eq!(backend.calls(MockRoute::GetLikes).await, 1);
    }

    #[test(tokio::test)]
    async fn like_unlike_like() {
        let backend = backend(3).await;
        let card = card(&backend, Some("hey")).await;

        assert!(card.toggle_like().await.is_committed());
        assert!(card.toggle_like().await.is_committed());
        assert_eq!((card.state().like_count, card.state().user_liked), (3, false));
        assert!(card.toggle_like().await.is_committed());

        let state = card.state();
        assert_eq!((state.like_count, state.user_liked), (4, true));
        assert_eq!(backend.calls(MockRoute::DeleteLike).await, 1);
        assert_eq!(backend.calls(MockRoute::AddLike).await, 2);
    }

    #[test(tokio::test)]
    async fn like_failure_resyncs_with_server() {
        let backend = backend(5).await;
        let card = card(&backend, Some("hey")).await;
        backend.add_like(POST_ID, "bob").await;
        backend.fail(MockRoute::AddLike).await;

        assert_eq!(card.toggle_like().await, LikeOutcome::RolledBack);
        let state = card.state();
        assert_eq!((state.like_count, state.user_liked), (6, false));
        assert!(!state.like_pending);
        assert_eq!(backend.calls(MockRoute::GetLikes).await, 2);
    }

    #[test(tokio::test)]
    async fn like_failed_resync_keeps_optimistic_state() {
        let backend = backend(5).await;
        let card = card(&backend, Some("hey")).await;
        backend.fail(MockRoute::AddLike).await;
        backend.fail(MockRoute::GetLikes).await;

        assert_eq!(card.toggle_like().await, LikeOutcome::RolledBack);
        let state = card.state();
        assert_eq!((state.like_count, state.user_liked), (6, true));
        assert_eq!(card.like_stage(), PostLikeStage::Liked);
    }

    #[test(tokio::test)]
    async fn like_guest_is_noop() {
        let backend = backend(5).await;
        let card = card(&backend, None).await;
        let before = card.state();

        assert_eq!(card.toggle_like().await, LikeOutcome::Skipped);
        assert_eq!(card.state(), before);
        assert_eq!(backend.calls(MockRoute::AddLike).await, 0);
    }

    #[test(tokio::test)]
    async fn like_rejects_second_toggle_while_pending() {
        let backend = backend(5).await;
        let card = card(&backend, Some("hey")).await;

        let (first, second) = tokio::join!(card.toggle_like(), card.toggle_like());
        assert_eq!(first, LikeOutcome::Committed);
        assert_eq!(second, LikeOutcome::Skipped);
        assert_eq!((card.state().like_count, card.state().user_liked), (6, true));
        assert_eq!(backend.calls(MockRoute::AddLike).await, 1);
        assert_eq!(backend.calls(MockRoute::DeleteLike).await, 0);
    }

    #[test(tokio::test)]
    async fn like_disabled_feature() {
        let backend = backend(5).await;
        let config = CardConfig {
            features: Features {
                likes: false,
                ..Features::default()
            },
            ..CardConfig::default()
        };
        let card = card_with(&backend, Some("hey"), config).await;

        assert!(card.toggle_like().await.is_skipped());
        assert_eq!(backend.calls(MockRoute::AddLike).await, 0);
    }

    #[test(tokio::test)]
    async fn react_refetches_likes() {
        let backend = backend(1).await;
        let card = card(&backend, Some("hey")).await;
        backend.add_like(POST_ID, "bob").await;

        assert!(card.react("🔥").await);
        assert_eq!(card.state().like_count, 2);
        assert_eq!(
            backend.reactions(POST_ID).await,
            vec![("hey".to_string(), "🔥".to_string())]
        );

        backend.fail(MockRoute::React).await;
        backend.add_like(POST_ID, "carl").await;
        assert!(card.react("👍").await);
        assert_eq!(card.state().like_count, 3);
        assert_eq!(backend.calls(MockRoute::GetLikes).await, 3);
    }

    #[test(tokio::test)]
    async fn react_blank_or_guest_is_noop() {
        let backend = backend(1).await;
        let viewer = card(&backend, Some("hey")).await;
        assert!(!viewer.react("  ").await);

        let guest = card(&backend, None).await;
        assert!(!guest.react("🔥").await);
        assert_eq!(backend.calls(MockRoute::React).await, 0);
    }
}
