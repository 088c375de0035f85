use mindmingle_api::{Api, ServerRes};
use mindmingle_shared::{Comment, CommentId, NewComment, valid};
use tracing::{error, trace};

use super::PostCard;
use super::store::InteractionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIs)]
#[strum(serialize_all = "lowercase")]
pub enum CommentOutcome {
    Skipped,
    Submitted,
    Deleted,
    Failed,
}

impl<A: Api> PostCard<A> {
    /// Shows the comment panel, fetching the comments the first time only.
    pub async fn open_comments(&self) {
        if !self.config.features.comments {
            trace!("open_comments: comments disabled");
            return;
        }
        if let Some(true) = self.store.update(InteractionState::open_comments) {
            self.fetch_comments().await;
        }
    }

    pub fn close_comments(&self) {
        self.store.update(InteractionState::close_comments);
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        let draft = draft.into();
        self.store.update(|state| state.set_draft(draft));
    }

    pub fn reply_to(&self, comment: &Comment) {
        let comment = comment.clone();
        self.store
            .update(|state| state.set_reply_target(Some(comment)));
    }

    pub fn cancel_reply(&self) {
        self.store.update(|state| state.set_reply_target(None));
    }

    pub async fn submit_comment(&self) -> CommentOutcome {
        let post_id = self.post.id;
        if !self.config.features.comments || !self.is_logged_in() {
            trace!("submit_comment: comments disabled or viewer not logged in");
            return CommentOutcome::Skipped;
        }
        let (draft, reply_to_id) = self.store.read(|state| {
            (
                state.draft.clone(),
                state.reply_target.as_ref().map(|comment| comment.id),
            )
        });
        let content = match valid::process_comment(draft) {
            Ok(content) => content,
            Err(err) => {
                trace!("submit_comment: {err}");
                return CommentOutcome::Skipped;
            }
        };
        if !self.store.is_alive() {
            return CommentOutcome::Skipped;
        }

        let new_comment = NewComment {
            content,
            reply_to_id,
        };
        let res = self
            .api
            .add_post_comment(post_id, new_comment)
            .send_native()
            .await;
        match res {
            Ok(ServerRes::Comment(comment)) => {
                trace!("post {post_id} comment {} added", comment.id);
                self.store.update(InteractionState::clear_draft);
                self.fetch_comments().await;
                CommentOutcome::Submitted
            }
            Ok(res) => {
                error!("submit_comment: expected ServerRes::Comment, received: {res:?}");
                CommentOutcome::Failed
            }
            Err(err) => {
                error!("submit_comment: post {post_id}: {err}");
                CommentOutcome::Failed
            }
        }
    }

    /// Only the comment's author or the post's owner may delete it.
    pub fn can_delete_comment(&self, comment: &Comment) -> bool {
        let Some(viewer) = self.viewer() else {
            return false;
        };
        comment.user.username == viewer || self.is_owner()
    }

    pub async fn delete_comment(&self, comment_id: CommentId) -> CommentOutcome {
        let post_id = self.post.id;
        if !self.config.features.comments || !self.store.is_alive() {
            return CommentOutcome::Skipped;
        }
        let allowed = self.store.read(|state| {
            state
                .comments
                .iter()
                .find(|comment| comment.id == comment_id)
                .map(|comment| self.can_delete_comment(comment))
                .unwrap_or_default()
        });
        if !allowed {
            trace!("delete_comment: viewer may not delete comment {comment_id}");
            return CommentOutcome::Skipped;
        }

        let result = self
            .api
            .delete_post_comment(post_id, comment_id)
            .send_native()
            .await
            .and_then(ServerRes::into_ok);
        match result {
            Ok(()) => {
                trace!("post {post_id} comment {comment_id} deleted");
                self.fetch_comments().await;
                CommentOutcome::Deleted
            }
            Err(err) => {
                error!("delete_comment: post {post_id} comment {comment_id}: {err}");
                CommentOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod comment_tests {
    use mindmingle_api::mock::MockRoute;
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::CommentOutcome;
    use crate::post_card::card_test_util::{POST_ID, backend, card};

    #[test(tokio::test)]
    async fn comment_panel_fetches_once() {
        let backend = backend(0).await;
        backend.add_comment(POST_ID, "author", "welcome", None).await;
        let card = card(&backend, Some("hey")).await;

        card.open_comments().await;
        card.close_comments();
        card.open_comments().await;

        let state = card.state();
        assert!(state.comments_open);
        assert_eq!(state.comments.len(), 1);
        assert_eq!(backend.calls(MockRoute::GetComments).await, 1);
    }

    #[test(tokio::test)]
    async fn comment_panel_reopen_while_loading() {
        let backend = backend(0).await;
        backend.add_comment(POST_ID, "author", "welcome", None).await;
        let card = card(&backend, Some("hey")).await;

        tokio::join!(card.open_comments(), async {
            card.close_comments();
            card.open_comments().await
        });

        let state = card.state();
        assert!(state.comments_open);
        assert!(state.comments_loaded);
        assert!(!state.comments_loading);
        assert_eq!(state.comments.len(), 1);
        assert_eq!(backend.calls(MockRoute::GetComments).await, 1);
    }

    #[test(tokio::test)]
    async fn comment_panel_retries_after_failure() {
        let backend = backend(0).await;
        let card = card(&backend, Some("hey")).await;

        backend.fail(MockRoute::GetComments).await;
        card.open_comments().await;
        assert!(!card.state().comments_loaded);

        backend.heal(MockRoute::GetComments).await;
        card.open_comments().await;
        assert!(card.state().comments_loaded);
        assert_eq!(backend.calls(MockRoute::GetComments).await, 2);
    }

    #[test(tokio::test)]
    async fn comment_empty_is_noop() {
        let backend = backend(0).await;
        let card = card(&backend, Some("hey")).await;
        card.set_draft("   \n ");
        let before = card.state();

        assert_eq!(card.submit_comment().await, CommentOutcome::Skipped);
        assert_eq!(card.state(), before);
        assert_eq!(backend.calls(MockRoute::AddComment).await, 0);
    }

    #[test(tokio::test)]
    async fn comment_reply_refreshes_list() {
        let backend = backend(0).await;
        let parent = backend
            .add_comment(POST_ID, "author", "welcome", None)
            .await
            .unwrap();
        let card = card(&backend, Some("hey")).await;
        card.open_comments().await;

        card.reply_to(&parent);
        card.set_draft("  thanks ");
        assert_eq!(card.submit_comment().await, CommentOutcome::Submitted);

        let state = card.state();
        assert_eq!(state.draft, "");
        assert_eq!(state.reply_target, None);
        let reply = state
            .comments
            .iter()
            .find(|comment| comment.reply_to_id == Some(parent.id))
            .unwrap();
        assert_eq!(reply.content, "thanks");
        assert_eq!(
            state.comment_rows().map(|row| row.indent).collect::<Vec<u8>>(),
            vec![0, 1]
        );
        assert_eq!(backend.calls(MockRoute::GetComments).await, 2);
    }

    #[test(tokio::test)]
    async fn comment_failure_keeps_draft() {
        let backend = backend(0).await;
        let card = card(&backend, Some("hey")).await;
        backend.fail(MockRoute::AddComment).await;

        card.set_draft("hello");
        assert_eq!(card.submit_comment().await, CommentOutcome::Failed);
        assert_eq!(card.state().draft, "hello");
        assert_eq!(backend.calls(MockRoute::GetComments).await, 0);
    }

    #[test(tokio::test)]
    async fn comment_guest_is_noop() {
        let backend = backend(0).await;
        let card = card(&backend, None).await;
        card.set_draft("hello");
        assert!(card.submit_comment().await.is_skipped());
        assert_eq!(backend.calls(MockRoute::AddComment).await, 0);
    }

    #[test(tokio::test)]
    async fn comment_delete_permissions() {
        let backend = backend(0).await;
        let mine = backend
            .add_comment(POST_ID, "hey", "mine", None)
            .await
            .unwrap();
        let theirs = backend
            .add_comment(POST_ID, "bob", "theirs", None)
            .await
            .unwrap();

        let viewer = card(&backend, Some("hey")).await;
        viewer.open_comments().await;
        assert!(viewer.delete_comment(theirs.id).await.is_skipped());
        assert_eq!(viewer.delete_comment(mine.id).await, CommentOutcome::Deleted);
        assert_eq!(viewer.state().comments.len(), 1);

        let owner = card(&backend, Some("author")).await;
        owner.open_comments().await;
        assert_eq!(owner.delete_comment(theirs.id).await, CommentOutcome::Deleted);
        assert!(owner.state().comments.is_empty());
        assert_eq!(backend.calls(MockRoute::DeleteComment).await, 2);
    }
}
