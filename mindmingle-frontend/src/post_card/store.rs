use std::sync::atomic::{AtomicBool, Ordering};

use mindmingle_shared::{Comment, CommentRow, LikeSummary, PostStats};
use tokio::sync::watch;
use tracing::trace;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIs)]
#[strum(serialize_all = "lowercase")]
pub enum PostLikeStage {
    Pending,
    Liked,
    #[default]
    Unliked,
}

/// Interaction counters and comment panel state of a single post card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    pub like_count: u64,
    pub user_liked: bool,
    pub like_pending: bool,
    pub share_count: u64,
    pub share_success: bool,
    pub comments: Vec<Comment>,
    /// known from the stats endpoint before the comments are loaded
    pub comment_count: Option<u64>,
    pub comments_open: bool,
    pub comments_loading: bool,
    pub comments_loaded: bool,
    pub reply_target: Option<Comment>,
    pub draft: String,
}

impl InteractionState {
    pub fn set_likes(&mut self, summary: LikeSummary) {
        self.like_count = summary.count;
        self.user_liked = summary.viewer_has_liked;
    }

    /// Flips the viewer's like and moves the counter with it. Returns the new
    /// like value, or `None` while a previous toggle is still in flight.
    pub fn begin_like_toggle(&mut self) -> Option<bool> {
        if self.like_pending {
            return None;
        }
        let liked = !self.user_liked;
        self.user_liked = liked;
        self.like_count = if liked {
            self.like_count + 1
        } else {
            self.like_count.saturating_sub(1)
        };
        self.like_pending = true;
        Some(liked)
    }

    pub fn end_like_toggle(&mut self) {
        self.like_pending = false;
    }

    pub fn like_stage(&self) -> PostLikeStage {
        if self.like_pending {
            PostLikeStage::Pending
        } else if self.user_liked {
            PostLikeStage::Liked
        } else {
            PostLikeStage::Unliked
        }
    }

    pub fn set_share_count(&mut self, count: u64) {
        self.share_count = count;
    }

    pub fn bump_share_count(&mut self) {
        self.share_count += 1;
    }

    pub fn set_share_success(&mut self, success: bool) {
        self.share_success = success;
    }

    /// Leaves `like_count` alone while a like is pending so it keeps moving
    /// together with `user_liked`.
    pub fn set_stats(&mut self, stats: PostStats) {
        if !self.like_pending {
            self.like_count = stats.like_count;
        }
        self.share_count = stats.share_count;
        self.comment_count = Some(stats.comment_count);
    }

    pub fn replace_comments(&mut self, comments: Vec<Comment>) {
        self.comment_count = Some(comments.len() as u64);
        self.comments = comments;
        self.comments_loaded = true;
    }

    /// Returns true when the panel has never been filled and no fetch is in
    /// flight. The caller then owns the fetch.
    pub fn open_comments(&mut self) -> bool {
        self.comments_open = true;
        if self.comments_loaded || self.comments_loading {
            return false;
        }
        self.comments_loading = true;
        true
    }

    pub fn end_comment_fetch(&mut self) {
        self.comments_loading = false;
    }

    pub fn close_comments(&mut self) {
        self.comments_open = false;
    }

    pub fn set_draft(&mut self, draft: String) {
        self.draft = draft;
    }

    pub fn set_reply_target(&mut self, comment: Option<Comment>) {
        self.reply_target = comment;
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
        self.reply_target = None;
    }

    pub fn comment_rows(&self) -> impl Iterator<Item = CommentRow<'_>> {
        self.comments.iter().map(CommentRow::from)
    }
}

/// Owns a card's state and its liveness. Writes after [`CardStore::kill`]
/// are dropped so late responses never touch an unmounted card.
#[derive(Debug)]
pub struct CardStore {
    state: watch::Sender<InteractionState>,
    alive: AtomicBool,
}

impl CardStore {
    pub fn new(state: InteractionState) -> Self {
        Self {
            state: watch::Sender::new(state),
            alive: AtomicBool::new(true),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn kill(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut InteractionState) -> R) -> Option<R> {
        if !self.is_alive() {
            trace!("card unmounted, dropping update");
            return None;
        }
        let mut output = None;
        self.state.send_modify(|state| output = Some(f(state)));
        output
    }

    pub fn read<R>(&self, f: impl FnOnce(&InteractionState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn snapshot(&self) -> InteractionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InteractionState> {
        self.state.subscribe()
    }
}

impl Default for CardStore {
    fn default() -> Self {
        Self::new(InteractionState::default())
    }
}
