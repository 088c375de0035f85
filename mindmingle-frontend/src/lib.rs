pub mod post_card;
pub mod share_target;

pub use post_card::{
    CardConfig, CommentOutcome, InteractionState, LikeOutcome, PostCard, PostLikeStage,
    ShareOutcome,
};
pub use share_target::{ShareErr, ShareTarget, share_url};
