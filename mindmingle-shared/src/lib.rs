pub mod comment;
pub mod like;
pub mod post;
pub mod share;

pub use comment::{Comment, CommentId, CommentRow, NewComment};
pub use like::{Like, LikeSummary, Reaction};
pub use post::{FileAttachment, Post, PostId, PostStats, UserSummary};
pub use share::{SharePlatform, ShareCount, ShareReq};

pub mod valid {
    use tracing::trace;

    pub fn process_comment<S: AsRef<str>>(content: S) -> Result<String, String> {
        let content = content.as_ref().trim().to_string();
        if content.is_blank() {
            trace!("empty comment");
            return Err("comment must not be empty".to_string());
        }

        Ok(content)
    }

    pub fn process_emoji<S: AsRef<str>>(emoji: S) -> Result<String, String> {
        let mut errors = String::new();
        let emoji = emoji.as_ref().trim().to_string();
        if emoji.is_blank() {
            errors += "emoji must not be empty\n";
        }
        if emoji.is_bigger_than(32) {
            errors += "emoji must be shorter than 33 bytes\n";
        }

        if errors.is_empty() {
            Ok(emoji)
        } else {
            let _ = errors.pop();
            trace!("errors {errors}");
            Err(errors)
        }
    }

    pub trait Validator {
        fn is_blank(&self) -> bool;
        fn is_bigger_than(&self, size: usize) -> bool;
    }

    impl<S: AsRef<str>> Validator for S {
        fn is_blank(&self) -> bool {
            self.as_ref().chars().all(|c| c.is_whitespace())
        }
        fn is_bigger_than(&self, size: usize) -> bool {
            self.as_ref().len() > size
        }
    }

}
