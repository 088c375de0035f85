use jiff::Timestamp;

use crate::post::UserSummary;

pub type CommentId = i64;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub user: UserSummary,
    pub content: String,
    /// epoch milliseconds
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<CommentId>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.reply_to_id.is_some()
    }

    /// Replies are rendered one level deep no matter how deep the chain goes.
    pub fn indent(&self) -> u8 {
        if self.is_reply() { 1 } else { 0 }
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        Timestamp::from_millisecond(self.timestamp).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<CommentId>,
}

impl NewComment {
    pub fn new(content: impl Into<String>, reply_to: Option<&Comment>) -> Self {
        Self {
            content: content.into(),
            reply_to_id: reply_to.map(|comment| comment.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRow<'a> {
    pub indent: u8,
    pub comment: &'a Comment,
}

impl<'a> From<&'a Comment> for CommentRow<'a> {
    fn from(comment: &'a Comment) -> Self {
        Self {
            indent: comment.indent(),
            comment,
        }
    }
}

#[cfg(test)]
mod comment_tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::{Comment, CommentRow, NewComment};
    use crate::post::UserSummary;

    fn comment(id: i64, reply_to_id: Option<i64>) -> Comment {
        Comment {
            id,
            user: UserSummary::new("hey", "Hey"),
            content: format!("comment {id}"),
            timestamp: 1,
            reply_to_id,
        }
    }

    #[test]
    fn test_new_comment_payload() {
        let parent = comment(3, None);

        let top = serde_json::to_string(&NewComment::new("hi", None)).unwrap();
        assert_eq!(top, r#"{"content":"hi"}"#);

        let reply = serde_json::to_string(&NewComment::new("hi", Some(&parent))).unwrap();
        assert_eq!(reply, r#"{"content":"hi","replyToId":3}"#);
    }

    #[test]
    fn test_comment_indent_is_single_level() {
        let comments = [comment(1, None), comment(2, Some(1)), comment(3, Some(2))];
        let indents = comments
            .iter()
            .map(CommentRow::from)
            .map(|row| row.indent)
            .collect::<Vec<u8>>();
        assert_eq!(indents, vec![0, 1, 1]);
    }

    #[test]
    fn test_comment_wire_format() {
        let json = r#"{"id":5,"user":{"username":"a","displayName":"A"},"content":"x","timestamp":10,"replyToId":2}"#;
        let decoded: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.reply_to_id, Some(2));
        assert!(decoded.is_reply());
    }
}
