use mindmingle_shared::{CommentId, PostId};

pub const PATH_API: &'static str = "/api/1.0";

// route templates, used by the mock backend router
pub const PATH_API_POST: &'static str = "/posts/{id}";
pub const PATH_API_POST_LIKE: &'static str = "/posts/{id}/like";
pub const PATH_API_POST_LIKES: &'static str = "/posts/{id}/likes";
pub const PATH_API_POST_REACT: &'static str = "/posts/{id}/react";
pub const PATH_API_POST_COMMENTS: &'static str = "/posts/{id}/comments";
pub const PATH_API_POST_COMMENT: &'static str = "/posts/{id}/comments/{comment_id}";
pub const PATH_API_POST_SHARE: &'static str = "/posts/{id}/share";
pub const PATH_API_POST_SHARES: &'static str = "/posts/{id}/shares";
pub const PATH_API_POST_STATS: &'static str = "/posts/{id}/stats";

pub fn link_post(post_id: PostId) -> String {
    format!("/posts/{post_id}")
}

pub fn link_post_like(post_id: PostId) -> String {
    format!("/posts/{post_id}/like")
}

pub fn link_post_likes(post_id: PostId) -> String {
    format!("/posts/{post_id}/likes")
}

pub fn link_post_react(post_id: PostId) -> String {
    format!("/posts/{post_id}/react")
}

pub fn link_post_comments(post_id: PostId) -> String {
    format!("/posts/{post_id}/comments")
}

pub fn link_post_comment(post_id: PostId, comment_id: CommentId) -> String {
    format!("/posts/{post_id}/comments/{comment_id}")
}

pub fn link_post_share(post_id: PostId) -> String {
    format!("/posts/{post_id}/share")
}

pub fn link_post_shares(post_id: PostId) -> String {
    format!("/posts/{post_id}/shares")
}

pub fn link_post_stats(post_id: PostId) -> String {
    format!("/posts/{post_id}/stats")
}

/// Public page of a post, shared to external platforms.
pub fn link_post_page(site_address: impl AsRef<str>, post_id: PostId) -> String {
    format!(
        "{}/posts/{post_id}",
        site_address.as_ref().trim_end_matches('/')
    )
}

#[cfg(test)]
mod path_tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn test_links_match_templates() {
        let fill = |template: &str| {
            template
                .replace("{id}", "12")
                .replace("{comment_id}", "3")
        };
        assert_eq!(link_post(12), fill(PATH_API_POST));
        assert_eq!(link_post_like(12), fill(PATH_API_POST_LIKE));
        assert_eq!(link_post_likes(12), fill(PATH_API_POST_LIKES));
        assert_eq!(link_post_react(12), fill(PATH_API_POST_REACT));
        assert_eq!(link_post_comments(12), fill(PATH_API_POST_COMMENTS));
        assert_eq!(link_post_comment(12, 3), fill(PATH_API_POST_COMMENT));
        assert_eq!(link_post_share(12), fill(PATH_API_POST_SHARE));
        assert_eq!(link_post_shares(12), fill(PATH_API_POST_SHARES));
        assert_eq!(link_post_stats(12), fill(PATH_API_POST_STATS));
    }

    #[test]
    fn test_link_post_page() {
        assert_eq!(
            link_post_page("http://localhost:3000/", 5),
            "http://localhost:3000/posts/5"
        );
        assert_eq!(
            link_post_page("https://mindmingle.app", 5),
            "https://mindmingle.app/posts/5"
        );
    }
}
