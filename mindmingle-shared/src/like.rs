use crate::post::UserSummary;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<&UserSummary> for Like {
    fn from(user: &UserSummary) -> Self {
        Self {
            username: user.username.clone(),
            display_name: Some(user.display_name.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeSummary {
    pub count: u64,
    pub viewer_has_liked: bool,
}

impl LikeSummary {
    pub fn from_likes(likes: &[Like], viewer: Option<&str>) -> Self {
        let viewer_has_liked = viewer
            .map(|viewer| likes.iter().any(|like| like.username == viewer))
            .unwrap_or_default();

        Self {
            count: likes.len() as u64,
            viewer_has_liked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Reaction {
    pub emoji: String,
}
