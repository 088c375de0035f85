use jiff::Timestamp;

pub type PostId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl UserSummary {
    pub fn new(username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
            profile_image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub name: String,
    pub file_type: String,
}

impl FileAttachment {
    pub fn is_image(&self) -> bool {
        self.file_type.starts_with("image")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub user: UserSummary,
    pub content: String,
    /// epoch milliseconds
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_attachment: Option<FileAttachment>,
}

impl Post {
    pub fn is_owned_by(&self, viewer: Option<&str>) -> bool {
        viewer
            .map(|viewer| viewer == self.user.username)
            .unwrap_or_default()
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        Timestamp::from_millisecond(self.timestamp).ok()
    }

    pub fn image(&self) -> Option<&FileAttachment> {
        self.file_attachment.as_ref().filter(|file| file.is_image())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStats {
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
}
