use mindmingle_shared::SharePlatform;
use reqwest::Url;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShareErr {
    #[error("{0} has no external share target")]
    NoTarget(SharePlatform),

    #[error("invalid share url {0}")]
    Url(String),

    #[error("failed to open share target {0}")]
    Open(String),

    #[error("failed to copy link {0}")]
    Copy(String),
}

/// Where a post link ends up when shared: a browser tab for the external
/// platforms and the clipboard for [`SharePlatform::Copy`].
pub trait ShareTarget {
    fn open(&self, url: &Url) -> Result<(), ShareErr>;
    fn copy(&self, text: &str) -> Result<(), ShareErr>;
}

pub fn share_url(
    platform: SharePlatform,
    link: impl AsRef<str>,
    text: impl AsRef<str>,
) -> Result<Url, ShareErr> {
    let link = link.as_ref();
    let text = text.as_ref();
    let url = match platform {
        SharePlatform::Twitter => Url::parse_with_params(
            "https://twitter.com/intent/tweet",
            [("url", link), ("text", text)],
        ),
        SharePlatform::Facebook => {
            Url::parse_with_params("https://www.facebook.com/sharer/sharer.php", [("u", link)])
        }
        SharePlatform::Linkedin => Url::parse_with_params(
            "https://www.linkedin.com/sharing/share-offsite/",
            [("url", link)],
        ),
        SharePlatform::Whatsapp => {
            let message = format!("{text} {link}");
            Url::parse_with_params("https://wa.me/", [("text", message.trim_start())])
        }
        SharePlatform::Copy => return Err(ShareErr::NoTarget(platform)),
    };

    url.map_err(|err| ShareErr::Url(err.to_string()))
}
