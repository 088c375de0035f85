use mindmingle_api::{Api, ServerRes, path};
use mindmingle_shared::SharePlatform;
use tracing::{error, trace};

use super::PostCard;
use super::store::InteractionState;
use crate::share_target::{ShareTarget, share_url};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIs)]
#[strum(serialize_all = "lowercase")]
pub enum ShareOutcome {
    Skipped,
    /// shared by a guest, nothing recorded
    Opened,
    Recorded,
    Failed,
}

impl<A: Api> PostCard<A> {
    pub fn share_link(&self) -> String {
        path::link_post_page(&self.config.site_address, self.post.id)
    }

    /// Hands the post link to `target`, then counts the share for logged in
    /// viewers. The count is never rolled back.
    pub async fn share(&self, platform: SharePlatform, target: &impl ShareTarget) -> ShareOutcome {
        let post_id = self.post.id;
        if !self.config.features.shares || !self.store.is_alive() {
            trace!("share: shares disabled or card unmounted");
            return ShareOutcome::Skipped;
        }

        let link = self.share_link();
        let shared = match platform {
            SharePlatform::Copy => target.copy(&link).map(|_| self.flash_share_success()),
            platform => share_url(platform, &link, &self.post.content)
                .and_then(|url| target.open(&url)),
        };
        if let Err(err) = shared {
            error!("share: post {post_id} on {platform}: {err}");
            return ShareOutcome::Failed;
        }

        if !self.is_logged_in() {
            trace!("share: viewer not logged in, not recording {platform} share");
            return ShareOutcome::Opened;
        }
        self.store.update(InteractionState::bump_share_count);
        let result = self
            .api
            .add_post_share(post_id, platform)
            .send_native()
            .await
            .and_then(ServerRes::into_ok);
        if let Err(err) = result {
            error!("share: failed to record {platform} share of post {post_id}: {err}");
        }

        ShareOutcome::Recorded
    }

    fn flash_share_success(&self) {
        if self
            .store
            .update(|state| state.set_share_success(true))
            .is_none()
        {
            return;
        }
        let store = self.store.clone();
        let delay = self.config.share_flash;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.update(|state| state.set_share_success(false));
        });
    }
}
