use std::sync::Arc;

use eyre::{eyre, Result};
use serenity::{cache::Cache, http::Http};
use tokio::sync::OnceCell;

/// Handle to the gateway client's cache and HTTP client.
///
/// The tracker and its collaborators are built before the serenity client
/// exists, so the resolver and notifier hold this link and it is filled in
/// once the client has been created.
#[derive(Default)]
pub struct DiscordLink {
    inner: OnceCell<(Arc<Cache>, Arc<Http>)>,
}

impl DiscordLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, cache: Arc<Cache>, http: Arc<Http>) -> Result<()> {
        self.inner
            .set((cache, http))
            .map_err(|_| eyre!("Discord link is already connected"))
    }

    pub fn cache(&self) -> Result<&Arc<Cache>> {
        self.inner
            .get()
            .map(|(cache, _)| cache)
            .ok_or_else(|| eyre!("Discord client is not connected yet"))
    }

    pub fn http(&self) -> Result<&Arc<Http>> {
        self.inner
            .get()
            .map(|(_, http)| http)
            .ok_or_else(|| eyre!("Discord client is not connected yet"))
    }
}
