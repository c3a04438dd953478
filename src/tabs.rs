/// Browser tab service seam
use crate::error::TabError;
use crate::link_data::TabInfo;

/// Tab enumeration and creation (`chrome.tabs` in the extension)
#[allow(async_fn_in_trait)]
pub trait TabService {
    /// All open tabs across every window
    async fn query_tabs(&self) -> Result<Vec<TabInfo>, TabError>;

    async fn open_tab(&self, url: &str, active: bool) -> Result<(), TabError>;
}
