//! Opens external navigation links.

use url::Url;

/// Port handing a URL to the host, typically a new browser tab.
#[cfg_attr(test, mockall::automock)]
pub trait NavigationLauncher: Send + Sync {
    /// Open `url` outside the map.
    fn open_external(&self, url: &Url);
}

/// Fixture launcher that ignores every link.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureNavigationLauncher;

impl NavigationLauncher for FixtureNavigationLauncher {
    fn open_external(&self, _url: &Url) {}
}
