use crate::core::request::PageWindow;
use crate::storage::credentials::AuthMode;

/// 認証状態情報
#[derive(Debug, Clone)]
pub struct AuthStatus {
    pub profile_name: String,
    pub auth_mode: AuthMode,
    pub username: Option<String>,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        self.auth_mode != AuthMode::None
    }
}

/// Search parameters shared by account and group listings
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Search term passed to the provider's filter parameter
    pub filter: Option<String>,
    /// Requested page; `None` leaves paging to the provider
    pub page: Option<PageWindow>,
    /// Stop consuming the response after this many resources
    pub limit: Option<usize>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    pub fn with_page(mut self, page: Option<PageWindow>) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}
