use super::types::ListParams;
use crate::AppError;
use crate::api::client::{Authorization, DEFAULT_TIMEOUT_SECS, ServiceClient};
use crate::api::models::{Account, Credential, Group, GroupMember, PasswordUpdate};
use crate::api::transport::Transport;
use crate::core::handler::{ResultHandler, ResultPage};
use crate::core::operation::Operation;
use crate::core::provider::{PaginationParams, Provider};
use crate::core::request::SearchRequest;
use crate::core::search::Search;
use crate::error::{ApiError, CliError, ConfigError};
use crate::storage::config::Profile;
use crate::utils::validation::{validate_identifier, validate_realm, validate_url, validate_value};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Account and group management against one provider
pub struct DirectoryService<X: Transport = ServiceClient> {
    transport: X,
    provider: Provider,
    pagination: PaginationParams,
}

impl DirectoryService<ServiceClient> {
    /// Build a service for a configured profile
    pub fn connect(profile: &Profile, authorization: Option<Authorization>) -> Result<Self, AppError> {
        validate_url(&profile.url)?;
        if let Some(realm) = &profile.realm {
            validate_realm(realm)?;
        }

        let timeout = profile.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let mut client = ServiceClient::with_timeout(profile.api_url(), timeout)?;
        if let Some(authorization) = authorization {
            client = client.with_authorization(authorization);
        }

        Ok(Self::new(client, profile.provider).with_pagination(profile.pagination()))
    }
}

impl<X: Transport> DirectoryService<X> {
    pub fn new(transport: X, provider: Provider) -> Self {
        Self {
            transport,
            provider,
            pagination: provider.pagination(),
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationParams) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    /// Jira takes names as query parameters, Keycloak as path segments
    fn check(&self, kind: &str, value: &str) -> Result<(), AppError> {
        match self.provider {
            Provider::Jira => validate_value(kind, value),
            Provider::Keycloak => validate_identifier(kind, value),
        }
    }

    fn unsupported(&self, operation: &str) -> AppError {
        CliError::Unsupported {
            operation: operation.to_string(),
            provider: self.provider.to_string(),
        }
        .into()
    }

    fn account_search(&self, params: &ListParams) -> SearchRequest {
        let request = match self.provider {
            // Jira answers nothing without a user name pattern; "." matches all
            Provider::Jira => SearchRequest::new("user/search")
                .filter(params.filter.clone().unwrap_or_else(|| ".".to_string())),
            Provider::Keycloak => {
                SearchRequest::new("users").filter(params.filter.clone().unwrap_or_default())
            }
        };
        with_page(request, params)
    }

    fn group_search(&self, params: &ListParams) -> SearchRequest {
        let request = match self.provider {
            Provider::Jira => {
                let request = SearchRequest::new("groups/picker");
                match &params.filter {
                    Some(filter) => request.parameter("query", filter),
                    None => request,
                }
            }
            Provider::Keycloak => {
                SearchRequest::new("groups").filter(params.filter.clone().unwrap_or_default())
            }
        };
        with_page(request, params)
    }

    fn list<T: DeserializeOwned>(
        &self,
        request: SearchRequest,
        limit: Option<usize>,
    ) -> Result<ResultPage<T>, ApiError> {
        let search = Search::new(&self.transport, self.pagination.clone(), request);
        match limit {
            Some(limit) => search.list_limited(limit),
            None => search.list(),
        }
    }

    /// Search accounts and collect one page
    pub fn search_accounts(&self, params: &ListParams) -> Result<ResultPage<Account>, AppError> {
        log::trace!("entering search_accounts {:?}", params);
        let page = self.list(self.account_search(params), params.limit)?;
        log::trace!("exiting search_accounts with {} accounts", page.len());
        Ok(page)
    }

    /// Search accounts and stream them into `handler`
    pub fn stream_accounts<H>(&self, params: &ListParams, handler: &mut H) -> Result<(), AppError>
    where
        H: ResultHandler<Account> + ?Sized,
    {
        log::trace!("entering stream_accounts {:?}", params);
        Search::new(&self.transport, self.pagination.clone(), self.account_search(params))
            .invoke(handler)?;
        log::trace!("exiting stream_accounts");
        Ok(())
    }

    pub fn search_groups(&self, params: &ListParams) -> Result<ResultPage<Group>, AppError> {
        log::trace!("entering search_groups {:?}", params);
        let page = self.list(self.group_search(params), params.limit)?;
        log::trace!("exiting search_groups with {} groups", page.len());
        Ok(page)
    }

    /// Fetch one account; an unknown account is `None`
    pub fn lookup_account(&self, id: &str) -> Result<Option<Account>, AppError> {
        log::trace!("entering lookup_account {}", id);
        self.check("account", id)?;
        let operation = match self.provider {
            Provider::Jira => Operation::lookup(&self.transport, "user").parameter("username", id),
            Provider::Keycloak => Operation::lookup(&self.transport, format!("users/{}", id)),
        };
        let account = match operation.invoke_for::<Account>() {
            Ok(account) => account,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };
        log::trace!("exiting lookup_account found={}", account.is_some());
        Ok(account)
    }

    pub fn count_accounts(&self, filter: Option<&str>) -> Result<i64, AppError> {
        log::trace!("entering count_accounts {:?}", filter);
        let count = match self.provider {
            Provider::Keycloak => {
                let mut operation = Operation::count(&self.transport, "users/count");
                if let Some(filter) = filter.filter(|f| !f.is_empty()) {
                    operation = operation.parameter(self.pagination.filter.as_str(), filter);
                }
                operation.invoke_count()?
            }
            Provider::Jira => return Err(self.unsupported("count")),
        };
        log::trace!("exiting count_accounts {}", count);
        Ok(count)
    }

    pub fn delete_account(&self, id: &str) -> Result<(), AppError> {
        log::trace!("entering delete_account {}", id);
        self.check("account", id)?;
        match self.provider {
            Provider::Jira => Operation::delete(&self.transport, "user")
                .parameter("username", id)
                .invoke()?,
            Provider::Keycloak => Operation::delete(&self.transport, format!("users/{}", id)).invoke()?,
        }
        log::trace!("exiting delete_account");
        Ok(())
    }

    pub fn assign_group(&self, group: &str, account: &str) -> Result<(), AppError> {
        log::trace!("entering assign_group {} {}", group, account);
        self.check("group", group)?;
        self.check("account", account)?;
        match self.provider {
            Provider::Jira => {
                let member = to_body(GroupMember {
                    name: account.to_string(),
                })?;
                Operation::assign(&self.transport, Method::POST, "group/user", Some(member))
                    .parameter("groupname", group)
                    .invoke()?
            }
            Provider::Keycloak => Operation::assign(
                &self.transport,
                Method::PUT,
                format!("users/{}/groups/{}", account, group),
                None,
            )
            .invoke()?,
        }
        log::trace!("exiting assign_group");
        Ok(())
    }

    pub fn revoke_group(&self, group: &str, account: &str) -> Result<(), AppError> {
        log::trace!("entering revoke_group {} {}", group, account);
        self.check("group", group)?;
        self.check("account", account)?;
        match self.provider {
            Provider::Jira => Operation::revoke(&self.transport, "group/user")
                .parameter("groupname", group)
                .parameter("username", account)
                .invoke()?,
            Provider::Keycloak => {
                Operation::revoke(&self.transport, format!("users/{}/groups/{}", account, group))
                    .invoke()?
            }
        }
        log::trace!("exiting revoke_group");
        Ok(())
    }

    pub fn reset_password(&self, account: &str, password: &str, temporary: bool) -> Result<(), AppError> {
        log::trace!("entering reset_password {}", account);
        self.check("account", account)?;
        if password.is_empty() {
            return Err(CliError::InvalidArguments("Password cannot be empty".to_string()).into());
        }
        match self.provider {
            Provider::Jira => {
                let body = to_body(PasswordUpdate {
                    password: password.to_string(),
                })?;
                Operation::password(&self.transport, "user/password", body)
                    .parameter("username", account)
                    .invoke()?
            }
            Provider::Keycloak => {
                let body = to_body(Credential::password(password, temporary))?;
                Operation::password(
                    &self.transport,
                    format!("users/{}/reset-password", account),
                    body,
                )
                .invoke()?
            }
        }
        log::trace!("exiting reset_password");
        Ok(())
    }
}

fn with_page(request: SearchRequest, params: &ListParams) -> SearchRequest {
    match params.page {
        Some(page) => request.page(page.start, page.count),
        None => request,
    }
}

fn to_body<T: serde::Serialize>(body: T) -> Result<Value, AppError> {
    serde_json::to_value(body).map_err(|e| {
        ConfigError::InvalidValue {
            field: "body".to_string(),
            value: String::new(),
            reason: e.to_string(),
        }
        .into()
    })
}
