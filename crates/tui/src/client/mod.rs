use std::{collections::BTreeMap, time::Duration};

use api_types::{
    buyer::BuyerView,
    dashboard::Dashboard,
    envelope::{ApiResponse, CODE_CREATED, CODE_OK, DataResponse, MessageBody, ValidationErrorBody},
    item::{ItemNew, ItemStatus, ItemStatusUpdate, ItemUpdate, ItemView},
    pagination::Page,
    profile::{Profile, ProfileResponse, ProfileUpdate},
    quotation::{QuotationNew, QuotationRefResponse, QuotationRow, QuotationUpdate, QuotationView},
};
use engine::listing::PageKey;
use reqwest::{Method, Response, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned, de::IgnoredAny};
use thiserror::Error;

use crate::error::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("validation failed")]
    Validation {
        message: Option<String>,
        errors: BTreeMap<String, Vec<String>>,
    },
    /// The request went through but the envelope did not carry the success code.
    #[error("request rejected (code {code:?})")]
    Rejected {
        code: Option<u16>,
        message: Option<String>,
    },
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Text for the notice shown to the user. `fallback` names the failed
    /// action when the server gave no message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Unauthorized => "Your session is not authorized. Check the API token.".to_string(),
            Self::Forbidden => "You do not have permission to do this.".to_string(),
            Self::NotFound => "The requested record was not found.".to_string(),
            Self::Validation { message, .. } => message
                .clone()
                .unwrap_or_else(|| "Please fix the highlighted fields.".to_string()),
            Self::Rejected { message, .. } => {
                message.clone().unwrap_or_else(|| fallback.to_string())
            }
            Self::Server(message) if message.is_empty() => fallback.to_string(),
            Self::Server(message) => message.clone(),
        }
    }

    /// Per-field messages of a server validation failure.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

type ClientResult<T> = std::result::Result<T, ClientError>;

/// Authenticated REST client. The bearer token is attached to every request.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: String,
}

impl Client {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| AppError::InvalidBaseUrl(format!("{base_url}: {err}")))?;
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url,
            http,
            token: token.to_string(),
        })
    }

    pub async fn dashboard(&self) -> ClientResult<Dashboard> {
        let res: DataResponse<Dashboard> = self.get("api/dashboard", &[]).await?;
        Ok(res.data)
    }

    pub async fn items(&self, key: &PageKey) -> ClientResult<Page<ItemView>> {
        let res: DataResponse<Page<ItemView>> = self.get("api/item", &page_query(key)).await?;
        Ok(res.data)
    }

    /// First page of the catalog, used by the line item picker.
    pub async fn catalog(&self) -> ClientResult<Vec<ItemView>> {
        let res: DataResponse<Page<ItemView>> = self.get("api/item", &[]).await?;
        Ok(res.data.data)
    }

    pub async fn item(&self, id: u64) -> ClientResult<ItemView> {
        let res: DataResponse<ItemView> = self.get(&format!("api/item/{id}"), &[]).await?;
        Ok(res.data)
    }

    pub async fn create_item(&self, body: &ItemNew) -> ClientResult<()> {
        let res = self.send(Method::POST, "api/item", body).await?;
        expect_code(res, CODE_CREATED)
    }

    pub async fn update_item(&self, id: u64, body: &ItemUpdate) -> ClientResult<()> {
        let res = self.send(Method::PUT, &format!("api/item/{id}"), body).await?;
        expect_code(res, CODE_CREATED)
    }

    pub async fn update_item_status(&self, id: u64, status: ItemStatus) -> ClientResult<()> {
        let body = ItemStatusUpdate {
            item_status: status,
        };
        let res = self
            .send(Method::PATCH, &format!("api/items/{id}/status"), &body)
            .await?;
        if res.is_code(CODE_CREATED) || res.status.as_deref() == Some("success") {
            Ok(())
        } else {
            Err(rejected(res))
        }
    }

    pub async fn quotations(&self, key: &PageKey) -> ClientResult<Page<QuotationRow>> {
        let res: DataResponse<Page<QuotationRow>> =
            self.get("api/quotation", &page_query(key)).await?;
        Ok(res.data)
    }

    pub async fn quotation(&self, id: u64) -> ClientResult<QuotationView> {
        let res: DataResponse<QuotationView> =
            self.get(&format!("api/quotation/{id}"), &[]).await?;
        Ok(res.data)
    }

    pub async fn quotation_ref(&self) -> ClientResult<Option<String>> {
        let res: QuotationRefResponse = self.get("api/quotation-ref", &[]).await?;
        Ok(res.data)
    }

    pub async fn active_buyers(&self) -> ClientResult<Vec<BuyerView>> {
        let res: DataResponse<Vec<BuyerView>> = self.get("api/activeBuyers", &[]).await?;
        Ok(res.data)
    }

    pub async fn create_quotation(&self, body: &QuotationNew) -> ClientResult<()> {
        let res = self.send(Method::POST, "api/quotation", body).await?;
        expect_code(res, CODE_CREATED)
    }

    pub async fn update_quotation(&self, id: u64, body: &QuotationUpdate) -> ClientResult<()> {
        let res = self
            .send(Method::PUT, &format!("api/quotation/{id}"), body)
            .await?;
        expect_code(res, CODE_CREATED)
    }

    /// Deletes a persisted quotation line. Any 2xx answer is a success.
    pub async fn delete_quotation_line(&self, id: u64) -> ClientResult<()> {
        let url = self.url(&format!("api/quotation-sub/{id}"))?;
        tracing::debug!(%url, "DELETE");
        let res = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        check_status(res).await.map(drop)
    }

    pub async fn profile(&self) -> ClientResult<Profile> {
        let res: ProfileResponse = self.get("api/panel-fetch-profile", &[]).await?;
        Ok(res.profile)
    }

    pub async fn update_profile(&self, body: &ProfileUpdate) -> ClientResult<()> {
        let res = self
            .send(Method::PUT, "api/panel-update-profile", body)
            .await?;
        expect_code(res, CODE_OK)
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let url = self.url(path)?;
        tracing::debug!(%url, ?query, "GET");
        let res = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(check_status(res).await?.json::<T>().await?)
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiResponse<IgnoredAny>> {
        let url = self.url(path)?;
        tracing::debug!(%url, %method, "sending");
        let res = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Ok(check_status(res).await?.json().await?)
    }
}

fn page_query(key: &PageKey) -> Vec<(&'static str, String)> {
    let mut query = vec![("page", key.page.to_string())];
    if !key.search.is_empty() {
        query.push(("search", key.search.clone()));
    }
    query
}

fn expect_code(res: ApiResponse<IgnoredAny>, code: u16) -> ClientResult<()> {
    if res.is_code(code) {
        Ok(())
    } else {
        Err(rejected(res))
    }
}

fn rejected(res: ApiResponse<IgnoredAny>) -> ClientError {
    tracing::warn!(code = ?res.code, message = ?res.message, "request rejected");
    ClientError::Rejected {
        code: res.code,
        message: res.message,
    }
}

/// Passes successful responses through and maps failures to [`ClientError`].
async fn check_status(res: Response) -> ClientResult<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.bytes().await?;
    tracing::warn!(%status, "request failed");
    let err = match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        _ => match serde_json::from_slice::<ValidationErrorBody>(&body) {
            Ok(validation) => ClientError::Validation {
                message: validation.message,
                errors: validation.errors,
            },
            Err(_) => ClientError::Server(
                serde_json::from_slice::<MessageBody>(&body)
                    .ok()
                    .and_then(|body| body.message)
                    .unwrap_or_default(),
            ),
        },
    };
    Err(err)
}
