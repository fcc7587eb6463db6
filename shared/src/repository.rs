use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::form_urlencoded;

use crate::decode::decode_list_response;
use crate::error::ApiError;
use crate::progress::calculate_progress;
use crate::query::ListQuery;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::types::{
    Achievement, AchievementCreateInput, AchievementUpdateInput, ListResponse,
};

pub const DEFAULT_BASE_URL: &str = "/api/achievements";

/// Source of "now" in Unix seconds.
pub type Clock = fn() -> i64;

pub fn system_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Client for the achievements collection.
#[derive(Debug, Clone)]
pub struct AchievementRepository<T> {
    transport: T,
    base_url: String,
    clock: Clock,
}

impl<T: HttpTransport> AchievementRepository<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            clock: system_clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_url(&self, query: &ListQuery) -> String {
        format!("{}?{}", self.base_url, query.to_query_string())
    }

    pub fn item_url(&self, id: &str) -> String {
        let segment: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
        format!("{}/{}", self.base_url, segment)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest {
            method,
            url: url.to_string(),
            body,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} {} failed: {}", method.as_str(), url, e);
                return Err(ApiError::from(e).with_request(method.as_str(), url));
            }
        };

        if response.is_success() {
            Ok(response)
        } else {
            log::warn!("{} {} returned {}", method.as_str(), url, response.status);
            Err(ApiError::from_status(
                response.status,
                method.as_str(),
                url,
                &response.body,
            ))
        }
    }

    async fn send_for<R: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<R, ApiError> {
        let response = self.send(method, url, body).await?;
        serde_json::from_str(&response.body).map_err(|e| {
            ApiError::unexpected_body(response.status, method.as_str(), url, &e.to_string())
        })
    }

    /// Fetches one page. The payload shape is normalized by
    /// [`decode_list_response`].
    pub async fn list(&self, query: &ListQuery) -> Result<ListResponse, ApiError> {
        let url = self.list_url(query);
        let response = self.send(Method::Get, &url, None).await?;
        if response.body.trim().is_empty() {
            return Ok(decode_list_response(&Value::Null));
        }
        let raw: Value = serde_json::from_str(&response.body).map_err(|e| {
            ApiError::unexpected_body(response.status, Method::Get.as_str(), &url, &e.to_string())
        })?;
        Ok(decode_list_response(&raw))
    }

    pub async fn get(&self, id: &str) -> Result<Achievement, ApiError> {
        self.send_for(Method::Get, &self.item_url(id), None).await
    }

    /// Creates a record with progress derived from its todos and both
    /// timestamps set to now.
    pub async fn create(&self, input: &AchievementCreateInput) -> Result<Achievement, ApiError> {
        let now = (self.clock)();
        let payload = json!({
            "title": input.title,
            "description": input.description,
            "category": input.category,
            "progress": calculate_progress(&input.todos),
            "todos": input.todos,
            "createdAt": now,
            "updatedAt": now,
        });
        self.send_for(Method::Post, &self.base_url, Some(payload)).await
    }

    /// Read-before-write update: the backend replaces whole records, so the
    /// current record is fetched and the partial input merged onto it.
    /// Concurrent writers race; the last PUT wins.
    pub async fn update(
        &self,
        id: &str,
        input: &AchievementUpdateInput,
    ) -> Result<Achievement, ApiError> {
        let existing = self.get(id).await?;
        let merged = merge_update(existing, input, (self.clock)());
        self.send_for(Method::Put, &self.item_url(id), Some(json!(merged)))
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        self.send(Method::Delete, &self.item_url(id), None).await?;
        Ok(())
    }
}

/// Merges a partial update onto the stored record and refreshes the derived
/// fields.
pub fn merge_update(existing: Achievement, input: &AchievementUpdateInput, now: i64) -> Achievement {
    let todos = input
        .todos
        .clone()
        .unwrap_or_else(|| existing.todos().to_vec());
    let progress = calculate_progress(&todos);

    Achievement {
        title: input.title.clone().unwrap_or(existing.title),
        description: input.description.clone().unwrap_or(existing.description),
        category: input.category.clone().unwrap_or(existing.category),
        progress: Some(progress),
        todos: Some(todos),
        updated_at: now.max(existing.created_at),
        id: existing.id,
        created_at: existing.created_at,
    }
}
