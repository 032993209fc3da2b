//! Hosted database REST client
//!
//! Talks to the PostgREST-style API of the hosted database. Keyset pagination
//! is expressed with `or=(...)` filters on `(sort column, id)`.

use reqwest::Client;
use serde::de::DeserializeOwned;
use urlencoding::encode;

use crate::domain::ports::{Page, PageRequest, SortDirection};
use crate::error::DomainError;

#[derive(Clone)]
pub struct HostedClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HostedClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn table_url(&self, table: &str, query: &str) -> String {
        format!("{}/rest/v1/{}?{}", self.base_url, table, query)
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &str) -> Result<T, DomainError> {
        let mut request = self.http.get(self.table_url(table, query));
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }
        let response = request.send().await?;
        handle_response(response).await
    }

    /// Fetch one keyset page of `table` ordered by `sort_col`
    pub async fn fetch_keyset_page<R, T>(
        &self,
        table: &str,
        sort_col: &str,
        request: &PageRequest,
        id_of: impl Fn(&R) -> String,
    ) -> Result<Page<T>, DomainError>
    where
        R: DeserializeOwned,
        T: From<R>,
    {
        let direction = request.sort.direction;
        let filter = match &request.cursor {
            Some(cursor) => {
                let anchor = self.anchor_value(table, sort_col, cursor).await?;
                Some(keyset_filter(sort_col, anchor.as_deref(), cursor, direction))
            }
            None => None,
        };

        let query = page_query(sort_col, direction, request.page_size, filter.as_deref());
        let rows: Vec<R> = self.select(table, &query).await?;
        tracing::debug!(table, rows = rows.len(), cursor = ?request.cursor, "fetched hosted page");

        Ok(Page::from_overfetched(rows, request.page_size, id_of))
    }

    /// Sort value of the cursor row; `Ok(None)` when the row exists with a NULL value
    async fn anchor_value(
        &self,
        table: &str,
        sort_col: &str,
        cursor: &str,
    ) -> Result<Option<String>, DomainError> {
        let query = format!("select=id,{}&id=eq.{}", sort_col, encode(cursor));
        let rows: Vec<serde_json::Value> = self.select(table, &query).await?;
        let row = rows
            .first()
            .ok_or_else(|| DomainError::InvalidCursor(cursor.to_string()))?;
        Ok(row
            .get(sort_col)
            .and_then(|v| v.as_str())
            .map(str::to_string))
    }
}

async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, DomainError> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| DomainError::Malformed(e.to_string()))
    } else if status.as_u16() == 429 || status.is_server_error() {
        let message = response.text().await.unwrap_or_default();
        Err(DomainError::Unavailable(format!("{}: {}", status, message)))
    } else if status.as_u16() == 400 {
        let message = response.text().await.unwrap_or_default();
        Err(DomainError::Validation(message))
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(DomainError::Internal(format!("{}: {}", status, message)))
    }
}

/// Query string for one page: ordering, limit and the optional keyset filter
pub fn page_query(
    sort_col: &str,
    direction: SortDirection,
    page_size: u64,
    filter: Option<&str>,
) -> String {
    let nulls = match direction {
        SortDirection::Desc => "nullsfirst",
        SortDirection::Asc => "nullslast",
    };
    let mut query = format!(
        "select=*&order={col}.{dir}.{nulls},id.{dir}&limit={limit}",
        col = sort_col,
        dir = direction,
        nulls = nulls,
        limit = page_size + 1,
    );
    if let Some(filter) = filter {
        query.push('&');
        query.push_str(filter);
    }
    query
}

/// Filter selecting rows positioned after the anchor row.
///
/// NULL sort values come first when descending and last when ascending, the
/// same placement as the `order` clause of `page_query`.
pub fn keyset_filter(
    sort_col: &str,
    anchor_value: Option<&str>,
    anchor_id: &str,
    direction: SortDirection,
) -> String {
    let id = quote(anchor_id);
    let expr = match (direction, anchor_value) {
        (SortDirection::Desc, Some(value)) => {
            let value = quote(value);
            format!("({c}.lt.{v},and({c}.eq.{v},id.lt.{id}))", c = sort_col, v = value, id = id)
        }
        (SortDirection::Desc, None) => {
            format!("({c}.not.is.null,and({c}.is.null,id.lt.{id}))", c = sort_col, id = id)
        }
        (SortDirection::Asc, Some(value)) => {
            let value = quote(value);
            format!(
                "({c}.gt.{v},and({c}.eq.{v},id.gt.{id}),{c}.is.null)",
                c = sort_col,
                v = value,
                id = id
            )
        }
        (SortDirection::Asc, None) => {
            return format!("and={}", encode(&format!("({}.is.null,id.gt.{})", sort_col, id)));
        }
    };
    format!("or={}", encode(&expr))
}

/// Values inside logical filters are double-quoted so `,` `.` `:` and `()` stay literal
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
