//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! - **Customers**: the [`CustomerStore`], always the read path.
//! - **Database pool**: optional Postgres write-through target, hydrated
//!   into the store on startup.
//! - **Metrics**: Prometheus registry shared with the metrics middleware.
//! - **Config**: environment-derived [`AppConfig`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use custreg_core::Cpf;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::middleware::metrics::ApiMetrics;

// -- Customer Record ----------------------------------------------------------

/// Maximum length of a customer name, in characters.
pub const NAME_MAX_LEN: usize = 127;

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerRecord {
    pub id: Uuid,
    /// Full name, 1 to 127 characters.
    pub name: String,
    /// Birth date, rendered as `DD/MM/YYYY`.
    #[serde(with = "crate::dates::born")]
    #[schema(value_type = String, example = "15/03/1990")]
    pub born: NaiveDate,
    /// Canonical 11-digit CPF.
    #[serde(rename = "CPF")]
    #[schema(value_type = String, example = "20802113079")]
    pub cpf: Cpf,
    pub created_at: DateTime<Utc>,
}

// -- Customer Store -----------------------------------------------------------

/// A customer with this CPF is already registered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("a customer with CPF {0} already exists")]
pub struct DuplicateCpf(pub String);

#[derive(Debug, Default)]
struct CustomerIndex {
    by_id: HashMap<Uuid, CustomerRecord>,
    by_cpf: HashMap<Cpf, Uuid>,
}

/// Thread-safe, cloneable in-memory customer store with a unique CPF index.
///
/// Operations are synchronous: the lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct CustomerStore {
    inner: Arc<RwLock<CustomerIndex>>,
}

impl CustomerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless its CPF is already taken.
    ///
    /// The CPF check and both index writes happen under one write lock.
    pub fn insert(&self, record: CustomerRecord) -> Result<(), DuplicateCpf> {
        let mut guard = self.inner.write();
        if guard.by_cpf.contains_key(&record.cpf) {
            return Err(DuplicateCpf(record.cpf.into_inner()));
        }
        guard.by_cpf.insert(record.cpf.clone(), record.id);
        guard.by_id.insert(record.id, record);
        Ok(())
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<CustomerRecord> {
        self.inner.read().by_id.get(id).cloned()
    }

    /// Retrieve a record by canonical CPF.
    pub fn get_by_cpf(&self, cpf: &Cpf) -> Option<CustomerRecord> {
        let guard = self.inner.read();
        guard
            .by_cpf
            .get(cpf)
            .and_then(|id| guard.by_id.get(id))
            .cloned()
    }

    /// Whether a CPF is registered.
    pub fn contains_cpf(&self, cpf: &Cpf) -> bool {
        self.inner.read().by_cpf.contains_key(cpf)
    }

    /// All records ordered by name, then creation time, then id.
    pub fn list(&self) -> Vec<CustomerRecord> {
        self.filter(&CustomerFilter::default())
    }

    /// Records matching `filter`, in [`CustomerStore::list`] order.
    pub fn filter(&self, filter: &CustomerFilter) -> Vec<CustomerRecord> {
        let mut out: Vec<CustomerRecord> = self
            .inner
            .read()
            .by_id
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        out
    }

    /// Number of registered customers.
    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exact-match list filters. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub name: Option<String>,
    pub born: Option<NaiveDate>,
}

impl CustomerFilter {
    fn matches(&self, record: &CustomerRecord) -> bool {
        self.name.as_deref().map_or(true, |n| record.name == n)
            && self.born.map_or(true, |b| record.born == b)
    }
}

// -- Configuration ------------------------------------------------------------

/// Invalid environment configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but does not parse.
    #[error("invalid value for {var}: \"{value}\" ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration.
///
/// Custom `Debug` redacts the `database_url`, which may carry credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Page size used when the client does not pass `page_size`.
    pub default_page_size: usize,
    /// Upper bound on a client-supplied `page_size`.
    pub max_page_size: usize,
    /// Whether the `/metrics` endpoint and request metrics are enabled.
    pub metrics_enabled: bool,
    /// Postgres connection string. `None` means in-memory only.
    pub database_url: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("default_page_size", &self.default_page_size)
            .field("max_page_size", &self.max_page_size)
            .field("metrics_enabled", &self.metrics_enabled)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            default_page_size: 5,
            max_page_size: 100,
            metrics_enabled: true,
            database_url: None,
        }
    }
}

impl AppConfig {
    /// Build configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = parse_var(&lookup, "PORT")?.unwrap_or(defaults.port);
        let default_page_size =
            parse_var(&lookup, "DEFAULT_PAGE_SIZE")?.unwrap_or(defaults.default_page_size);
        let max_page_size =
            parse_var(&lookup, "MAX_PAGE_SIZE")?.unwrap_or(defaults.max_page_size);
        let metrics_enabled = match lookup("METRICS_ENABLED") {
            None => defaults.metrics_enabled,
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::Invalid {
                var: "METRICS_ENABLED",
                value: v.clone(),
                reason: "expected true/false".to_string(),
            })?,
        };
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        if default_page_size == 0 {
            return Err(ConfigError::Invalid {
                var: "DEFAULT_PAGE_SIZE",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if max_page_size < default_page_size {
            return Err(ConfigError::Invalid {
                var: "MAX_PAGE_SIZE",
                value: max_page_size.to_string(),
                reason: format!("must be at least DEFAULT_PAGE_SIZE ({default_page_size})"),
            });
        }

        Ok(Self {
            port,
            default_page_size,
            max_page_size,
            metrics_enabled,
            database_url,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(var)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub customers: CustomerStore,
    /// `None` runs in-memory only.
    pub db_pool: Option<PgPool>,
    pub metrics: ApiMetrics,
    pub config: AppConfig,
}

impl AppState {
    /// In-memory state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// State with the given configuration and optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            customers: CustomerStore::new(),
            db_pool,
            metrics: ApiMetrics::new(),
            config,
        }
    }

    /// Load persisted customers into the in-memory store.
    ///
    /// No-op without a database pool.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let customers = crate::db::customers::load_all(pool)
            .await
            .map_err(|e| format!("failed to load customers: {e}"))?;
        let mut loaded = 0usize;
        for record in customers {
            let id = record.id;
            match self.customers.insert(record) {
                Ok(()) => loaded += 1,
                Err(e) => tracing::warn!(customer_id = %id, error = %e, "skipping duplicate customer row"),
            }
        }

        tracing::info!(customers = loaded, "Hydrated in-memory store from database");
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
