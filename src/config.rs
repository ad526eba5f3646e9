// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{InMemorySalesSource, SalesRepository, SalesSource},
    models::sales::DEFAULT_PAGE_SIZE,
    services::SalesService,
    state::session::DEFAULT_SESSION_IDLE_TTL,
};

/// De onde vêm os registros de venda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceConfig {
    Postgres { database_url: String, max_connections: u32 },
    SeedFile(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub page_size: u32,
    pub session_idle_ttl: Duration,
    pub source: DataSourceConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Mesma leitura do `from_env`, com a origem das variáveis injetável (testes).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let page_size = match lookup("PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .with_context(|| format!("PAGE_SIZE inválido: '{}'", raw))?,
            None => DEFAULT_PAGE_SIZE,
        };

        let session_idle_ttl = match lookup("SESSION_IDLE_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n >= 1)
                .map(Duration::from_secs)
                .with_context(|| format!("SESSION_IDLE_TTL_SECS inválido: '{}'", raw))?,
            None => DEFAULT_SESSION_IDLE_TTL,
        };

        let source = match (lookup("DATABASE_URL"), lookup("SALES_SEED_FILE")) {
            (Some(database_url), _) => {
                let max_connections = match lookup("DB_MAX_CONNECTIONS") {
                    Some(raw) => raw
                        .trim()
                        .parse()
                        .with_context(|| format!("DB_MAX_CONNECTIONS inválido: '{}'", raw))?,
                    None => 5,
                };
                DataSourceConfig::Postgres { database_url, max_connections }
            }
            (None, Some(path)) => DataSourceConfig::SeedFile(PathBuf::from(path)),
            (None, None) => bail!("DATABASE_URL ou SALES_SEED_FILE deve ser definida"),
        };

        Ok(Self { bind_addr, page_size, session_idle_ttl, source })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub sales_service: SalesService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let source: Arc<dyn SalesSource> = match &config.source {
            DataSourceConfig::Postgres { database_url, max_connections } => {
                let db_pool = PgPoolOptions::new()
                    .max_connections(*max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!().run(&db_pool).await?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(SalesRepository::new(db_pool))
            }
            DataSourceConfig::SeedFile(path) => Arc::new(InMemorySalesSource::from_json_file(path)?),
        };

        let mut state = Self::with_source(source, config.page_size);
        state.sales_service = state.sales_service.with_session_idle_ttl(config.session_idle_ttl);
        Ok(state)
    }

    /// Monta o estado em cima de uma fonte já pronta.
    pub fn with_source(source: Arc<dyn SalesSource>, page_size: u32) -> Self {
        Self {
            sales_service: SalesService::new(source, page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn database_url_wins_over_seed_file() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/sales"),
            ("SALES_SEED_FILE", "seed.json"),
        ]))
        .unwrap();

        assert_eq!(
            config.source,
            DataSourceConfig::Postgres {
                database_url: "postgres://localhost/sales".into(),
                max_connections: 5,
            }
        );
        assert_eq!(config.page_size, 10);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn seed_file_and_custom_page_size() {
        let config = Config::from_lookup(lookup(&[
            ("SALES_SEED_FILE", "data/sales.json"),
            ("PAGE_SIZE", "25"),
        ]))
        .unwrap();

        assert_eq!(config.source, DataSourceConfig::SeedFile(PathBuf::from("data/sales.json")));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.session_idle_ttl, DEFAULT_SESSION_IDLE_TTL);
    }

    #[test]
    fn session_idle_ttl_from_env() {
        let config = Config::from_lookup(lookup(&[
            ("SALES_SEED_FILE", "x.json"),
            ("SESSION_IDLE_TTL_SECS", "90"),
        ]))
        .unwrap();
        assert_eq!(config.session_idle_ttl, Duration::from_secs(90));

        assert!(Config::from_lookup(lookup(&[("SALES_SEED_FILE", "x.json"), ("SESSION_IDLE_TTL_SECS", "0")])).is_err());
    }

    #[test]
    fn rejects_missing_source_and_zero_page_size() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("SALES_SEED_FILE", "x.json"), ("PAGE_SIZE", "0")])).is_err());
    }
}
