// src/state/session.rs

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    sync::{Mutex, RwLock},
    time::Instant,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{FilterOptions, SalesFilters, SalesPage, SalesQuery, SalesRecord, SummaryStats},
    state::query_state::{QueryIntent, QueryState, SortPolicy},
};

/// Busca de linhas emitida por uma transição. Só é aplicada se ainda for a mais recente.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: SalesQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTicket {
    pub generation: u64,
    pub filters: SalesFilters,
}

/// Buscas a disparar depois de um `dispatch`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchPlan {
    pub rows: Option<FetchTicket>,
    pub summary: Option<SummaryTicket>,
}

/// Resultado de `complete_fetch`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Resposta de uma busca que já foi substituída; nada mudou.
    Stale,
    Applied,
    /// O total encolheu e a página buscada ficou fora do intervalo. A página
    /// já foi corrigida e este ticket busca as linhas dela.
    Refetch(FetchTicket),
}

impl FetchOutcome {
    pub fn follow_up(self) -> Option<FetchTicket> {
        match self {
            FetchOutcome::Refetch(ticket) => Some(ticket),
            _ => None,
        }
    }
}

/// Estado de uma instância do dashboard: consulta + últimos resultados.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    pub id: Uuid,
    pub query: QueryState,
    pub rows: Vec<SalesRecord>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter_options: FilterOptions,
    pub summary: SummaryStats,
    policy: SortPolicy,
    fetch_generation: u64,
    summary_generation: u64,
}

impl DashboardSession {
    pub fn new(page_size: u32, policy: SortPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: QueryState::new(page_size),
            rows: Vec::new(),
            loading: true,
            error: None,
            filter_options: FilterOptions::default(),
            summary: SummaryStats::default(),
            policy,
            fetch_generation: 0,
            summary_generation: 0,
        }
    }

    /// Plano da carga inicial (linhas + resumo).
    pub fn initial_plan(&mut self) -> FetchPlan {
        self.issue(true, true)
    }

    pub fn dispatch(&mut self, intent: QueryIntent) -> FetchPlan {
        let (next, transition) = self.query.reduce(intent, &self.policy);
        self.query = next;
        self.issue(transition.needs_fetch(), transition.needs_summary())
    }

    fn issue(&mut self, rows: bool, summary: bool) -> FetchPlan {
        let mut plan = FetchPlan::default();
        if rows {
            self.fetch_generation += 1;
            self.loading = true;
            self.error = None;
            plan.rows = Some(FetchTicket {
                generation: self.fetch_generation,
                query: self.query.query(),
            });
        }
        if summary {
            self.summary_generation += 1;
            plan.summary = Some(SummaryTicket {
                generation: self.summary_generation,
                filters: self.query.filters.clone(),
            });
        }
        plan
    }

    /// Aplica o resultado de uma busca. Respostas atrasadas são descartadas.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, result: Result<SalesPage, AppError>) -> FetchOutcome {
        if ticket.generation != self.fetch_generation {
            tracing::debug!(
                session = %self.id,
                stale = ticket.generation,
                latest = self.fetch_generation,
                "Resposta atrasada descartada"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(page) => {
                self.error = None;
                if self.query.apply_fetch_totals(page.total_matching) {
                    tracing::debug!(
                        session = %self.id,
                        requested = ticket.query.page,
                        page = self.query.pagination.page,
                        "Página fora do intervalo, buscando de novo"
                    );
                    self.rows.clear();
                    return match self.issue(true, false).rows {
                        Some(next) => FetchOutcome::Refetch(next),
                        None => FetchOutcome::Applied,
                    };
                }
                self.loading = false;
                self.rows = page.rows;
            }
            Err(e) => {
                tracing::warn!(session = %self.id, "Erro ao buscar vendas: {}", e);
                self.loading = false;
                self.rows.clear();
                self.error = Some(e.user_message());
            }
        }
        FetchOutcome::Applied
    }

    /// Falhas no resumo só vão para o log; os valores anteriores ficam.
    pub fn complete_summary(&mut self, ticket: &SummaryTicket, result: Result<SummaryStats, AppError>) -> bool {
        if ticket.generation != self.summary_generation {
            return false;
        }
        match result {
            Ok(stats) => self.summary = stats,
            Err(e) => tracing::warn!(session = %self.id, "Erro ao calcular resumo: {}", e),
        }
        true
    }

    pub fn complete_filter_options(&mut self, result: Result<FilterOptions, AppError>) {
        match result {
            Ok(options) => self.filter_options = options,
            Err(e) => tracing::warn!(session = %self.id, "Erro ao buscar opções de filtro: {}", e),
        }
    }
}

pub type SharedSession = Arc<Mutex<DashboardSession>>;

/// Tempo sem acesso depois do qual uma sessão é descartada.
pub const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct StoredSession {
    session: SharedSession,
    last_access: Instant,
}

/// Sessões vivas. Nada é persistido: uma sessão some no `remove`, quando fica
/// ociosa por mais de `idle_ttl` ou com o processo.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_SESSION_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub async fn insert(&self, session: DashboardSession) -> SharedSession {
        let id = session.id;
        let shared = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions);
        sessions.insert(id, StoredSession { session: shared.clone(), last_access: Instant::now() });
        shared
    }

    /// Busca e renova o prazo da sessão.
    pub async fn get(&self, id: Uuid) -> Result<SharedSession, AppError> {
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions);

        let stored = sessions.get_mut(&id).ok_or(AppError::SessionNotFound(id))?;
        stored.last_access = Instant::now();
        Ok(stored.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::SessionNotFound(id))
    }

    /// Remove as sessões ociosas e devolve quantas saíram.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, StoredSession>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, stored| stored.last_access.elapsed() <= self.idle_ttl);

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "Sessões ociosas descartadas");
        }
        evicted
    }
}
