//! Feed sessions
//!
//! One `FeedController` per open feed. A client opens a session, then keeps
//! asking it for more or for a refresh. Sessions idle past the TTL are purged
//! and the number of live sessions is capped, evicting the least recently
//! used one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use uuid::Uuid;

use super::feed_controller::{FeedController, FeedSettings};
use crate::domain::ports::{ArticleSource, ProjectSource};

/// Controller over type-erased sources, as held by the HTTP layer
pub type DynFeedController = FeedController<ProjectSource, ArticleSource>;

struct SessionEntry {
    controller: Arc<DynFeedController>,
    last_access: Instant,
}

pub struct FeedSessions {
    projects: Arc<ProjectSource>,
    articles: Arc<ArticleSource>,
    settings: FeedSettings,
    ttl: Duration,
    max_sessions: usize,
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl FeedSessions {
    pub fn new(
        projects: Arc<ProjectSource>,
        articles: Arc<ArticleSource>,
        settings: FeedSettings,
        ttl: Duration,
        max_sessions: usize,
    ) -> Self {
        Self {
            projects,
            articles,
            settings,
            ttl,
            max_sessions: max_sessions.max(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Open a session with fresh cursors and run its initial load
    pub async fn open(&self) -> (Uuid, Arc<DynFeedController>) {
        let id = Uuid::new_v4();
        let controller = Arc::new(FeedController::new(
            self.projects.clone(),
            self.articles.clone(),
            self.settings,
        ));

        {
            let mut sessions = self.sessions();
            if sessions.len() >= self.max_sessions {
                evict_least_recent(&mut sessions);
            }
            sessions.insert(
                id,
                SessionEntry {
                    controller: controller.clone(),
                    last_access: Instant::now(),
                },
            );
        }
        tracing::debug!(session = %id, "feed session opened");

        controller.load_initial().await;
        (id, controller)
    }

    /// Look up a session and mark it as used
    pub fn get(&self, id: &Uuid) -> Option<Arc<DynFeedController>> {
        let mut sessions = self.sessions();
        sessions.get_mut(id).map(|entry| {
            entry.last_access = Instant::now();
            entry.controller.clone()
        })
    }

    pub fn close(&self, id: &Uuid) -> bool {
        self.sessions().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop sessions idle for longer than the TTL as of `now`
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions();
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_access) <= ttl);
        before - sessions.len()
    }

    /// Periodically purge idle sessions
    pub fn spawn_purger(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let sessions = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let purged = sessions.purge_expired_at(Instant::now());
                if purged > 0 {
                    tracing::info!(purged, live = sessions.len(), "purged idle feed sessions");
                }
            }
        })
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn evict_least_recent(sessions: &mut HashMap<Uuid, SessionEntry>) {
    let oldest = sessions
        .iter()
        .min_by_key(|(_, entry)| entry.last_access)
        .map(|(id, _)| *id);
    if let Some(id) = oldest {
        sessions.remove(&id);
        tracing::debug!(session = %id, "evicted least recently used feed session");
    }
}
