//! Per-view-session HR state, keyed by the id carried in the session cookie.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use products_hr::HrModule;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Everything one browser view owns: its roster, its draft and a pending notice.
#[derive(Debug, Default)]
pub struct ViewSession {
    pub hr: HrModule,
    pub notice: Option<String>,
}

struct SessionEntry {
    view: ViewSession,
    last_seen: Instant,
}

pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    seed_roster: bool,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(seed_roster: bool, idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            seed_roster,
            idle_ttl,
        }
    }

    /// Runs `f` against the session, starting a fresh one when the id is
    /// unknown or has sat idle past the TTL.
    pub async fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut ViewSession) -> R) -> R {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        if sessions.get(&id).is_some_and(|entry| self.is_idle(entry, now)) {
            sessions.remove(&id);
            info!(session_id = %id, "idle session discarded");
        }
        if !sessions.contains_key(&id) {
            self.expire_idle(&mut sessions, now);
            info!(session_id = %id, seeded = self.seed_roster, "session started");
        }
        let entry = sessions.entry(id).or_insert_with(|| SessionEntry {
            view: self.fresh_view(),
            last_seen: now,
        });
        entry.last_seen = now;
        f(&mut entry.view)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn fresh_view(&self) -> ViewSession {
        let hr = if self.seed_roster {
            HrModule::with_sample_roster()
        } else {
            HrModule::default()
        };
        ViewSession { hr, notice: None }
    }

    fn is_idle(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.duration_since(entry.last_seen) > self.idle_ttl
    }

    fn expire_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_idle(entry, now));
        let expired = before - sessions.len();
        if expired > 0 {
            info!(expired, remaining = sessions.len(), "sessions expired");
        } else {
            debug!(active = before, "no idle sessions to expire");
        }
    }
}
