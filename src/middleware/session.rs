//! Session Middleware
//!
//! Identifies the client by a `sessionid` cookie, loads its session map from
//! a [`SessionStore`] before the inner handler runs and saves it afterwards.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::http::{Request, Response};
use crate::middleware::{CookieJar, Handler};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sessionid";

const SESSION_ID_LEN: usize = 32;
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Per-client data kept between requests.
pub type SessionData = Map<String, Value>;

/// Backing storage for serialized sessions.
pub trait SessionStore: Send + Sync {
    fn get_data(&self, session_id: &str) -> Option<Vec<u8>>;
    fn set_data(&self, session_id: &str, data: Vec<u8>, timeout: Duration);
}

/// Keeps sessions in process memory for the lifetime of the store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    ///
    /// A poisoned lock is logged and the count read through it.
    pub fn len(&self) -> usize {
        match self.sessions.lock() {
            Ok(sessions) => sessions.len(),
            Err(poisoned) => {
                warn!("session store lock poisoned, counting anyway");
                poisoned.into_inner().len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn get_data(&self, session_id: &str) -> Option<Vec<u8>> {
        self.sessions.lock().ok()?.get(session_id).cloned()
    }

    fn set_data(&self, session_id: &str, data: Vec<u8>, _timeout: Duration) {
        match self.sessions.lock() {
            Ok(mut sessions) => {
                sessions.insert(session_id.to_string(), data);
            }
            Err(_) => warn!("session store lock poisoned, session not saved"),
        }
    }
}

/// Draws a session id of distinct characters from `[A-Za-z0-9]`.
pub fn new_session_id() -> String {
    let mut rng = rand::rng();
    rand::seq::index::sample(&mut rng, ALPHABET.len(), SESSION_ID_LEN)
        .iter()
        .map(|i| ALPHABET[i] as char)
        .collect()
}

/// Wraps `inner` with cookie parsing and session load/save.
pub struct Session<H, S> {
    inner: H,
    store: S,
    timeout: Duration,
}

impl<H: Handler, S: SessionStore> Session<H, S> {
    pub fn new(inner: H, store: S, timeout: Duration) -> Self {
        Self {
            inner,
            store,
            timeout,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load(&self, session_id: &str) -> SessionData {
        let Some(bytes) = self.store.get_data(session_id) else {
            return SessionData::new();
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            warn!(error = %err, "discarding unreadable session");
            SessionData::new()
        })
    }
}

impl<H: Handler, S: SessionStore> Handler for Session<H, S> {
    fn handle(&self, req: &mut Request) -> Option<Response> {
        req.cookies = CookieJar::parse(req.headers.get("Cookie"));

        let existing = req
            .cookies
            .get(SESSION_COOKIE)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let session_id = match existing {
            Some(id) => {
                req.session = self.load(&id);
                id
            }
            None => {
                let id = new_session_id();
                req.cookies.set(SESSION_COOKIE, id.clone());
                req.session = SessionData::new();
                id
            }
        };
        info!(session_id = %session_id, keys = req.session.len(), "session loaded");

        let mut res = self.inner.handle(req);

        match serde_json::to_vec(&req.session) {
            Ok(bytes) => self.store.set_data(&session_id, bytes, self.timeout),
            Err(err) => warn!(error = %err, "session not saved"),
        }
        if let Some(res) = res.as_mut() {
            req.cookies.write_to(res);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::handler_fn;
    use std::collections::HashSet;

    fn counter() -> impl Handler {
        handler_fn(|req: &mut Request| {
            let count = req.session.get("count").and_then(Value::as_u64).unwrap_or(0);
            req.session.insert("count".to_string(), Value::from(count + 1));
            Some(Response::ok(count.to_string()))
        })
    }

    fn session_cookie(res: &Response) -> String {
        res.headers.get("Set-Cookie").unwrap().to_string()
    }

    #[test]
    fn test_session_id_shape() {
        let id = new_session_id();
        assert_eq!(id.len(), SESSION_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(id.chars().collect::<HashSet<_>>().len(), SESSION_ID_LEN);
    }

    #[test]
    fn test_new_client_gets_cookie() {
        let session = Session::new(counter(), MemorySessionStore::new(), Duration::from_secs(600));

        let res = session.handle(&mut Request::get("/")).unwrap();

        assert_eq!(res.body_text(), "0");
        assert!(session_cookie(&res).starts_with("sessionid="));
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_session_roundtrip_through_cookie() {
        let session = Session::new(counter(), MemorySessionStore::new(), Duration::from_secs(600));

        let first = session.handle(&mut Request::get("/")).unwrap();
        let cookie = session_cookie(&first);

        let mut req = Request::get("/").with_header("Cookie", cookie);
        let second = session.handle(&mut req).unwrap();

        assert_eq!(second.body_text(), "1");
        // Known session: nothing changed in the jar, so no new cookie.
        assert!(!second.headers.contains("Set-Cookie"));
    }

    #[test]
    fn test_unknown_session_id_starts_empty() {
        let session = Session::new(counter(), MemorySessionStore::new(), Duration::from_secs(600));
        let mut req = Request::get("/").with_header("Cookie", "sessionid=forgotten");

        let res = session.handle(&mut req).unwrap();

        assert_eq!(res.body_text(), "0");
        assert!(session.store().get_data("forgotten").is_some());
    }

    #[test]
    fn test_unreadable_session_discarded() {
        let store = MemorySessionStore::new();
        store.set_data("broken", b"{not json".to_vec(), Duration::from_secs(1));
        let session = Session::new(counter(), store, Duration::from_secs(600));
        let mut req = Request::get("/").with_header("Cookie", "sessionid=broken");

        assert_eq!(session.handle(&mut req).unwrap().body_text(), "0");
    }

    #[test]
    fn test_len_survives_poisoned_lock() {
        let store = MemorySessionStore::new();
        store.set_data("a", b"{}".to_vec(), Duration::from_secs(1));
        store.set_data("b", b"{}".to_vec(), Duration::from_secs(1));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.sessions.lock().unwrap();
            panic!("poison the store");
        }));
        assert!(result.is_err());
        assert!(store.sessions.is_poisoned());

        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_absent_response_still_saves_session() {
        let inner = handler_fn(|req: &mut Request| {
            req.session.insert("seen".to_string(), Value::Bool(true));
            None
        });
        let session = Session::new(inner, MemorySessionStore::new(), Duration::from_secs(600));

        assert!(session.handle(&mut Request::get("/")).is_none());
        assert_eq!(session.store().len(), 1);
    }
}
