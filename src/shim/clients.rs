//! Registry of open page instances controlled by the shim.
//!
//! Mirrors the notion of service-worker clients: activation claims all open
//! instances immediately, and a notification click brings an existing
//! instance to the foreground or opens a new one.

// Allow dead code: registry inspection methods are used by tests
#![allow(dead_code)]

use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub id: u64,
    pub url: String,
    pub controlled: bool,
    pub focused: bool,
}

#[derive(Default)]
pub struct ClientRegistry {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    clients: Vec<ClientHandle>,
}

impl ClientRegistry {
    /// Register a newly opened page instance. It is uncontrolled until the
    /// shim claims it.
    pub fn register(&self, url: &str) -> u64 {
        let mut inner = self.inner.lock().expect("client registry poisoned");
        inner.next_id += 1;
        let id = inner.next_id;
        inner.clients.push(ClientHandle {
            id,
            url: url.to_string(),
            controlled: false,
            focused: false,
        });
        id
    }

    /// Take control of every registered instance immediately.
    pub fn claim(&self) {
        let mut inner = self.inner.lock().expect("client registry poisoned");
        for client in &mut inner.clients {
            client.controlled = true;
        }
    }

    /// Bring an existing instance to the foreground, or open a new
    /// controlled one at `url`. Returns the focused client's id.
    pub fn focus_or_open(&self, url: &str) -> u64 {
        let mut inner = self.inner.lock().expect("client registry poisoned");
        if let Some(first_id) = inner.clients.first().map(|c| c.id) {
            for client in &mut inner.clients {
                client.focused = client.id == first_id;
            }
            return first_id;
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.clients.push(ClientHandle {
            id,
            url: url.to_string(),
            controlled: true,
            focused: true,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("client registry poisoned").clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn controlled_count(&self) -> usize {
        self.inner
            .lock()
            .expect("client registry poisoned")
            .clients
            .iter()
            .filter(|c| c.controlled)
            .count()
    }

    pub fn focused(&self) -> Option<u64> {
        self.inner
            .lock()
            .expect("client registry poisoned")
            .clients
            .iter()
            .find(|c| c.focused)
            .map(|c| c.id)
    }
}
