//! # Display Handles
//!
//! A display handle is an ephemeral, process-local url (`blob:folio/<uuid>`)
//! that stands for a record's payload while it is on screen. Handles are
//! never persisted and every one of them holds its payload in memory, so
//! they must be released once nothing displays them anymore.
//!
//! ## Lifecycle
//!
//! The [`HandleTable`] issues handles. A [`DisplayHandle`] is reference
//! counted: clones share one table slot and the slot is released when the
//! last clone is dropped. That gives two guarantees without any manual
//! revoke calls:
//!
//! - replacing the section state releases every handle issued by the
//!   previous load, once the new state has been rendered;
//! - a handle still bound to an open viewer or carousel outlives the reload
//!   that superseded it, and is released when that view closes.
//!
//! The table only keeps a weak link from handles back to itself, so dropping
//! the table before its handles is harmless.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;
use uuid::Uuid;

pub const HANDLE_SCHEME: &str = "blob:folio/";

struct Slot {
    bytes: Rc<[u8]>,
    media_type: String,
}

#[derive(Default)]
struct TableInner {
    slots: HashMap<Uuid, Slot>,
    issued: u64,
    released: u64,
}

/// Issues and resolves display handles.
#[derive(Clone, Default)]
pub struct HandleTable {
    inner: Rc<RefCell<TableInner>>,
}

/// Payload behind a live handle.
#[derive(Debug, Clone)]
pub struct ResolvedHandle {
    pub bytes: Rc<[u8]>,
    pub media_type: String,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, bytes: Vec<u8>, media_type: &str) -> DisplayHandle {
        let token = Uuid::new_v4();
        let url = format!("{}{}", HANDLE_SCHEME, token);
        {
            let mut inner = self.inner.borrow_mut();
            inner.slots.insert(
                token,
                Slot {
                    bytes: Rc::from(bytes),
                    media_type: media_type.to_string(),
                },
            );
            inner.issued += 1;
        }
        trace!(%url, "display handle issued");
        DisplayHandle {
            guard: Rc::new(HandleGuard {
                token,
                url,
                table: Rc::downgrade(&self.inner),
            }),
        }
    }

    /// Look a url up. Returns None for released or foreign urls.
    pub fn resolve(&self, url: &str) -> Option<ResolvedHandle> {
        let token = url.strip_prefix(HANDLE_SCHEME)?.parse::<Uuid>().ok()?;
        let inner = self.inner.borrow();
        inner.slots.get(&token).map(|slot| ResolvedHandle {
            bytes: Rc::clone(&slot.bytes),
            media_type: slot.media_type.clone(),
        })
    }

    /// Handles issued and not yet released.
    pub fn live_count(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    pub fn issued_total(&self) -> u64 {
        self.inner.borrow().issued
    }

    pub fn released_total(&self) -> u64 {
        self.inner.borrow().released
    }
}

struct HandleGuard {
    token: Uuid,
    url: String,
    table: Weak<RefCell<TableInner>>,
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            let mut inner = table.borrow_mut();
            if inner.slots.remove(&self.token).is_some() {
                inner.released += 1;
                trace!(url = %self.url, "display handle released");
            }
        }
    }
}

/// A live display handle. Cloning shares the same url.
#[derive(Clone)]
pub struct DisplayHandle {
    guard: Rc<HandleGuard>,
}

impl DisplayHandle {
    pub fn url(&self) -> &str {
        &self.guard.url
    }
}

impl PartialEq for DisplayHandle {
    fn eq(&self, other: &Self) -> bool {
        self.guard.token == other.guard.token
    }
}

impl fmt::Debug for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DisplayHandle").field(&self.guard.url).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_handle_resolves_to_payload() {
        let table = HandleTable::new();
        let handle = table.issue(vec![1, 2, 3], "image/png");

        assert!(handle.url().starts_with(HANDLE_SCHEME));
        let resolved = table.resolve(handle.url()).unwrap();
        assert_eq!(&*resolved.bytes, &[1, 2, 3]);
        assert_eq!(resolved.media_type, "image/png");
        assert_eq!(table.live_count(), 1);
    }

    #[test]
    fn dropping_last_clone_releases() {
        let table = HandleTable::new();
        let handle = table.issue(vec![0], "application/pdf");
        let url = handle.url().to_string();
        let clone = handle.clone();

        drop(handle);
        assert_eq!(table.live_count(), 1);
        assert!(table.resolve(&url).is_some());

        drop(clone);
        assert_eq!(table.live_count(), 0);
        assert!(table.resolve(&url).is_none());
        assert_eq!(table.released_total(), 1);
    }

    #[test]
    fn urls_are_unique() {
        let table = HandleTable::new();
        let a = table.issue(vec![], "image/png");
        let b = table.issue(vec![], "image/png");
        assert_ne!(a.url(), b.url());
        assert_ne!(a, b);
        assert_eq!(table.issued_total(), 2);
    }

    #[test]
    fn foreign_urls_do_not_resolve() {
        let table = HandleTable::new();
        assert!(table.resolve("https://example.com/a.png").is_none());
        assert!(table.resolve("blob:folio/not-a-uuid").is_none());
    }

    #[test]
    fn handle_outliving_table_is_harmless() {
        let table = HandleTable::new();
        let handle = table.issue(vec![9], "image/gif");
        drop(table);
        assert!(handle.url().starts_with(HANDLE_SCHEME));
        drop(handle);
    }
}
