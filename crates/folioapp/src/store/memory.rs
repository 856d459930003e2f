use super::mem_backend::MemBackend;
use super::record_store::RecordStore;

pub type InMemoryStore = RecordStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        RecordStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{MediaKind, NewRecord, SectionKey};
    use crate::store::BlobStore;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_documents(mut self, section: &str, count: usize) -> Self {
            let key: SectionKey = section.parse().unwrap();
            for i in 0..count {
                let record = NewRecord::new(
                    key,
                    MediaKind::Pdf,
                    format!("doc-{}-{}.pdf", section, i + 1),
                    "application/pdf",
                    format!("%PDF-1.4 {}", i + 1).into_bytes(),
                );
                self.store.add(record).unwrap();
            }
            self
        }

        pub fn with_images(mut self, section: &str, count: usize) -> Self {
            let key: SectionKey = section.parse().unwrap();
            for i in 0..count {
                let record = NewRecord::new(
                    key,
                    MediaKind::Image,
                    format!("img-{}-{}.png", section, i + 1),
                    "image/png",
                    vec![0x89, b'P', b'N', b'G', i as u8],
                );
                self.store.add(record).unwrap();
            }
            self
        }
    }
}
