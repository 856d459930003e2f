use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::RecordId;
use crate::store::BlobStore;

/// Remove one record. Unknown ids fail with `NotFound`; a failed delete
/// leaves the store as it was. Only the row is consulted, so a record whose
/// payload went missing can still be removed.
pub fn run<S: BlobStore>(store: &mut S, id: RecordId) -> Result<CmdResult> {
    let meta = store.meta(id)?;
    store.remove(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted {} ({}): {}",
        meta.kind, meta.id, meta.name
    )));
    result.affected.push(meta);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;
    use crate::model::{MediaKind, SectionKey};
    use crate::store::backend::StorageBackend;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn removes_exactly_one_record() {
        let mut fixture = StoreFixture::new()
            .with_documents("1-1", 2)
            .with_images("2-1", 3);

        let result = run(&mut fixture.store, RecordId(2)).unwrap();
        assert_eq!(result.affected[0].name, "doc-1-1-2.pdf");
        assert_eq!(result.affected[0].kind, MediaKind::Pdf);

        let remaining = fixture.store.list_all().unwrap();
        assert_eq!(remaining.len(), 4);
        assert!(remaining.iter().all(|r| r.id != RecordId(2)));

        let images = fixture
            .store
            .list_section("2-1".parse::<SectionKey>().unwrap())
            .unwrap();
        assert_eq!(images.len(), 3);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut fixture = StoreFixture::new().with_documents("1-1", 1);
        let err = run(&mut fixture.store, RecordId(99)).unwrap_err();
        assert!(matches!(err, FolioError::NotFound(RecordId(99))));
        assert_eq!(fixture.store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn listed_row_without_payload_is_deletable() {
        let mut fixture = StoreFixture::new().with_documents("1-1", 1);
        fixture.store.backend().delete_blob(RecordId(1)).unwrap();
        let section: SectionKey = "1-1".parse().unwrap();
        assert_eq!(fixture.store.list_section(section).unwrap().len(), 1);

        let result = run(&mut fixture.store, RecordId(1)).unwrap();
        assert_eq!(result.affected[0].name, "doc-1-1-1.pdf");
        assert!(fixture.store.list_section(section).unwrap().is_empty());
    }

    #[test]
    fn failed_delete_keeps_the_record() {
        let mut fixture = StoreFixture::new().with_images("3-1", 1);
        fixture.store.backend().set_simulate_write_error(true);

        let err = run(&mut fixture.store, RecordId(1)).unwrap_err();
        assert!(matches!(err, FolioError::DeleteFailure { .. }));

        fixture.store.backend().set_simulate_write_error(false);
        assert_eq!(fixture.store.list_all().unwrap().len(), 1);
    }
}
