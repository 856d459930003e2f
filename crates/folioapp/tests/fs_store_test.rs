use folioapp::api::Portfolio;
use folioapp::carousel::CarouselSettings;
use folioapp::commands::upload::IncomingFile;
use folioapp::error::FolioError;
use folioapp::model::{MediaKind, NewRecord, RecordId, SectionKey};
use folioapp::store::backend::StorageBackend;
use folioapp::store::fs::FileStore;
use folioapp::store::fs_backend::FsBackend;
use folioapp::store::schema::SCHEMA_VERSION;
use folioapp::store::BlobStore;
use folioapp::surface::{ContainerId, HeadlessPage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn section(key: &str) -> SectionKey {
    key.parse().unwrap()
}

fn pdf(key: &str, name: &str) -> NewRecord {
    NewRecord::new(
        section(key),
        MediaKind::Pdf,
        name,
        "application/pdf",
        format!("%PDF {}", name).into_bytes(),
    )
}

fn assert_no_tmp_files(dir: &Path) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        if path.is_dir() {
            assert_no_tmp_files(&path);
        }
    }
}

#[test]
fn records_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = FileStore::new(dir.path().to_path_buf());
        store.open().unwrap();
        store.add(pdf("1-1", "cv.pdf")).unwrap();
        store.add(pdf("1-2", "plan.pdf")).unwrap();
    }

    let store = FileStore::new(dir.path().to_path_buf());
    store.open().unwrap();
    let records = store.list_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, RecordId(1));
    assert_eq!(records[0].name, "cv.pdf");
    assert_eq!(records[0].blob, b"%PDF cv.pdf");
    assert_eq!(records[1].section, section("1-2"));
}

#[test]
fn layout_is_manifest_plus_blob_files() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path().to_path_buf());
    store.add(pdf("2-1", "a.pdf")).unwrap();

    assert!(dir.path().join("folio.json").exists());
    assert!(dir.path().join("blobs").join("file-1.bin").exists());
    assert_no_tmp_files(dir.path());

    let backend = FsBackend::new(dir.path().to_path_buf());
    let manifest = backend.load_manifest().unwrap().unwrap();
    assert_eq!(manifest.schema_version, SCHEMA_VERSION);
}

#[test]
fn ids_are_not_reused_after_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = FileStore::new(dir.path().to_path_buf());
        store.add(pdf("1-1", "a.pdf")).unwrap();
        store.add(pdf("1-1", "b.pdf")).unwrap();
        store.remove(RecordId(2)).unwrap();
    }

    let mut store = FileStore::new(dir.path().to_path_buf());
    let id = store.add(pdf("1-1", "c.pdf")).unwrap();
    assert_eq!(id, RecordId(3));
    assert!(!dir.path().join("blobs").join("file-2.bin").exists());
}

#[test]
fn newer_schema_on_disk_is_unavailable() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("folio.json"),
        r#"{ "schema_version": 99, "files": null }"#,
    )
    .unwrap();

    let store = FileStore::new(dir.path().to_path_buf());
    assert!(matches!(
        store.open().unwrap_err(),
        FolioError::StoreUnavailable(_)
    ));
}

#[test]
fn file_in_place_of_data_dir_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("not-a-dir");
    fs::write(&bogus, "x").unwrap();

    let store = FileStore::new(bogus);
    assert!(matches!(
        store.open().unwrap_err(),
        FolioError::StoreUnavailable(_)
    ));
}

#[test]
fn portfolio_round_trip_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut portfolio = Portfolio::new(
        FileStore::new(dir.path().to_path_buf()),
        HeadlessPage::with_all_sections(),
        CarouselSettings::default(),
    );
    portfolio.load_data().unwrap();
    portfolio
        .upload(
            section("2-2"),
            MediaKind::Image,
            vec![
                IncomingFile::new("front.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]),
                IncomingFile::new("readme.txt", "text/plain", b"x".to_vec()),
            ],
        )
        .unwrap();

    let items = portfolio.surface().items(ContainerId::Images(section("2-2")));
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "front.jpg");
    assert!(items[0].url.starts_with("blob:folio/"));

    assert!(portfolio.open_carousel(section("2-2"), 0));
    assert_eq!(portfolio.carousel().geometry().radius, 0.0);
    assert_no_tmp_files(dir.path());
}

#[test]
fn unreadable_payload_skips_only_its_row() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = FileStore::new(dir.path().to_path_buf());
        store.add(pdf("1-1", "healthy.pdf")).unwrap();
        store.add(pdf("1-2", "broken.pdf")).unwrap();
    }
    let blob = dir.path().join("blobs").join("file-2.bin");
    fs::remove_file(&blob).unwrap();
    fs::create_dir(&blob).unwrap();

    let store = FileStore::new(dir.path().to_path_buf());
    let records = store.list_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "healthy.pdf");

    let mut portfolio = Portfolio::new(
        store,
        HeadlessPage::with_all_sections(),
        CarouselSettings::default(),
    );
    let report = portfolio.load_data().unwrap();
    assert_eq!(report.documents, 1);
    assert_eq!(
        portfolio
            .surface()
            .items(ContainerId::Documents(section("1-1")))
            .len(),
        1
    );
}

#[test]
fn row_with_missing_payload_is_deleted_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path().to_path_buf());
    let id = store.add(pdf("1-3", "gone.pdf")).unwrap();
    fs::remove_file(dir.path().join("blobs").join("file-1.bin")).unwrap();

    assert_eq!(store.list_section(section("1-3")).unwrap().len(), 1);
    store.remove(id).unwrap();
    assert!(store.list_section(section("1-3")).unwrap().is_empty());
}
