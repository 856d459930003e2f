use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::SectionKey;
use crate::store::BlobStore;

/// List rows without payloads, through the section index. With no section
/// every section is listed in page order.
pub fn run<S: BlobStore>(store: &S, section: Option<SectionKey>) -> Result<CmdResult> {
    store.open()?;

    let rows = match section {
        Some(key) => store.list_section(key)?,
        None => {
            let mut rows = Vec::new();
            for key in SectionKey::all() {
                rows.extend(store.list_section(key)?);
            }
            rows
        }
    };

    Ok(CmdResult::default().with_listed(rows))
}
