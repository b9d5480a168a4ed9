mod test_merge;
mod test_record;

use tempfile::TempDir;

use crate::record::RankingRecord;
use crate::store::RankingStore;

/// Initialize logging for tests
pub fn init() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Write `records` into a fresh store inside its own temp directory.
pub fn store_with(records: &[(usize, usize, f64)]) -> (TempDir, RankingStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = RankingStore::new(dir.path().join("ranking.txt"));
    let mut writer = store.writer().unwrap();
    for &(s, t, score) in records {
        writer.append(&RankingRecord::new(s, t, score)).unwrap();
    }
    writer.finish().unwrap();
    (dir, store)
}

/// Drain a store into memory.
pub fn read_all(store: &RankingStore) -> Vec<RankingRecord> {
    let mut reader = store.reader().unwrap();
    let mut out = Vec::new();
    while let Some(record) = reader.next_record().unwrap() {
        out.push(record);
    }
    out
}
