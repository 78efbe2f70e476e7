use lockgate::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock ApprovalStore keeping the record in memory; clones share state
#[derive(Clone)]
pub struct InMemoryApprovalStore {
    record: Arc<Mutex<ApprovalRecord>>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryApprovalStore {
    pub fn new() -> Self {
        Self::with_record(ApprovalRecord::empty())
    }

    pub fn with_record(record: ApprovalRecord) -> Self {
        Self {
            record: Arc::new(Mutex::new(record)),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn record(&self) -> ApprovalRecord {
        self.record.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ApprovalStore for InMemoryApprovalStore {
    fn load(&self) -> ApprovalRecord {
        self.record()
    }

    fn save(&self, record: &ApprovalRecord) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.record.lock().unwrap() = record.clone();
        Ok(())
    }
}
