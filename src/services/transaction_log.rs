//! Audit trail of gateway status queries.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::NewTransactionLogEntry;
use crate::ports::{RepositoryResult, TransactionLogStore};

/// Appends one entry per status query. There is no read path; store
/// failures are returned to the caller as-is.
#[derive(Clone)]
pub struct TransactionLogRecorder {
    store: Arc<dyn TransactionLogStore>,
}

impl TransactionLogRecorder {
    pub fn new(store: Arc<dyn TransactionLogStore>) -> Self {
        Self { store }
    }

    pub async fn append(
        &self,
        reference: &str,
        status: &str,
        data_out: String,
    ) -> RepositoryResult<()> {
        self.store
            .append(NewTransactionLogEntry {
                reference: reference.to_string(),
                status: status.to_string(),
                data_out,
                created_at: Utc::now(),
            })
            .await?;

        tracing::debug!("Logged gateway status {} for {}", status, reference);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTransactionLogStore;

    #[tokio::test]
    async fn test_append_records_raw_payload() {
        let store = InMemoryTransactionLogStore::new();
        let recorder = TransactionLogRecorder::new(Arc::new(store.clone()));

        recorder
            .append("eve-abc", "DECLINED", r#"{"data":{"status":"DECLINED"}}"#.to_string())
            .await
            .unwrap();

        let entries = store.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reference, "eve-abc");
        assert_eq!(entries[0].status, "DECLINED");
        assert_eq!(entries[0].data_out, r#"{"data":{"status":"DECLINED"}}"#);
    }
}
