//! Ledger-account CSV export
//!
//! Exports are server-side jobs: create one, poll its status on a fixed
//! interval until it completes or fails, then ask for a short-lived download
//! link. The poller is a spawned task owned by `ExportJob`; dropping the handle
//! aborts it, so closing the export dialog never leaves a timer behind.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::graphql::operations::{
    AccountingCsv, AccountingCsvStatus, CsvCreatePayload, CsvIdInput, CsvListVars,
    DownloadLinkPayload, Input, LedgerAccountInput, ACCOUNTING_CSVS,
    ACCOUNTING_CSV_DOWNLOAD_LINK_GENERATE, LEDGER_ACCOUNT_CSV_CREATE,
};
use crate::graphql::{ClientError, Connection, GraphqlClient};

/// Default poll period
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// How many recent exports the status query looks through
const RECENT_EXPORTS: u32 = 5;

/// Progress reported by a running export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportUpdate {
    Pending { csv_id: String },
    Completed { csv_id: String, link: String },
    Failed { csv_id: String },
    Error(ClientError),
}

/// Server calls the poller needs; the GraphQL client in production
pub trait ExportBackend: Send + Sync + 'static {
    fn csv_status(
        &self,
        ledger_account_id: &str,
        csv_id: &str,
    ) -> impl Future<Output = Result<Option<AccountingCsvStatus>, ClientError>> + Send;

    fn download_link(
        &self,
        csv_id: &str,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;
}

impl ExportBackend for GraphqlClient {
    async fn csv_status(
        &self,
        ledger_account_id: &str,
        csv_id: &str,
    ) -> Result<Option<AccountingCsvStatus>, ClientError> {
        let vars = CsvListVars {
            ledger_account_id,
            first: RECENT_EXPORTS,
        };
        let recent: Connection<AccountingCsv> = self.execute(&ACCOUNTING_CSVS, &vars).await?;
        Ok(recent
            .into_nodes()
            .into_iter()
            .find(|csv| csv.csv_id == csv_id)
            .map(|csv| csv.status))
    }

    async fn download_link(&self, csv_id: &str) -> Result<String, ClientError> {
        let vars = Input {
            input: CsvIdInput {
                accounting_csv_id: csv_id,
            },
        };
        let payload: DownloadLinkPayload = self
            .execute(&ACCOUNTING_CSV_DOWNLOAD_LINK_GENERATE, &vars)
            .await?;
        Ok(payload.link.url)
    }
}

/// Handle to a running export; aborts the poller when dropped
#[derive(Debug)]
pub struct ExportJob {
    csv_id: String,
    handle: JoinHandle<()>,
}

impl ExportJob {
    /// Create a new export for `ledger_account_id` and start polling it
    pub async fn start(
        client: GraphqlClient,
        ledger_account_id: String,
        interval: Duration,
        updates: mpsc::Sender<ExportUpdate>,
    ) -> Result<Self, ClientError> {
        let vars = Input {
            input: LedgerAccountInput {
                ledger_account_id: &ledger_account_id,
            },
        };
        let created: CsvCreatePayload = client.execute(&LEDGER_ACCOUNT_CSV_CREATE, &vars).await?;
        let csv_id = created.accounting_csv.csv_id;

        tracing::info!(csv_id = %csv_id, ledger_account_id = %ledger_account_id, "CSV export created");

        Ok(Self::spawn(client, ledger_account_id, csv_id, interval, updates))
    }

    /// Start polling an export that already exists
    pub fn spawn<B: ExportBackend>(
        backend: B,
        ledger_account_id: String,
        csv_id: String,
        interval: Duration,
        updates: mpsc::Sender<ExportUpdate>,
    ) -> Self {
        let task_csv_id = csv_id.clone();
        let handle = tokio::spawn(async move {
            poll_until_done(backend, ledger_account_id, task_csv_id, interval, updates).await;
        });
        Self { csv_id, handle }
    }

    pub fn csv_id(&self) -> &str {
        &self.csv_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ExportJob {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            tracing::debug!(csv_id = %self.csv_id, "Cancelling CSV export poller");
        }
        self.handle.abort();
    }
}

async fn poll_until_done<B: ExportBackend>(
    backend: B,
    ledger_account_id: String,
    csv_id: String,
    interval: Duration,
    updates: mpsc::Sender<ExportUpdate>,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        let update = match backend.csv_status(&ledger_account_id, &csv_id).await {
            Ok(Some(AccountingCsvStatus::Completed)) => {
                match backend.download_link(&csv_id).await {
                    Ok(link) => ExportUpdate::Completed {
                        csv_id: csv_id.clone(),
                        link,
                    },
                    Err(e) => ExportUpdate::Error(e),
                }
            }
            Ok(Some(AccountingCsvStatus::Failed)) => ExportUpdate::Failed {
                csv_id: csv_id.clone(),
            },
            // Not listed yet counts as still pending
            Ok(Some(AccountingCsvStatus::Pending)) | Ok(None) => ExportUpdate::Pending {
                csv_id: csv_id.clone(),
            },
            Err(e) => ExportUpdate::Error(e),
        };

        let done = !matches!(update, ExportUpdate::Pending { .. });
        match &update {
            ExportUpdate::Completed { .. } => tracing::info!(csv_id = %csv_id, "CSV export ready"),
            ExportUpdate::Failed { .. } => tracing::warn!(csv_id = %csv_id, "CSV export failed"),
            ExportUpdate::Error(e) => tracing::warn!(csv_id = %csv_id, "CSV poll error: {}", e),
            ExportUpdate::Pending { .. } => tracing::trace!(csv_id = %csv_id, "CSV still pending"),
        }

        if updates.send(update).await.is_err() || done {
            break;
        }
    }
}
