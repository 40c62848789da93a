//! SQLite-backed job ledger
//!
//! Every mutation runs inside a `BEGIN IMMEDIATE` transaction, which takes
//! SQLite's reserved lock up front. Two writers (in this process or another
//! driver process sharing the file) therefore serialize on the lock instead
//! of interleaving a read-then-write; a blocked writer waits up to
//! [`BUSY_TIMEOUT`](crate::db::BUSY_TIMEOUT).

use baton_core::JobId;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::db;
use crate::error::LedgerResult;

const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

/// Ledger contents as read by [`JobLedger::snapshot`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub jobs: Vec<JobId>,
    last_row: Option<i64>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Durable, insertion-ordered set of pending job ids
#[derive(Debug, Clone)]
pub struct JobLedger {
    pool: SqlitePool,
    path: PathBuf,
}

impl JobLedger {
    /// Opens (or creates) the ledger at `path`.
    ///
    /// Creates missing parent directories and ensures the table exists;
    /// opening an existing ledger keeps its rows.
    pub async fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = std::path::absolute(path.as_ref())?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let pool = db::create_pool(&path).await?;
        db::run_migrations(&pool).await?;

        info!("Job ledger: {}", path.display());
        Ok(Self { pool, path })
    }

    /// Absolute path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records a submitted job.
    pub async fn append(&self, job_id: &JobId) -> LedgerResult<()> {
        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;
        sqlx::query("INSERT INTO pending_jobs (job_id) VALUES (?)")
            .bind(job_id.as_str())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Recorded job {} in ledger", job_id);
        Ok(())
    }

    /// Number of pending jobs
    pub async fn size(&self) -> LedgerResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pending_jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    pub async fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.size().await? == 0)
    }

    /// Pending jobs in insertion order
    pub async fn list(&self) -> LedgerResult<Vec<JobId>> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT job_id FROM pending_jobs ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().map(JobId::from).collect())
    }

    /// Pending jobs together with the position of the last one, so that
    /// exactly these rows can be cleared later.
    pub async fn snapshot(&self) -> LedgerResult<Snapshot> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, job_id FROM pending_jobs ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        let last_row = rows.last().map(|(id, _)| *id);
        let jobs = rows.into_iter().map(|(_, job_id)| JobId::from(job_id)).collect();
        Ok(Snapshot { jobs, last_row })
    }

    /// Removes the jobs in `snapshot` and compacts the file.
    ///
    /// Jobs appended after the snapshot was taken are kept. Only call this
    /// once the snapshot's jobs are known to have left the scheduler.
    pub async fn clear_snapshot(&self, snapshot: &Snapshot) -> LedgerResult<Vec<JobId>> {
        match snapshot.last_row {
            Some(last_row) => self.remove_through(last_row).await,
            None => Ok(Vec::new()),
        }
    }

    /// Removes every pending job and compacts the file.
    ///
    /// Administrative: jobs still running are forgotten. Returns the ids
    /// that were removed.
    pub async fn clear(&self) -> LedgerResult<Vec<JobId>> {
        self.remove_through(i64::MAX).await
    }

    async fn remove_through(&self, last_row: i64) -> LedgerResult<Vec<JobId>> {
        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;
        let cleared: Vec<String> =
            sqlx::query_scalar("SELECT job_id FROM pending_jobs WHERE id <= ? ORDER BY id")
                .bind(last_row)
                .fetch_all(&mut *tx)
                .await?;
        sqlx::query("DELETE FROM pending_jobs WHERE id <= ?")
            .bind(last_row)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        // VACUUM cannot run inside a transaction
        sqlx::query("VACUUM").execute(&self.pool).await?;

        info!("Cleared {} job(s) from ledger", cleared.len());
        for job_id in &cleared {
            info!("  - {}", job_id);
        }

        Ok(cleared.into_iter().map(JobId::from).collect())
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
