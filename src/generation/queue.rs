use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{CertificateGenerationService, GenerationTask, Spool};
use crate::course_key::CourseKey;
use crate::user_directory::UserRecord;

/// Hands generation tasks to a background worker that spools them.
///
/// Dropping every clone of the service closes the queue; the worker then
/// finishes the backlog and its join handle yields the number of tasks
/// written.
#[derive(Debug, Clone)]
pub struct QueuedGenerationService {
    tx: mpsc::UnboundedSender<GenerationTask>,
}

impl QueuedGenerationService {
    pub fn spawn(spool: Spool) -> (Self, JoinHandle<usize>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(spool, rx));
        (Self { tx }, worker)
    }
}

impl CertificateGenerationService for QueuedGenerationService {
    fn request(&self, user: &UserRecord, course_key: &CourseKey) {
        let task = GenerationTask::new(user, course_key);
        if let Err(e) = self.tx.send(task) {
            log::error!(
                "[QUEUE] Worker gone, dropping request for user {} : {}",
                e.0.user_id,
                e.0.course_key
            );
        }
    }
}

async fn run_worker(spool: Spool, mut rx: mpsc::UnboundedReceiver<GenerationTask>) -> usize {
    let mut seq: u64 = 0;
    let mut written = 0;

    while let Some(task) = rx.recv().await {
        match spool.write(seq, &task).await {
            Ok(path) => {
                written += 1;
                log::info!(
                    "[QUEUE] Spooled generation task for user {} : {} -> {}",
                    task.user_id,
                    task.course_key,
                    path.display()
                );
            }
            Err(e) => {
                log::error!(
                    "[QUEUE] Failed to spool task for user {} : {}: {:#}",
                    task.user_id,
                    task.course_key,
                    anyhow::Error::new(e)
                );
            }
        }
        seq += 1;
    }

    log::info!("[QUEUE] Queue closed after {} task(s)", written);
    written
}
