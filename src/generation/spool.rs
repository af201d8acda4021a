use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use super::GenerationTask;

const TASK_EXTENSION: &str = "task";
const MAX_NAME_ATTEMPTS: u32 = 1000;

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, thiserror::Error)]
pub enum SpoolError {
    #[error("Spool I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode generation task")]
    Encode(#[source] bincode::Error),
    #[error("Failed to decode generation task {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
    #[error("No free task name for {0}")]
    NameExhausted(String),
    #[error("Invalid spool pattern")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to list spool entry")]
    Glob(#[from] glob::GlobError),
}

/// Directory of bincode-encoded generation tasks, one file per task.
#[derive(Debug, Clone)]
pub struct Spool {
    dir: PathBuf,
}

impl Spool {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, SpoolError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| SpoolError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `task` under a name ordered by request time, then `seq`.
    ///
    /// The task is written to a temporary file and published with a hard
    /// link, which never replaces an existing task. A taken name gets a
    /// `~N` suffix, so identical requests from separate runs all survive.
    pub async fn write(&self, seq: u64, task: &GenerationTask) -> Result<PathBuf, SpoolError> {
        let bytes = bincode::serialize(task).map_err(SpoolError::Encode)?;
        let tmp_path = self.dir.join(format!(
            ".{}-{}.tmp",
            process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(|source| SpoolError::Io {
                path: tmp_path.clone(),
                source,
            })?;

        let published = self.publish(&tmp_path, seq, task).await;
        if let Err(e) = tokio::fs::remove_file(&tmp_path).await {
            log::warn!("[SPOOL] Could not remove {}: {}", tmp_path.display(), e);
        }
        let path = published?;

        log::debug!("[SPOOL] Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    async fn publish(
        &self,
        tmp_path: &Path,
        seq: u64,
        task: &GenerationTask,
    ) -> Result<PathBuf, SpoolError> {
        let base = format!("{:013}-{:06}-{}", task.requested_at, seq, task.user_id);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = match attempt {
                0 => format!("{}.{}", base, TASK_EXTENSION),
                n => format!("{}~{}.{}", base, n, TASK_EXTENSION),
            };
            let path = self.dir.join(name);
            match tokio::fs::hard_link(tmp_path, &path).await {
                Ok(()) => return Ok(path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(SpoolError::Io { path, source }),
            }
        }
        Err(SpoolError::NameExhausted(base))
    }

    /// Spooled task files, oldest first.
    pub fn pending(&self) -> Result<Vec<PathBuf>, SpoolError> {
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            TASK_EXTENSION
        );
        let mut paths = glob::glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
        paths.sort();
        Ok(paths)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<GenerationTask, SpoolError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| SpoolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        bincode::deserialize(&data).map_err(|source| SpoolError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(user_id: u64, requested_at: i64) -> GenerationTask {
        GenerationTask {
            user_id,
            username: format!("user{user_id}"),
            course_key: "course-v1:edX+DemoX+Demo_Course".to_string(),
            requested_at,
        }
    }

    #[tokio::test]
    async fn written_tasks_are_listed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let spool = Spool::open(dir.path().join("spool")).unwrap();

        spool.write(1, &task(43, 1_700_000_000_001)).await.unwrap();
        spool.write(0, &task(42, 1_700_000_000_000)).await.unwrap();

        let pending = spool.pending().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(Spool::read(&pending[0]).unwrap(), task(42, 1_700_000_000_000));
        assert_eq!(Spool::read(&pending[1]).unwrap(), task(43, 1_700_000_000_001));
    }

    #[tokio::test]
    async fn no_temporary_files_are_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let spool = Spool::open(dir.path()).unwrap();
        spool.write(0, &task(1, 1)).await.unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".task"));
    }

    #[tokio::test]
    async fn identical_writes_from_separate_spools_are_both_kept() {
        let dir = tempfile::tempdir().unwrap();
        let first = Spool::open(dir.path()).unwrap();
        let second = Spool::open(dir.path()).unwrap();
        let same = task(42, 1_700_000_000_000);

        let a = first.write(0, &same).await.unwrap();
        let b = second.write(0, &same).await.unwrap();
        assert_ne!(a, b);

        let pending = second.pending().unwrap();
        assert_eq!(pending.len(), 2);
        for path in &pending {
            assert_eq!(Spool::read(path).unwrap(), same);
        }
    }

    #[test]
    fn empty_spool_has_no_pending_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let spool = Spool::open(dir.path()).unwrap();
        assert!(spool.pending().unwrap().is_empty());
    }

    #[test]
    fn corrupt_task_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.task");
        fs::write(&path, [0xff]).unwrap();
        assert!(matches!(Spool::read(&path), Err(SpoolError::Decode { .. })));
    }
}
