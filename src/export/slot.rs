// Single-slot task guard for exports.
// One job may be in flight; further requests are rejected, not queued.
// There is no cancellation: a job runs to completion or failure.

use super::ExportError;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

pub type ExportResult = Result<PathBuf, ExportError>;

#[derive(Debug, Default)]
pub struct ExportSlot {
    pending: Option<Receiver<ExportResult>>,
}

impl ExportSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Run `job` on a worker thread; returns false (and drops `job`) when busy
    pub fn try_start<F>(&mut self, job: F) -> bool
    where
        F: FnOnce() -> ExportResult + Send + 'static,
    {
        if self.is_busy() {
            tracing::debug!("export already in flight, request ignored");
            return false;
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // Receiver may be gone if the app quit mid-export
            let _ = tx.send(job());
        });
        self.pending = Some(rx);
        true
    }

    /// Non-blocking; yields the finished result exactly once
    pub fn poll(&mut self) -> Option<ExportResult> {
        let result = match self.pending.as_ref()?.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(ExportError::WorkerLost),
        };
        self.pending = None;
        Some(result)
    }

    /// Block until the in-flight job finishes; None when idle
    pub fn wait(&mut self) -> Option<ExportResult> {
        let rx = self.pending.take()?;
        Some(rx.recv().unwrap_or(Err(ExportError::WorkerLost)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_slot() {
        let mut slot = ExportSlot::new();
        assert!(!slot.is_busy());
        assert!(slot.poll().is_none());
        assert!(slot.wait().is_none());
    }

    #[test]
    fn test_second_start_rejected_while_busy() {
        let mut slot = ExportSlot::new();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (ran_tx, ran_rx) = mpsc::channel::<&'static str>();

        let first_ran = ran_tx.clone();
        assert!(slot.try_start(move || {
            let _ = release_rx.recv();
            let _ = first_ran.send("first");
            Ok(PathBuf::from("first.pdf"))
        }));
        assert!(slot.is_busy());

        assert!(!slot.try_start(move || {
            let _ = ran_tx.send("second");
            Ok(PathBuf::from("second.pdf"))
        }));
        assert!(slot.poll().is_none());

        release_tx.send(()).unwrap();
        let result = slot.wait().unwrap();

        assert_eq!(result.unwrap(), PathBuf::from("first.pdf"));
        assert!(!slot.is_busy());
        let ran: Vec<_> = ran_rx.try_iter().collect();
        assert_eq!(ran, vec!["first"]);
    }

    #[test]
    fn test_failure_returns_slot_to_idle() {
        let mut slot = ExportSlot::new();
        assert!(slot.try_start(|| Err(ExportError::Render("boom".to_string()))));

        let result = slot.wait().unwrap();

        assert!(matches!(result, Err(ExportError::Render(_))));
        assert!(!slot.is_busy());
        assert!(slot.try_start(|| Ok(PathBuf::from("retry.pdf"))));
        assert!(slot.wait().unwrap().is_ok());
    }

    #[test]
    fn test_panicking_job_reports_worker_lost() {
        let mut slot = ExportSlot::new();
        assert!(slot.try_start(|| panic!("renderer crashed")));

        let result = slot.wait().unwrap();

        assert!(matches!(result, Err(ExportError::WorkerLost)));
        assert!(!slot.is_busy());
    }

    #[test]
    fn test_poll_eventually_yields_result() {
        let mut slot = ExportSlot::new();
        slot.try_start(|| Ok(PathBuf::from("done.pdf")));

        let mut result = None;
        for _ in 0..1000 {
            if let Some(r) = slot.poll() {
                result = Some(r);
                break;
            }
            thread::sleep(std::time::Duration::from_millis(5));
        }

        assert_eq!(result.unwrap().unwrap(), PathBuf::from("done.pdf"));
        assert!(slot.poll().is_none());
    }
}
