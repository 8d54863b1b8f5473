//! Shared progress state for a submission attempt, polled by the
//! embedding surface while the flow runs on another task.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};

/// Submission state machine. One attempt walks
/// Idle → Validating → UploadingImages → SendingEmail and ends in
/// Succeeded or Failed; a validation rejection goes back to Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Idle = 0,
    Validating = 1,
    UploadingImages = 2,
    SendingEmail = 3,
    Succeeded = 4,
    Failed = 5,
}

impl Phase {
    fn from_raw(raw: u8) -> Phase {
        match raw {
            1 => Phase::Validating,
            2 => Phase::UploadingImages,
            3 => Phase::SendingEmail,
            4 => Phase::Succeeded,
            5 => Phase::Failed,
            _ => Phase::Idle,
        }
    }
}

pub struct SubmissionProgress {
    phase: AtomicU8,
    status: Mutex<String>,
}

impl SubmissionProgress {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Idle as u8),
            status: Mutex::new(String::new()),
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_raw(self.phase.load(Ordering::Relaxed))
    }

    /// Latest user-facing status line, empty before the first stage.
    pub fn status(&self) -> String {
        self.status.lock().unwrap().clone()
    }

    pub(crate) fn set_phase(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::Relaxed);
    }

    pub(crate) fn set_status(&self, line: impl Into<String>) {
        *self.status.lock().unwrap() = line.into();
    }
}
