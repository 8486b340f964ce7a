use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UploadId;

/// Lifecycle of a single ingestion run. `Pending` at creation, moved to
/// `Processing` when the pipeline picks it up, and parked in one of the
/// terminal states afterwards. Terminal states absorb every further
/// transition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }

    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Pending, JobStatus::Processing) => true,
            (JobStatus::Processing, JobStatus::Done) => true,
            (JobStatus::Processing, JobStatus::Failed) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(raw: &str) -> Option<JobStatus> {
        match raw {
            "pending" => Some(JobStatus::Pending),
            "processing" => Some(JobStatus::Processing),
            "done" => Some(JobStatus::Done),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestionJob {
    pub id: JobId,
    pub upload_id: UploadId,
    pub status: JobStatus,
    pub processed_at: Option<DateTime<Utc>>,
    pub chunk_count: u32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IngestionJob {
    pub fn pending(upload_id: UploadId) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            upload_id,
            status: JobStatus::Pending,
            processed_at: None,
            chunk_count: 0,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_pending_job_when_checking_transitions_then_only_processing_is_allowed() {
        let status = JobStatus::Pending;

        assert!(status.can_transition_to(JobStatus::Processing));
        assert!(!status.can_transition_to(JobStatus::Done));
        assert!(!status.can_transition_to(JobStatus::Failed));
        assert!(!status.can_transition_to(JobStatus::Pending));
    }

    #[test]
    fn given_terminal_status_when_checking_transitions_then_everything_is_rejected() {
        for terminal in [JobStatus::Done, JobStatus::Failed] {
            for next in [
                JobStatus::Pending,
                JobStatus::Processing,
                JobStatus::Done,
                JobStatus::Failed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn given_status_when_round_tripping_through_str_then_value_is_preserved() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Done,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("queued"), None);
    }
}
