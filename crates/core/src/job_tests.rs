// SPDX-License-Identifier: MIT

use super::*;
use std::time::Duration;

#[test]
fn new_job_starts_pending() {
    let job = Job::new(JobAction::ServiceCreate, ServiceId::new(), 0, Utc::now());
    assert_eq!(job.state, JobState::Pending);
    assert!(job.claimed_at.is_none());
}

#[test]
fn legal_transitions_only() {
    assert!(JobState::Pending.can_transition_to(JobState::Processing));
    assert!(JobState::Processing.can_transition_to(JobState::Completed));
    assert!(JobState::Processing.can_transition_to(JobState::Failed));
    assert!(!JobState::Pending.can_transition_to(JobState::Completed));
    assert!(!JobState::Completed.can_transition_to(JobState::Processing));
    assert!(!JobState::Pending.can_transition_to(JobState::Failed));
}

#[test]
fn timeout_detection() {
    let now = Utc::now();
    let mut job = Job::new(JobAction::ServiceStart, ServiceId::new(), 0, now);
    job.state = JobState::Processing;
    job.claimed_at = Some(now);

    assert!(!job.is_timed_out(now + chrono::Duration::seconds(10), Duration::from_secs(30)));
    assert!(job.is_timed_out(now + chrono::Duration::seconds(31), Duration::from_secs(30)));
}

#[test]
fn non_processing_job_is_never_timed_out() {
    let now = Utc::now();
    let job = Job::new(JobAction::ServiceStart, ServiceId::new(), 0, now);
    assert!(!job.is_timed_out(now + chrono::Duration::seconds(1000), Duration::from_secs(1)));
}
