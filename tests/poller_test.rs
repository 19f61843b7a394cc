// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod common;

use common::{pod_descriptor, pod_id, Fault, FakeRemoteApi};
use std::time::Duration;
use tokio::time::Instant;
use webserver_harness::{
    wait_for, HarnessError, PollSettings, ReadinessTarget, RemoteApi, ResourceHandle,
    ResourceState,
};

/// Paused-clock elapsed time lands on timer ticks; allow one tick of slack.
fn assert_elapsed(elapsed: Duration, expected: Duration) {
    assert!(
        elapsed >= expected && elapsed <= expected + Duration::from_millis(5),
        "elapsed {:?}, expected {:?}",
        elapsed,
        expected
    );
}

async fn pod_handle(fake: &FakeRemoteApi) -> ResourceHandle {
    ResourceHandle::create(fake.shared(), pod_descriptor("webserver-alice", "nginx"))
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_returns_once_target_observed() {
    let fake = FakeRemoteApi::new();
    let id = pod_id("webserver-alice", "nginx");
    fake.script_status(&id, &["Pending", "Pending", "Running"]);
    let mut handle = pod_handle(&fake).await;

    let start = Instant::now();
    let target = ReadinessTarget::new(ResourceState::RUNNING, Duration::from_secs(240));
    wait_for(&mut handle, &target, &PollSettings::default())
        .await
        .unwrap();

    assert_eq!(fake.status_reads(&id), 3);
    assert_elapsed(start.elapsed(), Duration::from_secs(4));
    assert_eq!(handle.state(), Some(&ResourceState::running()));
}

#[tokio::test(start_paused = true)]
async fn test_already_ready_needs_one_read() {
    let fake = FakeRemoteApi::new();
    let id = pod_id("webserver-alice", "nginx");
    let mut handle = pod_handle(&fake).await;

    let start = Instant::now();
    let target = ReadinessTarget::new(ResourceState::RUNNING, Duration::from_secs(1));
    wait_for(&mut handle, &target, &PollSettings::default())
        .await
        .unwrap();

    assert_eq!(fake.status_reads(&id), 1);
    assert_elapsed(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_stuck_pending_times_out_after_about_one_second() {
    let fake = FakeRemoteApi::new();
    let id = pod_id("webserver-alice", "nginx");
    fake.script_status(&id, &["Pending"]);
    let mut handle = pod_handle(&fake).await;

    let poll = PollSettings::default();
    let timeout = Duration::from_secs(1);
    let start = Instant::now();
    let err = wait_for(
        &mut handle,
        &ReadinessTarget::new(ResourceState::RUNNING, timeout),
        &poll,
    )
    .await
    .unwrap_err();
    let elapsed = start.elapsed();

    match err {
        HarnessError::TimeoutExpired {
            expected,
            last_state,
            timeout: reported,
            ..
        } => {
            assert_eq!(expected, "Running");
            assert_eq!(last_state.as_deref(), Some("Pending"));
            assert_eq!(reported, timeout);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(elapsed >= timeout);
    assert!(elapsed <= timeout + poll.interval);
}

#[tokio::test(start_paused = true)]
async fn test_final_sleep_clamped_to_deadline() {
    let fake = FakeRemoteApi::new();
    let id = pod_id("webserver-alice", "nginx");
    fake.script_status(&id, &["Pending"]);
    let mut handle = pod_handle(&fake).await;

    let start = Instant::now();
    let target = ReadinessTarget::new(ResourceState::RUNNING, Duration::from_secs(5));
    let result = wait_for(&mut handle, &target, &PollSettings::every(Duration::from_secs(2))).await;

    assert!(matches!(result, Err(HarnessError::TimeoutExpired { .. })));
    // reads at 0s, 2s, 4s and the deadline
    assert_eq!(fake.status_reads(&id), 4);
    assert_elapsed(start.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_abort_state_fails_immediately() {
    let fake = FakeRemoteApi::new();
    let id = pod_id("webserver-alice", "nginx");
    fake.script_status(&id, &["Pending", "Failed"]);
    let mut handle = pod_handle(&fake).await;

    let start = Instant::now();
    let target = ReadinessTarget::new(ResourceState::RUNNING, Duration::from_secs(240))
        .abort_on(ResourceState::FAILED);
    let err = wait_for(&mut handle, &target, &PollSettings::default())
        .await
        .unwrap_err();

    match err {
        HarnessError::UnexpectedState {
            expected, observed, ..
        } => {
            assert_eq!(expected, "Running");
            assert_eq!(observed, "Failed");
        }
        other => panic!("expected unexpected-state, got {:?}", other),
    }
    assert_elapsed(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_propagates_without_waiting() {
    let fake = FakeRemoteApi::new();
    let id = pod_id("webserver-alice", "nginx");
    fake.script_status_then_fail(&id, &["Pending"], Fault::Remote);
    let mut handle = pod_handle(&fake).await;

    let start = Instant::now();
    let target = ReadinessTarget::new(ResourceState::RUNNING, Duration::from_secs(240));
    let err = wait_for(&mut handle, &target, &PollSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Remote(_)));
    assert_eq!(fake.status_reads(&id), 2);
    assert_elapsed(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_deleted_resource_reports_not_found() {
    let fake = FakeRemoteApi::new();
    let mut handle = pod_handle(&fake).await;
    fake.shared()
        .delete(&pod_id("webserver-alice", "nginx"))
        .await
        .unwrap();

    let target = ReadinessTarget::new(ResourceState::RUNNING, Duration::from_secs(10));
    let err = wait_for(&mut handle, &target, &PollSettings::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test(start_paused = true)]
async fn test_hung_status_read_is_bounded_by_deadline() {
    let fake = FakeRemoteApi::new();
    let id = pod_id("webserver-alice", "nginx");
    let mut handle = pod_handle(&fake).await;
    fake.delay_status(Duration::from_secs(60));

    let start = Instant::now();
    let target = ReadinessTarget::new(ResourceState::RUNNING, Duration::from_secs(1));
    let err = wait_for(
        &mut handle,
        &target,
        &PollSettings::every(Duration::from_millis(500)),
    )
    .await
    .unwrap_err();

    assert_elapsed(start.elapsed(), Duration::from_millis(1500));
    assert_eq!(fake.status_reads(&id), 1);
    match err {
        HarnessError::TimeoutExpired { last_state, .. } => {
            // Only the state observed at creation is known.
            assert_eq!(last_state.as_deref(), Some(ResourceState::UNKNOWN));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_reads_keep_last_observed_state() {
    let fake = FakeRemoteApi::new();
    let id = pod_id("webserver-alice", "nginx");
    fake.script_status(&id, &["Pending"]);
    let mut handle = pod_handle(&fake).await;
    fake.delay_status(Duration::from_millis(700));

    let start = Instant::now();
    let target = ReadinessTarget::new(ResourceState::RUNNING, Duration::from_secs(1));
    let err = wait_for(
        &mut handle,
        &target,
        &PollSettings::every(Duration::from_millis(500)),
    )
    .await
    .unwrap_err();

    // First read lands at 0.7s, the second is cut off at 1.5s.
    assert_elapsed(start.elapsed(), Duration::from_millis(1500));
    match err {
        HarnessError::TimeoutExpired { last_state, .. } => {
            assert_eq!(last_state.as_deref(), Some("Pending"));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}
