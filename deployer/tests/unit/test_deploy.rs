//! Deployment phase tests against a scripted stack API

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

use cfndeploy::app::options::DeployOptions;
use cfndeploy::app::run::run_with_api;
use cfndeploy::cfn::api::{ServiceError, StackApi};
use cfndeploy::cfn::models::{
    ChangeSetDescription, ChangeSetStatus, ChangeSetType, CreateChangeSetInput, StackStatus,
    StackSummary,
};
use cfndeploy::deploy::change_set::{submit_and_wait, ChangeSetOutcome};
use cfndeploy::deploy::converge::{execute_and_wait, wait_for_convergence};
use cfndeploy::deploy::fsm::DeploymentState;
use cfndeploy::deploy::resolver::resolve_change_set_type;
use cfndeploy::deploy::Deployer;
use cfndeploy::errors::DeployError;
use cfndeploy::models::deployment::{DeployOutcome, DeploymentRequest};
use cfndeploy::retry::{CeilingAnchor, ExponentialBackoffPolicy, FixedIntervalPolicy, QueryErrorPolicy};

const STACK: &str = "my-stack";
const MISSING: &str = "ValidationError: Stack with id my-stack does not exist";
const EMPTY_REASON: &str = "The submitted information didn't contain changes. Submit different information to create a change set.";

type StackReply = Result<Vec<StackSummary>, ServiceError>;
type ChangeSetReply = Result<ChangeSetDescription, ServiceError>;

/// Replays scripted replies; the last reply repeats once the script runs out
struct Script<T: Clone> {
    replies: Mutex<VecDeque<T>>,
}

impl<T: Clone> Script<T> {
    fn new(replies: Vec<T>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }

    fn next(&self) -> T {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().expect("script has no replies")
        }
    }
}

struct FakeStackApi {
    stacks: Script<StackReply>,
    change_sets: Script<ChangeSetReply>,
    create_error: Option<ServiceError>,
    execute_error: Option<ServiceError>,
    describe_stack_calls: Mutex<u32>,
    describe_change_set_calls: Mutex<u32>,
    created: Mutex<Vec<CreateChangeSetInput>>,
    executed: Mutex<Vec<String>>,
}

impl FakeStackApi {
    fn new(stacks: Vec<StackReply>, change_sets: Vec<ChangeSetReply>) -> Self {
        Self {
            stacks: Script::new(stacks),
            change_sets: Script::new(change_sets),
            create_error: None,
            execute_error: None,
            describe_stack_calls: Mutex::new(0),
            describe_change_set_calls: Mutex::new(0),
            created: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    fn describe_stack_calls(&self) -> u32 {
        *self.describe_stack_calls.lock().unwrap()
    }

    fn describe_change_set_calls(&self) -> u32 {
        *self.describe_change_set_calls.lock().unwrap()
    }

    fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl StackApi for FakeStackApi {
    async fn describe_stack(&self, _stack_name: &str) -> Result<Vec<StackSummary>, ServiceError> {
        *self.describe_stack_calls.lock().unwrap() += 1;
        self.stacks.next()
    }

    async fn create_change_set(&self, input: CreateChangeSetInput) -> Result<String, ServiceError> {
        if let Some(e) = &self.create_error {
            return Err(e.clone());
        }
        let id = format!("arn:aws:cloudformation:changeSet/{}", input.change_set_name);
        self.created.lock().unwrap().push(input);
        Ok(id)
    }

    async fn describe_change_set(
        &self,
        _change_set_id: &str,
        _stack_name: &str,
    ) -> Result<ChangeSetDescription, ServiceError> {
        *self.describe_change_set_calls.lock().unwrap() += 1;
        self.change_sets.next()
    }

    async fn execute_change_set(
        &self,
        change_set_name: &str,
        _stack_name: &str,
    ) -> Result<(), ServiceError> {
        if let Some(e) = &self.execute_error {
            return Err(e.clone());
        }
        self.executed.lock().unwrap().push(change_set_name.to_string());
        Ok(())
    }
}

fn stack(status: &str) -> StackReply {
    Ok(vec![StackSummary {
        stack_name: STACK.to_string(),
        status: StackStatus::parse(status),
    }])
}

fn change_set(status: &str, reason: Option<&str>) -> ChangeSetReply {
    Ok(ChangeSetDescription {
        status: ChangeSetStatus::parse(status),
        status_reason: reason.map(str::to_string),
    })
}

fn error<T>(message: &str) -> Result<T, ServiceError> {
    Err(ServiceError::new(message))
}

fn no_jitter() -> ExponentialBackoffPolicy {
    ExponentialBackoffPolicy {
        randomization_factor: 0.0,
        ..Default::default()
    }
}

fn options() -> DeployOptions {
    DeployOptions {
        convergence: no_jitter(),
        ..Default::default()
    }
}

fn request() -> DeploymentRequest {
    DeploymentRequest::new(STACK, r#"{"Resources":{}}"#, true)
}

fn assert_elapsed(start: Instant, secs: f64) {
    let elapsed = start.elapsed();
    let want = Duration::from_secs_f64(secs);
    assert!(
        elapsed >= want && elapsed < want + Duration::from_secs(1),
        "elapsed {:?}, want {:?}",
        elapsed,
        want
    );
}

// ================================ RESOLVER =================================== //

#[tokio::test]
async fn test_resolver_missing_stack_creates() {
    let api = FakeStackApi::new(vec![error(MISSING)], vec![]);
    let change_set_type = assert_ok!(resolve_change_set_type(&api, STACK).await);
    assert_eq!(change_set_type, ChangeSetType::Create);
}

#[tokio::test]
async fn test_resolver_existing_stack_updates() {
    let api = FakeStackApi::new(vec![stack("UPDATE_COMPLETE")], vec![]);
    let change_set_type = assert_ok!(resolve_change_set_type(&api, STACK).await);
    assert_eq!(change_set_type, ChangeSetType::Update);
}

#[tokio::test]
async fn test_resolver_unexpected_error_fails() {
    let api = FakeStackApi::new(vec![error("AccessDenied: not authorized")], vec![]);
    let err = assert_err!(resolve_change_set_type(&api, STACK).await);
    assert!(matches!(err, DeployError::Probe(msg) if msg.contains("AccessDenied")));
}

// =============================== CHANGE SETS ================================= //

#[tokio::test(start_paused = true)]
async fn test_change_set_ready() {
    let api = FakeStackApi::new(
        vec![],
        vec![
            change_set("CREATE_PENDING", None),
            change_set("CREATE_IN_PROGRESS", None),
            change_set("CREATE_COMPLETE", None),
        ],
    );
    let start = Instant::now();

    let (handle, outcome) = assert_ok!(
        submit_and_wait(
            &api,
            &request(),
            ChangeSetType::Create,
            &FixedIntervalPolicy::default(),
            &CancellationToken::new(),
        )
        .await
    );

    assert_eq!(outcome, ChangeSetOutcome::Ready);
    assert!(handle.name.starts_with("my-stack-"));
    assert_eq!(api.describe_change_set_calls(), 3);
    assert_elapsed(start, 10.0);

    let created = api.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].change_set_name, handle.name);
    assert_eq!(created[0].change_set_type, ChangeSetType::Create);
    assert_eq!(created[0].stack_name, STACK);
    assert!(created[0].named_iam);
}

#[tokio::test(start_paused = true)]
async fn test_change_set_empty_is_success() {
    let api = FakeStackApi::new(vec![], vec![change_set("FAILED", Some(EMPTY_REASON))]);

    let (_, outcome) = assert_ok!(
        submit_and_wait(
            &api,
            &request(),
            ChangeSetType::Update,
            &FixedIntervalPolicy::default(),
            &CancellationToken::new(),
        )
        .await
    );

    assert_eq!(outcome, ChangeSetOutcome::Empty);
}

#[tokio::test(start_paused = true)]
async fn test_change_set_failed_with_changes() {
    let api = FakeStackApi::new(
        vec![],
        vec![change_set("FAILED", Some("Template format error: Unresolved resource dependencies"))],
    );

    let err = assert_err!(
        submit_and_wait(
            &api,
            &request(),
            ChangeSetType::Update,
            &FixedIntervalPolicy::default(),
            &CancellationToken::new(),
        )
        .await
    );

    assert!(matches!(err, DeployError::CreationTimeout(_)));
    assert!(err.to_string().contains("changeset is not empty"));
}

#[tokio::test(start_paused = true)]
async fn test_change_set_creation_times_out() {
    let api = FakeStackApi::new(vec![], vec![change_set("CREATE_IN_PROGRESS", None)]);
    let start = Instant::now();

    let err = assert_err!(
        submit_and_wait(
            &api,
            &request(),
            ChangeSetType::Update,
            &FixedIntervalPolicy::default(),
            &CancellationToken::new(),
        )
        .await
    );

    assert!(matches!(err, DeployError::CreationTimeout(msg) if msg.contains("12 wait attempts")));
    // 12 polls plus the describe that classifies the change set
    assert_eq!(api.describe_change_set_calls(), 13);
    assert_elapsed(start, 55.0);
}

#[tokio::test(start_paused = true)]
async fn test_change_set_describe_failure_after_wait() {
    let api = FakeStackApi::new(vec![], vec![error("Throttling: Rate exceeded")]);

    let err = assert_err!(
        submit_and_wait(
            &api,
            &request(),
            ChangeSetType::Update,
            &FixedIntervalPolicy::default(),
            &CancellationToken::new(),
        )
        .await
    );

    assert!(matches!(err, DeployError::Probe(msg) if msg.contains("error describing the ChangeSet")));
}

#[tokio::test]
async fn test_change_set_submission_rejected() {
    let mut api = FakeStackApi::new(vec![], vec![change_set("CREATE_COMPLETE", None)]);
    api.create_error = Some(ServiceError::new("InsufficientCapabilities: Requires capabilities"));

    let err = assert_err!(
        submit_and_wait(
            &api,
            &request(),
            ChangeSetType::Create,
            &FixedIntervalPolicy::default(),
            &CancellationToken::new(),
        )
        .await
    );

    assert!(matches!(err, DeployError::Submission(msg) if msg.contains("CREATE")));
    assert_eq!(api.describe_change_set_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_change_set_wait_cancelled() {
    let api = FakeStackApi::new(vec![], vec![change_set("CREATE_IN_PROGRESS", None)]);
    let cancel = CancellationToken::new();

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(Duration::from_secs(7)).await;
            cancel.cancel();
        }
    });

    let start = Instant::now();
    let err = assert_err!(
        submit_and_wait(
            &api,
            &request(),
            ChangeSetType::Update,
            &FixedIntervalPolicy::default(),
            &cancel,
        )
        .await
    );

    assert!(matches!(err, DeployError::Cancelled(ref msg) if msg.contains("creation")));
    // Polled at 0s and 5s, cancelled during the second sleep
    assert_eq!(api.describe_change_set_calls(), 2);
    assert_elapsed(start, 7.0);
}

#[tokio::test]
async fn test_change_set_not_submitted_once_cancelled() {
    let api = FakeStackApi::new(vec![], vec![change_set("CREATE_COMPLETE", None)]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = assert_err!(
        submit_and_wait(
            &api,
            &request(),
            ChangeSetType::Create,
            &FixedIntervalPolicy::default(),
            &cancel,
        )
        .await
    );

    assert!(err.is_cancelled());
    assert!(api.created.lock().unwrap().is_empty());
    assert_eq!(api.describe_change_set_calls(), 0);
}

// =============================== CONVERGENCE ================================= //

#[tokio::test(start_paused = true)]
async fn test_convergence_after_retries() {
    let api = FakeStackApi::new(
        vec![
            stack("UPDATE_IN_PROGRESS"),
            stack("UPDATE_IN_PROGRESS"),
            stack("UPDATE_IN_PROGRESS"),
            stack("UPDATE_COMPLETE"),
        ],
        vec![],
    );
    let start = Instant::now();

    assert_ok!(
        execute_and_wait(
            &api,
            STACK,
            "my-stack-cs",
            &no_jitter(),
            start,
            &CancellationToken::new(),
        )
        .await
    );

    assert_eq!(api.executed(), vec!["my-stack-cs".to_string()]);
    assert_eq!(api.describe_stack_calls(), 4);
    // 12 + 18 + 27
    assert_elapsed(start, 57.0);
}

#[tokio::test(start_paused = true)]
async fn test_convergence_ceiling_exceeded() {
    let api = FakeStackApi::new(vec![stack("UPDATE_IN_PROGRESS")], vec![]);
    let start = Instant::now();

    let err = assert_err!(
        wait_for_convergence(&api, STACK, &no_jitter(), start, &CancellationToken::new()).await
    );

    match err {
        DeployError::CeilingExceeded { ceiling, last_reason } => {
            assert_eq!(ceiling, Duration::from_secs(600));
            assert_eq!(last_reason, "stack not yet in completed state");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(start.elapsed() <= Duration::from_secs(600));
    assert_eq!(api.describe_stack_calls(), 13);
}

#[tokio::test(start_paused = true)]
async fn test_convergence_jittered_schedule_stays_under_ceiling() {
    let api = FakeStackApi::new(vec![stack("CREATE_IN_PROGRESS")], vec![]);
    let start = Instant::now();

    let err = assert_err!(
        wait_for_convergence(
            &api,
            STACK,
            &ExponentialBackoffPolicy::default(),
            start,
            &CancellationToken::new(),
        )
        .await
    );

    assert!(matches!(err, DeployError::CeilingExceeded { .. }));
    assert!(start.elapsed() <= Duration::from_secs(600));
}

#[tokio::test(start_paused = true)]
async fn test_convergence_fatal_status() {
    let api = FakeStackApi::new(
        vec![stack("UPDATE_IN_PROGRESS"), stack("UPDATE_ROLLBACK_COMPLETE")],
        vec![],
    );
    let start = Instant::now();

    let err = assert_err!(
        wait_for_convergence(&api, STACK, &no_jitter(), start, &CancellationToken::new()).await
    );

    assert!(matches!(err, DeployError::FatalStatus(msg) if msg.contains("UPDATE_ROLLBACK_COMPLETE")));
    assert_eq!(api.describe_stack_calls(), 2);
    assert_elapsed(start, 12.0);
}

#[tokio::test(start_paused = true)]
async fn test_convergence_unexpected_stack_count() {
    let api = FakeStackApi::new(vec![Ok(vec![])], vec![]);

    let err = assert_err!(
        wait_for_convergence(&api, STACK, &no_jitter(), Instant::now(), &CancellationToken::new())
            .await
    );

    assert!(matches!(err, DeployError::FatalStatus(msg) if msg.contains("number of stacks")));
}

#[tokio::test(start_paused = true)]
async fn test_convergence_retries_query_errors() {
    let api = FakeStackApi::new(
        vec![
            error("Throttling: Rate exceeded"),
            error("dispatch failure: connection reset"),
            stack("CREATE_COMPLETE"),
        ],
        vec![],
    );

    assert_ok!(
        wait_for_convergence(&api, STACK, &no_jitter(), Instant::now(), &CancellationToken::new())
            .await
    );
    assert_eq!(api.describe_stack_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_convergence_query_errors_exhaust_consecutive_budget() {
    let api = FakeStackApi::new(
        vec![
            error("Throttling: Rate exceeded"),
            stack("UPDATE_IN_PROGRESS"),
            error("Throttling: Rate exceeded"),
            error("Throttling: Rate exceeded"),
            stack("UPDATE_COMPLETE"),
        ],
        vec![],
    );
    let policy = ExponentialBackoffPolicy {
        query_errors: QueryErrorPolicy::FailAfterConsecutive(2),
        ..no_jitter()
    };

    let err = assert_err!(
        wait_for_convergence(&api, STACK, &policy, Instant::now(), &CancellationToken::new()).await
    );

    assert!(matches!(err, DeployError::Probe(msg) if msg.contains("2 consecutive failures")));
    assert_eq!(api.describe_stack_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_convergence_ceiling_from_deploy_start() {
    let api = FakeStackApi::new(vec![stack("UPDATE_IN_PROGRESS")], vec![]);
    let policy = ExponentialBackoffPolicy {
        ceiling_anchor: CeilingAnchor::DeployStart,
        ..no_jitter()
    };
    let deploy_started = Instant::now();
    tokio::time::sleep(Duration::from_secs(595)).await;

    let err = assert_err!(
        wait_for_convergence(&api, STACK, &policy, deploy_started, &CancellationToken::new()).await
    );

    assert!(matches!(err, DeployError::CeilingExceeded { .. }));
    assert_eq!(api.describe_stack_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_convergence_cancelled() {
    let api = FakeStackApi::new(vec![stack("UPDATE_IN_PROGRESS")], vec![]);
    let cancel = CancellationToken::new();

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(Duration::from_secs(40)).await;
            cancel.cancel();
        }
    });

    let start = Instant::now();
    let err = assert_err!(wait_for_convergence(&api, STACK, &no_jitter(), start, &cancel).await);

    assert!(err.is_cancelled());
    assert_elapsed(start, 40.0);
}

#[tokio::test]
async fn test_execution_rejected() {
    let mut api = FakeStackApi::new(vec![stack("UPDATE_COMPLETE")], vec![]);
    api.execute_error = Some(ServiceError::new("InvalidChangeSetStatus: change set is not executable"));

    let err = assert_err!(
        execute_and_wait(
            &api,
            STACK,
            "my-stack-cs",
            &no_jitter(),
            Instant::now(),
            &CancellationToken::new(),
        )
        .await
    );

    assert!(matches!(err, DeployError::Submission(msg) if msg.contains("error executing the ChangeSet")));
    assert_eq!(api.describe_stack_calls(), 0);
}

#[tokio::test]
async fn test_execution_skipped_once_cancelled() {
    let api = FakeStackApi::new(vec![stack("UPDATE_IN_PROGRESS")], vec![]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = assert_err!(
        execute_and_wait(&api, STACK, "my-stack-cs", &no_jitter(), Instant::now(), &cancel).await
    );

    assert!(err.is_cancelled());
    assert!(api.executed().is_empty());
    assert_eq!(api.describe_stack_calls(), 0);
}

// ================================= DEPLOYER ================================== //

#[tokio::test(start_paused = true)]
async fn test_deploy_creates_stack() {
    let api = Arc::new(FakeStackApi::new(
        vec![
            error(MISSING),
            stack("CREATE_IN_PROGRESS"),
            stack("CREATE_COMPLETE"),
        ],
        vec![change_set("CREATE_COMPLETE", None)],
    ));
    let deployer = Deployer::new(api.clone(), options());

    let report = assert_ok!(deployer.deploy(&request(), &CancellationToken::new()).await);

    assert_eq!(report.outcome, DeployOutcome::Converged);
    assert_eq!(report.state, DeploymentState::Converged);
    assert_eq!(report.change_set_type, ChangeSetType::Create);
    assert_eq!(report.stack_name, STACK);
    assert_eq!(api.executed(), vec![report.change_set_name.clone()]);
}

#[tokio::test(start_paused = true)]
async fn test_deploy_empty_change_set_skips_execution() {
    let api = Arc::new(FakeStackApi::new(
        vec![stack("UPDATE_COMPLETE")],
        vec![change_set("FAILED", Some(EMPTY_REASON))],
    ));
    let deployer = Deployer::new(api.clone(), options());

    let report = assert_ok!(deployer.deploy(&request(), &CancellationToken::new()).await);

    assert_eq!(report.outcome, DeployOutcome::NoChanges);
    assert_eq!(report.state, DeploymentState::NoChanges);
    assert_eq!(report.change_set_type, ChangeSetType::Update);
    assert!(api.executed().is_empty());
    assert_eq!(api.describe_stack_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deploy_uses_fresh_change_set_names() {
    let api = Arc::new(FakeStackApi::new(
        vec![stack("UPDATE_COMPLETE")],
        vec![change_set("CREATE_COMPLETE", None)],
    ));
    let deployer = Deployer::new(api.clone(), options());

    let first = assert_ok!(deployer.deploy(&request(), &CancellationToken::new()).await);
    let second = assert_ok!(deployer.deploy(&request(), &CancellationToken::new()).await);

    assert_ne!(first.change_set_name, second.change_set_name);
    assert_eq!(api.executed().len(), 2);
}

#[tokio::test]
async fn test_deploy_probe_failure_stops_early() {
    let api = Arc::new(FakeStackApi::new(
        vec![error("ExpiredToken: The security token included in the request is expired")],
        vec![change_set("CREATE_COMPLETE", None)],
    ));
    let deployer = Deployer::new(api.clone(), options());

    let err = assert_err!(deployer.deploy(&request(), &CancellationToken::new()).await);

    assert!(matches!(err, DeployError::Probe(_)));
    assert!(api.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_deploy_rejects_invalid_request() {
    let api = Arc::new(FakeStackApi::new(vec![stack("UPDATE_COMPLETE")], vec![]));
    let deployer = Deployer::new(api.clone(), options());

    let err = assert_err!(
        deployer
            .deploy(&DeploymentRequest::new("", "{}", false), &CancellationToken::new())
            .await
    );

    assert!(matches!(err, DeployError::ValidationError(_)));
    assert_eq!(api.describe_stack_calls(), 0);
}

#[tokio::test]
async fn test_deploy_already_cancelled_touches_nothing() {
    let api = Arc::new(FakeStackApi::new(
        vec![stack("UPDATE_IN_PROGRESS")],
        vec![change_set("CREATE_COMPLETE", None)],
    ));
    let deployer = Deployer::new(api.clone(), options());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = assert_err!(deployer.deploy(&request(), &cancel).await);

    assert!(err.is_cancelled());
    assert_eq!(api.describe_stack_calls(), 0);
    assert!(api.created.lock().unwrap().is_empty());
    assert!(api.executed().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_deploy_cancelled_during_change_set_wait_never_executes() {
    let api = Arc::new(FakeStackApi::new(
        vec![error(MISSING), stack("CREATE_IN_PROGRESS")],
        vec![
            change_set("CREATE_IN_PROGRESS", None),
            change_set("CREATE_COMPLETE", None),
        ],
    ));
    let deployer = Deployer::new(api.clone(), options());
    let cancel = CancellationToken::new();

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            cancel.cancel();
        }
    });

    let err = assert_err!(deployer.deploy(&request(), &cancel).await);

    assert!(err.is_cancelled());
    assert_eq!(api.created.lock().unwrap().len(), 1);
    assert_eq!(api.describe_change_set_calls(), 1);
    assert!(api.executed().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_run_cancelled_by_shutdown_signal() {
    let api = Arc::new(FakeStackApi::new(
        vec![stack("UPDATE_COMPLETE"), stack("UPDATE_IN_PROGRESS")],
        vec![change_set("CREATE_COMPLETE", None)],
    ));

    let err = assert_err!(
        run_with_api(
            api.clone(),
            options(),
            request(),
            tokio::time::sleep(Duration::from_secs(100)),
        )
        .await
    );

    assert!(err.is_cancelled());
    assert_eq!(api.executed().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deploy_fn_with_defaults() {
    let api = Arc::new(FakeStackApi::new(
        vec![stack("UPDATE_COMPLETE")],
        vec![change_set("CREATE_COMPLETE", None)],
    ));

    assert_ok!(cfndeploy::deploy(api.clone(), STACK, "{}", false).await);
    assert_eq!(api.executed().len(), 1);
}
