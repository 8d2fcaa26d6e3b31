#![cfg(unix)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use sbt_runner_common::channel;
use sbt_runner_process::test_support::{CollectingEvents, DirectLauncher};
use sbt_runner_process::{CommandSpec, ManagedProcess, ProcessError, UnixLauncher};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    cond()
}

fn start_direct(
    elements: &[&str],
    cwd: &std::path::Path,
    events: Arc<CollectingEvents>,
    queue: Arc<sbt_runner_common::ChannelQueue>,
) -> ManagedProcess {
    let command = CommandSpec::new(elements.iter().copied()).unwrap();
    ManagedProcess::start(Arc::new(DirectLauncher), &command, cwd, events, queue).unwrap()
}

#[test]
fn hello_world_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let (queue, pump) = channel();
    let events = Arc::new(CollectingEvents::new());

    let proc = start_direct(
        &["sh", "-c", "printf hello; printf world >&2"],
        dir.path(),
        Arc::clone(&events),
        Arc::new(queue),
    );

    assert_eq!(events.start_count(), 1);
    assert!(pump.run_one(STARTUP_TIMEOUT), "on_stop never arrived");
    assert_eq!(events.stop_count(), 1);
    assert!(!proc.is_running());

    // stream delivery is not ordered against on_stop
    assert!(wait_until(STARTUP_TIMEOUT, || events.stdout() == "hello"));
    assert!(wait_until(STARTUP_TIMEOUT, || events.stderr() == "world"));

    assert_eq!(pump.run_pending(), 0, "on_stop fired more than once");
    assert_eq!(events.stop_count(), 1);
    assert_eq!(proc.exit_status().map(|s| s.success()), Some(true));
}

#[test]
fn stdout_reconstructs_across_chunk_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let (queue, pump) = channel();
    let events = Arc::new(CollectingEvents::new());

    // well over READ_CHUNK_SIZE of output
    let proc = start_direct(
        &["seq", "1", "20000"],
        dir.path(),
        Arc::clone(&events),
        Arc::new(queue),
    );

    let expected: String = (1..=20000).map(|n| format!("{n}\n")).collect();
    assert!(expected.len() > sbt_runner_process::READ_CHUNK_SIZE);

    assert!(pump.run_one(STARTUP_TIMEOUT));
    assert!(wait_until(STARTUP_TIMEOUT, || events.stdout().len() == expected.len()));
    assert_eq!(events.stdout(), expected);
    assert!(!proc.is_running());
}

#[test]
fn terminate_stops_the_process_and_fires_on_stop_once() {
    let dir = tempfile::tempdir().unwrap();
    let (queue, pump) = channel();
    let events = Arc::new(CollectingEvents::new());

    let proc = start_direct(
        &["sleep", "30"],
        dir.path(),
        Arc::clone(&events),
        Arc::new(queue),
    );
    assert!(proc.is_running());

    proc.terminate().unwrap();
    assert!(pump.run_one(STARTUP_TIMEOUT), "on_stop never arrived");
    assert!(!proc.is_running());
    assert_eq!(events.stop_count(), 1);
    assert_eq!(pump.run_pending(), 0);
}

#[test]
fn kill_stops_the_process_and_fires_on_stop_once() {
    let dir = tempfile::tempdir().unwrap();
    let (queue, pump) = channel();
    let events = Arc::new(CollectingEvents::new());

    let proc = start_direct(
        &["sleep", "30"],
        dir.path(),
        Arc::clone(&events),
        Arc::new(queue),
    );

    proc.kill().unwrap();
    assert!(pump.run_one(STARTUP_TIMEOUT), "on_stop never arrived");
    assert!(!proc.is_running());
    assert_eq!(events.stop_count(), 1);
    assert_eq!(pump.run_pending(), 0);
}

#[test]
fn send_reaches_the_process_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let (queue, pump) = channel();
    let events = Arc::new(CollectingEvents::new());

    let proc = start_direct(
        &["head", "-n", "1"],
        dir.path(),
        Arc::clone(&events),
        Arc::new(queue),
    );

    proc.send("compile\n").unwrap();
    assert!(wait_until(STARTUP_TIMEOUT, || events.stdout() == "compile\n"));
    assert!(pump.run_one(STARTUP_TIMEOUT));
    assert!(!proc.is_running());
}

#[test]
fn send_after_exit_propagates_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (queue, pump) = channel();
    let events = Arc::new(CollectingEvents::new());

    let proc = start_direct(&["true"], dir.path(), Arc::clone(&events), Arc::new(queue));

    assert!(pump.run_one(STARTUP_TIMEOUT));
    assert!(!proc.is_running());

    // no guard in send: the broken pipe surfaces to the caller. The first
    // write can land in the pipe buffer before the kernel reports EPIPE,
    // so push until it fails.
    let err = (0..1024)
        .find_map(|_| proc.send("anyone there?\n").err())
        .expect("send to an exited process kept succeeding");
    assert!(matches!(err, ProcessError::Write(_)));
}

#[test]
fn missing_program_is_a_launch_error() {
    let dir = tempfile::tempdir().unwrap();
    let (queue, _pump) = channel();
    let events = Arc::new(CollectingEvents::new());

    let command = CommandSpec::new(["sbt-runner-no-such-program-xyzzy"]).unwrap();
    let result = ManagedProcess::start(
        Arc::new(DirectLauncher),
        &command,
        dir.path(),
        Arc::clone(&events) as _,
        Arc::new(queue),
    );

    match result {
        Err(ProcessError::Launch { program, .. }) => {
            assert_eq!(program, "sbt-runner-no-such-program-xyzzy");
        }
        Err(other) => panic!("expected launch error, got {other:?}"),
        Ok(_) => panic!("spawn of a missing program succeeded"),
    }
    assert_eq!(events.start_count(), 0, "on_start must not fire on spawn failure");
}

#[test]
fn shell_launcher_keeps_metacharacter_arguments_intact() {
    let dir = tempfile::tempdir().unwrap();
    let (queue, pump) = channel();
    let events = Arc::new(CollectingEvents::new());

    let command = CommandSpec::new([
        "printf",
        "%s|",
        "a b",
        "$HOME",
        "it's",
        "*",
        "x;y&z",
    ])
    .unwrap();

    // pin the shell to the always-present POSIX one instead of whatever
    // the test machine has in $SHELL
    let proc = ManagedProcess::start(
        Arc::new(UnixLauncher::with_shell("/bin/sh")),
        &command,
        dir.path(),
        Arc::clone(&events) as _,
        Arc::new(queue),
    )
    .unwrap();

    assert!(pump.run_one(STARTUP_TIMEOUT));
    // an interactive shell without a tty may chatter on stderr; stdout is
    // what the quoting contract protects
    assert!(wait_until(STARTUP_TIMEOUT, || {
        events.stdout().contains("a b|$HOME|it's|*|x;y&z|")
    }));
    assert!(!proc.is_running());
}
