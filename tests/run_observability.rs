use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use route_stop_grouper::observability::{
    CompositeObserver, RunContext, RunObserver, RunSeverity, RunStats,
};
use route_stop_grouper::pipeline::RunRequest;
use route_stop_grouper::ProcessingError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<RunStats>>,
    failures: Mutex<Vec<RunSeverity>>,
    alerts: Mutex<Vec<RunSeverity>>,
}

impl RunObserver for RecordingObserver {
    fn on_success(&self, _ctx: &RunContext, stats: RunStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &RunContext, severity: RunSeverity, _error: &ProcessingError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &RunContext, severity: RunSeverity, _error: &ProcessingError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("route-stop-grouper-obs-{name}-{nanos}.{ext}"))
}

#[test]
fn observer_receives_failure_and_alert_on_missing_input() {
    let obs = Arc::new(RecordingObserver::default());
    let request = RunRequest::new("tests/does_not_exist.csv", tmp_file("out", "csv"))
        .with_observer(obs.clone());

    let _ = request.run().unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![RunSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![RunSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_missing_column() {
    let input = tmp_file("no-zip", "csv");
    std::fs::write(
        &input,
        "Sequence,Stop,Destination Address,Bairro,City\n1,1,\"Rua A, 1\",C,D\n",
    )
    .unwrap();

    let obs = Arc::new(RecordingObserver::default());
    let request = RunRequest::new(&input, tmp_file("out", "csv")).with_observer(obs.clone());
    let err = request.run().unwrap_err();
    assert!(err.to_string().contains("postal code"));

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![RunSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());

    let _ = std::fs::remove_file(&input);
}

#[test]
fn composite_observer_fans_out_success() {
    let input = tmp_file("ok", "csv");
    let output = tmp_file("ok-out", "csv");
    std::fs::write(
        &input,
        "Sequence,Stop,Destination Address,Bairro,City,Zip\n1,1,\"Rua A, 1\",C,D,1\n2,2,\"rua a, 1\",E,D,1\n",
    )
    .unwrap();

    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let composite = Arc::new(CompositeObserver::new(vec![
        a.clone() as Arc<dyn RunObserver>,
        b.clone(),
    ]));
    RunRequest::new(&input, &output).with_observer(composite).run().unwrap();

    let expected = RunStats {
        input_rows: 2,
        groups: 1,
        divergent_groups: 1,
    };
    assert_eq!(a.successes.lock().unwrap().clone(), vec![expected]);
    assert_eq!(b.successes.lock().unwrap().clone(), vec![expected]);

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}
