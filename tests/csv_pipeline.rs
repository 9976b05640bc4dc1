use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use route_stop_grouper::config::Config;
use route_stop_grouper::pipeline::RunRequest;
use route_stop_grouper::ProcessingError;

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("route-stop-grouper-{name}-{nanos}.{ext}"))
}

const ROUTE_CSV: &str = "\
Sequence,Stop,Destination Address ,Neighborhood,City,ZIP
4,7,\"Rua B, 2\",Centro,Campinas,13010-000
1,3,\"Rua A, 10\",Cambuí,Campinas,13024-000
2,9,\"Rua Á, 10\",Cambuí,Campinas,13024-000
3,5,,Centro,Campinas,13010-000
";

#[test]
fn csv_to_csv_with_stop_order() {
    let input = tmp_file("route", "csv");
    let output = tmp_file("stops", "csv");
    std::fs::write(&input, ROUTE_CSV).unwrap();

    let cfg = Config::from_toml_str("order = \"stop\"\nstate = \"SP\"").unwrap();
    let mut request = RunRequest::new(&input, &output);
    request.options = cfg.process_options().unwrap();

    let stats = request.run().unwrap();
    assert_eq!(stats.input_rows, 4);
    assert_eq!(stats.groups, 3);

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "Stop Name,Address Line,Secondary Address Line,City,State,Zip Code,Observations,Total Packages\n\
         Parada 3,\"Rua A, 10\",Cambuí,Campinas,SP,13024-000,Orders for this stop: 1 and 2,2 packages\n\
         Parada 5,,Centro,Campinas,SP,13010-000,Order 3,1 packages\n\
         Parada 7,\"Rua B, 2\",Centro,Campinas,SP,13010-000,Order 4,1 packages\n"
    );

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn failed_run_writes_nothing() {
    let input = tmp_file("route-bad", "csv");
    let output = tmp_file("stops-bad", "xlsx");
    std::fs::write(
        &input,
        "Sequence,Stop,Destination Address,Bairro,City,Zip\nx,1,\"Rua A, 1\",C,D,1\n",
    )
    .unwrap();

    let err = RunRequest::new(&input, &output).run().unwrap_err();
    assert!(matches!(err, ProcessingError::TypeConversion { row: 2, .. }));
    assert!(!output.exists());

    let _ = std::fs::remove_file(&input);
}

#[test]
fn unsupported_output_extension_fails_before_reading() {
    let err = RunRequest::new("does_not_exist.csv", "stops.json").run().unwrap_err();
    assert!(matches!(err, ProcessingError::UnsupportedFormat { .. }));
}
