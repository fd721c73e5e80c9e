use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use fitrs_core::cmd::config::{Action, CmdError, Config, DataSource, Fit, Generate, ModelConfig};
use fitrs_core::data::{make_regression, DataError, Dataset, SyntheticSpec};
use fitrs_core::report::html_report::{render_html, write_html};
use fitrs_core::report::{report_file_name, Plots, ReportData};
use fitrs_core::{ErrorKind, Model};

fn write_config(dir: &std::path::Path, body: &str) -> PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn csv_round_trip_and_fit() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("points.csv");

    let synth = make_regression(&SyntheticSpec {
        n_samples: 60,
        noise: 0.4,
        bias: 50.0,
        coef: Some(3.0),
        seed: Some(11),
    })
    .unwrap();
    synth.dataset.write_csv(&csv_path).unwrap();

    let loaded = Dataset::from_csv(&csv_path, "x", "y").unwrap();
    assert_eq!(loaded.len(), 60);
    for (a, b) in loaded.x().iter().zip(synth.dataset.x()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }

    let mut model = Model::new(0.0, 0.0, 1e-10, 0.1).unwrap();
    model.fit(loaded.x(), loaded.y()).unwrap();
    assert_abs_diff_eq!(model.theta_0(), 50.0, epsilon = 0.3);
    assert_abs_diff_eq!(model.theta_1(), 3.0, epsilon = 0.3);
    assert!(model.r_squared().unwrap() > 0.95);
    assert!(model.w_stat().unwrap() > 0.0);
}

#[test]
fn csv_with_text_cell_is_type_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("bad.csv");
    fs::write(&csv_path, "x,y\n1,2\n2,hello\n3,6\n").unwrap();

    let err = Dataset::from_csv(&csv_path, "x", "y").unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Type));
    assert_eq!(err.to_string(), "row 2, column 'y': 'hello' is not a number");
}

#[test]
fn csv_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("cols.csv");
    fs::write(&csv_path, "a,b\n1,2\n").unwrap();

    let err = Dataset::from_csv(&csv_path, "a", "y").unwrap_err();
    assert!(matches!(err, DataError::MissingColumn(ref c) if c == "y"));
}

#[test]
fn report_is_written_and_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("docs");
    let date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();

    let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let y = [0.9, 3.1, 5.0, 7.2, 8.8, 11.1];
    let mut model = Model::new(0.0, 0.0, 1e-10, 0.05).unwrap();
    model.fit(&x, &y).unwrap();

    let data = ReportData { model: &model, x: &x, y: &y, source: "inline", date };
    let html = render_html(&data, &Plots::default()).unwrap();

    let first = write_html(&out, date, "old \u{201c}report\u{201d}").unwrap();
    assert_eq!(first, out.join("2025-06-30_regression_QA.html"));
    assert_eq!(fs::read_to_string(&first).unwrap(), "old \"report\"");

    let second = write_html(&out, date, &html).unwrap();
    assert_eq!(first, second);
    let written = fs::read_to_string(&second).unwrap();
    assert!(written.contains("Regression QA 2025-06-30"));
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    assert_eq!(report_file_name(date), "2025-06-30_regression_QA.html");
}

#[test]
fn config_file_with_string_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"theta_0": 0, "theta_1": "one", "learning_rate": 0.1, "convergence_threshold": 1e-6}"#,
    );
    let err = ModelConfig::load(&path).unwrap_err();
    assert!(matches!(err, CmdError::Config { .. }));
    assert_eq!(err.kind(), Some(ErrorKind::Type));
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelConfig::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, CmdError::Io(_)));
}

#[test]
fn generate_then_fit_without_report() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("gen.csv");

    let generate = Config {
        action: Action::Generate(Generate {
            spec: SyntheticSpec { n_samples: 40, seed: Some(5), ..Default::default() },
            output: csv_path.clone(),
        }),
    };
    generate.run().unwrap();
    assert_eq!(Dataset::from_csv(&csv_path, "x", "y").unwrap().len(), 40);

    let config_path = write_config(
        dir.path(),
        r#"{"theta_0": 0, "theta_1": 0, "learning_rate": 0.1, "convergence_threshold": 1e-8}"#,
    );
    let out_dir = dir.path().join("docs");
    let fit = Config {
        action: Action::Fit(Fit {
            config_path,
            source: DataSource::Csv { path: csv_path, x_col: "x".into(), y_col: "y".into() },
            out_dir: out_dir.clone(),
            write_report: false,
            print_json: true,
        }),
    };
    fit.run().unwrap();
    assert!(!out_dir.exists());
}

#[test]
fn fit_with_invalid_hyperparameters_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(
        dir.path(),
        r#"{"theta_0": 0, "theta_1": 0, "learning_rate": 0, "convergence_threshold": 1e-8}"#,
    );
    let fit = Config {
        action: Action::Fit(Fit {
            config_path,
            source: DataSource::Synthetic(SyntheticSpec { seed: Some(1), ..Default::default() }),
            out_dir: dir.path().join("docs"),
            write_report: false,
            print_json: false,
        }),
    };
    let err = fit.run().unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Value));
}
