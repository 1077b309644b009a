//! End-to-end analysis and report tests

use amino_stats::report::ModelStatus;
use amino_stats::{AminoAcid, Analysis, AnalysisConfig, Error, Outcome};

#[test]
fn test_reference_run_report() {
    let run = Analysis::new(AnalysisConfig::default()).unwrap().run().unwrap();
    let report = run.report().unwrap();

    assert_eq!(report.observations, 1000);
    assert_eq!(report.train_rows, 800);
    assert_eq!(report.test_rows, 200);
    assert_eq!(report.summary.len(), 22);
    assert_eq!(report.rankings.len(), 4);
    assert!(report.rankings.iter().all(|r| r.top.len() == 5));
    assert_eq!(report.models.len(), 4);

    for model in &report.models {
        match &model.status {
            ModelStatus::Fitted { mse, r2, coefficients } => {
                assert!(*mse >= 0.0);
                assert!(r2.is_finite());
                assert_eq!(coefficients.len(), 22);
            }
            ModelStatus::Failed { reason } => panic!("{}: {reason}", model.outcome),
        }
    }
}

#[test]
fn test_report_text_has_one_line_per_metric() {
    let run = Analysis::new(AnalysisConfig::default()).unwrap().run().unwrap();
    let text = run.report().unwrap().to_string();

    for outcome in Outcome::ALL {
        let prefix = format!("{} - Mean Squared Error: ", outcome.title());
        assert_eq!(text.lines().filter(|l| l.starts_with(&prefix)).count(), 1, "{outcome}");
    }
    assert!(text.contains("R-squared: "));
}

#[test]
fn test_report_json_round_trips_config() {
    let config = AnalysisConfig::builder()
        .rows(120)
        .labels(vec![AminoAcid::Leucine, AminoAcid::Isoleucine, AminoAcid::Valine])
        .top_k(2)
        .build()
        .unwrap();
    let run = Analysis::new(config.clone()).unwrap().run().unwrap();
    let json = run.report().unwrap().to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["observations"], 120);
    assert_eq!(value["models"].as_array().unwrap().len(), 4);
    assert_eq!(value["rankings"][0]["top"].as_array().unwrap().len(), 2);

    let parsed: AnalysisConfig = serde_json::from_value(value["config"].clone()).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_runs_are_reproducible() {
    let a = Analysis::new(AnalysisConfig::default()).unwrap().run().unwrap();
    let b = Analysis::new(AnalysisConfig::default()).unwrap().run().unwrap();

    assert_eq!(a.dataset(), b.dataset());
    for outcome in Outcome::ALL {
        let fa = a.models().get(outcome).unwrap().as_ref().unwrap();
        let fb = b.models().get(outcome).unwrap().as_ref().unwrap();
        assert!((fa.mse - fb.mse).abs() < f64::EPSILON);
        assert!((fa.r2 - fb.r2).abs() < f64::EPSILON);
    }
}

#[test]
fn test_invalid_config_rejected() {
    let config = AnalysisConfig {
        test_ratio: 0.0,
        ..AnalysisConfig::default()
    };
    assert!(Analysis::new(config).is_err());
}

#[test]
fn test_overflowing_spread_fails_only_that_metric() {
    let config = AnalysisConfig::builder()
        .outcome_params(Outcome::RecoveryRate, 0.0, 1e200)
        .build()
        .unwrap();
    let run = Analysis::new(config).unwrap().run().unwrap();

    let failures: Vec<(Outcome, &Error)> = run.models().failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Outcome::RecoveryRate);
    assert!(matches!(failures[0].1, Error::InvalidInput(_)));

    for (outcome, fit) in run.models().fitted() {
        assert!(fit.mse.is_finite(), "{outcome}");
        assert!(!fit.r2.is_nan(), "{outcome}");
    }

    let text = run.report().unwrap().to_string();
    assert!(text.contains("Recovery Rate (%) - fit failed: "));
}
