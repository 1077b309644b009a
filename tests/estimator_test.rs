//! Estimator integration tests

use amino_stats::{
    AminoAcid, Dataset, Error, Estimator, Generator, GeneratorConfig, Observation, Outcome,
    TrainTestSplit,
};
use std::collections::HashSet;

fn reference_dataset() -> Dataset {
    Generator::new(GeneratorConfig::default())
        .unwrap()
        .generate_seeded(42)
        .unwrap()
}

#[test]
fn test_reference_split_integrity() {
    let split = TrainTestSplit::seeded(1000, 0.2, 42).unwrap();
    assert_eq!(split.train().len(), 800);
    assert_eq!(split.test().len(), 200);

    let train: HashSet<usize> = split.train().iter().copied().collect();
    let test: HashSet<usize> = split.test().iter().copied().collect();
    assert!(train.is_disjoint(&test));
    assert_eq!(train.union(&test).count(), 1000);
}

#[test]
fn test_reference_run_fits_every_outcome() {
    let dataset = reference_dataset();
    let split = TrainTestSplit::seeded(dataset.len(), 0.2, 42).unwrap();
    let results = Estimator::for_dataset(&dataset)
        .unwrap()
        .fit(&dataset, &split)
        .unwrap();

    assert_eq!(results.fitted().count(), 4);
    for (outcome, fit) in results.fitted() {
        assert!(fit.mse >= 0.0, "{outcome}");
        assert!(fit.r2.is_finite(), "{outcome}");
        // Label effects are independent of the outcomes, so R² sits near zero
        assert!(fit.r2 < 0.5, "{outcome}: {}", fit.r2);
    }
}

#[test]
fn test_predictions_are_training_group_means() {
    let dataset = reference_dataset();
    let split = TrainTestSplit::seeded(dataset.len(), 0.2, 42).unwrap();
    let results = Estimator::for_dataset(&dataset)
        .unwrap()
        .fit(&dataset, &split)
        .unwrap();
    let fit = results.get(Outcome::MuscleStrength).unwrap().as_ref().unwrap();

    let leucine: Vec<f64> = split
        .train()
        .iter()
        .map(|&row| dataset.get(row).unwrap())
        .filter(|o| o.amino_acid == AminoAcid::Leucine)
        .map(|o| o.value(Outcome::MuscleStrength))
        .collect();
    let mean = leucine.iter().sum::<f64>() / leucine.len() as f64;
    let predicted = fit.model.predict_label(AminoAcid::Leucine).unwrap();
    assert!((predicted - mean).abs() < 1e-9);
}

#[test]
fn test_failure_is_isolated_to_one_metric() {
    let dataset = reference_dataset();
    let split = TrainTestSplit::seeded(dataset.len(), 0.2, 42).unwrap();

    // Blank hypertrophy for every Glycine row
    let observations: Vec<Observation> = dataset
        .observations()
        .iter()
        .map(|o| {
            let mut o = *o;
            if o.amino_acid == AminoAcid::Glycine {
                *o.values.get_mut(Outcome::Hypertrophy) = f64::NAN;
            }
            o
        })
        .collect();
    let damaged = Dataset::from_observations(dataset.labels().to_vec(), observations).unwrap();

    let results = Estimator::for_dataset(&damaged)
        .unwrap()
        .fit(&damaged, &split)
        .unwrap();

    let failures: Vec<(Outcome, &Error)> = results.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Outcome::Hypertrophy);
    assert!(matches!(
        failures[0].1,
        Error::DegenerateSplit {
            outcome: Outcome::Hypertrophy,
            label: AminoAcid::Glycine
        }
    ));
    assert_eq!(results.fitted().count(), 3);
}

#[test]
fn test_label_missing_from_training_fails_all_metrics() {
    let labels = vec![AminoAcid::Leucine, AminoAcid::Arginine];
    let dataset = Generator::new(GeneratorConfig {
        rows: 40,
        labels: labels.clone(),
        ..GeneratorConfig::default()
    })
    .unwrap()
    .generate_seeded(1)
    .unwrap();

    // Every Arginine row goes to the test partition
    let (test, train): (Vec<usize>, Vec<usize>) =
        (0..dataset.len()).partition(|&row| dataset.get(row).unwrap().amino_acid == AminoAcid::Arginine);
    let split = TrainTestSplit::from_indices(dataset.len(), train, test).unwrap();

    let results = Estimator::for_dataset(&dataset)
        .unwrap()
        .fit(&dataset, &split)
        .unwrap();
    assert_eq!(results.failures().count(), 4);
    assert_eq!(results.fitted().count(), 0);
}
