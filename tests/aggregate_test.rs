//! Aggregation integration tests

use amino_stats::topk::SortOrder;
use amino_stats::{
    AminoAcid, Dataset, Generator, GeneratorConfig, Observation, Outcome, OutcomeValues, Summary,
};

fn reference_dataset() -> Dataset {
    Generator::new(GeneratorConfig::default())
        .unwrap()
        .generate_seeded(42)
        .unwrap()
}

#[test]
fn test_reference_run_has_a_row_per_label() {
    let dataset = reference_dataset();
    let summary = Summary::from_dataset(&dataset);

    // 1000 draws over 22 labels leave no label empty with this seed
    assert_eq!(summary.len(), 22);
    assert_eq!(summary.rows().iter().map(|r| r.count).sum::<usize>(), 1000);

    for row in summary.rows() {
        let synthesis = row.mean(Outcome::MuscleProteinSynthesis);
        assert!((8.0..=12.0).contains(&synthesis), "{}: {synthesis}", row.amino_acid);
    }
}

#[test]
fn test_means_lie_within_partition_range() {
    let dataset = reference_dataset();
    let summary = Summary::from_dataset(&dataset);

    for row in summary.rows() {
        for outcome in Outcome::ALL {
            let values: Vec<f64> = dataset
                .observations()
                .iter()
                .filter(|o| o.amino_acid == row.amino_acid)
                .map(|o| o.value(outcome))
                .collect();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = row.mean(outcome);
            assert!(min <= mean && mean <= max);
        }
    }
}

#[test]
fn test_rows_sorted_by_label_name() {
    let summary = Summary::from_dataset(&reference_dataset());
    let names: Vec<&str> = summary.rows().iter().map(|r| r.amino_acid.name()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[test]
fn test_absent_label_has_no_row() {
    let values = OutcomeValues {
        muscle_protein_synthesis: 10.0,
        recovery_rate: 8.0,
        muscle_strength: 5.0,
        hypertrophy: 6.0,
    };
    let dataset = Dataset::from_observations(
        vec![AminoAcid::Leucine, AminoAcid::Serine],
        vec![Observation::new(AminoAcid::Leucine, values)],
    )
    .unwrap();

    let summary = Summary::from_dataset(&dataset);
    assert_eq!(summary.len(), 1);
    assert!(summary.get(AminoAcid::Serine).is_none());
    assert_eq!(summary.get(AminoAcid::Leucine).unwrap().count, 1);
}

#[test]
fn test_top_k_ranks_highest_means_first() {
    let summary = Summary::from_dataset(&reference_dataset());
    let top = summary.top_k(Outcome::Hypertrophy, 5, SortOrder::Descending).unwrap();

    assert_eq!(top.len(), 5);
    for pair in top.windows(2) {
        assert!(pair[0].mean(Outcome::Hypertrophy) >= pair[1].mean(Outcome::Hypertrophy));
    }
    let best = summary
        .rows()
        .iter()
        .map(|r| r.mean(Outcome::Hypertrophy))
        .fold(f64::NEG_INFINITY, f64::max);
    assert!((top[0].mean(Outcome::Hypertrophy) - best).abs() < f64::EPSILON);
}

#[test]
fn test_summary_record_batch() {
    let summary = Summary::from_dataset(&reference_dataset());
    let batch = summary.to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 22);
    assert_eq!(batch.num_columns(), 6);
}
