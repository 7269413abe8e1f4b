use ndarray::array;
use sentei::data::FeatureKind;
use sentei::editing::{imbalance, iterative};
use sentei::{DataSet, Decomposition, Error, GraphOrder, HyperParam, Selector};

const ALL_SELECTORS: [Selector; 6] = [
    Selector::Condense,
    Selector::Edit { k: 3 },
    Selector::LocalSetPrune { threshold: 0.15 },
    Selector::LocalSetOrderedPrune {
        threshold: 0.15,
        ordering_threshold: 0.15,
    },
    Selector::LocalSetStat,
    Selector::RelativeNeighborhoodGraph {
        order: GraphOrder::Second,
    },
];

fn hyper_param(decomposition: Decomposition, selector: Selector) -> HyperParam {
    HyperParam {
        decomposition,
        selector,
        show_progress: false,
        ..HyperParam::default()
    }
}

/// Scattered points with labels that only partly follow the features.
fn scattered_dataset() -> DataSet {
    DataSet::from_rows(
        (0..40)
            .map(|i| {
                let x = ((i * 7) % 40) as f32;
                let y = ((i * 13) % 17) as f32;
                (
                    vec![x, y],
                    vec![x < 20., y < 8., (i * 5) % 3 == 0],
                )
            })
            .collect(),
    )
    .unwrap()
    .with_name("scattered")
}

/// Two well separated clusters of five rows each; labels follow the cluster.
fn clean_clusters() -> Vec<(Vec<f32>, Vec<bool>)> {
    (0..10)
        .map(|i| {
            let left = i < 5;
            let x = (if left { 0. } else { 50. }) + (i % 5) as f32;
            (vec![x, (i % 2) as f32], vec![left, !left, true])
        })
        .collect()
}

#[test]
fn test_reduction_size_bounds() {
    let dataset = scattered_dataset();
    for &decomposition in &[
        Decomposition::BinaryRelevance,
        Decomposition::LabelPowerset,
        Decomposition::RandomLabelsets { k: 2, m: 1 },
    ] {
        for &selector in &ALL_SELECTORS {
            let reduction = hyper_param(decomposition, selector)
                .reduce(&dataset)
                .unwrap();
            assert!(!reduction.kept.is_empty());
            assert!(reduction.kept.len() <= dataset.len());
            assert_eq!(reduction.kept.len(), reduction.dataset.len());
            assert!(reduction.kept.windows(2).all(|w| w[0] < w[1]));
            for (row, &original) in reduction.kept.iter().enumerate() {
                assert_eq!(dataset.labels(original), reduction.dataset.labels(row));
            }
        }
    }

    for reduction in &[
        iterative::HyperParam::default().reduce(&dataset).unwrap(),
        imbalance::HyperParam::default().reduce(&dataset).unwrap(),
    ] {
        assert!(!reduction.kept.is_empty());
        assert!(reduction.kept.len() <= dataset.len());
    }
}

#[test]
fn test_vote_thresholds_are_nested() {
    let dataset = scattered_dataset();
    let reduction = hyper_param(Decomposition::BinaryRelevance, Selector::Edit { k: 3 })
        .reduce(&dataset)
        .unwrap();
    let votes = reduction.votes.unwrap();
    assert!(votes.iter().all(|&v| v <= 3));

    let below = |t: u32| (0..votes.len()).filter(|&i| votes[i] < t).collect::<Vec<_>>();
    for t in 1..=4 {
        let smaller = below(t);
        let larger = below(t + 1);
        assert!(smaller.iter().all(|i| larger.contains(i)));
    }
    assert_eq!(below(reduction.threshold.unwrap()), reduction.kept);
}

#[test]
fn test_reduction_is_deterministic() {
    let dataset = scattered_dataset();
    for &decomposition in &[
        Decomposition::BinaryRelevance,
        Decomposition::RandomLabelsets { k: 2, m: 3 },
    ] {
        let hyper_param = hyper_param(decomposition, Selector::LocalSetStat);
        let first = hyper_param.reduce(&dataset).unwrap();
        let second = hyper_param.reduce(&dataset).unwrap();
        assert_eq!(first.votes, second.votes);
        assert_eq!(first.threshold, second.threshold);
        assert_eq!(first.kept, second.kept);
        assert_eq!(first.fitness, second.fitness);
    }
}

#[test]
fn test_pure_error_calibration_takes_first_minimum() {
    let dataset = scattered_dataset();
    let mut hyper_param = hyper_param(Decomposition::BinaryRelevance, Selector::Edit { k: 3 });
    hyper_param.calibration.alpha = 1.;
    let reduction = hyper_param.reduce(&dataset).unwrap();

    let min_error = reduction
        .fitness
        .iter()
        .map(|point| point.error)
        .fold(f32::INFINITY, f32::min);
    let first_min = reduction
        .fitness
        .iter()
        .find(|point| point.error == min_error)
        .map(|point| point.threshold);
    assert_eq!(first_min, reduction.threshold);
}

#[test]
fn test_condense_interleaved_classes() {
    let dataset = DataSet::from_rows(vec![
        (vec![0.], vec![true, false]),
        (vec![10.], vec![false, true]),
        (vec![0.5], vec![true, false]),
        (vec![10.5], vec![false, true]),
        (vec![1.], vec![true, false]),
        (vec![11.], vec![false, true]),
    ])
    .unwrap();
    let reduction = hyper_param(Decomposition::LabelPowerset, Selector::Condense)
        .reduce(&dataset)
        .unwrap();
    assert_eq!(vec![0, 1], reduction.kept);
}

#[test]
fn test_graph_editing_removes_outlier() {
    let dataset = DataSet::from_rows(vec![
        (vec![0., 0.], vec![true, false]),
        (vec![1., 0.], vec![true, false]),
        (vec![2., 0.], vec![true, false]),
        (vec![0., 1.], vec![true, false]),
        (vec![1., 1.], vec![true, false]),
        (vec![3.5, 0.], vec![false, true]),
    ])
    .unwrap();
    let reduction = hyper_param(
        Decomposition::LabelPowerset,
        Selector::RelativeNeighborhoodGraph {
            order: GraphOrder::First,
        },
    )
    .reduce(&dataset)
    .unwrap();
    assert_eq!(vec![0, 1, 2, 3, 4], reduction.kept);
}

#[test]
fn test_single_labelset_is_retained() {
    let dataset = DataSet::from_rows(
        (0..12)
            .map(|i| (vec![(i * 3 % 7) as f32, i as f32], vec![true, false, true]))
            .collect(),
    )
    .unwrap();
    for &selector in &[
        Selector::Edit { k: 3 },
        Selector::LocalSetPrune { threshold: 0.15 },
        Selector::LocalSetStat,
        Selector::RelativeNeighborhoodGraph {
            order: GraphOrder::First,
        },
    ] {
        let reduction = hyper_param(Decomposition::LabelPowerset, selector)
            .reduce(&dataset)
            .unwrap();
        assert_eq!(12, reduction.kept.len());
        assert_eq!(0., reduction.compression());
    }
}

#[test]
fn test_label_powerset_editing_is_idempotent() {
    let mut rows = clean_clusters();
    rows.push((vec![1.5, 0.5], vec![false, true, true]));
    let dataset = DataSet::from_rows(rows).unwrap();
    let hyper_param = hyper_param(Decomposition::LabelPowerset, Selector::Edit { k: 3 });

    let first = hyper_param.reduce(&dataset).unwrap();
    assert_eq!((0..10).collect::<Vec<_>>(), first.kept);
    let second = hyper_param.reduce(&first.dataset).unwrap();
    assert_eq!((0..10).collect::<Vec<_>>(), second.kept);
}

#[test]
fn test_iterative_editing_drops_duplicates() {
    let mut rows = clean_clusters();
    rows.truncate(7);
    for i in 0..3 {
        rows.push(rows[i].clone());
    }
    let dataset = DataSet::from_rows(rows).unwrap();
    assert_eq!(10, dataset.len());

    let reduction = iterative::HyperParam::default().reduce(&dataset).unwrap();
    assert!(reduction.kept.iter().all(|&i| i < 7));
}

#[test]
fn test_attribute_matrix_input() {
    let matrix = array![
        [1., 0., 0.5, 2.],
        [0., 1., 0.7, 1.],
        [1., 1., 0.1, 2.],
    ];
    let dataset = DataSet::from_attribute_matrix(
        matrix.clone(),
        2,
        vec![FeatureKind::Numeric, FeatureKind::Nominal],
    )
    .unwrap();
    assert_eq!(2, dataset.n_labels());
    assert_eq!(2, dataset.n_features());
    assert_eq!(&[true, true], dataset.labels(2));

    assert_eq!(
        Err(Error::InvalidLabelCount {
            n_labels: 4,
            n_attributes: 4
        }),
        DataSet::from_attribute_matrix(matrix.clone(), 4, vec![]).map(|d| d.len())
    );
    let mut bad = matrix;
    bad[[1, 0]] = 0.5;
    assert!(DataSet::from_attribute_matrix(bad, 2, vec![FeatureKind::Numeric; 2]).is_err());
}

#[test]
fn test_empty_dataset_is_rejected() {
    let empty = DataSet::from_rows(vec![]).unwrap().with_name("nothing");
    let expected = Err(Error::EmptyDataSet {
        name: "nothing".to_owned(),
    });
    assert_eq!(expected, HyperParam::default().reduce(&empty).map(|r| r.kept));
    assert_eq!(
        expected,
        iterative::HyperParam::default().reduce(&empty).map(|r| r.kept)
    );
    assert_eq!(
        expected,
        imbalance::HyperParam::default().reduce(&empty).map(|r| r.kept)
    );
}

#[test]
fn test_config_from_json() {
    let hyper_param: HyperParam = serde_json::from_str(
        r#"{
            "decomposition": "LabelPowerset",
            "selector": {"LocalSetOrderedPrune": {"threshold": 0.2, "ordering_threshold": 0.1}},
            "calibration": {"alpha": 0.75}
        }"#,
    )
    .unwrap();
    assert_eq!(Decomposition::LabelPowerset, hyper_param.decomposition);
    assert_eq!(
        Selector::LocalSetOrderedPrune {
            threshold: 0.2,
            ordering_threshold: 0.1
        },
        hyper_param.selector
    );
    assert_eq!(0.75, hyper_param.calibration.alpha);
    assert_eq!(10, hyper_param.calibration.min_train_size);
    assert_eq!(1, hyper_param.seed);

    let defaults: HyperParam = serde_json::from_str("{}").unwrap();
    assert_eq!(HyperParam::default(), defaults);

    let editing: iterative::HyperParam = serde_json::from_str(r#"{"k": 5}"#).unwrap();
    assert_eq!(5, editing.k);
    assert_eq!(0.15, editing.stop_ratio);
}
