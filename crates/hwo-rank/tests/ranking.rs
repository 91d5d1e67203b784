use hwo_model::{
    CanonicalRecord, HabitabilityClass, PriorityTier, ScoreBreakdown, ScoredRecord, TargetId,
};
use hwo_rank::{
    RankComponent, Ranker, RankingConfig, RankingConfigError, RankingWeights, rank,
};
use hwo_sequence::{SequenceResult, SequenceStep, StrategyKind};
use proptest::prelude::*;

fn id(value: &str) -> TargetId {
    TargetId::new(value).unwrap()
}

fn scored(name: &str, characterizability: f64, confidence: f64, habitability: f64) -> ScoredRecord {
    ScoredRecord {
        record: CanonicalRecord::new(id(name)),
        habitability_score: habitability,
        characterizability_score: characterizability,
        confidence,
        tier: PriorityTier::from_score(characterizability),
        habitability_class: HabitabilityClass::from_score(habitability),
        breakdown: ScoreBreakdown::default(),
    }
}

fn sequence_of(ids: &[&str]) -> SequenceResult {
    SequenceResult {
        steps: ids
            .iter()
            .enumerate()
            .map(|(slot, name)| SequenceStep {
                id: id(name),
                slot,
                cost_from_previous: 0.0,
            })
            .collect(),
        total_cost: 0.0,
        excluded: Vec::new(),
        strategy: Some(StrategyKind::Exact),
        iterations: 0,
        converged: true,
    }
}

#[test]
fn composite_is_explained_by_its_components() {
    let result = rank(&[scored("K2-18 b", 80.0, 60.0, 55.0)], None);
    let entry = &result.entries[0];

    // (0.40·80 + 0.35·60 + 0.20·25) / 0.95
    assert_eq!(entry.composite, 61.052632);
    assert_eq!(entry.rank, 1);
    assert!(!result.used_sequence);
    assert!(entry.component(RankComponent::SequencePosition).is_none());

    let tier = entry.component(RankComponent::TierPoints).unwrap();
    assert_eq!(tier.raw, 25.0);
    assert!((tier.weight - 0.20 / 0.95).abs() < 1e-12);

    let weight_sum: f64 = entry.components.iter().map(|c| c.weight).sum();
    assert!((weight_sum - 1.0).abs() < 1e-12);
    let contribution_sum: f64 = entry.components.iter().map(|c| c.contribution).sum();
    assert!((contribution_sum - entry.composite).abs() < 1e-6);
}

#[test]
fn higher_composite_ranks_first() {
    let records = vec![
        scored("Low", 30.0, 40.0, 90.0),
        scored("High", 90.0, 80.0, 10.0),
        scored("Mid", 60.0, 60.0, 50.0),
    ];
    let result = rank(&records, None);
    let ids: Vec<&str> = result.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["High", "Mid", "Low"]);
    let ranks: Vec<usize> = result.entries.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn equal_composites_break_ties_by_habitability_then_identifier() {
    let records = vec![
        scored("B", 70.0, 50.0, 60.0),
        scored("C", 70.0, 50.0, 70.0),
        scored("A", 70.0, 50.0, 70.0),
    ];
    let result = rank(&records, None);
    let ids: Vec<&str> = result.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "C", "B"]);
    assert_eq!(result.entries[0].composite, result.entries[2].composite);
}

#[test]
fn sequence_position_joins_the_composite() {
    let records = vec![
        scored("X", 80.0, 60.0, 50.0),
        scored("Y", 80.0, 60.0, 50.0),
        scored("Z", 80.0, 60.0, 50.0),
    ];
    let sequence = sequence_of(&["Y", "X"]);
    let result = rank(&records, Some(&sequence));
    assert!(result.used_sequence);

    let raw = |name: &str| {
        result
            .get(&id(name))
            .and_then(|e| e.component(RankComponent::SequencePosition))
            .map(|c| c.raw)
    };
    assert_eq!(raw("Y"), Some(100.0));
    assert_eq!(raw("X"), Some(50.0));
    assert_eq!(raw("Z"), Some(0.0));
    assert_eq!(result.get(&id("Z")).unwrap().sequence_position, None);

    let ids: Vec<&str> = result.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["Y", "X", "Z"]);

    let weight = result.entries[0]
        .component(RankComponent::SequencePosition)
        .unwrap()
        .weight;
    assert!((weight - 0.05).abs() < 1e-12);
}

#[test]
fn custom_weights_are_normalized() {
    let ranker = Ranker::new(RankingConfig {
        weights: RankingWeights {
            characterizability: 2.0,
            confidence: 0.0,
            tier: 0.0,
            sequence: 0.0,
        },
        ..RankingConfig::default()
    })
    .unwrap();
    let result = ranker.rank(&[scored("Solo", 42.0, 99.0, 10.0)], None);
    assert_eq!(result.entries[0].composite, 42.0);
}

#[test]
fn invalid_weights_are_rejected() {
    let err = Ranker::new(RankingConfig {
        weights: RankingWeights {
            confidence: -0.35,
            ..RankingWeights::default()
        },
        ..RankingConfig::default()
    })
    .unwrap_err();
    assert!(matches!(
        err,
        RankingConfigError::InvalidWeight {
            name: "confidence",
            ..
        }
    ));
}

#[test]
fn empty_input_ranks_nothing() {
    let result = rank(&[], None);
    assert!(result.is_empty());
    assert!(result.top(5).is_empty());
}

#[test]
fn ranking_ignores_input_order() {
    let records: Vec<ScoredRecord> = (0..30)
        .map(|i| {
            scored(
                &format!("R-{i:02}"),
                (i * 37 % 100) as f64,
                (i * 11 % 100) as f64,
                (i % 4 * 20) as f64,
            )
        })
        .collect();
    let mut reversed = records.clone();
    reversed.reverse();
    assert_eq!(rank(&records, None), rank(&reversed, None));
}

#[test]
fn ranking_is_deterministic_across_threads() {
    let records: Vec<ScoredRecord> = (0..40)
        .map(|i| scored(&format!("T-{i}"), (i * 7 % 100) as f64, 50.0, (i % 3) as f64))
        .collect();
    let ranker = Ranker::default();
    let expected = ranker.rank(&records, None);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| ranker.rank(&records, None)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn ranking_result_serializes_components() {
    let result = rank(&[scored("Json", 80.0, 60.0, 55.0)], None);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["entries"][0]["id"], "Json");
    assert_eq!(json["entries"][0]["components"][0]["component"], "characterizability");
    let back: hwo_rank::RankingResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}

proptest! {
    #[test]
    fn composites_are_bounded_and_ranks_contiguous(
        scores in proptest::collection::vec((0.0..=100.0f64, 0.0..=100.0f64, 0.0..=100.0f64), 0..40),
        use_sequence in any::<bool>(),
    ) {
        let records: Vec<ScoredRecord> = scores
            .iter()
            .enumerate()
            .map(|(i, &(c, conf, h))| scored(&format!("P-{i}"), c, conf, h))
            .collect();
        let names: Vec<String> = records.iter().step_by(2).map(|r| r.id().to_string()).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let sequence = sequence_of(&name_refs);
        let result = rank(&records, use_sequence.then_some(&sequence));

        prop_assert_eq!(result.len(), records.len());
        for (index, entry) in result.entries.iter().enumerate() {
            prop_assert_eq!(entry.rank, index + 1);
            prop_assert!((0.0..=100.0).contains(&entry.composite));
        }
        for pair in result.entries.windows(2) {
            prop_assert!(pair[0].composite >= pair[1].composite);
        }
    }
}
