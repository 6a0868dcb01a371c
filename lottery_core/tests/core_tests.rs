use lottery_core::{
    seeded_random, DrawEngine, DrawOutcome, Eligibility, EligibilityGate, FixedRandom,
    PityTracker, PrizeEntry, PrizeTable, ParticipantState, ProvablyFairRng, Tier,
};

fn scenario_table() -> PrizeTable {
    PrizeTable(vec![
        PrizeEntry {
            weight: 10.0,
            reward_actions: vec!["A".into()],
        },
        PrizeEntry {
            weight: 20.0,
            reward_actions: vec!["B".into()],
        },
    ])
}

#[test]
fn fixed_samples_pick_expected_entry() {
    let engine = DrawEngine::default();
    let table = scenario_table();
    let win = |r: f64| {
        let mut rng = FixedRandom::percent(r);
        engine.draw(&table, false, &mut rng)
    };
    assert_eq!(win(5.0).reward_actions(), ["A".to_string()]);
    assert_eq!(win(25.0).reward_actions(), ["B".to_string()]);
    assert_eq!(win(99.0), DrawOutcome::Lose);
}

#[test]
fn draw_repeatable_with_same_seed() {
    let engine = DrawEngine::default();
    let table = scenario_table();
    let mut a = ProvablyFairRng::new("s", "c", 42);
    let mut b = ProvablyFairRng::new("s", "c", 42);
    for _ in 0..50 {
        assert_eq!(
            engine.draw(&table, false, &mut a),
            engine.draw(&table, false, &mut b)
        );
    }
}

#[test]
fn win_rate_converges_to_weight() {
    let engine = DrawEngine::default();
    let table = scenario_table();
    let mut rng = seeded_random(2024);
    let trials = 200_000;
    let (mut a, mut b, mut lose) = (0u32, 0u32, 0u32);
    for _ in 0..trials {
        match engine.draw(&table, false, &mut rng) {
            DrawOutcome::Win(e) if e.reward_actions[0] == "A" => a += 1,
            DrawOutcome::Win(_) => b += 1,
            DrawOutcome::Lose => lose += 1,
        }
    }
    let rate = |n: u32| n as f64 / trials as f64;
    // loose bounds, several standard deviations wide
    assert!((rate(a) - 0.10).abs() < 0.01);
    assert!((rate(b) - 0.20).abs() < 0.01);
    assert!((rate(lose) - 0.70).abs() < 0.01);
}

#[test]
fn pity_after_three_losing_draws() {
    let engine = DrawEngine::new(vec!["guaranteed".into()]);
    let tracker = PityTracker::new(3);
    let gate = EligibilityGate::default();
    let table = scenario_table();
    let mut rng = FixedRandom::percent(99.0);
    let mut state = ParticipantState::default();

    for t in 1..=3 {
        assert_eq!(gate.check(&state, Tier::Default, t), Eligibility::Allowed);
        let forced = state.in_pity;
        assert!(!forced);
        let out = engine.draw(&table, forced, &mut rng);
        assert_eq!(out, DrawOutcome::Lose);
        state = tracker.record_attempt(state, forced, t);
    }
    assert!(state.in_pity);
    assert_eq!(state.attempt_count, 3);

    let out = engine.draw(&table, state.in_pity, &mut rng);
    assert_eq!(out.reward_actions(), ["guaranteed".to_string()]);
    state = tracker.record_attempt(state, true, 4);
    assert_eq!(state.attempt_count, 0);
    assert!(!state.in_pity);
}
