use lottery_core::{
    DrawEngine, PityTracker, PrizeEntry, PrizeTable, ParticipantState, ProvablyFairRng,
};

fn main() {
    // Example run of ten draws for one participant
    let table = PrizeTable(vec![
        PrizeEntry {
            weight: 10.0,
            reward_actions: vec!["give %player_name% diamond 1".into()],
        },
        PrizeEntry {
            weight: 20.0,
            reward_actions: vec!["give %player_name% iron_ingot 5".into()],
        },
    ]);
    let engine = DrawEngine::new(vec!["give %player_name% nether_star 1".into()]);
    let tracker = PityTracker::new(4);
    let mut rng = ProvablyFairRng::new("example-server-seed", "example-participant", 1);
    let mut state = ParticipantState::default();
    println!("server_seed_hash={}", rng.server_seed_hash_hex());
    for n in 1..=10 {
        let forced = state.in_pity;
        let outcome = engine.draw(&table, forced, &mut rng);
        state = tracker.record_attempt(state, forced, n);
        println!("draw={n} forced={forced} outcome={outcome:?} state={state:?}");
    }
}
