//! Random playouts checking the conservation and elimination invariants on every snapshot.

use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use coup_engine::{Config, Coup, Driver, Phase, RandomOracle};

const MAX_STEPS: usize = 3000;

/// Picks a uniformly random legal input for whoever the game is waiting on.
fn random_step(coup: &Coup, rng: &mut Pcg64) -> Coup {
    let player_idx = coup.awaited_player().expect("an unfinished game waits on someone");

    match coup.phase() {
        Phase::AwaitingAction => {
            let actions = coup.legal_actions(player_idx);
            let action = actions.choose(rng).expect("the current player always has a move");
            coup.try_declare_action(action.actor, action.kind, action.target).unwrap()
        }
        Phase::AwaitingResponse(_) => {
            let responses = coup.legal_responses(player_idx);
            let response = *responses.choose(rng).expect("allow is always legal");
            coup.try_submit_response(player_idx, response, rng).unwrap()
        }
        Phase::AwaitingExchange(pending) => {
            let hand = coup.players()[player_idx].hidden_cards();
            let mut pool = hand.clone();
            pool.extend(pending.drawn.iter().copied());
            pool.shuffle(rng);

            let after = coup.try_submit_exchange_selection(player_idx, &pool[..hand.len()], rng).unwrap();
            assert_eq!(after.players()[player_idx].hidden_count(), hand.len());
            after
        }
        Phase::AwaitingReveal(_) => {
            let card = coup.players()[player_idx].hidden_cards().choose(rng).copied();
            coup.try_submit_forced_reveal(player_idx, card).unwrap()
        }
    }
}

fn check(coup: &Coup) -> Result<(), TestCaseError> {
    let tally = coup.check_invariants();
    prop_assert_eq!(tally.coins, 50);
    prop_assert_eq!(tally.cards, 15);
    prop_assert_eq!(tally.per_character, [3; 5]);

    for player in coup.players() {
        prop_assert_eq!(player.is_eliminated(), player.influence.iter().all(|slot| slot.revealed));
    }

    if let Some(player_idx) = coup.awaited_player() {
        prop_assert!(!coup.players()[player_idx].is_eliminated());
    }

    if let Phase::AwaitingResponse(pending) = coup.phase() {
        for &idx in &pending.eligible {
            prop_assert!(!coup.players()[idx].is_eliminated());
        }
    }

    if let Some(winner) = coup.winner() {
        prop_assert_eq!(coup.alive_players().count(), 1);
        prop_assert!(!coup.players()[winner].is_eliminated());
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_play_conserves_coins_and_cards(seed in any::<u64>(), seats in 2usize..=6) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let names: Vec<String> = (0..seats).map(|n| format!("P{n}")).collect();
        let mut coup = Coup::new(&names, 0, &Config::default(), &mut rng).unwrap();
        check(&coup)?;

        for _ in 0..MAX_STEPS {
            if coup.winner().is_some() {
                break;
            }
            coup = random_step(&coup, &mut rng);
            check(&coup)?;
        }
    }

    #[test]
    fn automated_games_end_with_one_survivor(seed in any::<u64>(), bots in 2usize..=5) {
        let oracle = RandomOracle::new(Pcg64::seed_from_u64(seed));
        let mut driver = Driver::new(oracle, Pcg64::seed_from_u64(seed.wrapping_add(1)), Config::default());
        let coup = driver.initialize(&[], bots).unwrap();

        prop_assert!(coup.winner().is_some());
        check(&coup)?;
    }

    #[test]
    fn rejected_calls_only_add_a_log_line(seed in any::<u64>()) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let names = vec!["Ann".to_string(), "Bo".to_string(), "Cy".to_string()];
        let coup = Coup::new(&names, 0, &Config::default(), &mut rng).unwrap();

        let idle = coup.other_player_indexes(coup.current_player().id)[0];
        let rejected = coup.declare_action(idle, coup_engine::ActionKind::Income, None);

        prop_assert_eq!(rejected.players(), coup.players());
        prop_assert_eq!(rejected.phase(), coup.phase());
        prop_assert_eq!(rejected.treasury(), coup.treasury());
        prop_assert_eq!(rejected.log().len(), coup.log().len() + 1);
    }
}
