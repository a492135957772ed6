// automated players: ask the advisory oracle, check its answer, fall back when it is wrong

use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use crate::action::{Action, ActionKind, Claim, Response, FORCED_COUP_THRESHOLD};
use crate::character::Character;
use crate::config::Config;
use crate::coup::{Coup, PendingExchange, Phase};
use crate::error::{CoupError, OracleError};
use crate::player::{Player, PlayerId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Action,
    Response,
    Reveal,
}

/// What everyone at the table can see about an opponent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OpponentView {
    pub name: String,
    pub money: u8,
    pub influence: usize,
    pub revealed: Vec<Character>,
}

/// Everything the oracle is told about a decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Situation {
    pub player: String,
    pub money: u8,
    pub hand: Vec<Character>,
    pub opponents: Vec<OpponentView>,
    pub decision: Decision,
    pub options: Vec<String>,
    pub targets: Vec<String>,
    pub claim: Option<String>,
    pub summary: String,
}

/// The oracle's recommendation. Untrusted until checked against the legal options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub choice: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub rationale: String,
}

impl Advice {
    pub fn new(choice: impl Into<String>, target: Option<&str>) -> Self {
        Self {
            choice: choice.into(),
            target: target.map(str::to_string),
            rationale: String::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Advice, OracleError> {
        Ok(serde_json::from_str(json)?)
    }

    fn chose(&self, label: &str) -> bool {
        self.choice.trim().eq_ignore_ascii_case(label)
    }
}

pub trait Oracle {
    fn advise(&mut self, situation: &Situation) -> Result<Advice, OracleError>;
}

impl<F> Oracle for F where F: FnMut(&Situation) -> Result<Advice, OracleError> {
    fn advise(&mut self, situation: &Situation) -> Result<Advice, OracleError> {
        self(situation)
    }
}

/// Picks uniformly among the offered options and targets.
pub struct RandomOracle<R> {
    rng: R,
}

impl<R: Rng> RandomOracle<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Oracle for RandomOracle<R> {
    fn advise(&mut self, situation: &Situation) -> Result<Advice, OracleError> {
        let choice = situation.options
            .choose(&mut self.rng)
            .ok_or_else(|| OracleError::Unavailable("no options offered".to_string()))?;

        Ok(Advice {
            choice: choice.clone(),
            target: situation.targets.choose(&mut self.rng).cloned(),
            rationale: "picked at random".to_string(),
        })
    }
}

/// Stands in for every automated seat. Each entry point forwards to the snapshot, then keeps
/// deciding for automated players until a human has to act or the game is over.
pub struct Driver<O, R> {
    oracle: O,
    rng: R,
    config: Config,
}

impl<O: Oracle, R: Rng> Driver<O, R> {
    pub fn new(oracle: O, rng: R, config: Config) -> Self {
        Self { oracle, rng, config }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn initialize(&mut self, humans: &[String], ai_count: usize) -> Result<Coup, CoupError> {
        let game = Coup::new(humans, ai_count, &self.config, &mut self.rng)?;
        Ok(self.advance(&game))
    }

    pub fn declare_action(&mut self, game: &Coup, player_idx: PlayerId, kind: ActionKind, target: Option<PlayerId>) -> Coup {
        let game = game.declare_action(player_idx, kind, target);
        self.advance(&game)
    }

    pub fn submit_response(&mut self, game: &Coup, player_idx: PlayerId, response: Response) -> Coup {
        let game = game.submit_response(player_idx, response, &mut self.rng);
        self.advance(&game)
    }

    pub fn submit_exchange_selection(&mut self, game: &Coup, player_idx: PlayerId, keep: &[Character]) -> Coup {
        let game = game.submit_exchange_selection(player_idx, keep, &mut self.rng);
        self.advance(&game)
    }

    pub fn submit_forced_reveal(&mut self, game: &Coup, player_idx: PlayerId, card: Option<Character>) -> Coup {
        let game = game.submit_forced_reveal(player_idx, card);
        self.advance(&game)
    }

    /// Plays every pending automated decision, one at a time.
    pub fn advance(&mut self, game: &Coup) -> Coup {
        let mut game = game.clone();

        for _ in 0..self.config.max_automated_steps {
            let Some(player_idx) = next_automated(&game) else {
                return game;
            };

            game = match self.decide(&game, player_idx) {
                Ok(next) => next,
                Err(err) => {
                    // fallbacks are always legal, so this means the snapshot itself is off
                    warn!("automated decision for player {player_idx} failed: {err}");
                    return game.rejected(&err);
                }
            };
        }

        warn!("stopped after {} automated decisions", self.config.max_automated_steps);
        game
    }

    fn decide(&mut self, game: &Coup, player_idx: PlayerId) -> Result<Coup, CoupError> {
        match game.phase() {
            Phase::AwaitingAction => self.take_turn(game, player_idx),
            Phase::AwaitingResponse(pending) => {
                let claim = claim_text(game, &pending.claim);
                self.respond(game, player_idx, claim)
            }
            Phase::AwaitingExchange(pending) => self.exchange(game, player_idx, pending),
            Phase::AwaitingReveal(_) => self.reveal(game, player_idx),
        }
    }

    fn take_turn(&mut self, game: &Coup, player_idx: PlayerId) -> Result<Coup, CoupError> {
        let legal = game.legal_actions(player_idx);

        let mut options: Vec<String> = vec![];
        for action in &legal {
            if !options.iter().any(|label| label == action.kind.label()) {
                options.push(action.kind.label().to_string());
            }
        }
        let targets = game.other_player_indexes(player_idx)
            .into_iter()
            .map(|idx| game.players()[idx].name.clone())
            .collect();

        let situation = self.situation(game, player_idx, Decision::Action, options, targets, None);
        let advice = self.oracle.advise(&situation);

        let mut game = game.clone();
        let action = match advice.and_then(|advice| checked_action(game.players(), &legal, advice)) {
            Ok(action) => action,
            Err(err) => {
                let action = fallback_action(&game, player_idx, &legal);
                note_fallback(&mut game, player_idx, action.kind.label(), &err);
                action
            }
        };

        game.try_declare_action(action.actor, action.kind, action.target)
    }

    fn respond(&mut self, game: &Coup, player_idx: PlayerId, claim: String) -> Result<Coup, CoupError> {
        let legal = game.legal_responses(player_idx);
        let options = legal.iter().map(|response| response.label().to_string()).collect();

        let situation = self.situation(game, player_idx, Decision::Response, options, vec![], Some(claim));
        let advice = self.oracle.advise(&situation);

        let mut game = game.clone();
        let checked = advice.and_then(|advice| {
            debug!("{}: {}", situation.player, advice.rationale);
            legal.iter()
                .copied()
                .find(|response| advice.chose(response.label()))
                .ok_or(OracleError::IllegalChoice(advice.choice))
        });
        let response = match checked {
            Ok(response) => response,
            Err(err) => {
                note_fallback(&mut game, player_idx, Response::Allow.label(), &err);
                Response::Allow
            }
        };

        game.try_submit_response(player_idx, response, &mut self.rng)
    }

    fn reveal(&mut self, game: &Coup, player_idx: PlayerId) -> Result<Coup, CoupError> {
        let hand = game.player(player_idx)?.hidden_cards();
        let mut options: Vec<String> = hand.iter().map(|card| card.name().to_string()).collect();
        options.dedup();

        let situation = self.situation(game, player_idx, Decision::Reveal, options, vec![], None);
        let advice = self.oracle.advise(&situation);

        let mut game = game.clone();
        let checked = advice.and_then(|advice| {
            debug!("{}: {}", situation.player, advice.rationale);
            Character::parse(&advice.choice)
                .filter(|card| hand.contains(card))
                .ok_or(OracleError::IllegalChoice(advice.choice))
        });
        let card = match checked {
            Ok(card) => Some(card),
            Err(err) => {
                note_fallback(&mut game, player_idx, "any card", &err);
                None
            }
        };

        game.try_submit_forced_reveal(player_idx, card)
    }

    fn exchange(&mut self, game: &Coup, player_idx: PlayerId, pending: &PendingExchange) -> Result<Coup, CoupError> {
        let hand = game.player(player_idx)?.hidden_cards();
        let mut pool = hand.clone();
        pool.extend(pending.drawn.iter().copied());

        let keep = choose_keep(&pool, hand.len());
        game.try_submit_exchange_selection(player_idx, &keep, &mut self.rng)
    }

    fn situation(&self, game: &Coup, player_idx: PlayerId, decision: Decision, options: Vec<String>, targets: Vec<String>, claim: Option<String>) -> Situation {
        let player = &game.players()[player_idx];

        Situation {
            player: player.name.clone(),
            money: player.money,
            hand: player.hidden_cards(),
            opponents: game.players()
                .iter()
                .filter(|opponent| opponent.id != player_idx)
                .map(|opponent| OpponentView {
                    name: opponent.name.clone(),
                    money: opponent.money,
                    influence: opponent.hidden_count(),
                    revealed: opponent.revealed_cards(),
                })
                .collect(),
            decision,
            options,
            targets,
            claim,
            summary: game.log().tail(self.config.summary_lines),
        }
    }
}

fn next_automated(game: &Coup) -> Option<PlayerId> {
    if game.winner().is_some() {
        return None;
    }

    match game.phase() {
        // every automated responder gets polled, in seating order, even while humans are pending
        Phase::AwaitingResponse(pending) => pending.awaiting().find(|&idx| game.players()[idx].automated),
        _ => game.awaited_player().filter(|&idx| game.players()[idx].automated),
    }
}

fn checked_action(players: &[Player], legal: &[Action], advice: Advice) -> Result<Action, OracleError> {
    debug!("advice: {} ({})", advice.choice, advice.rationale);

    let kind = legal.iter()
        .map(|action| action.kind)
        .find(|kind| advice.chose(kind.label()))
        .ok_or_else(|| OracleError::IllegalChoice(advice.choice.clone()))?;

    if !kind.needs_target() {
        return legal.iter()
            .copied()
            .find(|action| action.kind == kind)
            .ok_or(OracleError::IllegalChoice(advice.choice));
    }

    let wanted = advice.target.as_deref().map(str::trim);
    legal.iter()
        .copied()
        .filter(|action| action.kind == kind)
        .find(|action| {
            let name = action.target.map(|idx| players[idx].name.as_str());
            matches!((name, wanted), (Some(name), Some(wanted)) if name.eq_ignore_ascii_case(wanted))
        })
        .ok_or(OracleError::IllegalTarget(advice.target))
}

// income when there is a choice, otherwise coup whoever comes first
fn fallback_action(game: &Coup, player_idx: PlayerId, legal: &[Action]) -> Action {
    let income = Action { actor: player_idx, kind: ActionKind::Income, target: None };

    if game.players()[player_idx].money < FORCED_COUP_THRESHOLD {
        return income;
    }

    legal.iter()
        .copied()
        .find(|action| action.kind == ActionKind::Coup)
        .unwrap_or(income)
}

fn note_fallback(game: &mut Coup, player_idx: PlayerId, fallback: &str, err: &OracleError) {
    let name = &game.players()[player_idx].name;
    warn!("{name}: {err}, falling back to {fallback}");
    let line = format!("{name} falls back to {fallback}: {err}");
    game.note(line);
}

fn claim_text(game: &Coup, claim: &Claim) -> String {
    let name = |idx: PlayerId| game.players()[idx].name.as_str();

    match claim {
        Claim::Action(action) => match action.target {
            Some(target) => format!("{} declared {} against {}", name(action.actor), action.kind, name(target)),
            None => format!("{} declared {}", name(action.actor), action.kind),
        },
        Claim::Block { blocker, kind, action } => {
            format!("{} blocks {}'s {} ({})", name(*blocker), name(action.actor), action.kind, kind.label())
        }
    }
}

fn keep_rank(card: &Character) -> u8 {
    match card {
        Character::Duke => 0,
        Character::Captain => 1,
        Character::Assassin => 2,
        Character::Contessa => 3,
        Character::Ambassador => 4,
    }
}

/// Keeps the best ranked distinct cards first, then the best of what is left.
fn choose_keep(pool: &[Character], count: usize) -> Vec<Character> {
    let mut remaining = pool.to_vec();
    remaining.sort_by_key(keep_rank);

    let mut keep: Vec<Character> = Vec::with_capacity(count);
    let mut idx = 0;
    while keep.len() < count && idx < remaining.len() {
        if keep.contains(&remaining[idx]) {
            idx += 1;
        } else {
            keep.push(remaining.remove(idx));
        }
    }

    while keep.len() < count && !remaining.is_empty() {
        keep.push(remaining.remove(0));
    }

    keep
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::action::{ActionKind, BlockKind, Claim, Response};
    use crate::ai::{choose_keep, Advice, Decision, Driver, Oracle, RandomOracle, Situation};
    use crate::character::Character;
    use crate::character::Character::{Ambassador, Assassin, Captain, Contessa, Duke};
    use crate::config::Config;
    use crate::coup::{Coup, Phase};
    use crate::error::OracleError;

    /// Replays canned answers and remembers what it was asked.
    #[derive(Default)]
    struct Scripted {
        replies: VecDeque<Result<Advice, OracleError>>,
        seen: Vec<Situation>,
    }

    impl Scripted {
        fn new(replies: Vec<Advice>) -> Self {
            Self { replies: replies.into_iter().map(Ok).collect(), seen: vec![] }
        }
    }

    impl Oracle for Scripted {
        fn advise(&mut self, situation: &Situation) -> Result<Advice, OracleError> {
            self.seen.push(situation.clone());
            self.replies
                .pop_front()
                .unwrap_or_else(|| Err(OracleError::Unavailable("script exhausted".to_string())))
        }
    }

    // Human in seat 0, two bots after, human to act
    fn table(current: usize, hands: &[[Character; 2]], replies: Vec<Advice>) -> (Coup, Driver<Scripted, Pcg64>) {
        let mut rng = Pcg64::seed_from_u64(11);
        let mut coup = Coup::new(&["Human".to_string()], 2, &Config::default(), &mut rng).unwrap();
        coup.rig(current, hands, &mut rng);
        (coup, Driver::new(Scripted::new(replies), rng, Config::default()))
    }

    fn assert_conserved(coup: &Coup) {
        let tally = coup.check_invariants();
        assert_eq!(tally.coins, 50);
        assert_eq!(tally.per_character, [3; 5]);
    }

    #[test_log::test]
    fn first_challenge_stops_the_polling() {
        let (coup, mut driver) = table(0, &[[Duke, Contessa], [Captain, Assassin], [Captain, Ambassador]], vec![
            Advice::new("challenge", None),
        ]);

        let coup = driver.declare_action(&coup, 0, ActionKind::Tax, None);

        // bot 1 loses the challenge, the tax lands, both bots take income, back to the human
        assert_eq!(coup.awaited_player(), Some(0));
        assert_eq!(coup.players()[0].money, 5);
        assert_eq!(coup.players()[1].hidden_count(), 1);
        assert_eq!(coup.players()[1].money, 3);
        assert_eq!(coup.players()[2].money, 3);

        let responses: Vec<&Situation> = driver.oracle().seen.iter().filter(|s| s.decision == Decision::Response).collect();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].player, "Bot 1");
        assert_eq!(responses[0].options, vec!["Allow", "Challenge"]);
        assert_conserved(&coup);
    }

    #[test]
    fn bot_block_waits_on_the_human() {
        let (coup, mut driver) = table(0, &[[Duke, Contessa], [Captain, Assassin], [Captain, Ambassador]], vec![
            Advice::new("Block Foreign Aid", None),
        ]);

        let coup = driver.declare_action(&coup, 0, ActionKind::ForeignAid, None);
        match coup.phase() {
            Phase::AwaitingResponse(pending) => {
                assert!(matches!(pending.claim, Claim::Block { blocker: 1, kind: BlockKind::ForeignAid, .. }));
            }
            phase => panic!("expected the human to answer the block, got {phase:?}"),
        }
        assert_eq!(coup.awaited_player(), Some(0));
        assert_eq!(coup.legal_responses(0), vec![Response::Allow, Response::Challenge]);

        let coup = driver.submit_response(&coup, 0, Response::Allow);
        assert_eq!(coup.awaited_player(), Some(0));
        assert_eq!(coup.players()[0].money, 2);
    }

    #[test]
    fn illegal_choice_falls_back_to_income() {
        // bot 1 can't afford a coup
        let (coup, mut driver) = table(1, &[[Duke, Contessa], [Captain, Assassin], [Captain, Ambassador]], vec![
            Advice::new("Coup", Some("Human")),
        ]);

        let coup = driver.advance(&coup);
        assert_eq!(coup.awaited_player(), Some(0));
        assert_eq!(coup.players()[1].money, 3);
        assert_eq!(coup.players()[0].hidden_count(), 2);
        assert!(coup.log().iter().any(|line| line.starts_with("Bot 1 falls back to Income")));
    }

    #[test]
    fn unknown_target_falls_back_to_income() {
        let (coup, mut driver) = table(1, &[[Duke, Contessa], [Captain, Assassin], [Captain, Ambassador]], vec![
            Advice::new("Steal", Some("Nobody")),
        ]);

        let coup = driver.advance(&coup);
        assert_eq!(coup.players()[1].money, 3);
        assert_eq!(coup.players()[0].money, 2);
    }

    #[test]
    fn valid_advice_is_followed() {
        let (coup, mut driver) = table(1, &[[Duke, Contessa], [Captain, Assassin], [Captain, Ambassador]], vec![
            Advice::new(" steal ", Some("human")),
        ]);

        // bot 2 is polled first and allows, then the human has to answer
        let coup = driver.advance(&coup);
        assert_eq!(coup.awaited_player(), Some(0));
        assert_eq!(
            coup.legal_responses(0),
            vec![Response::Allow, Response::Challenge, Response::Block(BlockKind::Stealing)]
        );

        let coup = driver.submit_response(&coup, 0, Response::Allow);
        assert_eq!(coup.players()[1].money, 4);
        assert_eq!(coup.players()[0].money, 0);
        assert_eq!(coup.awaited_player(), Some(0));
    }

    #[test]
    fn rich_bot_falls_back_to_a_coup() {
        let (mut coup, mut driver) = table(1, &[[Duke, Contessa], [Captain, Assassin], [Captain, Ambassador]], vec![]);
        coup.set_money(1, 10);

        let coup = driver.advance(&coup);

        // first opponent after bot 1 is bot 2, which reveals a card and then takes its turn
        assert_eq!(coup.players()[1].money, 3);
        assert_eq!(coup.players()[2].hidden_count(), 1);
        assert_eq!(coup.players()[0].hidden_count(), 2);
        assert_eq!(coup.awaited_player(), Some(0));
        assert_conserved(&coup);
    }

    #[test]
    fn bot_reveal_follows_valid_advice() {
        let (mut coup, mut driver) = table(0, &[[Duke, Contessa], [Captain, Assassin], [Captain, Ambassador]], vec![
            Advice::new("assassin", None),
        ]);
        coup.set_money(0, 7);

        let coup = driver.declare_action(&coup, 0, ActionKind::Coup, Some(1));
        assert_eq!(coup.players()[1].revealed_cards(), vec![Assassin]);

        let reveal = driver.oracle().seen.iter().find(|s| s.decision == Decision::Reveal).unwrap();
        assert_eq!(reveal.options, vec!["Captain", "Assassin"]);
    }

    #[test]
    fn bot_exchange_keeps_its_hand_size() {
        let (coup, mut driver) = table(1, &[[Duke, Contessa], [Ambassador, Assassin], [Captain, Ambassador]], vec![
            Advice::new("Exchange", None),
        ]);

        // bot 2 allows on its own, the human still has a say
        let coup = driver.advance(&coup);
        assert_eq!(coup.legal_responses(0), vec![Response::Allow, Response::Challenge]);

        let coup = driver.submit_response(&coup, 0, Response::Allow);
        assert_eq!(coup.awaited_player(), Some(0));
        assert_eq!(coup.players()[1].hidden_count(), 2);
        assert_eq!(coup.deck().len(), 9);
        assert_conserved(&coup);
    }

    #[test]
    fn situation_describes_the_table() {
        let (coup, mut driver) = table(0, &[[Duke, Contessa], [Captain, Assassin], [Captain, Ambassador]], vec![]);
        let _ = driver.declare_action(&coup, 0, ActionKind::Tax, None);

        let first = &driver.oracle().seen[0];
        assert_eq!(first.player, "Bot 1");
        assert_eq!(first.hand, vec![Captain, Assassin]);
        assert_eq!(first.opponents.len(), 2);
        assert_eq!(first.opponents[0].name, "Human");
        assert_eq!(first.claim.as_deref(), Some("Human declared Tax"));
        assert!(first.summary.ends_with("Human claims Duke to Tax"));

        let json = serde_json::to_value(first).unwrap();
        assert_eq!(json["decision"], "response");
        assert_eq!(json["opponents"][0]["influence"], 2);
    }

    #[test]
    fn advice_from_json() {
        let advice = Advice::from_json(r#"{"choice": "Steal", "target": "Bot 2", "rationale": "they are rich"}"#).unwrap();
        assert_eq!(advice.choice, "Steal");
        assert_eq!(advice.target.as_deref(), Some("Bot 2"));

        let advice = Advice::from_json(r#"{"choice": "Allow"}"#).unwrap();
        assert_eq!(advice.target, None);
        assert!(advice.rationale.is_empty());

        assert!(matches!(Advice::from_json("I think you should coup"), Err(OracleError::Malformed(_))));
    }

    #[test]
    fn closures_are_oracles() {
        let mut calls = 0;
        let oracle = |_: &Situation| -> Result<Advice, OracleError> {
            calls += 1;
            Err(OracleError::Unavailable("offline".to_string()))
        };

        let mut rng = Pcg64::seed_from_u64(5);
        let mut coup = Coup::new(&["Human".to_string()], 1, &Config::default(), &mut rng).unwrap();
        coup.rig(1, &[[Duke, Contessa], [Captain, Assassin]], &mut rng);

        let mut driver = Driver::new(oracle, rng, Config::default());
        let coup = driver.advance(&coup);
        drop(driver);

        // the bot asked once, got nothing, took income and handed the turn over
        assert_eq!(calls, 1);
        assert_eq!(coup.awaited_player(), Some(0));
        assert_eq!(coup.players()[1].money, 3);
        assert!(coup.log().iter().any(|line| line.starts_with("Bot 1 falls back to Income")));
    }

    #[test]
    fn keep_prefers_distinct_cards() {
        assert_eq!(choose_keep(&[Duke, Duke, Captain, Ambassador], 2), vec![Duke, Captain]);
        assert_eq!(choose_keep(&[Ambassador, Contessa, Ambassador], 1), vec![Contessa]);
        assert_eq!(choose_keep(&[Duke, Duke], 2), vec![Duke, Duke]);
    }

    #[test]
    fn random_bots_finish_a_game() {
        let mut driver = Driver::new(RandomOracle::new(Pcg64::seed_from_u64(99)), Pcg64::seed_from_u64(100), Config::default());
        let coup = driver.initialize(&[], 4).unwrap();

        let winner = coup.winner().expect("an all automated game plays to the end");
        assert!(!coup.players()[winner].is_eliminated());
        assert_eq!(coup.alive_players().count(), 1);
        assert_conserved(&coup);
    }
}
