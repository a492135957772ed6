use std::fmt::{Debug, Formatter};
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::action::{Action, ActionKind, Claim, Response, FORCED_COUP_THRESHOLD};
use crate::character::{Character, CHARACTER_VARIANTS};
use crate::config::{Config, MIN_SEATS};
use crate::deck::Deck;
use crate::error::CoupError;
use crate::game_log::GameLog;
use crate::player::{Player, PlayerId};

/// A claim waiting on its eligible responders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResponse {
    pub claim: Claim,
    pub eligible: Vec<PlayerId>,
    pub responses: Vec<(PlayerId, Response)>,
}

impl PendingResponse {
    pub fn has_responded(&self, player_idx: PlayerId) -> bool {
        self.responses.iter().any(|(responder, _)| *responder == player_idx)
    }

    /// Eligible players who haven't answered yet, in seating order.
    pub fn awaiting(&self) -> impl Iterator<Item=PlayerId> + '_ {
        self.eligible.iter().copied().filter(|&idx| !self.has_responded(idx))
    }
}

/// An ambassador mid-exchange. The drawn cards are in transit: neither in the deck nor in a slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingExchange {
    pub player: PlayerId,
    pub drawn: Vec<Character>,
}

/// Someone must turn a card face up before play continues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReveal {
    pub player: PlayerId,
    // action whose effect lands once the reveal is done, otherwise the turn ends
    pub resume: Option<Action>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingAction,
    AwaitingResponse(PendingResponse),
    AwaitingExchange(PendingExchange),
    AwaitingReveal(PendingReveal),
}

/// Conservation totals across every location a coin or card can be.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tally {
    pub coins: u32,
    pub cards: usize,
    pub per_character: [usize; 5],
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coup {
    turn: usize,
    current_player_idx: usize,
    deck: Deck,
    players: Vec<Player>,
    treasury: u8,
    phase: Phase,
    log: GameLog,
    winner: Option<PlayerId>,
}

impl Debug for Coup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("T {} | P {} | ${} | {:?}\n", self.turn, self.current_player_idx, self.treasury, self.phase).as_str())?;
        for player in self.players.iter() {
            f.write_str(format!("\tP {}: ${} | {:?}, {:?}\n", player.id, player.money, player.influence[0], player.influence[1]).as_str())?;
        }
        Ok(())
    }
}

impl Coup {
    /// Deals two cards and the starting coins to every seat, then picks a random first player.
    /// Humans sit first, in the order given, followed by the automated seats.
    pub fn new<R: Rng + ?Sized>(humans: &[String], ai_count: usize, config: &Config, rng: &mut R) -> Result<Coup, CoupError> {
        config.validate_seats(humans.len(), ai_count)?;

        let seats = humans.len() + ai_count;
        let mut deck = Deck::full(rng);
        let coins_dealt = seats * config.starting_coins as usize;
        let invalid = || CoupError::InvalidSeatCount {
            humans: humans.len(),
            ai: ai_count,
            min: config.min_players.max(MIN_SEATS),
            max: config.max_players,
            max_ai: config.max_ai_players,
        };
        if seats * 2 > deck.len() || coins_dealt > config.total_coins as usize {
            return Err(invalid());
        }

        let names = humans.iter()
            .cloned()
            .chain((1..=ai_count).map(|n| format!("Bot {n}")));

        let mut players: Vec<Player> = Vec::with_capacity(seats);
        for (id, name) in names.enumerate() {
            let (Some(first), Some(second)) = (deck.draw(), deck.draw()) else {
                return Err(invalid());
            };
            let name = unique_name(&players, name);
            players.push(Player::new(id, name, id >= humans.len(), config.starting_coins, [first, second]));
        }

        let mut game = Self {
            turn: 1,
            current_player_idx: rng.gen_range(0..seats),
            deck,
            players,
            treasury: config.total_coins - coins_dealt as u8,
            phase: Phase::AwaitingAction,
            log: GameLog::new(config.log_capacity),
            winner: None,
        };

        game.log.push(format!("A new game begins with {seats} players"));
        game.announce_turn();

        Ok(game)
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_idx: PlayerId) -> Result<&Player, CoupError> {
        self.players.get(player_idx).ok_or(CoupError::UnknownPlayer(player_idx))
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_idx]
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn treasury(&self) -> u8 {
        self.treasury
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn alive_players(&self) -> impl Iterator<Item=&Player> + '_ {
        self.players.iter().filter(|player| !player.is_eliminated())
    }

    /// The player whose input the game is waiting on, if any.
    pub fn awaited_player(&self) -> Option<PlayerId> {
        if self.winner.is_some() {
            return None;
        }

        match &self.phase {
            Phase::AwaitingAction => Some(self.current_player_idx),
            Phase::AwaitingResponse(pending) => pending.awaiting().next(),
            Phase::AwaitingExchange(pending) => Some(pending.player),
            Phase::AwaitingReveal(pending) => Some(pending.player),
        }
    }

    pub fn check_invariants(&self) -> Tally {
        let mut per_character = [0usize; 5];
        let mut count = |card: &Character| {
            if let Some(idx) = CHARACTER_VARIANTS.iter().position(|c| c == card) {
                per_character[idx] += 1;
            }
        };

        self.deck.cards().iter().for_each(&mut count);
        self.players.iter().flat_map(|p| p.influence.iter()).for_each(|slot| count(&slot.card));
        if let Phase::AwaitingExchange(pending) = &self.phase {
            pending.drawn.iter().for_each(&mut count);
        }

        Tally {
            coins: self.treasury as u32 + self.players.iter().map(|p| p.money as u32).sum::<u32>(),
            cards: per_character.iter().sum(),
            per_character,
        }
    }

    pub fn other_player_indexes(&self, exclude_idx: usize) -> Vec<usize> {
        (1..self.players.len())
            .map(|n| (exclude_idx + n) % self.players.len())
            .filter(|&player_idx| !self.players[player_idx].is_eliminated())
            .collect()
    }

    /// Every action `player_idx` could declare right now, with its target.
    pub fn legal_actions(&self, player_idx: PlayerId) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.players.len() * 3 + 4);

        let Some(player) = self.players.get(player_idx) else {
            return actions;
        };
        if self.winner.is_some()
            || self.phase != Phase::AwaitingAction
            || self.current_player_idx != player_idx
            || player.is_eliminated() {
            return actions;
        }

        let opponents = self.other_player_indexes(player_idx);
        let action = |kind: ActionKind, target: Option<PlayerId>| Action { actor: player_idx, kind, target };

        if player.money >= FORCED_COUP_THRESHOLD {
            // forced coup at $10+
            for &opponent_idx in &opponents {
                actions.push(action(ActionKind::Coup, Some(opponent_idx)));
            }
            return actions;
        }

        actions.push(action(ActionKind::Income, None));
        actions.push(action(ActionKind::ForeignAid, None));
        actions.push(action(ActionKind::Tax, None));
        actions.push(action(ActionKind::Exchange, None));

        for &opponent_idx in &opponents {
            actions.push(action(ActionKind::Steal, Some(opponent_idx)));
            if player.money >= ActionKind::Assassinate.cost() {
                actions.push(action(ActionKind::Assassinate, Some(opponent_idx)));
            }
            if player.money >= ActionKind::Coup.cost() {
                actions.push(action(ActionKind::Coup, Some(opponent_idx)));
            }
        }

        actions
    }

    /// Responses `player_idx` may give to the pending claim, empty if they aren't being asked.
    pub fn legal_responses(&self, player_idx: PlayerId) -> Vec<Response> {
        match &self.phase {
            Phase::AwaitingResponse(pending) if self.winner.is_none() && pending.awaiting().any(|idx| idx == player_idx) => {
                response_options(&pending.claim, player_idx)
            }
            _ => vec![],
        }
    }

    /// Appends a line to the game log without touching anything else.
    pub fn note(&mut self, line: impl Into<String>) {
        self.log.push(line);
    }

    /// The snapshot unchanged apart from a line recording why the call was refused.
    pub fn rejected(&self, error: &CoupError) -> Coup {
        warn!("rejected: {error}");
        let mut game = self.clone();
        game.log.push(format!("Rejected: {error}"));
        game
    }

    pub fn declare_action(&self, player_idx: PlayerId, kind: ActionKind, target: Option<PlayerId>) -> Coup {
        self.try_declare_action(player_idx, kind, target)
            .unwrap_or_else(|err| self.rejected(&err))
    }

    pub fn submit_response<R: Rng + ?Sized>(&self, responder_idx: PlayerId, response: Response, rng: &mut R) -> Coup {
        self.try_submit_response(responder_idx, response, rng)
            .unwrap_or_else(|err| self.rejected(&err))
    }

    pub fn submit_exchange_selection<R: Rng + ?Sized>(&self, player_idx: PlayerId, keep: &[Character], rng: &mut R) -> Coup {
        self.try_submit_exchange_selection(player_idx, keep, rng)
            .unwrap_or_else(|err| self.rejected(&err))
    }

    pub fn submit_forced_reveal(&self, player_idx: PlayerId, card: Option<Character>) -> Coup {
        self.try_submit_forced_reveal(player_idx, card)
            .unwrap_or_else(|err| self.rejected(&err))
    }

    pub fn try_declare_action(&self, player_idx: PlayerId, kind: ActionKind, target: Option<PlayerId>) -> Result<Coup, CoupError> {
        self.ensure_running()?;
        let player = self.player(player_idx)?;

        if self.current_player_idx != player_idx {
            return Err(CoupError::NotYourTurn(player_idx));
        }
        if self.phase != Phase::AwaitingAction {
            return Err(CoupError::WrongPhase("declaring an action"));
        }
        if player.is_eliminated() {
            return Err(CoupError::Eliminated(player_idx));
        }
        if player.money < kind.cost() {
            return Err(CoupError::InsufficientFunds { player: player_idx, action: kind, money: player.money });
        }
        if player.money >= FORCED_COUP_THRESHOLD && kind != ActionKind::Coup {
            return Err(CoupError::MustCoup { player: player_idx, money: player.money });
        }

        match (kind.needs_target(), target) {
            (true, None) => return Err(CoupError::MissingTarget(kind)),
            (false, Some(_)) => return Err(CoupError::UnexpectedTarget(kind)),
            (true, Some(target_idx)) => {
                let target_player = self.player(target_idx)?;
                if target_idx == player_idx {
                    return Err(CoupError::SelfTarget(player_idx));
                }
                if target_player.is_eliminated() {
                    return Err(CoupError::Eliminated(target_idx));
                }
            }
            (false, None) => {}
        }

        let mut game = self.clone();
        let action = Action { actor: player_idx, kind, target };

        // costs are paid up front and never refunded
        game.pay_to_treasury(player_idx, kind.cost());
        let line = game.describe(&action);
        game.log.push(line);

        if kind.resolves_immediately() {
            game.apply_effect(action);
        } else {
            game.open_response(Claim::Action(action));
        }

        Ok(game)
    }

    pub fn try_submit_response<R: Rng + ?Sized>(&self, responder_idx: PlayerId, response: Response, rng: &mut R) -> Result<Coup, CoupError> {
        self.ensure_running()?;
        self.player(responder_idx)?;

        let Phase::AwaitingResponse(pending) = &self.phase else {
            return Err(CoupError::WrongPhase("responding"));
        };
        if !pending.eligible.contains(&responder_idx) {
            return Err(CoupError::NotEligible(responder_idx));
        }
        if pending.has_responded(responder_idx) {
            return Err(CoupError::AlreadyResponded(responder_idx));
        }
        if !response_options(&pending.claim, responder_idx).contains(&response) {
            return Err(CoupError::IllegalResponse(response));
        }

        let mut game = self.clone();
        let mut pending = pending.clone();
        game.phase = Phase::AwaitingAction;

        let responder = game.players[responder_idx].name.clone();
        let claimant = game.players[pending.claim.claimant()].name.clone();

        match response {
            Response::Challenge => {
                game.log.push(format!("{responder} challenges {claimant}"));
                game.resolve_challenge(pending.claim, responder_idx, rng);
            }
            Response::Block(kind) => {
                let cards = kind.proven_by().iter().map(Character::name).collect::<Vec<&str>>().join(" or ");
                game.log.push(format!("{responder} claims {cards} to block {claimant}'s {}", kind.counters()));
                game.open_response(Claim::Block { blocker: responder_idx, kind, action: pending.claim.action() });
            }
            Response::Allow => {
                match pending.claim {
                    Claim::Action(_) => game.log.push(format!("{responder} allows it")),
                    Claim::Block { .. } => game.log.push(format!("{responder} accepts the block")),
                }
                pending.responses.push((responder_idx, response));

                if pending.awaiting().next().is_none() {
                    game.settle_unopposed(pending.claim);
                } else {
                    game.phase = Phase::AwaitingResponse(pending);
                }
            }
        }

        Ok(game)
    }

    pub fn try_submit_exchange_selection<R: Rng + ?Sized>(&self, player_idx: PlayerId, keep: &[Character], rng: &mut R) -> Result<Coup, CoupError> {
        self.ensure_running()?;
        let player = self.player(player_idx)?;

        let Phase::AwaitingExchange(pending) = &self.phase else {
            return Err(CoupError::WrongPhase("exchanging"));
        };
        if pending.player != player_idx {
            return Err(CoupError::NotYourTurn(player_idx));
        }

        let hidden_slots: Vec<usize> = player.hidden_slots().collect();
        if keep.len() != hidden_slots.len() {
            return Err(CoupError::WrongSelectionSize { expected: hidden_slots.len(), got: keep.len() });
        }

        // whatever is left of the pool after taking the kept cards goes back to the court
        let mut pool: Vec<Character> = player.hidden_cards();
        pool.extend(pending.drawn.iter().copied());
        for card in keep {
            match pool.iter().position(|c| c == card) {
                Some(idx) => {
                    pool.swap_remove(idx);
                }
                None => return Err(CoupError::SelectionNotInPool),
            }
        }

        let mut game = self.clone();
        game.phase = Phase::AwaitingAction;

        for (&slot_idx, &card) in hidden_slots.iter().zip(keep) {
            game.players[player_idx].influence[slot_idx].card = card;
        }
        for card in pool {
            game.deck.return_and_shuffle(card, rng);
        }

        game.log.push(format!("{} returns {} cards to the court", game.players[player_idx].name, pending.drawn.len()));
        game.end_turn();

        Ok(game)
    }

    pub fn try_submit_forced_reveal(&self, player_idx: PlayerId, card: Option<Character>) -> Result<Coup, CoupError> {
        self.ensure_running()?;
        self.player(player_idx)?;

        let Phase::AwaitingReveal(pending) = &self.phase else {
            return Err(CoupError::WrongPhase("revealing influence"));
        };
        if pending.player != player_idx {
            return Err(CoupError::NotEligible(player_idx));
        }

        let resume = pending.resume;
        let mut game = self.clone();
        game.phase = Phase::AwaitingAction;
        game.lose_influence(player_idx, card);

        if game.check_winner() {
            return Ok(game);
        }

        match resume {
            Some(action) => game.apply_effect(action),
            None => game.end_turn(),
        }

        Ok(game)
    }

    fn ensure_running(&self) -> Result<(), CoupError> {
        match self.winner {
            Some(_) => Err(CoupError::GameOver),
            None => Ok(()),
        }
    }

    fn describe(&self, action: &Action) -> String {
        let actor = &self.players[action.actor].name;
        let target = action.target.map(|idx| self.players[idx].name.as_str());

        match (action.kind.claim(), target) {
            (Some(character), Some(target)) => format!("{actor} claims {character} to {} {target}", action.kind),
            (Some(character), None) => format!("{actor} claims {character} to {}", action.kind),
            (None, Some(target)) => format!("{actor} launches a {} against {target}", action.kind),
            (None, None) => format!("{actor} takes {}", action.kind),
        }
    }

    fn pay_to_treasury(&mut self, player_idx: PlayerId, amount: u8) {
        let paid = amount.min(self.players[player_idx].money);
        self.players[player_idx].money -= paid;
        self.treasury += paid;
    }

    // the treasury pays what it has left
    fn pay_from_treasury(&mut self, player_idx: PlayerId, amount: u8) -> u8 {
        let paid = amount.min(self.treasury);
        self.treasury -= paid;
        self.players[player_idx].money += paid;
        paid
    }

    fn open_response(&mut self, claim: Claim) {
        let eligible = match claim {
            Claim::Action(action) => self.other_player_indexes(action.actor),
            // only the original claimant may dispute a block
            Claim::Block { action, .. } => {
                if self.players[action.actor].is_eliminated() {
                    vec![]
                } else {
                    vec![action.actor]
                }
            }
        };

        if eligible.is_empty() {
            self.settle_unopposed(claim);
        } else {
            self.phase = Phase::AwaitingResponse(PendingResponse { claim, eligible, responses: vec![] });
        }
    }

    fn settle_unopposed(&mut self, claim: Claim) {
        match claim {
            Claim::Action(action) => self.apply_effect(action),
            Claim::Block { blocker, action, .. } => {
                self.log.push(format!("{} stops {}'s {}", self.players[blocker].name, self.players[action.actor].name, action.kind));
                self.end_turn();
            }
        }
    }

    /// A failed challenge costs the challenger an influence and lets the claim stand; a
    /// successful one costs the claimant an influence and cancels the claim. For a block, the
    /// claim standing means the original action is cancelled.
    fn resolve_challenge<R: Rng + ?Sized>(&mut self, claim: Claim, challenger_idx: PlayerId, rng: &mut R) {
        let claimant_idx = claim.claimant();

        match self.players[claimant_idx].find_hidden(claim.proven_by()) {
            Some(slot_idx) => {
                let card = self.players[claimant_idx].influence[slot_idx].card;
                self.log.push(format!("{} shows {card}, the challenge fails", self.players[claimant_idx].name));
                self.replace_influence(claimant_idx, slot_idx, rng);

                let resume = match claim {
                    Claim::Action(action) => Some(action),
                    Claim::Block { .. } => None,
                };
                self.force_reveal(challenger_idx, resume);
            }
            None => {
                self.log.push(format!("{} was bluffing, the challenge succeeds", self.players[claimant_idx].name));

                let resume = match claim {
                    Claim::Action(_) => None,
                    Claim::Block { action, .. } => Some(action),
                };
                self.force_reveal(claimant_idx, resume);
            }
        }
    }

    // a proven card goes back to the court and a fresh one is drawn in its place
    fn replace_influence<R: Rng + ?Sized>(&mut self, player_idx: PlayerId, slot_idx: usize, rng: &mut R) {
        if self.deck.is_empty() {
            warn!("deck is empty, {} keeps their proven card", self.players[player_idx].name);
            self.log.push(format!("The court is empty, {} keeps the card", self.players[player_idx].name));
            return;
        }

        let card = self.players[player_idx].influence[slot_idx].card;
        self.deck.return_and_shuffle(card, rng);
        if let Some(fresh) = self.deck.draw() {
            self.players[player_idx].influence[slot_idx].card = fresh;
        }
        self.log.push(format!("{} shuffles their {card} back and draws a replacement", self.players[player_idx].name));
    }

    fn force_reveal(&mut self, player_idx: PlayerId, resume: Option<Action>) {
        if self.players[player_idx].is_eliminated() {
            // nothing left to lose
            match resume {
                Some(action) => self.apply_effect(action),
                None => self.end_turn(),
            }
            return;
        }

        self.log.push(format!("{} must reveal an influence", self.players[player_idx].name));
        self.phase = Phase::AwaitingReveal(PendingReveal { player: player_idx, resume });
    }

    fn lose_influence(&mut self, player_idx: PlayerId, card: Option<Character>) {
        if let Some(revealed) = self.players[player_idx].reveal(card) {
            let name = &self.players[player_idx].name;
            self.log.push(format!("{name} reveals {revealed}"));

            if self.players[player_idx].is_eliminated() {
                info!("{name} is eliminated");
                self.log.push(format!("{name} is eliminated"));
            }
        }
    }

    fn apply_effect(&mut self, action: Action) {
        let actor_idx = action.actor;

        match action.kind {
            ActionKind::Income | ActionKind::ForeignAid | ActionKind::Tax => {
                let paid = self.pay_from_treasury(actor_idx, action.kind.payout());
                self.log.push(format!("{} collects {paid} coins", self.players[actor_idx].name));
                self.end_turn();
            }
            ActionKind::Steal => {
                let Some(target_idx) = action.target else {
                    return self.end_turn();
                };
                let taken = self.players[target_idx].money.min(2);
                self.players[target_idx].money -= taken;
                self.players[actor_idx].money += taken;
                self.log.push(format!("{} takes {taken} coins from {}", self.players[actor_idx].name, self.players[target_idx].name));
                self.end_turn();
            }
            ActionKind::Coup | ActionKind::Assassinate => {
                // the target could already be out from losing a challenge
                match action.target {
                    Some(target_idx) if !self.players[target_idx].is_eliminated() => {
                        self.force_reveal(target_idx, None);
                    }
                    _ => self.end_turn(),
                }
            }
            ActionKind::Exchange => {
                let drawn: Vec<Character> = (0..2).filter_map(|_| self.deck.draw()).collect();
                if drawn.is_empty() {
                    self.log.push(format!("The court is empty, {} has nothing to exchange", self.players[actor_idx].name));
                    return self.end_turn();
                }

                self.log.push(format!("{} draws {} cards from the court", self.players[actor_idx].name, drawn.len()));
                self.phase = Phase::AwaitingExchange(PendingExchange { player: actor_idx, drawn });
            }
        }
    }

    /// Records the winner when exactly one player has influence left.
    fn check_winner(&mut self) -> bool {
        let survivors: Vec<(PlayerId, String)> = self.alive_players()
            .take(2)
            .map(|player| (player.id, player.name.clone()))
            .collect();

        match survivors.as_slice() {
            [(id, name)] => {
                info!("{name} wins");
                self.log.push(format!("{name} wins the game"));
                self.winner = Some(*id);
                self.phase = Phase::AwaitingAction;
                true
            }
            _ => false,
        }
    }

    fn end_turn(&mut self) {
        self.phase = Phase::AwaitingAction;

        if self.check_winner() {
            return;
        }

        // player's turn is over
        self.turn += 1;

        // go to next player
        self.current_player_idx = self.next_living_player();
        self.announce_turn();
    }

    fn announce_turn(&mut self) {
        let player = &self.players[self.current_player_idx];
        let line = format!("Turn {}: {} to act with {} coins", self.turn, player.name, player.money);
        info!("{line}");
        self.log.push(line);
    }

    fn next_living_player(&self) -> usize {
        let mut idx = self.current_player_idx;

        idx = (idx + 1) % self.players.len();
        while self.players[idx].is_eliminated() && idx != self.current_player_idx {
            idx = (idx + 1) % self.players.len();
        }

        idx
    }

    #[cfg(test)]
    pub(crate) fn rig<R: Rng + ?Sized>(&mut self, current_player_idx: usize, hands: &[[Character; 2]], rng: &mut R) {
        use crate::character::COPIES_PER_CHARACTER;

        let mut cards: Vec<Character> = CHARACTER_VARIANTS.iter()
            .flat_map(|&card| std::iter::repeat(card).take(COPIES_PER_CHARACTER))
            .collect();

        for (player, hand) in self.players.iter_mut().zip(hands) {
            for card in hand {
                let idx = cards.iter().position(|c| c == card).expect("at most three of a character");
                cards.remove(idx);
            }
            *player = Player::new(player.id, player.name.clone(), player.automated, player.money, *hand);
        }

        self.deck = Deck::from_cards(cards);
        self.deck.shuffle(rng);
        self.current_player_idx = current_player_idx;
        self.phase = Phase::AwaitingAction;
    }

    #[cfg(test)]
    pub(crate) fn set_money(&mut self, player_idx: PlayerId, money: u8) {
        let current = self.players[player_idx].money;
        self.treasury = self.treasury + current - money;
        self.players[player_idx].money = money;
    }

    #[cfg(test)]
    pub(crate) fn set_deck(&mut self, deck: Deck) {
        self.deck = deck;
    }

    #[cfg(test)]
    pub(crate) fn players_mut(&mut self) -> &mut Vec<Player> {
        &mut self.players
    }
}

fn response_options(claim: &Claim, responder_idx: PlayerId) -> Vec<Response> {
    let mut options = vec![Response::Allow];

    if claim.is_challengeable() {
        options.push(Response::Challenge);
    }

    // blocks can't themselves be blocked
    if let Claim::Action(action) = claim {
        if let Some(block) = action.kind.blocked_by() {
            if !block.target_only() || action.target == Some(responder_idx) {
                options.push(Response::Block(block));
            }
        }
    }

    options
}

fn unique_name(players: &[Player], name: String) -> String {
    if !players.iter().any(|p| p.name == name) {
        return name;
    }

    (2..)
        .map(|n| format!("{name} ({n})"))
        .find(|candidate| !players.iter().any(|p| &p.name == candidate))
        .unwrap_or(name)
}
