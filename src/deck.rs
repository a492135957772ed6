use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use crate::character::{Character, CHARACTER_VARIANTS, COPIES_PER_CHARACTER};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Character>,
}

impl Deck {
    /// The full 15 card court, shuffled.
    pub fn full<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let cards = CHARACTER_VARIANTS.iter()
            .flat_map(|&card| std::iter::repeat(card).take(COPIES_PER_CHARACTER))
            .collect();

        let mut deck = Self { cards };
        deck.shuffle(rng);
        deck
    }

    pub fn from_cards(cards: Vec<Character>) -> Self {
        Self { cards }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Takes the top card. An empty deck yields None and callers treat the draw as a no-op.
    pub fn draw(&mut self) -> Option<Character> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    /// Puts a card back and reshuffles everything, so its position can't be inferred.
    pub fn return_and_shuffle<R: Rng + ?Sized>(&mut self, card: Character, rng: &mut R) {
        self.cards.push(card);
        self.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Character] {
        &self.cards
    }
}
