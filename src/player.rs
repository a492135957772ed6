use serde::{Deserialize, Serialize};
use crate::character::Character;

pub type PlayerId = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Influence {
    pub card: Character,
    pub revealed: bool,
}

impl Influence {
    pub fn hidden(card: Character) -> Self {
        Self { card, revealed: false }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub automated: bool,
    pub money: u8,
    // slots never change count, only the revealed flag flips or the card is swapped
    pub influence: [Influence; 2],
}

impl Player {
    pub fn new(id: PlayerId, name: String, automated: bool, money: u8, cards: [Character; 2]) -> Self {
        Self {
            id,
            name,
            automated,
            money,
            influence: [Influence::hidden(cards[0]), Influence::hidden(cards[1])],
        }
    }

    pub fn is_eliminated(&self) -> bool {
        self.influence.iter().all(|slot| slot.revealed)
    }

    /// Slot indexes of the cards still face down.
    pub fn hidden_slots(&self) -> impl Iterator<Item=usize> + '_ {
        self.influence
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| if slot.revealed { None } else { Some(idx) })
    }

    pub fn hidden_cards(&self) -> Vec<Character> {
        self.hidden_slots().map(|idx| self.influence[idx].card).collect()
    }

    pub fn revealed_cards(&self) -> Vec<Character> {
        self.influence.iter().filter(|slot| slot.revealed).map(|slot| slot.card).collect()
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden_slots().count()
    }

    /// First face-down slot holding any of `characters`.
    pub fn find_hidden(&self, characters: &[Character]) -> Option<usize> {
        self.influence
            .iter()
            .position(|slot| !slot.revealed && characters.contains(&slot.card))
    }

    /// Flips one slot face up: the slot holding `preferred` if it is still hidden, otherwise the
    /// first hidden slot. Returns the revealed card, or None when nothing was left to reveal.
    pub fn reveal(&mut self, preferred: Option<Character>) -> Option<Character> {
        let slot_idx = preferred
            .and_then(|card| self.find_hidden(&[card]))
            .or_else(|| self.hidden_slots().next())?;

        self.influence[slot_idx].revealed = true;
        Some(self.influence[slot_idx].card)
    }
}

#[cfg(test)]
mod tests {
    use crate::character::Character::{Assassin, Contessa, Duke};
    use crate::player::Player;

    fn player() -> Player {
        Player::new(0, "P0".to_string(), false, 2, [Duke, Contessa])
    }

    #[test]
    fn reveal_prefers_requested_card() {
        let mut p = player();
        assert_eq!(p.reveal(Some(Contessa)), Some(Contessa));
        assert!(p.influence[1].revealed);
        assert!(!p.influence[0].revealed);
    }

    #[test]
    fn reveal_falls_back_to_any_hidden_card() {
        let mut p = player();
        assert_eq!(p.reveal(Some(Assassin)), Some(Duke));
        assert_eq!(p.reveal(Some(Duke)), Some(Contessa));
        assert!(p.is_eliminated());
        assert_eq!(p.reveal(None), None);
    }

    #[test]
    fn hidden_and_revealed_cards() {
        let mut p = player();
        p.influence[0].revealed = true;
        assert_eq!(p.hidden_cards(), vec![Contessa]);
        assert_eq!(p.revealed_cards(), vec![Duke]);
        assert_eq!(p.hidden_count(), 1);
        assert_eq!(p.find_hidden(&[Duke]), None);
        assert_eq!(p.find_hidden(&[Duke, Contessa]), Some(1));
    }
}
