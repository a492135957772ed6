use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Character {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
}

pub static CHARACTER_VARIANTS: [Character; 5] = [
    Character::Duke,
    Character::Assassin,
    Character::Captain,
    Character::Ambassador,
    Character::Contessa,
];

pub const COPIES_PER_CHARACTER: usize = 3;

impl Character {
    pub fn name(&self) -> &'static str {
        match self {
            Character::Duke => "Duke",
            Character::Assassin => "Assassin",
            Character::Captain => "Captain",
            Character::Ambassador => "Ambassador",
            Character::Contessa => "Contessa",
        }
    }

    /// Case-insensitive lookup by name, used when reading oracle output.
    pub fn parse(name: &str) -> Option<Character> {
        CHARACTER_VARIANTS
            .iter()
            .copied()
            .find(|character| character.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl Display for Character {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
