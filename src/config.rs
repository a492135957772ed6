use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::CoupError;

/// Fewest seats a game can be dealt with, whatever the config asks for.
pub const MIN_SEATS: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub min_players: usize,
    // 15 cards, two dealt per seat, and an exchange still needs two left to draw
    pub max_players: usize,
    pub max_ai_players: usize,
    pub starting_coins: u8,
    pub total_coins: u8,
    pub log_capacity: usize,
    /// Log lines handed to the oracle as context.
    pub summary_lines: usize,
    /// Upper bound on automated decisions taken in one driver call.
    pub max_automated_steps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 6,
            max_ai_players: 5,
            starting_coins: 2,
            total_coins: 50,
            log_capacity: 50,
            summary_lines: 10,
            max_automated_steps: 10_000,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if config.min_players < MIN_SEATS {
            return Err(serde::de::Error::custom(format!("min_players must be at least {MIN_SEATS}, got {}", config.min_players)));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(std::io::Error::from)
    }

    pub fn validate_seats(&self, humans: usize, ai: usize) -> Result<(), CoupError> {
        let seats = humans + ai;
        let min = self.min_players.max(MIN_SEATS);
        if seats < min || seats > self.max_players || ai > self.max_ai_players {
            return Err(CoupError::InvalidSeatCount {
                humans,
                ai,
                min,
                max: self.max_players,
                max_ai: self.max_ai_players,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::config::Config;
    use crate::coup::Coup;
    use crate::error::CoupError;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "log_capacity": 8 }"#).unwrap();
        assert_eq!(config.log_capacity, 8);
        assert_eq!(config.max_players, 6);
        assert_eq!(config.total_coins, 50);
    }

    #[test]
    fn seat_bounds() {
        let config = Config::default();
        assert!(config.validate_seats(1, 1).is_ok());
        assert!(config.validate_seats(0, 5).is_ok());
        assert!(config.validate_seats(2, 0).is_ok());
        assert!(config.validate_seats(1, 0).is_err());
        assert!(config.validate_seats(2, 5).is_err());
        assert!(config.validate_seats(0, 6).is_err());
    }

    #[test]
    fn fewer_than_two_seats_never_validate() {
        let err = Config::from_json(r#"{ "min_players": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("min_players"));
        assert!(Config::from_json(r#"{ "min_players": 1 }"#).is_err());

        // built by hand, skipping from_json
        let config = Config { min_players: 0, ..Config::default() };
        assert_eq!(
            config.validate_seats(0, 0),
            Err(CoupError::InvalidSeatCount { humans: 0, ai: 0, min: 2, max: 6, max_ai: 5 })
        );
        assert!(config.validate_seats(1, 0).is_err());
        assert!(config.validate_seats(0, 1).is_err());
        assert!(config.validate_seats(1, 1).is_ok());

        let mut rng = Pcg64::seed_from_u64(1);
        assert!(Coup::new(&[], 0, &config, &mut rng).is_err());
        assert!(Coup::new(&["Solo".to_string()], 0, &config, &mut rng).is_err());
    }
}
