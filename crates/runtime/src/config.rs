//! Runtime configuration.
use std::env;
use std::time::Duration;

use battle_core::BattleConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    pub event_buffer_size: usize,
    /// Pause between an AI plan and its commit.
    pub intent_delay: Duration,
    /// Rounds played before the battle is called off.
    pub max_rounds: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            event_buffer_size: 100,
            intent_delay: Duration::ZERO,
            max_rounds: 50,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_EVENT_BUFFER` - Event broadcast capacity (default: 100)
    /// - `BATTLE_INTENT_DELAY_MS` - AI intent pause in milliseconds (default: 0)
    /// - `BATTLE_MAX_ROUNDS` - Round limit (default: 50)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("BATTLE_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(millis) = read_env::<u64>("BATTLE_INTENT_DELAY_MS") {
            config.intent_delay = Duration::from_millis(millis);
        }
        if let Some(rounds) = read_env::<u32>("BATTLE_MAX_ROUNDS") {
            config.max_rounds = rounds.max(1);
        }

        config
    }

    pub fn with_battle(mut self, battle: BattleConfig) -> Self {
        self.battle = battle;
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds.max(1);
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
