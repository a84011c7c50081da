//! Caller-side container for one three-round game.
//!
//! The session chains validator and composer, carries insurance between
//! rounds and keeps the history the mission evaluator and achievement engine
//! read. It never persists anything itself; [`HistoryStore`] is the seam for
//! whoever does.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::achievements::GameSummary;
use crate::config::{ScoringConfig, default_config};
use crate::mission::{GameProgress, MissionId, MissionProgress, RoundRecord, evaluate};
use crate::rng::RandomSource;
use crate::route::RouteKind;
use crate::score::{ScoreInput, ScoreOutput, compose_with_config};
use crate::validator::{SanitizedJudgment, validate_with_config};
use crate::weather::Weather;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("game already finished after {rounds} rounds")]
    GameFinished { rounds: usize },
}

/// Flattened per-round record handed to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub prompt: String,
    pub route: RouteKind,
    pub input_text: String,
    pub final_altitude: u32,
    pub did_fall: bool,
}

/// Storage collaborator for finished rounds.
pub trait HistoryStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the rounds of one game under `game_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be written.
    fn save_history(&self, game_id: &str, records: &[HistoryRecord]) -> Result<(), Self::Error>;

    /// Load previously saved rounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load_history(&self, game_id: &str) -> Result<Option<Vec<HistoryRecord>>, Self::Error>;
}

/// Everything produced by one played round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundOutcome {
    pub round: usize,
    pub judgment: SanitizedJudgment,
    pub diversity_bonus: u32,
    pub score: ScoreOutput,
    pub cumulative_altitude: u32,
    pub mission: MissionProgress,
}

#[derive(Debug, Clone)]
pub struct GameSession<'a> {
    cfg: &'a ScoringConfig,
    weather: Option<Weather>,
    insurance: u8,
    progress: GameProgress,
    history: Vec<HistoryRecord>,
}

impl GameSession<'static> {
    /// Session backed by the default configuration.
    #[must_use]
    pub fn new(weather: Option<Weather>, mission: Option<MissionId>) -> Self {
        GameSession::with_config(weather, mission, default_config())
    }
}

impl<'a> GameSession<'a> {
    #[must_use]
    pub fn with_config(
        weather: Option<Weather>,
        mission: Option<MissionId>,
        cfg: &'a ScoringConfig,
    ) -> Self {
        Self {
            cfg,
            weather,
            insurance: 0,
            progress: GameProgress {
                mission,
                ..GameProgress::default()
            },
            history: Vec::with_capacity(cfg.rounds_per_game),
        }
    }

    #[must_use]
    pub const fn weather(&self) -> Option<Weather> {
        self.weather
    }

    #[must_use]
    pub const fn insurance(&self) -> u8 {
        self.insurance
    }

    #[must_use]
    pub const fn total_altitude(&self) -> u32 {
        self.progress.cumulative_score
    }

    #[must_use]
    pub fn rounds_played(&self) -> usize {
        self.progress.rounds.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.rounds_played() >= self.cfg.rounds_per_game
    }

    #[must_use]
    pub const fn progress(&self) -> &GameProgress {
        &self.progress
    }

    /// Play one round: validate the judgment, compose it, and record the result.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::GameFinished`] once every round has been played.
    pub fn play_round<R: RandomSource + ?Sized>(
        &mut self,
        prompt: &str,
        input_text: &str,
        raw: &Value,
        route: RouteKind,
        rng: &mut R,
    ) -> Result<RoundOutcome, SessionError> {
        if self.is_finished() {
            return Err(SessionError::GameFinished {
                rounds: self.rounds_played(),
            });
        }

        let judgment = validate_with_config(raw, route, self.cfg);
        let input =
            ScoreInput::from_judgment(&judgment, route, self.weather, self.insurance, self.cfg);
        let score = compose_with_config(&input, rng, self.cfg);

        self.insurance = score.insurance_left;
        self.progress.cumulative_score = self
            .progress
            .cumulative_score
            .saturating_add(score.final_altitude);
        self.progress.rounds.push(RoundRecord {
            altitude: Some(judgment.altitude),
            final_altitude: Some(score.final_altitude),
            labels: judgment.labels.clone(),
        });
        self.history.push(HistoryRecord {
            prompt: prompt.to_string(),
            route,
            input_text: input_text.to_string(),
            final_altitude: score.final_altitude,
            did_fall: score.did_fall,
        });

        let round = self.rounds_played();
        log::debug!(
            "round {round}/{} on {route}: {}m (total {}m, insurance {})",
            self.cfg.rounds_per_game,
            score.final_altitude,
            self.progress.cumulative_score,
            self.insurance
        );

        Ok(RoundOutcome {
            round,
            judgment,
            diversity_bonus: input.bonus_altitude,
            score,
            cumulative_altitude: self.progress.cumulative_score,
            mission: self.mission_progress(),
        })
    }

    #[must_use]
    pub fn mission_progress(&self) -> MissionProgress {
        evaluate(&self.progress)
    }

    #[must_use]
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// Numbers the achievement engine needs once the game is over.
    #[must_use]
    pub fn summary(&self) -> GameSummary {
        let altitudes: Vec<u32> = self
            .progress
            .rounds
            .iter()
            .map(RoundRecord::effective_altitude)
            .collect();
        GameSummary::from_altitudes(&altitudes)
    }

    /// Hand the round history to a store.
    ///
    /// # Errors
    ///
    /// Propagates the store's error.
    pub fn save_to<S: HistoryStore>(&self, store: &S, game_id: &str) -> Result<(), S::Error> {
        store.save_history(game_id, &self.history)
    }
}
