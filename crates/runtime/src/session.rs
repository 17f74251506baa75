//! Game session: the single write boundary the collaborator talks to.
//!
//! A session owns the registry and exactly one engine state (with its one
//! RNG). All mutation goes through [`GameSession::perform_action`];
//! everything else the UI reads comes from the owned snapshot views in
//! [`crate::views`].

use lastlight_content::ContentRegistry;
use lastlight_core::{
    Action, ContentOracle, EngineState, ExecuteError, ExecutionOutcome, GameEngine,
    GameEnv, HeroId, StateInitError,
};

/// Errors surfaced while starting a new game.
#[derive(Debug, thiserror::Error)]
pub enum NewGameError {
    #[error("hero `{0}` is not defined by the active pack set")]
    UnknownHero(HeroId),

    #[error(transparent)]
    Init(#[from] StateInitError),
}

/// One playthrough: the active pack set plus the authoritative state.
#[derive(Debug)]
pub struct GameSession {
    registry: ContentRegistry,
    state: EngineState,
}

impl GameSession {
    /// Starts a new game for `hero_id`. With `seed` absent, a fresh seed is
    /// drawn from OS entropy - the only non-deterministic input the engine
    /// ever takes; it is recorded in the state, so the run replays
    /// identically from it.
    pub fn new_game(
        registry: ContentRegistry,
        hero_id: &HeroId,
        seed: Option<u64>,
    ) -> Result<Self, NewGameError> {
        let hero = registry
            .hero(hero_id)
            .ok_or_else(|| NewGameError::UnknownHero(hero_id.clone()))?
            .clone();

        let seed = seed.unwrap_or_else(rand::random);
        let state = {
            let env = GameEnv::new(&registry);
            EngineState::new(&hero, &env, seed)?
        };

        tracing::info!(hero = %hero.id, seed, "new game started");

        Ok(Self { registry, state })
    }

    /// Reassembles a session from a restored state. Used by the save
    /// subsystem only.
    pub(crate) fn from_parts(registry: ContentRegistry, state: EngineState) -> Self {
        Self { registry, state }
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    /// Read-only view of the authoritative state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Executes one action to completion. This is the entire write surface:
    /// the session processes one action before accepting the next, and a
    /// rejected action leaves the state untouched.
    pub fn perform_action(
        &mut self,
        action: Action,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        let env = GameEnv::new(&self.registry);
        let outcome = GameEngine::new(&mut self.state).execute(env, &action);

        match &outcome {
            Ok(executed) => {
                tracing::debug!(
                    action = action.as_snake_case(),
                    nonce = executed.nonce,
                    phase = %self.state.phase(),
                    "action executed"
                );
            }
            Err(error) => {
                tracing::debug!(
                    action = action.as_snake_case(),
                    error = %error,
                    "action rejected"
                );
            }
        }

        outcome
    }
}
