//! Self-play evaluation of the model-driven agent
//!
//! Games start from an empty board. The opponent moves first by default;
//! after every move the board is checked for a win on the eight lines and
//! for a full board. Each game gets its own opponent seed, so any single
//! game can be replayed in isolation.

use std::{fmt, str::FromStr};

use log::{debug, info, warn};
use rand::{Rng, random};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use super::agents::{Difficulty, MinimaxAgent, ModelAgent, RandomAgent};
use crate::{
    Error, Result,
    classifier::CategoricalNaiveBayes,
    encoding::SymbolEncoder,
    ports::{Agent, Observer},
    selection::MoveConvention,
    tictactoe::{AgentOutcome, Game, Player},
};

/// Opponent faced by the model-driven agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    /// Uniformly random over empty cells
    #[default]
    Random,
    /// Minimax that mostly plays at random
    Easy,
    /// Shallow minimax that sometimes blunders
    Medium,
    /// Perfect play
    Minimax,
}

impl OpponentKind {
    fn build(self) -> Box<dyn Agent> {
        match self {
            OpponentKind::Random => Box::new(RandomAgent::new("Random".to_string())),
            OpponentKind::Easy => Box::new(MinimaxAgent::with_difficulty(
                "Minimax (easy)".to_string(),
                Difficulty::Easy,
            )),
            OpponentKind::Medium => Box::new(MinimaxAgent::with_difficulty(
                "Minimax (medium)".to_string(),
                Difficulty::Medium,
            )),
            OpponentKind::Minimax => Box::new(MinimaxAgent::new("Minimax".to_string())),
        }
    }
}

impl FromStr for OpponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(OpponentKind::Random),
            "easy" => Ok(OpponentKind::Easy),
            "medium" => Ok(OpponentKind::Medium),
            "minimax" | "optimal" | "hard" => Ok(OpponentKind::Minimax),
            other => Err(Error::InvalidConfiguration {
                message: format!(
                    "unknown opponent '{other}' (expected random, easy, medium or minimax)"
                ),
            }),
        }
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpponentKind::Random => write!(f, "random"),
            OpponentKind::Easy => write!(f, "easy"),
            OpponentKind::Medium => write!(f, "medium"),
            OpponentKind::Minimax => write!(f, "minimax"),
        }
    }
}

/// Evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Number of games to play
    pub games: usize,

    /// Base seed; game `i` seeds its opponent with `seed + i`
    pub seed: Option<u64>,

    /// Opponent type
    pub opponent: OpponentKind,

    /// Which player opens each game
    pub first_player: Player,

    /// Symbol the agent plays and the class it maximizes
    pub convention: MoveConvention,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            games: 100,
            seed: None,
            opponent: OpponentKind::Random,
            first_player: Player::X,
            convention: MoveConvention::default(),
        }
    }
}

impl EvaluationConfig {
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_opponent(mut self, opponent: OpponentKind) -> Self {
        self.opponent = opponent;
        self
    }

    pub fn with_first_player(mut self, first_player: Player) -> Self {
        self.first_player = first_player;
        self
    }

    pub fn with_convention(mut self, convention: MoveConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Symbol played by the evaluated agent
    pub fn agent_player(&self) -> Player {
        self.convention.agent
    }

    /// Opponent seeds for every game, fixed before any game is played
    fn game_seeds(&self) -> Vec<u64> {
        (0..self.games)
            .map(|i| match self.seed {
                Some(seed) => seed.wrapping_add(i as u64),
                None => random(),
            })
            .collect()
    }
}

/// Win/loss/draw tallies from the agent's perspective
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: AgentOutcome) {
        match outcome {
            AgentOutcome::Win => self.wins += 1,
            AgentOutcome::Loss => self.losses += 1,
            AgentOutcome::Draw => self.draws += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    pub fn get(&self, outcome: AgentOutcome) -> usize {
        match outcome {
            AgentOutcome::Win => self.wins,
            AgentOutcome::Loss => self.losses,
            AgentOutcome::Draw => self.draws,
        }
    }
}

impl FromIterator<AgentOutcome> for OutcomeCounts {
    fn from_iter<I: IntoIterator<Item = AgentOutcome>>(iter: I) -> Self {
        let mut counts = OutcomeCounts::default();
        for outcome in iter {
            counts.record(outcome);
        }
        counts
    }
}

/// Result of an evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Total games played
    pub total_games: usize,

    pub wins: usize,
    pub draws: usize,
    pub losses: usize,

    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,

    /// 95% Wilson score interval for the win rate
    pub win_rate_interval: (f64, f64),
}

impl EvaluationResult {
    pub fn new(counts: OutcomeCounts) -> Self {
        let total_games = counts.total();
        let rate = |k: usize| {
            if total_games > 0 {
                k as f64 / total_games as f64
            } else {
                0.0
            }
        };

        Self {
            total_games,
            wins: counts.wins,
            draws: counts.draws,
            losses: counts.losses,
            win_rate: rate(counts.wins),
            draw_rate: rate(counts.draws),
            loss_rate: rate(counts.losses),
            win_rate_interval: wilson_interval(counts.wins, total_games, 0.95),
        }
    }

    pub fn counts(&self) -> OutcomeCounts {
        OutcomeCounts {
            wins: self.wins,
            losses: self.losses,
            draws: self.draws,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("create {}", path.as_ref().display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Wilson score interval for `successes` out of `trials`
pub fn wilson_interval(successes: usize, trials: usize, confidence: f64) -> (f64, f64) {
    if trials == 0 {
        return (0.0, 0.0);
    }
    let z = Normal::standard().inverse_cdf(0.5 + confidence / 2.0);
    let n = trials as f64;
    let p = successes as f64 / n;
    let z2 = z * z;

    let denominator = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denominator;
    let half_width = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denominator;

    ((center - half_width).max(0.0), (center + half_width).min(1.0))
}

/// Play one game to completion.
///
/// Returns the finished game; every game ends within nine plies because each
/// move fills a cell.
///
/// # Errors
///
/// Propagates agent errors and [`Error::InvalidMove`] if an agent picks an
/// occupied cell.
pub fn play_game(
    game_num: usize,
    agent: &mut dyn Agent,
    opponent: &mut dyn Agent,
    agent_player: Player,
    first_player: Player,
    observers: &mut [Box<dyn Observer>],
) -> Result<Game> {
    let mut game = Game::new(first_player);

    while game.outcome.is_none() {
        let player = game.to_move();
        let by_agent = player == agent_player;
        let mover: &mut dyn Agent = if by_agent { &mut *agent } else { &mut *opponent };

        let board = *game.board();
        let position = mover.select_move(&board, player)?;
        for observer in observers.iter_mut() {
            observer.on_move(game_num, game.moves.len(), &board, position, by_agent)?;
        }
        game.play(position)?;
    }

    Ok(game)
}

fn agent_outcome(game: &Game, agent_player: Player) -> Result<AgentOutcome> {
    game.outcome
        .map(|outcome| outcome.for_player(agent_player))
        .ok_or(Error::NoValidMoves)
}

/// Play the default agent (O maximizing `NEGATIVE`) against a random
/// opponent that moves first and draws its moves from `rng`.
pub fn simulate_game<R: Rng + ?Sized>(
    model: &CategoricalNaiveBayes,
    encoder: &SymbolEncoder,
    rng: &mut R,
) -> Result<AgentOutcome> {
    let convention = MoveConvention::default();
    let agent_player = convention.agent;
    let mut agent = ModelAgent::new("Model".to_string(), model, encoder, convention);
    let mut opponent = RandomAgent::with_seed("Random".to_string(), rng.random());

    let game = play_game(
        0,
        &mut agent,
        &mut opponent,
        agent_player,
        agent_player.opponent(),
        &mut [],
    )?;
    agent_outcome(&game, agent_player)
}

/// Run `n_games` independent default-configuration games against a random
/// opponent and tally the outcomes.
pub fn run_evaluation(
    model: &CategoricalNaiveBayes,
    encoder: &SymbolEncoder,
    n_games: usize,
) -> Result<OutcomeCounts> {
    let config = EvaluationConfig::default().with_games(n_games);
    Ok(Evaluator::new(config).run(model, encoder)?.counts())
}

/// Evaluation pipeline for the model-driven agent against one opponent type
pub struct Evaluator {
    config: EvaluationConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Evaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Evaluate the classifier-driven agent sequentially
    pub fn run(
        &mut self,
        model: &CategoricalNaiveBayes,
        encoder: &SymbolEncoder,
    ) -> Result<EvaluationResult> {
        let mut agent = ModelAgent::new(
            "Model".to_string(),
            model,
            encoder,
            self.config.convention.clone(),
        );
        self.run_with_agent(&mut agent)
    }

    /// Evaluate any agent sequentially under this configuration
    pub fn run_with_agent(&mut self, agent: &mut dyn Agent) -> Result<EvaluationResult> {
        self.warn_if_empty();
        let agent_player = self.config.agent_player();
        let seeds = self.config.game_seeds();

        info!(
            "evaluating {} for {} games against {} (agent plays {agent_player}, {} opens)",
            agent.name(),
            self.config.games,
            self.config.opponent,
            self.config.first_player
        );

        for observer in &mut self.observers {
            observer.on_evaluation_start(self.config.games)?;
        }

        let mut opponent = self.config.opponent.build();
        let mut counts = OutcomeCounts::default();
        for (game_num, &seed) in seeds.iter().enumerate() {
            opponent.set_rng_seed(seed)?;
            let game = play_game(
                game_num,
                agent,
                opponent.as_mut(),
                agent_player,
                self.config.first_player,
                &mut self.observers,
            )?;
            let outcome = agent_outcome(&game, agent_player)?;
            debug!("game {game_num} (seed {seed}): {outcome:?} in {} plies", game.moves.len());

            counts.record(outcome);
            for observer in &mut self.observers {
                observer.on_game_end(game_num, outcome)?;
            }
        }

        self.finish(counts)
    }

    /// Evaluate the classifier-driven agent with games spread over the rayon
    /// thread pool.
    ///
    /// The model and encoder are only read, so every game gets its own
    /// agent. With a configured seed the tallies match [`run`](Self::run).
    pub fn run_parallel(
        &mut self,
        model: &CategoricalNaiveBayes,
        encoder: &SymbolEncoder,
    ) -> Result<EvaluationResult> {
        self.warn_if_empty();
        let agent_player = self.config.agent_player();
        let seeds = self.config.game_seeds();
        let config = &self.config;

        info!(
            "evaluating model in parallel for {} games against {}",
            config.games, config.opponent
        );

        for observer in &mut self.observers {
            observer.on_evaluation_start(config.games)?;
        }

        let outcomes = seeds
            .par_iter()
            .enumerate()
            .map(|(game_num, &seed)| {
                let mut agent =
                    ModelAgent::new("Model".to_string(), model, encoder, config.convention.clone());
                let mut opponent = config.opponent.build();
                opponent.set_rng_seed(seed)?;
                let game = play_game(
                    game_num,
                    &mut agent,
                    opponent.as_mut(),
                    agent_player,
                    config.first_player,
                    &mut [],
                )?;
                agent_outcome(&game, agent_player)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut counts = OutcomeCounts::default();
        for (game_num, outcome) in outcomes.into_iter().enumerate() {
            counts.record(outcome);
            for observer in &mut self.observers {
                observer.on_game_end(game_num, outcome)?;
            }
        }

        self.finish(counts)
    }

    fn warn_if_empty(&self) {
        if self.config.games == 0 {
            warn!("evaluation configured with zero games");
        }
    }

    fn finish(&mut self, counts: OutcomeCounts) -> Result<EvaluationResult> {
        for observer in &mut self.observers {
            observer.on_evaluation_end()?;
        }

        let result = EvaluationResult::new(counts);
        info!(
            "evaluation finished: {} wins, {} draws, {} losses",
            result.wins, result.draws, result.losses
        );
        Ok(result)
    }
}
