//! Self-play evaluation through the public pipeline API

mod common;

use bayes_ttt::{
    AgentOutcome, Board, ClassLabel, EvaluationConfig, Evaluator, MoveConvention, Player, Result,
    TrainedModel, TrainingConfig, TrainingExample, TrainingSet,
    pipeline::{MinimaxAgent, ModelAgent, OpponentKind, RandomAgent, play_game},
    ports::Agent,
    run_evaluation, simulate_game, train,
};
use common::{board, endgame_set};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn trained() -> TrainedModel {
    train(&endgame_set(500, 21), &TrainingConfig::default()).unwrap()
}

/// Always takes the center, otherwise the lowest free cell
struct CenterFirst;

impl Agent for CenterFirst {
    fn select_move(&mut self, board: &Board, _player: Player) -> Result<usize> {
        if board.is_empty(4) {
            return Ok(4);
        }
        board
            .empty_positions()
            .first()
            .copied()
            .ok_or(bayes_ttt::Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        "CenterFirst"
    }
}

#[test]
fn test_center_agent_game_terminates_with_one_outcome() {
    for seed in 0..20 {
        let mut agent = CenterFirst;
        let mut opponent = RandomAgent::with_seed("Random".to_string(), seed);
        let game = play_game(0, &mut agent, &mut opponent, Player::O, Player::X, &mut []).unwrap();

        assert!(game.moves.len() <= 9);
        let expected = if game.moves[0].position == 4 { 0 } else { 4 };
        assert_eq!(game.moves[1].position, expected);
        let outcome = game.outcome.unwrap().for_player(Player::O);
        assert!(matches!(
            outcome,
            AgentOutcome::Win | AgentOutcome::Loss | AgentOutcome::Draw
        ));
    }
}

/// Every board with O in the center is `NEGATIVE`; the rest of each board is
/// shared between the classes, so only the center cell separates them.
fn center_model() -> TrainedModel {
    let bases = [
        "B,B,B;B,B,B;B,B,B",
        "X,B,B;B,B,B;B,B,B",
        "B,X,B;B,B,B;B,B,B",
        "B,B,X;B,B,B;B,B,B",
        "B,B,B;X,B,B;B,B,B",
        "B,B,B;B,B,X;B,B,B",
        "B,B,B;B,B,B;X,B,B",
        "B,B,B;B,B,B;B,X,B",
        "B,B,B;B,B,B;B,B,X",
    ];
    let set: TrainingSet = bases
        .iter()
        .flat_map(|base| {
            let open = board(base);
            let center = open.with_move(4, Player::O).unwrap();
            [
                TrainingExample {
                    board: open,
                    outcome: ClassLabel::positive(),
                },
                TrainingExample {
                    board: center,
                    outcome: ClassLabel::negative(),
                },
            ]
        })
        .collect();
    train(&set, &TrainingConfig::default()).unwrap()
}

#[test]
fn test_model_agent_takes_learned_center() {
    let trained = center_model();
    for seed in 0..10 {
        let outcome = simulate_game(
            &trained.model,
            &trained.encoder,
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap();

        let opponent_seed: u64 = StdRng::seed_from_u64(seed).random();
        let mut agent = ModelAgent::new(
            "Model".to_string(),
            &trained.model,
            &trained.encoder,
            MoveConvention::o_blocks(),
        );
        let mut opponent = RandomAgent::with_seed("Random".to_string(), opponent_seed);
        let game = play_game(0, &mut agent, &mut opponent, Player::O, Player::X, &mut []).unwrap();

        assert!(game.moves.len() <= 9);
        if game.moves[0].position != 4 {
            assert_eq!(game.moves[1].position, 4, "seed {seed}");
        }
        assert_eq!(game.outcome.unwrap().for_player(Player::O), outcome);
    }
}

#[test]
fn test_simulate_game_replays_from_seed() {
    let trained = trained();
    for seed in 0..10 {
        let first = simulate_game(
            &trained.model,
            &trained.encoder,
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap();
        let second = simulate_game(
            &trained.model,
            &trained.encoder,
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_run_evaluation_counts_every_game() {
    let trained = trained();
    let counts = run_evaluation(&trained.model, &trained.encoder, 100).unwrap();
    assert_eq!(counts.wins + counts.losses + counts.draws, 100);
}

#[test]
fn test_parallel_matches_sequential_when_seeded() {
    let trained = trained();
    let config = EvaluationConfig::default().with_games(60).with_seed(77);

    let sequential = Evaluator::new(config.clone())
        .run(&trained.model, &trained.encoder)
        .unwrap();
    let parallel = Evaluator::new(config)
        .run_parallel(&trained.model, &trained.encoder)
        .unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(parallel.total_games, 60);
}

#[test]
fn test_each_game_replays_from_its_own_seed() {
    let trained = trained();
    let batch = Evaluator::new(EvaluationConfig::default().with_games(8).with_seed(500))
        .run(&trained.model, &trained.encoder)
        .unwrap();

    let mut wins = 0;
    let mut losses = 0;
    let mut draws = 0;
    for i in 0..8 {
        let single = Evaluator::new(EvaluationConfig::default().with_games(1).with_seed(500 + i))
            .run(&trained.model, &trained.encoder)
            .unwrap();
        wins += single.wins;
        losses += single.losses;
        draws += single.draws;
    }

    assert_eq!((batch.wins, batch.losses, batch.draws), (wins, losses, draws));
}

#[test]
fn test_x_wins_convention_playing_first() {
    let trained = trained();
    let config = EvaluationConfig::default()
        .with_games(30)
        .with_seed(3)
        .with_convention(MoveConvention::x_wins())
        .with_first_player(Player::X);

    let result = Evaluator::new(config)
        .run(&trained.model, &trained.encoder)
        .unwrap();
    assert_eq!(result.total_games, 30);
    let (lo, hi) = result.win_rate_interval;
    assert!(lo <= result.win_rate + 1e-12);
    assert!(result.win_rate <= hi + 1e-12);
}

#[test]
fn test_minimax_opponent_is_never_beaten() {
    let trained = trained();
    let config = EvaluationConfig::default()
        .with_games(5)
        .with_seed(1)
        .with_opponent(OpponentKind::Minimax);

    let result = Evaluator::new(config)
        .run(&trained.model, &trained.encoder)
        .unwrap();
    assert_eq!(result.wins, 0);
}

#[test]
fn test_minimax_draws_itself() {
    let mut x = MinimaxAgent::new("X".to_string());
    let mut o = MinimaxAgent::new("O".to_string());
    let game = play_game(0, &mut o, &mut x, Player::O, Player::X, &mut []).unwrap();
    assert_eq!(game.outcome.unwrap().for_player(Player::O), AgentOutcome::Draw);
    assert_eq!(game.moves.len(), 9);
}
