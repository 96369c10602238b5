//! Directional checks that training improves play

use std::sync::Arc;

use ttt_mc::{
    monte_carlo::{MonteCarloTrainer, OpponentCredit, OpponentKind, TrainerConfig},
    pipeline::{GreedyPolicy, MatchConfig, MatchPipeline, MatchResult, RandomPolicy},
    tictactoe::{Board, Side},
    value_table::ValueTable,
};

fn evaluate(table: ValueTable, games: usize) -> MatchResult {
    let mut agent = GreedyPolicy::value_only("agent", Arc::new(table));
    let mut opponent = RandomPolicy::new("random");
    MatchPipeline::new(MatchConfig {
        num_games: games,
        seed: Some(99),
    })
    .run(&mut agent, &mut opponent)
    .unwrap()
}

fn train(config: TrainerConfig) -> ValueTable {
    let mut trainer = MonteCarloTrainer::new(config).unwrap();
    trainer.train().unwrap();
    trainer.into_table()
}

#[test]
fn trained_table_loses_less_than_untrained_against_random() {
    let untrained = evaluate(ValueTable::new(), 2_000);

    let table = train(TrainerConfig {
        episodes: 20_000,
        seed: Some(7),
        ..TrainerConfig::default()
    });
    assert!(!table.is_empty());
    let trained = evaluate(table, 2_000);

    assert!(
        trained.loss_rate < untrained.loss_rate,
        "trained loss rate {:.3} should beat untrained {:.3}",
        trained.loss_rate,
        untrained.loss_rate
    );
    assert!(
        trained.win_rate > untrained.win_rate,
        "trained win rate {:.3} should beat untrained {:.3}",
        trained.win_rate,
        untrained.win_rate
    );
}

#[test]
fn self_play_with_negated_credit_learns_both_sides() {
    let table = train(TrainerConfig {
        episodes: 2_000,
        opponent: OpponentKind::SelfPlay,
        opponent_credit: OpponentCredit::Negated,
        seed: Some(3),
        ..TrainerConfig::default()
    });

    let (min, max) = table.value_range().unwrap();
    assert!(min < 0.0, "moves that preceded a loss should score below zero, min={min}");
    assert!(max > 0.0, "winning moves should score above zero, max={max}");
}

#[test]
fn exploration_settles_at_schedule_end() {
    let mut trainer = MonteCarloTrainer::new(TrainerConfig {
        episodes: 500,
        seed: Some(11),
        ..TrainerConfig::default()
    })
    .unwrap();

    assert_eq!(trainer.epsilon_at(0), 1.0);
    let result = trainer.train().unwrap();
    assert!((result.final_epsilon - 0.01).abs() < 1e-9);
}

#[test]
fn blocking_afterstate_outvalues_leaving_the_row_open() {
    let table = train(TrainerConfig {
        episodes: 100_000,
        seed: Some(7),
        ..TrainerConfig::default()
    });

    // The player holds 0 and 1; only 2 stops the top row.
    let board = Board::from_values(&[1, 1, 0, 0, -1, 0, 0, 0, 0]).unwrap();
    let value_after = |pos| table.value(board.apply(pos, Side::Ai).unwrap().canonical_key());

    let blocked = value_after(2);
    for open in [7, 8] {
        let missed = value_after(open);
        assert!(
            blocked > missed,
            "blocking at 2 ({blocked:.4}) should outvalue {open} ({missed:.4})"
        );
    }
}
