//! Round state machine integration tests.
//!
//! These drive whole rounds and whole games through `RulesEngine::apply`
//! and check the scorecard and phase after each step.

use knuffel::core::{
    Action, Category, CellRef, GameConfig, GameRng, GameState, Phase, Randomizer, ScriptedDice,
    CELL_COUNT, COLUMN_COUNT,
};
use knuffel::events::GameEvent;
use knuffel::rules::{KnuffelRules, RulesEngine};
use knuffel::scoring::grand_total;

fn apply(rules: &KnuffelRules, state: &GameState, action: Action, rng: &mut dyn Randomizer) -> GameState {
    let t = rules.apply(state, action, rng);
    assert!(t.applied, "{:?} rejected in {:?}", action, state.phase());
    t.state
}

// =============================================================================
// Single Round
// =============================================================================

/// Three rolls exhaust the round; the fourth is a no-op.
#[test]
fn test_three_rolls_then_locked() {
    let rules = KnuffelRules::default();
    let mut rng = GameRng::new(42);
    let mut state = rules.initial_state();

    for _ in 0..3 {
        state = apply(&rules, &state, Action::Roll, &mut rng);
    }
    assert_eq!(state.rolls_left(), 0);
    assert_eq!(state.phase(), Phase::MustChoose);

    let t = rules.apply(&state, Action::Roll, &mut rng);
    assert!(!t.applied);
    assert_eq!(t.state, state);
}

/// Committing to a filled cell changes nothing.
#[test]
fn test_commit_to_filled_cell_is_ignored() {
    let rules = KnuffelRules::default();
    let mut rng = ScriptedDice::new(vec![5]);
    let cell = CellRef::new(2, Category::Fives);

    let state = apply(&rules, &rules.initial_state(), Action::Roll, &mut rng);
    let state = apply(&rules, &state, Action::Commit(cell), &mut rng);
    let state = apply(&rules, &state, Action::NextRound, &mut rng);
    assert_eq!(state.cell(cell), Some(25));

    let t = rules.apply(&state, Action::Commit(cell), &mut rng);
    assert!(!t.applied);
    assert_eq!(t.state.cell(cell), Some(25));
    assert_eq!(t.state.filled_cells(), 1);
}

/// Undo works once, and a later commit makes the earlier one permanent.
#[test]
fn test_undo_is_single_level() {
    let rules = KnuffelRules::default();
    let mut rng = ScriptedDice::new(vec![2, 2, 2, 3, 3]);
    let first = CellRef::new(0, Category::FullHouse);
    let second = CellRef::new(1, Category::Twos);

    let state = apply(&rules, &rules.initial_state(), Action::Roll, &mut rng);
    let state = apply(&rules, &state, Action::Commit(first), &mut rng);
    let state = apply(&rules, &state, Action::NextRound, &mut rng);
    let state = apply(&rules, &state, Action::Commit(second), &mut rng);

    let state = apply(&rules, &state, Action::Undo, &mut rng);
    assert_eq!(state.cell(second), None);
    assert_eq!(state.cell(first), Some(25));

    assert!(!rules.apply(&state, Action::Undo, &mut rng).applied);
}

/// Undo then commit to a different cell.
#[test]
fn test_undo_then_recommit_elsewhere() {
    let rules = KnuffelRules::default();
    let mut rng = ScriptedDice::new(vec![1, 2, 3, 4, 5]);
    let straight = CellRef::new(0, Category::LargeStraight);
    let chance = CellRef::new(0, Category::Chance);

    let state = apply(&rules, &rules.initial_state(), Action::Roll, &mut rng);
    let state = apply(&rules, &state, Action::Commit(chance), &mut rng);
    let state = apply(&rules, &state, Action::Undo, &mut rng);
    let state = apply(&rules, &state, Action::Commit(straight), &mut rng);

    assert_eq!(state.cell(chance), None);
    assert_eq!(state.cell(straight), Some(40));
    assert!(!state.undone());
    assert_eq!(state.phase(), Phase::AwaitingNextRound);
}

// =============================================================================
// Whole Games
// =============================================================================

/// Fill all 39 cells; the game finishes exactly on the last one.
#[test]
fn test_full_game_reaches_finished() {
    let rules = KnuffelRules::default();
    let mut rng = GameRng::new(7);
    let mut state = apply(&rules, &rules.initial_state(), Action::Roll, &mut rng);
    let mut finished_events = 0;

    let cells: Vec<_> = (0..COLUMN_COUNT)
        .flat_map(|col| Category::ALL.into_iter().map(move |cat| CellRef::new(col, cat)))
        .collect();
    assert_eq!(cells.len(), CELL_COUNT);

    for (i, cell) in cells.iter().enumerate() {
        if state.phase() == Phase::AwaitingNextRound {
            state = apply(&rules, &state, Action::NextRound, &mut rng);
        }
        assert!(!rules.is_terminal(&state));

        let t = rules.apply(&state, Action::Commit(*cell), &mut rng);
        assert!(t.applied);
        finished_events += t
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameFinished { .. }))
            .count();
        state = t.state;

        assert_eq!(state.filled_cells(), i + 1);
        assert_eq!(state.phase() == Phase::Finished, i + 1 == CELL_COUNT);
    }

    assert!(rules.is_terminal(&state));
    assert_eq!(finished_events, 1);
    assert_eq!(rules.legal_actions(&state), vec![Action::NewGame]);
    assert_eq!(state.round(), CELL_COUNT as u32);

    let total = grand_total(state.columns());
    let fresh = apply(&rules, &state, Action::NewGame, &mut rng);
    assert_eq!(fresh, rules.initial_state());
    assert!(total > 0);
}

/// Every action `legal_actions` lists is accepted by `apply`.
#[test]
fn test_legal_actions_agree_with_apply() {
    let rules = KnuffelRules::new(GameConfig::default());
    let mut rng = GameRng::new(3);
    let mut state = rules.initial_state();

    for step in 0..200 {
        let legal = rules.legal_actions(&state);
        assert!(!legal.is_empty());
        for &action in &legal {
            assert!(rules.apply(&state, action, &mut rng.clone()).applied);
        }

        // Walk forward without ever resetting
        let forward: Vec<_> = legal
            .iter()
            .copied()
            .filter(|a| *a != Action::NewGame && *a != Action::Undo)
            .collect();
        let choice = forward
            .get(step % 3)
            .or(forward.first())
            .copied()
            .unwrap_or(Action::NewGame);
        state = apply(&rules, &state, choice, &mut rng);
        if rules.is_terminal(&state) {
            break;
        }
    }
}

/// Next round auto-rolls and leaves one fewer roll than configured.
#[test]
fn test_next_round_opening_roll() {
    let rules = KnuffelRules::default();
    let mut rng = ScriptedDice::new(vec![6, 6, 1, 1, 1, 4, 4, 4, 4, 2]);

    let state = apply(&rules, &rules.initial_state(), Action::Roll, &mut rng);
    let state = apply(&rules, &state, Action::ToggleHold(0), &mut rng);
    let state = apply(&rules, &state, Action::commit(0, Category::FullHouse), &mut rng);
    assert_eq!(state.cell(CellRef::new(0, Category::FullHouse)), Some(25));

    let t = rules.apply(&state, Action::NextRound, &mut rng);
    assert!(t.applied);
    assert_eq!(t.state.dice().faces(), [4, 4, 4, 4, 2]);
    assert_eq!(t.state.rolls_left(), 2);
    assert!(t.state.held().is_empty());
    assert_eq!(
        t.events.as_slice(),
        &[
            GameEvent::RoundStarted { round: 2 },
            GameEvent::RollFinished {
                roll: t.state.dice(),
                rolls_left: 2
            }
        ]
    );
}
