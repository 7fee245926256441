//! One simulated game between a tournament group of controllers

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::TrainConfig;
use super::population::Individual;
use crate::brain::{Brain, Variables};
use crate::game::{Simulation, SnakeId};
use crate::render::render_board;

/// Separates the move-choice stream from the simulation's own stream
const MOVE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Result of one tournament game
#[derive(Debug, Clone)]
pub struct GameOutcome {
    /// Turns played
    pub turns: u32,

    /// Group index of the sole survivor, if there is one
    pub winner: Option<usize>,

    /// Steps survived by each group member, in group order
    pub steps: Vec<u32>,

    /// Final board, when snapshots are enabled
    pub snapshot: Option<String>,
}

/// Play one game with snake `i` controlled by `group[i]` and add each
/// snake's steps survived to its controller's fitness.
///
/// The game is fully determined by `seed`.
pub fn play_game(group: &mut [Individual], config: &TrainConfig, seed: u64) -> GameOutcome {
    let game_config = config.game_config.clone().with_snakes(group.len());
    let mut sim = Simulation::seeded(game_config, seed);
    let mut rng = StdRng::seed_from_u64(seed ^ MOVE_STREAM);

    {
        let controllers: Vec<&Variables> = group.iter().map(|ind| &ind.variables).collect();

        while !config.game_end.is_over(sim.remaining()) {
            sim.step(|snake, sim| {
                let variables = controller_for(&controllers, snake.id());
                Brain::new(variables, snake.id(), sim).choose_move(&mut rng)
            });
        }
    }

    let steps: Vec<u32> = sim.snakes().iter().map(|s| s.steps_survived()).collect();
    for (individual, &survived) in group.iter_mut().zip(&steps) {
        individual.record_game(survived);
    }

    let winner = match sim.remaining() {
        1 => sim.alive().next().map(|s| s.id().index()),
        _ => None,
    };

    debug!(
        "game {:016x}: {} turns, winner {:?}, steps {:?}",
        seed,
        sim.turn(),
        winner,
        steps
    );

    GameOutcome {
        turns: sim.turn(),
        winner,
        steps,
        snapshot: config.snapshot.then(|| render_board(&sim)),
    }
}

fn controller_for<'a>(controllers: &[&'a Variables], id: SnakeId) -> &'a Variables {
    match controllers.get(id.index()) {
        Some(&variables) => variables,
        None => panic!("no controller bound to {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::config::GameEnd;
    use crate::evolution::population::random_population;
    use crate::game::GameConfig;
    use std::path::PathBuf;

    fn config() -> TrainConfig {
        let mut config = TrainConfig::new(1, 4, PathBuf::from("unused.dat"));
        config.game_config = GameConfig::small();
        config
    }

    #[test]
    fn test_every_member_plays_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = config();
        let mut group = random_population(4, &config.game_config.board(), &mut rng);

        let outcome = play_game(&mut group, &config, 7);
        assert_eq!(outcome.steps.len(), 4);
        for (ind, &steps) in group.iter().zip(&outcome.steps) {
            assert_eq!(ind.games_played, 1);
            assert_eq!(ind.fitness, steps as f64);
            assert!(steps <= outcome.turns);
        }
        assert!(outcome.snapshot.is_none());
    }

    #[test]
    fn test_game_is_deterministic_for_a_seed() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = config();
        let group = random_population(4, &config.game_config.board(), &mut rng);

        let a = play_game(&mut group.clone(), &config, 99);
        let b = play_game(&mut group.clone(), &config, 99);
        assert_eq!(a.turns, b.turns);
        assert_eq!(a.steps, b.steps);
        assert_eq!(a.winner, b.winner);
    }

    #[test]
    fn test_extinction_plays_until_all_dead() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut config = config();
        config.game_end = GameEnd::Extinction;
        let mut group = random_population(4, &config.game_config.board(), &mut rng);

        let outcome = play_game(&mut group, &config, 5);
        assert_eq!(outcome.winner, None);
        // The last snake to die survived for the whole game
        assert_eq!(outcome.steps.iter().max(), Some(&outcome.turns));
    }

    #[test]
    fn test_last_survivor_winner_outlasts_others() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = config();
        let mut group = random_population(4, &config.game_config.board(), &mut rng);

        let outcome = play_game(&mut group, &config, 11);
        if let Some(winner) = outcome.winner {
            assert_eq!(outcome.steps[winner], outcome.turns);
        }
    }

    #[test]
    #[should_panic(expected = "no controller bound")]
    fn test_snake_without_controller_panics() {
        let mut rng = StdRng::seed_from_u64(6);
        let vars = Variables::random(&GameConfig::small().board(), &mut rng);
        let controllers = vec![&vars];
        let _ = controller_for(&controllers, SnakeId(1));
    }

    #[test]
    fn test_snapshot_when_enabled() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut config = config();
        config.snapshot = true;
        let mut group = random_population(4, &config.game_config.board(), &mut rng);

        let outcome = play_game(&mut group, &config, 3);
        let snapshot = outcome.snapshot.unwrap();
        assert!(snapshot.starts_with(&format!("turn {}", outcome.turns)));
    }
}
