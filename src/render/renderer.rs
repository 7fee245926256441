use std::fmt::Write;

use crate::game::{Entity, Position, Simulation};

/// Plain-text board renderer
///
/// Rows are printed from the highest `y` down, so "up" points up on the
/// screen. Living heads are upper-case letters (`A` for snake 0), living
/// bodies the matching lower-case letter, food is `*` and everything else
/// is `.`.
pub struct Renderer {
    show_header: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self { show_header: true }
    }

    /// Renderer that prints only the grid
    pub fn grid_only() -> Self {
        Self { show_header: false }
    }

    pub fn render(&self, sim: &Simulation) -> String {
        let board = sim.board();
        let mut out = String::with_capacity((board.width * 2 + 1) * (board.height + 1));

        if self.show_header {
            let _ = writeln!(
                out,
                "turn {} | alive {}/{} | food {}",
                sim.turn(),
                sim.remaining(),
                sim.snakes().len(),
                sim.food().len()
            );
        }

        for y in (0..board.height as i32).rev() {
            let row: Vec<String> = (0..board.width as i32)
                .map(|x| glyph(sim, Position::new(x, y)).to_string())
                .collect();
            out.push_str(&row.join(" "));
            out.push('\n');
        }

        out
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `sim` with a header line
pub fn render_board(sim: &Simulation) -> String {
    Renderer::new().render(sim)
}

fn glyph(sim: &Simulation, pos: Position) -> char {
    let visible = sim.entities_at(pos).iter().find(|e| match e {
        Entity::Head(id) | Entity::Body(id) => sim.snake(*id).is_alive(),
        Entity::Food => true,
        Entity::PotentialMove(_) => false,
    });

    match visible {
        Some(Entity::Head(id)) => snake_letter(id.index()).to_ascii_uppercase(),
        Some(Entity::Body(id)) => snake_letter(id.index()),
        Some(Entity::Food) => '*',
        _ => '.',
    }
}

fn snake_letter(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig};

    #[test]
    fn test_highest_row_printed_first() {
        let mut config = GameConfig::new(3, 3).with_snakes(1);
        config.food_spawn_chance = 0.0;
        let mut sim = Simulation::with_heads(config, &[Position::new(0, 2)], 1);
        sim.place_food(Position::new(2, 0));

        let grid = Renderer::grid_only().render(&sim);
        assert_eq!(grid, "A . .\n. . .\n. . *\n");
    }

    #[test]
    fn test_body_and_header() {
        let mut config = GameConfig::standard().with_snakes(2);
        config.food_spawn_chance = 0.0;
        let mut sim =
            Simulation::with_heads(config, &[Position::new(1, 1), Position::new(8, 8)], 1);
        sim.place_food(Position::new(10, 10));
        sim.step(|_, _| Direction::Up);

        let text = render_board(&sim);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "turn 1 | alive 2/2 | food 1");
        assert_eq!(lines.len(), 12);
        // y = 2 is the tenth grid row from the top
        assert!(lines[1 + 8].starts_with(". A"));
        assert!(lines[1 + 9].starts_with(". a"));
    }

    #[test]
    fn test_dead_snakes_are_hidden() {
        let config = GameConfig::new(3, 3).with_snakes(1);
        let mut sim = Simulation::with_heads(config, &[Position::new(0, 0)], 1);
        sim.step(|_, _| Direction::Left);

        let grid = Renderer::grid_only().render(&sim);
        assert!(!grid.contains('A') && !grid.contains('a'));
    }
}
