use rand::Rng;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Iterates over every cell inside the wall ring of `bounds`, row by row.
pub fn interior_positions(bounds: GridSize) -> impl Iterator<Item = Position> {
    let width = i32::from(bounds.width);
    let height = i32::from(bounds.height);

    (1..height - 1).flat_map(move |y| (1..width - 1).map(move |x| Position { x, y }))
}

/// Picks an interior cell the snake does not occupy, uniformly at random.
///
/// Returns `None` when the snake covers the whole interior.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    let candidates: Vec<Position> = interior_positions(bounds)
        .filter(|position| !snake.occupies(*position))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{interior_positions, spawn_position};

    const BOUNDS: GridSize = GridSize {
        width: 8,
        height: 6,
    };

    #[test]
    fn interior_skips_wall_ring() {
        let cells: Vec<_> = interior_positions(BOUNDS).collect();

        assert_eq!(cells.len(), BOUNDS.interior_cells());
        assert_eq!(cells.first(), Some(&Position { x: 1, y: 1 }));
        assert_eq!(cells.last(), Some(&Position { x: 6, y: 4 }));
        assert!(cells.iter().all(|cell| !cell.is_on_border(BOUNDS)));
    }

    #[test]
    fn food_spawn_never_overlaps_snake_or_wall() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::from_segments(
            vec![
                Position { x: 3, y: 1 },
                Position { x: 2, y: 1 },
                Position { x: 1, y: 1 },
            ],
            Direction::Right,
        );

        for _ in 0..100 {
            let food_position =
                spawn_position(&mut rng, BOUNDS, &snake).expect("board has free cells");
            assert!(!snake.occupies(food_position));
            assert!(!food_position.is_on_border(BOUNDS));
        }
    }

    #[test]
    fn food_spawn_reaches_every_free_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let snake = Snake::serpentine(BOUNDS, 20);

        let seen: HashSet<_> = (0..500)
            .filter_map(|_| spawn_position(&mut rng, BOUNDS, &snake))
            .collect();

        assert_eq!(seen.len(), BOUNDS.interior_cells() - 20);
    }

    #[test]
    fn full_interior_yields_no_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = Snake::serpentine(BOUNDS, BOUNDS.interior_cells());

        assert_eq!(spawn_position(&mut rng, BOUNDS, &snake), None);
    }

    #[test]
    fn same_seed_gives_same_cell() {
        let snake = Snake::serpentine(BOUNDS, 4);
        let first = spawn_position(&mut StdRng::seed_from_u64(99), BOUNDS, &snake);
        let second = spawn_position(&mut StdRng::seed_from_u64(99), BOUNDS, &snake);

        assert_eq!(first, second);
    }
}
