use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns true when the position lies on the outer ring of `bounds`.
    #[must_use]
    pub fn is_on_border(self, bounds: GridSize) -> bool {
        self.is_within_bounds(bounds)
            && (self.x == 0
                || self.y == 0
                || self.x == i32::from(bounds.width) - 1
                || self.y == i32::from(bounds.height) - 1)
    }

    /// Returns the neighbouring position one step towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake body (head first) plus its committed and requested headings.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    heading: Direction,
    pending_heading: Direction,
}

impl Snake {
    /// Lays out `len` segments by filling the interior of `bounds` row by row,
    /// alternating left-to-right and right-to-left from the top-left interior
    /// cell. The last filled cell becomes the head.
    ///
    /// The heading points along the head's row: right on even interior rows,
    /// left on odd ones. `len` must fit inside the interior.
    #[must_use]
    pub fn serpentine(bounds: GridSize, len: usize) -> Self {
        let interior_width = usize::from(bounds.width.saturating_sub(2)).max(1);
        let mut body = VecDeque::with_capacity(len + 1);
        let mut heading = Direction::Right;

        for index in 0..len {
            let column = index % interior_width;
            let row = index / interior_width;
            let x = if row % 2 == 0 {
                heading = Direction::Right;
                column
            } else {
                heading = Direction::Left;
                interior_width - column - 1
            };

            // Interior coordinates are bounded by u16 dimensions.
            body.push_front(Position {
                x: x as i32 + 1,
                y: row as i32 + 1,
            });
        }

        Self {
            body,
            heading,
            pending_heading: heading,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        Self {
            body: VecDeque::from(segments),
            heading: direction,
            pending_heading: direction,
        }
    }

    /// Stores `direction` for the next step unless it reverses the current
    /// heading. Returns whether the request was accepted.
    pub fn request_heading(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.heading, direction) {
            return false;
        }

        self.pending_heading = direction;
        true
    }

    /// Returns the head position for the next movement step.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().step(self.pending_heading)
    }

    /// Makes the pending heading the current one.
    pub fn commit_heading(&mut self) {
        self.heading = self.pending_heading;
    }

    /// Moves the head to `next_head`, shifting every segment forward.
    ///
    /// Returns the cell vacated by the tail.
    pub fn shift_to(&mut self, next_head: Position) -> Option<Position> {
        self.body.push_front(next_head);
        self.body.pop_back()
    }

    /// Appends a tail segment at `position`.
    pub fn grow_at(&mut self, position: Position) {
        self.body.push_back(position);
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the heading used by the last committed step.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Returns the heading the next step will use.
    #[must_use]
    pub fn pending_heading(&self) -> Direction {
        self.pending_heading
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
