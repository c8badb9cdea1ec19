//! # Grid Mathematics
//!
//! Integer line rasterising for sight casts.

use crate::Position;

/// Iterator over the cells of a Bresenham line, both endpoints included.
///
/// ```
/// use delve::{BresenhamLine, Position};
///
/// let cells: Vec<Position> = BresenhamLine::new(Position::new(0, 0), Position::new(3, 1)).collect();
/// assert_eq!(cells.first(), Some(&Position::new(0, 0)));
/// assert_eq!(cells.last(), Some(&Position::new(3, 1)));
/// assert_eq!(cells.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    current: Position,
    end: Position,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(start: Position, end: Position) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = -(end.y - start.y).abs();
        Self {
            current: start,
            end,
            dx,
            dy,
            sx: if start.x < end.x { 1 } else { -1 },
            sy: if start.y < end.y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.done {
            return None;
        }

        let cell = self.current;
        if cell == self.end {
            self.done = true;
            return Some(cell);
        }

        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.current.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.current.y += self.sy;
        }
        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Position> {
        BresenhamLine::new(Position::new(x0, y0), Position::new(x1, y1)).collect()
    }

    #[test]
    fn test_single_point() {
        assert_eq!(line(4, 4, 4, 4), vec![Position::new(4, 4)]);
    }

    #[test]
    fn test_straight_and_diagonal_lines() {
        assert_eq!(line(0, 0, 3, 0).len(), 4);
        assert_eq!(line(2, 5, 2, 1).len(), 5);
        assert_eq!(
            line(0, 0, 3, 3),
            vec![
                Position::new(0, 0),
                Position::new(1, 1),
                Position::new(2, 2),
                Position::new(3, 3)
            ]
        );
    }

    #[test]
    fn test_steps_are_adjacent() {
        let cells = line(-3, 7, 9, -2);
        assert_eq!(cells.len(), 13);
        for pair in cells.windows(2) {
            let delta = pair[1] - pair[0];
            assert!(delta.x.abs() <= 1 && delta.y.abs() <= 1);
            assert_ne!(pair[0], pair[1]);
        }
    }
}
