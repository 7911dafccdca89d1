use std::fmt;

use super::entity::{Bomb, Defender, Invader, Missile};

/// Contents of a single grid cell.
///
/// The discriminants match the cell codes external renderers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Defender = 1,
    Invader = 2,
    Missile = 3,
    Bomb = 4,
}

impl Cell {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Defender => 'A',
            Cell::Invader => 'W',
            Cell::Missile => '|',
            Cell::Bomb => '*',
        }
    }
}

/// Row-major projection of entity positions onto the playing field.
///
/// The grid is never a source of truth: the environment rebuilds it from entity state after
/// every transition. Entities are drawn in the order defender, invader, missile, bomb, so a
/// later entity hides an earlier one sharing its cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the cell at `(row, column)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<Cell> {
        if row >= self.rows || column >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + column])
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.cols)
    }

    /// Counts cells holding `cell`.
    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    pub(crate) fn project(
        &mut self,
        defender_row: usize,
        defender: &Defender,
        invader: &Invader,
        missile: Option<&Missile>,
        bomb: Option<&Bomb>,
    ) {
        self.cells.fill(Cell::Empty);
        self.set(defender_row, defender.column, Cell::Defender);
        self.set(invader.row, invader.column, Cell::Invader);
        if let Some(missile) = missile {
            self.set(missile.row, missile.column, Cell::Missile);
        }
        if let Some(bomb) = bomb {
            self.set(bomb.row, bomb.column, Cell::Bomb);
        }
    }

    fn set(&mut self, row: usize, column: usize, cell: Cell) {
        debug_assert!(row < self.rows && column < self.cols);
        self.cells[row * self.cols + column] = cell;
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows_iter() {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    #[test]
    fn test_projection_places_each_entity() {
        let mut grid = Grid::new(4, 3);
        grid.project(
            3,
            &Defender { column: 1 },
            &Invader {
                row: 0,
                column: 2,
                direction: Direction::Left,
            },
            Some(&Missile { row: 2, column: 1 }),
            Some(&Bomb { row: 1, column: 2 }),
        );
        assert_eq!(grid.get(3, 1), Some(Cell::Defender));
        assert_eq!(grid.get(0, 2), Some(Cell::Invader));
        assert_eq!(grid.get(2, 1), Some(Cell::Missile));
        assert_eq!(grid.get(1, 2), Some(Cell::Bomb));
        assert_eq!(grid.count(Cell::Empty), 8);
        assert_eq!(grid.get(4, 0), None);
    }

    #[test]
    fn test_projection_clears_previous_frame() {
        let mut grid = Grid::new(3, 3);
        let invader = Invader {
            row: 0,
            column: 0,
            direction: Direction::Right,
        };
        grid.project(2, &Defender { column: 0 }, &invader, Some(&Missile { row: 1, column: 0 }), None);
        grid.project(2, &Defender { column: 2 }, &invader, None, None);
        assert_eq!(grid.count(Cell::Missile), 0);
        assert_eq!(grid.get(2, 0), Some(Cell::Empty));
        assert_eq!(grid.get(2, 2), Some(Cell::Defender));
    }

    #[test]
    fn test_display_one_line_per_row() {
        let mut grid = Grid::new(2, 3);
        grid.project(
            1,
            &Defender { column: 0 },
            &Invader {
                row: 0,
                column: 1,
                direction: Direction::Right,
            },
            None,
            None,
        );
        assert_eq!(grid.to_string(), ".W.\nA..\n");
    }
}
