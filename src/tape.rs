//! This module provides the `Tape` of a single-tape Turing Machine: a virtually infinite
//! sequence of cells which grows to the left and to the right as the head visits new cells.
//!
//! Cells live in an arena and refer to their neighbours by index, so the doubly-linked
//! shape of the tape never needs shared ownership.

use crate::types::{Direction, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cell {
    symbol: Symbol,
    left: Option<usize>,
    right: Option<usize>,
}

impl Cell {
    fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            left: None,
            right: None,
        }
    }
}

/// An unbounded tape with a movable read/write head.
///
/// The tape is never empty: the head always points at some cell. Cells are only
/// allocated when the head moves into territory that has not been visited yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    blank: Symbol,
    cells: Vec<Cell>,
    head: usize,
    leftmost: usize,
    /// Offset of the head from the leftmost cell.
    position: usize,
}

impl Tape {
    /// Creates a tape holding `content`, one cell per character, with the head on the
    /// first cell. An empty `content` yields a tape with a single blank cell.
    pub fn new(blank: Symbol, content: &str) -> Self {
        let mut cells: Vec<Cell> = content.chars().map(Cell::new).collect();
        if cells.is_empty() {
            cells.push(Cell::new(blank));
        }

        for i in 1..cells.len() {
            cells[i - 1].right = Some(i);
            cells[i].left = Some(i - 1);
        }

        Self {
            blank,
            cells,
            head: 0,
            leftmost: 0,
            position: 0,
        }
    }

    /// Returns the symbol under the head.
    pub fn read_head(&self) -> Symbol {
        self.cells[self.head].symbol
    }

    /// Overwrites the symbol under the head.
    pub fn write_head(&mut self, symbol: Symbol) {
        self.cells[self.head].symbol = symbol;
    }

    /// Moves the head one cell to the left, allocating a blank cell if needed.
    pub fn move_left(&mut self) {
        self.head = match self.cells[self.head].left {
            Some(left) => {
                self.position -= 1;
                left
            }
            None => {
                let index = self.allocate();
                self.cells[index].right = Some(self.head);
                self.cells[self.head].left = Some(index);
                self.leftmost = index;
                index
            }
        };
    }

    /// Moves the head one cell to the right, allocating a blank cell if needed.
    pub fn move_right(&mut self) {
        self.position += 1;
        self.head = match self.cells[self.head].right {
            Some(right) => right,
            None => {
                let index = self.allocate();
                self.cells[index].left = Some(self.head);
                self.cells[self.head].right = Some(index);
                index
            }
        };
    }

    /// Moves the head according to `direction`.
    pub fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Stay => {}
        }
    }

    /// Returns the visited content with leading and trailing blanks removed.
    ///
    /// | □ | □ | a | □ | b | □ |
    ///
    /// yields `"a□b"`. An all-blank tape yields an empty string.
    pub fn content(&self) -> String {
        let symbols = self.symbols();
        let start = symbols.iter().position(|&s| s != self.blank);
        let end = symbols.iter().rposition(|&s| s != self.blank);

        match (start, end) {
            (Some(start), Some(end)) => symbols[start..=end].iter().collect(),
            _ => String::new(),
        }
    }

    /// Returns every visited cell from leftmost to rightmost, blanks included.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.walk(Some(self.leftmost)).collect()
    }

    /// Splits the visited cells into those left of the head, the head symbol, and those
    /// right of the head.
    pub fn split(&self) -> (String, Symbol, String) {
        let left = self.walk(Some(self.leftmost)).take(self.position()).collect();
        let right = self.walk(self.cells[self.head].right).collect();

        (left, self.read_head(), right)
    }

    /// Returns the offset of the head from the leftmost visited cell.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of visited cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a tape holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the blank symbol of this tape.
    pub fn blank(&self) -> Symbol {
        self.blank
    }

    fn allocate(&mut self) -> usize {
        self.cells.push(Cell::new(self.blank));
        self.cells.len() - 1
    }

    fn walk(&self, start: Option<usize>) -> impl Iterator<Item = Symbol> + '_ {
        std::iter::successors(start, move |&index| self.cells[index].right)
            .map(move |index| self.cells[index].symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLANK: char = '□';

    #[test]
    fn test_new_tape() {
        let tape = Tape::new(BLANK, "Hello");

        assert_eq!(tape.content(), "Hello");
        assert_eq!(tape.read_head(), 'H');
        assert_eq!(tape.position(), 0);
        assert_eq!(tape.len(), 5);
    }

    #[test]
    fn test_empty_content_is_single_blank() {
        let tape = Tape::new(BLANK, "");

        assert_eq!(tape.len(), 1);
        assert!(!tape.is_empty());
        assert_eq!(tape.read_head(), BLANK);
        assert_eq!(tape.content(), "");
    }

    #[test]
    fn test_walk_write_and_extend() {
        let mut tape = Tape::new(BLANK, "Hello");

        tape.move_right(); // e
        assert_eq!(tape.read_head(), 'e');

        tape.move_right(); // l
        tape.write_head('x');
        tape.move_right(); // l
        tape.write_head('y');
        tape.move_right(); // o
        assert_eq!(tape.read_head(), 'o');

        tape.move_right(); // blank right 1
        assert_eq!(tape.read_head(), BLANK);
        tape.move_right(); // blank right 2
        tape.move_right(); // blank right 3
        assert_eq!(tape.read_head(), BLANK);

        for _ in 0..4 {
            tape.move_left();
        }
        assert_eq!(tape.read_head(), 'y');

        tape.move_left(); // x
        assert_eq!(tape.read_head(), 'x');

        tape.move_left(); // e
        tape.move_left(); // H
        assert_eq!(tape.read_head(), 'H');

        tape.move_left(); // blank left 1
        assert_eq!(tape.read_head(), BLANK);
        tape.move_left(); // blank left 2
        tape.move_left(); // blank left 3
        assert_eq!(tape.read_head(), BLANK);

        assert_eq!(tape.len(), 11);
        assert_eq!(tape.position(), 0);
        assert_eq!(tape.content(), "Hexyo");
    }

    #[test]
    fn test_symmetric_moves_return_to_same_cell() {
        for n in [1, 3, 10] {
            let mut tape = Tape::new(BLANK, "ab");
            tape.move_right();

            for _ in 0..n {
                tape.move_left();
            }
            for _ in 0..n {
                tape.move_right();
            }

            assert_eq!(tape.read_head(), 'b');
            assert_eq!(tape.position(), n);
            assert_eq!(tape.content(), "ab");
        }
    }

    #[test]
    fn test_fresh_cells_read_blank() {
        let mut tape = Tape::new(BLANK, "a");

        tape.move_left();
        assert_eq!(tape.read_head(), BLANK);
        tape.write_head('z');
        tape.move_right();
        tape.move_right();
        assert_eq!(tape.read_head(), BLANK);

        assert_eq!(tape.symbols(), vec!['z', 'a', BLANK]);
        assert_eq!(tape.content(), "za");
    }

    #[test]
    fn test_content_trims_both_ends_independently() {
        let tape = Tape::new(BLANK, "□□a□b□□");
        assert_eq!(tape.content(), "a□b");

        let trimmed = Tape::new(BLANK, "a□b");
        assert_eq!(trimmed.content(), "a□b");
        assert_eq!(Tape::new(BLANK, &trimmed.content()).content(), "a□b");
    }

    #[test]
    fn test_all_blank_content() {
        let mut tape = Tape::new(BLANK, "x");
        tape.write_head(BLANK);
        tape.move_left();
        tape.move_right();
        tape.move_right();

        assert_eq!(tape.content(), "");
    }

    #[test]
    fn test_split_around_head() {
        let mut tape = Tape::new(BLANK, "abc");
        tape.move_right();

        assert_eq!(tape.split(), ("a".to_string(), 'b', "c".to_string()));

        tape.move_left();
        tape.move_left();
        assert_eq!(tape.split(), (String::new(), BLANK, "abc".to_string()));
    }

    #[test]
    fn test_position_follows_head() {
        let mut tape = Tape::new(BLANK, "abc");
        let moves = "RRRRLLLLLLLRRLRRRRRRLL";

        for (i, m) in moves.chars().enumerate() {
            match m {
                'L' => tape.move_left(),
                _ => tape.move_right(),
            }

            let (left, _, _) = tape.split();
            assert_eq!(tape.position(), left.chars().count(), "after move {i}");
        }

        assert_eq!(tape.position(), 5);
        assert_eq!(tape.len(), 8);
    }

    #[test]
    fn test_move_head_directions() {
        let mut tape = Tape::new(BLANK, "ab");

        tape.move_head(Direction::Stay);
        assert_eq!(tape.read_head(), 'a');

        tape.move_head(Direction::Right);
        assert_eq!(tape.read_head(), 'b');

        tape.move_head(Direction::Left);
        tape.move_head(Direction::Left);
        assert_eq!(tape.read_head(), BLANK);
        assert_eq!(tape.len(), 3);
    }
}
