use std::collections::HashMap;

/// Sparse, unbounded byte memory with a cursor.
///
/// Cells that were never written read as 0. Addresses extend in both
/// directions; the cursor starts at 0 and may go negative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    // Only non-zero cells are stored.
    cells: HashMap<i64, u8>,
    cursor: i64,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn read_cell(&self) -> u8 {
        self.read_at(self.cursor)
    }

    pub fn read_at(&self, address: i64) -> u8 {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    /// Replace the cell under the cursor with `f(current)`.
    pub fn write_cell(&mut self, f: impl FnOnce(u8) -> u8) {
        self.write_at(self.cursor, f);
    }

    pub fn write_at(&mut self, address: i64, f: impl FnOnce(u8) -> u8) {
        let value = f(self.read_at(address));
        if value == 0 {
            self.cells.remove(&address);
        } else {
            self.cells.insert(address, value);
        }
    }

    pub fn move_right(&mut self) {
        self.cursor += 1;
    }

    pub fn move_left(&mut self) {
        self.cursor -= 1;
    }

    /// Non-zero cells in ascending address order.
    pub fn cells(&self) -> Vec<(i64, u8)> {
        let mut cells: Vec<(i64, u8)> = self.cells.iter().map(|(&a, &v)| (a, v)).collect();
        cells.sort_unstable_by_key(|&(address, _)| address);
        cells
    }
}
