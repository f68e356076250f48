//! The facility grid: a bounded map of cells with items on the floor.
//!
//! Cells and items are keyed by [`Position`] in `BTreeMap`s so every
//! iteration (nearest-item search, cell lookups) is deterministic.

use std::collections::BTreeMap;

use panopticon_types::enums::{CellKind, ItemKind};
use panopticon_types::ids::ItemId;
use panopticon_types::structs::{Item, Position};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A bounded grid of cells. Valid coordinates are `0..width` x `0..height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMap {
    /// Number of columns.
    pub width: i32,
    /// Number of rows.
    pub height: i32,
    /// Kind of every cell in the grid.
    pub cells: BTreeMap<Position, CellKind>,
    /// Items lying on the floor, keyed by cell.
    pub items: BTreeMap<Position, Vec<Item>>,
}

impl GameMap {
    /// Create an empty map of the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] unless both dimensions
    /// are at least 4 (the special cells need a bordered interior).
    pub fn new(width: i32, height: i32) -> Result<Self, WorldError> {
        if width < 4 || height < 4 {
            return Err(WorldError::InvalidDimensions {
                width,
                height,
                reason: String::from("both dimensions must be at least 4"),
            });
        }
        Ok(Self {
            width,
            height,
            cells: BTreeMap::new(),
            items: BTreeMap::new(),
        })
    }

    /// Whether a position lies inside the grid.
    pub const fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    /// Clamp a position onto the grid.
    pub fn clamp(&self, position: Position) -> Position {
        Position {
            x: position.x.clamp(0, self.width - 1),
            y: position.y.clamp(0, self.height - 1),
        }
    }

    /// The kind of the cell at `position`, if inside the grid.
    pub fn cell_kind(&self, position: Position) -> Option<CellKind> {
        self.cells.get(&position).copied()
    }

    /// First cell of the given kind in position order, if any.
    pub fn find_cell(&self, kind: CellKind) -> Option<Position> {
        self.cells
            .iter()
            .find(|(_, cell)| **cell == kind)
            .map(|(position, _)| *position)
    }

    /// Drop an item onto the floor at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for positions outside the grid.
    pub fn place_item(&mut self, position: Position, item: Item) -> Result<(), WorldError> {
        if !self.in_bounds(position) {
            return Err(WorldError::OutOfBounds(position));
        }
        self.items.entry(position).or_default().push(item);
        Ok(())
    }

    /// Items lying at `position`.
    pub fn items_at(&self, position: Position) -> &[Item] {
        self.items.get(&position).map_or(&[], Vec::as_slice)
    }

    /// Remove and return a specific item from the floor.
    pub fn take_item(&mut self, position: Position, item_id: ItemId) -> Option<Item> {
        let stack = self.items.get_mut(&position)?;
        let index = stack.iter().position(|item| item.id == item_id)?;
        let item = stack.remove(index);
        if stack.is_empty() {
            self.items.remove(&position);
        }
        Some(item)
    }

    /// Remove and return the first item of the given kind at `position`.
    pub fn take_item_of_kind(&mut self, position: Position, kind: ItemKind) -> Option<Item> {
        let id = self
            .items
            .get(&position)?
            .iter()
            .find(|item| item.kind == kind)
            .map(|item| item.id)?;
        self.take_item(position, id)
    }

    /// Count items of the given kind at `position`.
    pub fn count_items_of_kind(&self, position: Position, kind: ItemKind) -> usize {
        self.items_at(position)
            .iter()
            .filter(|item| item.kind == kind)
            .count()
    }

    /// Position of the nearest floor item of the given kind, by Manhattan
    /// distance from `from`. Ties resolve to the smaller position.
    pub fn nearest_item_of_kind(&self, from: Position, kind: ItemKind) -> Option<Position> {
        self.items
            .iter()
            .filter(|(_, stack)| stack.iter().any(|item| item.kind == kind))
            .map(|(position, _)| *position)
            .min_by_key(|position| (from.manhattan_distance(*position), *position))
    }

    /// Clear every item at `position`, returning how many were removed.
    pub fn clear_items(&mut self, position: Position) -> usize {
        self.items.remove(&position).map_or(0, |stack| stack.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn small_map() -> GameMap {
        GameMap::new(9, 16).unwrap()
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(GameMap::new(3, 16).is_err());
        assert!(GameMap::new(9, 0).is_err());
        assert!(GameMap::new(4, 4).is_ok());
    }

    #[test]
    fn bounds_and_clamp() {
        let map = small_map();
        assert!(map.in_bounds(Position::new(0, 0)));
        assert!(map.in_bounds(Position::new(8, 15)));
        assert!(!map.in_bounds(Position::new(9, 15)));
        assert!(!map.in_bounds(Position::new(-1, 3)));
        assert_eq!(map.clamp(Position::new(12, -4)), Position::new(8, 0));
    }

    #[test]
    fn place_take_roundtrip() {
        let mut map = small_map();
        let position = Position::new(4, 8);
        let item = Item::new("Water", "Clean drinking water", ItemKind::Water);
        let id = item.id;
        map.place_item(position, item).unwrap();
        assert_eq!(map.items_at(position).len(), 1);
        let taken = map.take_item(position, id).unwrap();
        assert_eq!(taken.id, id);
        assert!(map.items_at(position).is_empty());
        // Emptied stacks are removed entirely.
        assert!(!map.items.contains_key(&position));
    }

    #[test]
    fn place_out_of_bounds_fails() {
        let mut map = small_map();
        let item = Item::new("Book", "A worn paperback", ItemKind::Book);
        assert!(map.place_item(Position::new(20, 20), item).is_err());
    }

    #[test]
    fn nearest_item_prefers_manhattan_distance() {
        let mut map = small_map();
        map.place_item(
            Position::new(7, 14),
            Item::new("Food", "Prison meal", ItemKind::Food),
        )
        .unwrap();
        map.place_item(
            Position::new(2, 2),
            Item::new("Food", "Prison meal", ItemKind::Food),
        )
        .unwrap();
        let nearest = map.nearest_item_of_kind(Position::new(1, 1), ItemKind::Food);
        assert_eq!(nearest, Some(Position::new(2, 2)));
        // No books anywhere.
        assert_eq!(map.nearest_item_of_kind(Position::new(1, 1), ItemKind::Book), None);
    }

    #[test]
    fn take_item_of_kind_skips_other_kinds() {
        let mut map = small_map();
        let position = Position::new(4, 8);
        map.place_item(position, Item::new("Book", "A worn paperback", ItemKind::Book))
            .unwrap();
        map.place_item(position, Item::new("Food", "Prison meal", ItemKind::Food))
            .unwrap();
        let food = map.take_item_of_kind(position, ItemKind::Food).unwrap();
        assert_eq!(food.kind, ItemKind::Food);
        assert_eq!(map.count_items_of_kind(position, ItemKind::Book), 1);
    }
}
