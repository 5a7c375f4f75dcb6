//! Inventory grid, crafting grid, and the cursor-held slot.
//!
//! Every item lives in exactly one place: a main-grid cell, a crafting cell, or
//! the cursor. Clicks move items between those places through [`Inventory::click`],
//! and every transition except [`Transition::Discard`] conserves the total count.

use serde::{Deserialize, Serialize};
use skafos_core::{ItemKind, TileFrame};
use tracing::trace;

/// Side length of the crafting grid.
pub const CRAFTING_SIZE: usize = 3;

/// Column/row address inside a grid. Row 0 of the main grid is the hot-bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridPos {
    /// Column, from the left.
    pub col: usize,
    /// Row, from the hot-bar.
    pub row: usize,
}

impl GridPos {
    /// Cell at `col`, `row`.
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Which grid an item cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Container {
    /// The main grid.
    #[default]
    Inventory,
    /// The crafting grid.
    Crafting,
}

/// Where a pointer click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum SlotTarget {
    /// A main-grid cell.
    Inventory {
        /// Column.
        col: usize,
        /// Row; 0 is the hot-bar.
        row: usize,
    },
    /// A crafting-grid cell.
    Crafting {
        /// Column.
        col: usize,
        /// Row.
        row: usize,
    },
    /// Discards whatever the cursor holds.
    Trash,
}

/// Mouse button of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
}

/// A stack of one item kind with a positive amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Item kind of the stack.
    pub kind: ItemKind,
    /// Icon drawn in the slot.
    pub frame: TileFrame,
    /// Units in the stack.
    pub amount: u32,
    /// Cell the item occupies, or for the cursor item, the cell it was lifted from.
    pub grid_position: GridPos,
    /// Grid that `grid_position` refers to.
    pub container: Container,
}

impl InventoryItem {
    /// Stack with the icon frame of `kind`.
    pub fn new(kind: ItemKind, amount: u32, grid_position: GridPos, container: Container) -> Self {
        Self {
            kind,
            frame: kind.icon_frame(),
            amount,
            grid_position,
            container,
        }
    }

    /// Take `amount` units into a new stack at the same slot.
    ///
    /// Refuses zero and anything that would leave this stack empty.
    pub fn split(&mut self, amount: u32) -> Option<InventoryItem> {
        if amount == 0 || amount >= self.amount {
            return None;
        }
        self.amount -= amount;
        Some(InventoryItem {
            amount,
            ..self.clone()
        })
    }
}

/// Result of a single click, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum Transition {
    /// Nothing moved.
    NoOp,
    /// Cursor item dropped into an empty cell.
    Place,
    /// Cell item lifted onto the empty cursor.
    PickUp,
    /// Cursor stack added into a same-kind cell stack.
    Merge,
    /// Cursor and cell items exchanged.
    Swap,
    /// Half the cell stack (rounded down) lifted onto the cursor.
    Split {
        /// Units lifted.
        taken: u32,
    },
    /// One unit moved from the cursor into the cell.
    DepositOne,
    /// Cursor stack destroyed by the trash slot.
    Discard {
        /// Units destroyed.
        amount: u32,
    },
}

/// Fixed-size grid of optional stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: usize,
    rows: usize,
    container: Container,
    cells: Vec<Option<InventoryItem>>,
}

impl Grid {
    /// Grid of empty cells.
    pub fn new(columns: usize, rows: usize, container: Container) -> Self {
        Self {
            columns,
            rows,
            container,
            cells: vec![None; columns * rows],
        }
    }

    /// Grid width in cells.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Grid height in cells.
    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        (pos.col < self.columns && pos.row < self.rows).then(|| pos.row * self.columns + pos.col)
    }

    /// Whether `pos` addresses a cell of this grid.
    pub fn contains(&self, pos: GridPos) -> bool {
        self.index(pos).is_some()
    }

    /// Stack at `pos`, if any.
    pub fn get(&self, pos: GridPos) -> Option<&InventoryItem> {
        self.index(pos).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Mutable stack at `pos`, if any.
    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut InventoryItem> {
        let idx = self.index(pos)?;
        self.cells[idx].as_mut()
    }

    /// Remove and return the item at `pos`.
    pub fn take(&mut self, pos: GridPos) -> Option<InventoryItem> {
        let idx = self.index(pos)?;
        self.cells[idx].take()
    }

    /// Put an item at `pos`, returning whatever was there. The item's address is rewritten.
    ///
    /// Out-of-range positions hand the item straight back.
    pub fn put(&mut self, pos: GridPos, mut item: InventoryItem) -> Option<InventoryItem> {
        let Some(idx) = self.index(pos) else {
            return Some(item);
        };
        item.grid_position = pos;
        item.container = self.container;
        self.cells[idx].replace(item)
    }

    /// Occupied cells in row-major order.
    pub fn items(&self) -> impl Iterator<Item = &InventoryItem> + '_ {
        self.cells.iter().flatten()
    }

    /// First empty cell in row-major order.
    pub fn first_empty(&self) -> Option<GridPos> {
        self.cells
            .iter()
            .position(Option::is_none)
            .map(|idx| GridPos::new(idx % self.columns, idx / self.columns))
    }

    /// First stack of `kind` in row-major order.
    pub fn find_kind(&self, kind: ItemKind) -> Option<GridPos> {
        self.items()
            .find(|item| item.kind == kind)
            .map(|item| item.grid_position)
    }

    /// Units across every cell.
    pub fn total_count(&self) -> u64 {
        self.items().map(|item| u64::from(item.amount)).sum()
    }
}

/// Player inventory: main grid (row 0 = hot-bar), crafting grid, cursor slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    grid: Grid,
    crafting: Grid,
    cursor: Option<InventoryItem>,
    selected: usize,
}

impl Inventory {
    /// Empty inventory with a `columns` x `rows` main grid.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            grid: Grid::new(columns, rows, Container::Inventory),
            crafting: Grid::new(CRAFTING_SIZE, CRAFTING_SIZE, Container::Crafting),
            cursor: None,
            selected: 0,
        }
    }

    /// Main grid; row 0 is the hot-bar.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Crafting grid.
    pub fn crafting(&self) -> &Grid {
        &self.crafting
    }

    /// Item riding the pointer, if any.
    pub fn cursor(&self) -> Option<&InventoryItem> {
        self.cursor.as_ref()
    }

    /// Selected hot-bar column.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select a hot-bar column. Columns past the grid width are ignored.
    pub fn select_hotbar(&mut self, col: usize) -> bool {
        if col >= self.grid.columns {
            return false;
        }
        self.selected = col;
        true
    }

    /// Stack in the selected hot-bar cell.
    pub fn held(&self) -> Option<&InventoryItem> {
        self.grid.get(GridPos::new(self.selected, 0))
    }

    /// Remove one unit from the selected hot-bar stack.
    pub fn take_one_held(&mut self) -> Option<ItemKind> {
        let pos = GridPos::new(self.selected, 0);
        let item = self.grid.get_mut(pos)?;
        let kind = item.kind;
        item.amount -= 1;
        if item.amount == 0 {
            self.grid.take(pos);
        }
        Some(kind)
    }

    /// Put `item` into a main-grid cell directly, replacing what was there.
    pub fn set(&mut self, pos: GridPos, item: InventoryItem) -> Option<InventoryItem> {
        self.grid.put(pos, item)
    }

    /// Add world-acquired items: grow the first same-kind stack, else fill the first empty
    /// cell. A stack that would overflow `u32` is not grown. Returns false, leaving the
    /// inventory untouched, when there is no room.
    pub fn add_item(&mut self, kind: ItemKind, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        if let Some(item) = self
            .grid
            .find_kind(kind)
            .and_then(|pos| self.grid.get_mut(pos))
        {
            if let Some(total) = item.amount.checked_add(amount) {
                item.amount = total;
                return true;
            }
        }
        match self.grid.first_empty() {
            Some(pos) => {
                self.grid
                    .put(pos, InventoryItem::new(kind, amount, pos, Container::Inventory));
                true
            }
            None => {
                trace!(?kind, amount, "inventory full");
                false
            }
        }
    }

    /// Units across the main grid, crafting grid, and cursor.
    pub fn total_count(&self) -> u64 {
        self.grid.total_count()
            + self.crafting.total_count()
            + self.cursor.as_ref().map_or(0, |item| u64::from(item.amount))
    }

    /// Units of `kind` in the main grid.
    pub fn count_of(&self, kind: ItemKind) -> u64 {
        self.grid
            .items()
            .filter(|item| item.kind == kind)
            .map(|item| u64::from(item.amount))
            .sum()
    }

    /// Apply a pointer click to a slot.
    pub fn click(&mut self, target: SlotTarget, button: PointerButton) -> Transition {
        let (grid, pos) = match target {
            SlotTarget::Trash => return self.click_trash(button),
            SlotTarget::Inventory { col, row } => (&mut self.grid, GridPos::new(col, row)),
            SlotTarget::Crafting { col, row } => (&mut self.crafting, GridPos::new(col, row)),
        };
        if !grid.contains(pos) {
            trace!(?target, "click outside grid ignored");
            return Transition::NoOp;
        }

        let transition = match button {
            PointerButton::Left => Self::left_click(grid, pos, &mut self.cursor),
            PointerButton::Right => Self::right_click(grid, pos, &mut self.cursor),
        };
        trace!(?target, ?button, ?transition, "inventory click");
        transition
    }

    fn click_trash(&mut self, button: PointerButton) -> Transition {
        if button != PointerButton::Left {
            return Transition::NoOp;
        }
        match self.cursor.take() {
            Some(item) => {
                trace!(kind = ?item.kind, amount = item.amount, "cursor item discarded");
                Transition::Discard {
                    amount: item.amount,
                }
            }
            None => Transition::NoOp,
        }
    }

    fn left_click(grid: &mut Grid, pos: GridPos, cursor: &mut Option<InventoryItem>) -> Transition {
        let Some(held) = cursor.take() else {
            return match grid.take(pos) {
                Some(item) => {
                    *cursor = Some(item);
                    Transition::PickUp
                }
                None => Transition::NoOp,
            };
        };

        match grid.get_mut(pos) {
            None => {
                grid.put(pos, held);
                Transition::Place
            }
            Some(item) if item.kind == held.kind => match item.amount.checked_add(held.amount) {
                Some(total) => {
                    item.amount = total;
                    Transition::Merge
                }
                None => {
                    *cursor = Some(held);
                    Transition::NoOp
                }
            },
            Some(_) => {
                *cursor = grid.put(pos, held);
                Transition::Swap
            }
        }
    }

    fn right_click(grid: &mut Grid, pos: GridPos, cursor: &mut Option<InventoryItem>) -> Transition {
        if cursor.is_none() {
            let Some(item) = grid.get_mut(pos) else {
                return Transition::NoOp;
            };
            let half = item.amount / 2;
            let Some(taken) = item.split(half) else {
                return Transition::NoOp;
            };
            *cursor = Some(taken);
            return Transition::Split { taken: half };
        }

        let Some(held) = cursor.as_mut() else {
            return Transition::NoOp;
        };
        let container = grid.container;
        match grid.get_mut(pos) {
            Some(item) if item.kind == held.kind => match item.amount.checked_add(1) {
                Some(total) => item.amount = total,
                None => return Transition::NoOp,
            },
            Some(_) => return Transition::NoOp,
            None => {
                grid.put(pos, InventoryItem::new(held.kind, 1, pos, container));
            }
        }
        held.amount -= 1;
        if held.amount == 0 {
            *cursor = None;
        }
        Transition::DepositOne
    }

    /// Put the cursor item back: its origin cell (merging when the kinds match), else the
    /// first free main-grid cell. Returns the item when neither has room.
    pub fn return_cursor_item(&mut self) -> Option<InventoryItem> {
        let item = self.cursor.take()?;
        let grid = match item.container {
            Container::Inventory => &mut self.grid,
            Container::Crafting => &mut self.crafting,
        };
        let origin = item.grid_position;
        let in_range = grid.contains(origin);
        match grid.get_mut(origin) {
            None if in_range => {
                grid.put(origin, item);
                return None;
            }
            Some(existing) if existing.kind == item.kind => {
                if let Some(total) = existing.amount.checked_add(item.amount) {
                    existing.amount = total;
                    return None;
                }
            }
            _ => {}
        }

        match self.grid.first_empty() {
            Some(pos) => {
                self.grid.put(pos, item);
                None
            }
            None => Some(item),
        }
    }
}
