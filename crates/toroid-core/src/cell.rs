//! The per-worker [`Cell`] and its [`CellKind`] tag.

/// Whether a cell takes part in relaxation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellKind {
    /// Updated by the relaxation rule every round.
    #[default]
    Free,
    /// Pinned: keeps its assigned value forever (boundary or source).
    Fixed,
}

impl CellKind {
    /// Decode the record type code used by the input stream (0 or 1).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Free),
            1 => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// One scalar value plus its [`CellKind`].
///
/// Owned exclusively by the worker mapped to it; other workers only ever
/// see its value through the exchange channel.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Cell {
    /// Free or fixed.
    pub kind: CellKind,
    /// Current scalar value.
    pub value: f64,
}

impl Cell {
    /// A free cell holding `value`.
    pub const fn free(value: f64) -> Self {
        Self {
            kind: CellKind::Free,
            value,
        }
    }

    /// A fixed cell pinned at `value`.
    pub const fn fixed(value: f64) -> Self {
        Self {
            kind: CellKind::Fixed,
            value,
        }
    }

    /// Whether the cell is pinned.
    pub fn is_fixed(&self) -> bool {
        self.kind == CellKind::Fixed
    }

    /// Commit a relaxed value. Fixed cells discard it.
    pub fn commit(&mut self, relaxed: f64) {
        if self.kind == CellKind::Free {
            self.value = relaxed;
        }
    }
}
