use serde::{Deserialize, Serialize};

use crate::domain::elements::{ElementId, EL_EMPTY};

/// Stable id of a pixel body
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who may mutate a cell. A grid slot holding a `Body` cell is a read-only mirror for the
/// grid pass; only the named body writes or clears it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Grid,
    Body(BodyId),
}

/// One grid slot's instance state
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub element: ElementId,
    pub color: u32,
    pub base_color: u32,
    pub temperature: f32,
    pub health: i32,
    pub ignited: bool,
    pub sliding: bool,
    /// Remembered diagonal slide direction: -1, 0 or 1
    pub bias: i8,
    /// Equals the grid phase bit once the cell was processed in the current tick
    pub updated: bool,
    pub owner: Owner,
}

impl Cell {
    pub fn empty(temperature: f32, updated: bool) -> Self {
        Self {
            element: EL_EMPTY,
            color: 0,
            base_color: 0,
            temperature,
            health: 0,
            ignited: false,
            sliding: false,
            bias: 0,
            updated,
            owner: Owner::Grid,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.element == EL_EMPTY
    }

    /// Owned by a body (the `rigid` flag of the data model)
    #[inline]
    pub fn is_rigid(&self) -> bool {
        matches!(self.owner, Owner::Body(_))
    }

    #[inline]
    pub fn is_owned_by(&self, body: BodyId) -> bool {
        self.owner == Owner::Body(body)
    }
}
