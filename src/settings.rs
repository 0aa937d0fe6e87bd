//! Configuration values shared by level loading, search and path following.
//!
//! Nothing in the crate reads global state: a [Settings] value is handed to
//! [Grid::build_with](crate::Grid::build_with) and a [MoverSettings] to
//! [PathFollower::new](crate::PathFollower::new).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The surface kinds a level can be made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TileKind {
    /// Nothing at this coordinate.
    None,
    /// Open water. Produces no tile.
    Water,
    Dirt,
    Grass,
    Sand,
    Mountain,
}

impl TileKind {
    /// Whether a tile of this kind exists at all.
    pub fn has_tile(&self) -> bool {
        !matches!(self, TileKind::None | TileKind::Water)
    }
}

/// Traversal cost per [TileKind]. A cost of [None] means the tile exists but cannot be entered.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileCosts {
    pub dirt: Option<u32>,
    pub grass: Option<u32>,
    pub sand: Option<u32>,
    pub mountain: Option<u32>,
}

impl Default for TileCosts {
    fn default() -> TileCosts {
        TileCosts {
            dirt: Some(1),
            grass: Some(2),
            sand: Some(3),
            mountain: Some(10),
        }
    }
}

impl TileCosts {
    /// Cost of entering a tile of the given kind, [None] if it cannot be entered or has no tile.
    pub fn cost(&self, kind: TileKind) -> Option<u32> {
        match kind {
            TileKind::None | TileKind::Water => None,
            TileKind::Dirt => self.dirt,
            TileKind::Grass => self.grass,
            TileKind::Sand => self.sand,
            TileKind::Mountain => self.mountain,
        }
    }
}

/// Movement tuning for a [PathFollower](crate::PathFollower).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoverSettings {
    /// World units per second on expensive tiles.
    pub walk_speed: f32,
    /// World units per second on cheap tiles.
    pub run_speed: f32,
    /// Highest tile cost on which the mover still runs.
    pub max_run_cost: u32,
    /// Time constant of the critically damped direction smoothing, in seconds.
    pub smooth_time: f32,
}

impl Default for MoverSettings {
    fn default() -> MoverSettings {
        MoverSettings {
            walk_speed: 1.0,
            run_speed: 2.0,
            max_run_cost: 10,
            smooth_time: 0.03,
        }
    }
}

impl MoverSettings {
    /// Speed on a tile with the given cost. Off-grid positions walk.
    pub fn speed_for(&self, cost: Option<u32>) -> f32 {
        if self.runs_on(cost) {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    pub fn runs_on(&self, cost: Option<u32>) -> bool {
        cost.is_some_and(|c| c <= self.max_run_cost)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// World size of one tile along x and z.
    pub map_scale: f32,
    pub tile_costs: TileCosts,
    pub mover: MoverSettings,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            map_scale: 1.0,
            tile_costs: TileCosts::default(),
            mover: MoverSettings::default(),
        }
    }
}
