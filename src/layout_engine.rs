mod placement;
pub mod systems;
pub mod utils;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

pub use placement::{MAX_SECONDARIES, Placement, PlacementRequest, compute_placement, resolve_layout};
pub use systems::{ColumnLayout, LayoutSystem, LayoutSystemKind, SeparateLayout, Slot, SquareLayout};

/// How secondary windows are tiled relative to the primary window.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Layout {
    /// Primary fills its display; secondaries share the other display.
    Separate,
    /// Secondaries in a two-column grid left of the primary.
    SquareLeft,
    /// Secondaries in a two-column grid right of the primary.
    SquareRight,
    /// Secondaries stacked in a column left of the primary.
    ColumnLeft,
    /// Secondaries stacked in a column right of the primary.
    ColumnRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Layout {
    /// Falls back to a simpler layout when there are too few secondaries for
    /// this one to make sense.
    pub fn demoted(self, secondary_count: usize) -> Layout {
        if secondary_count == 0 {
            return Layout::Separate;
        }
        if secondary_count < 3 {
            return match self {
                Layout::SquareLeft => Layout::ColumnLeft,
                Layout::SquareRight => Layout::ColumnRight,
                other => other,
            };
        }
        self
    }

    /// Whether secondaries share the primary's display under this layout.
    pub fn shares_primary_display(self) -> bool { self != Layout::Separate }
}
