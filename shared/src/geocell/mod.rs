//! Read-only domain model reconstructed from the `geocell_*` tables.
//!
//! Every value here lives for one query or export and is never written back.

mod cell;
mod location;
mod network;

pub use cell::{Cell, CellPolygon, PolygonKind, Technology};
pub use location::{Country, County, District, Location};
pub use network::{Band, MccMnc};
