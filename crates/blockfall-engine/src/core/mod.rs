//! Board geometry: cells, pieces, collision and rotation.
//!
//! Everything here is a pure function of its inputs. Time, input and the
//! random source live in [`engine`](crate::engine).

pub use self::{board::*, collision::*, piece::*, rotation::*};

pub(crate) mod board;
pub(crate) mod collision;
pub(crate) mod piece;
pub(crate) mod rotation;
