//! Strongly-typed domain types for safer APIs.
//!
//! - [`Direction`]: grid direction (`X1`, `X2`, `X3`) instead of bare integers
//! - [`Sides`]: named `left`/`right` pair for per-direction boundary data
//! - [`StateLayout`]: which conservative variables carry diffusive physics
//!
//! # Example
//!
//! ```
//! use rkl_rs::types::{Direction, Sides, StateLayout};
//!
//! assert_eq!(Direction::X2.offsets(), [0, 1, 0]);
//!
//! let ghosts = Sides::uniform(2usize);
//! assert_eq!(ghosts.left + ghosts.right, 4);
//!
//! // Density followed by three momentum components.
//! let layout = StateLayout::new(4, 1, 3);
//! assert_eq!(layout.diffused().collect::<Vec<_>>(), vec![1, 2, 3]);
//! ```

mod direction;
mod indices;
mod layout;
mod sides;

pub use direction::Direction;
pub use indices::CellIndex;
pub use layout::StateLayout;
pub use sides::Sides;
