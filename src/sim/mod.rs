//! Deterministic simulation module
//!
//! Everything that moves or changes color lives here. This module must stay
//! pure and deterministic:
//! - One step per host frame, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (pool insertion order)
//! - No rendering or platform dependencies

pub mod entity;
pub mod palette;
pub mod physics;
pub mod pool;
pub mod scheduler;
pub mod tier;

pub use entity::{PearlKind, Primary, Secondary, ShapeSet, ThemeParams, Viewport, VisualState};
pub use palette::{AUTUMN_PALETTE, ColorTreatment, DEFAULT_PALETTE, PaletteEntry, Rgb};
pub use physics::{clamp_into, collide_pair, resolve_collisions, step};
pub use pool::{ColorCount, ShapePool};
pub use scheduler::{Scheduler, Task};
pub use tier::{EffectAction, Tier, TierThresholds, plan_correct};
