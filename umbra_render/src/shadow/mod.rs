/// Shadow-map layout, cascade math, and per-frame shadow caster packing

pub mod grid_layout;
pub mod shadow_atlas;
pub mod cascade;
pub mod directional_shadow_map_array;
pub mod punctual_shadow_atlas;

pub use grid_layout::GridLayout;
pub use shadow_atlas::{Cell, ShadowAtlas, Subcell};
pub use cascade::*;
pub use directional_shadow_map_array::DirectionalShadowMapArray;
pub use punctual_shadow_atlas::*;
