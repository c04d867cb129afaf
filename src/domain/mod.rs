pub mod material;
pub mod registry;
pub mod reactions;
pub mod content;
pub mod defaults;
