#![no_std] // Keeps the shared vocabulary usable from WASM/embedded front-ends

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod model;

// Re-export core types for convenience
pub use ids::TokenIndex;
pub use model::*;
