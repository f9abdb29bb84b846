pub mod compare;
pub mod distance;
pub mod error;
pub mod grid;
pub mod harness;
pub mod interp;
pub mod mesh;
pub mod naive;
pub mod nifti;
pub mod save;
pub mod types;
pub mod util;
pub mod vectorized;

pub use error::{Result, SphereMaskError};
pub use grid::GridSpec;
pub use harness::{HarnessConfig, TimingReport};
pub use save::save;
