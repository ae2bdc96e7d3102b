//! Numeric primitives.

pub mod normal;

pub use normal::{norm_cdf, norm_ppf};
