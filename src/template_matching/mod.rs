/// Template matching for glyph detection in captured regions
///
/// This module provides:
/// - Zero-mean normalized correlation over intensity and edge channels
/// - Multi-scale search with scales evaluated in parallel
/// - Deterministic tie-breaking (first scale, then first position wins)
pub mod matcher;
pub mod types;

pub use matcher::{SearchImage, default_scales, linspace, match_multi_scale, QUICK_SCALES};
pub use types::{MatchResult, Plane, Template};
