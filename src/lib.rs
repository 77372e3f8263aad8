//! Nutrition log normalization service.
//!
//! [`normalize`] is the pure core that turns raw upstream records into canonical entries
//! with per-field issue annotations. The remaining modules are the thin HTTP service
//! around it.

pub mod app;
pub mod config;
pub mod entries;
pub mod normalize;
pub mod sources;
pub mod state;
