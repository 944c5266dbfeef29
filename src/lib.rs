//! Helper utilities for querying the HSC survey catalog archive.
//!
//! Two independent halves:
//! * [`query`] assembles alias → column mappings for the forced-photometry
//!   tables and renders them into `SELECT` clause fragments.
//! * [`stats`], [`cosmo`] and [`text`] are small helpers used in downstream
//!   analysis: sigma-clipped sample summaries, physical-to-angular size
//!   conversion, and string utilities.

pub mod cosmo;
pub mod query;
pub mod stats;
pub mod text;
