//! # Dust emissivities
//!
//! Emissivity tables for dust grains in local thermodynamic equilibrium, as
//! sampled by a Monte Carlo radiative-transfer code when it re-emits photon
//! packets.
//!
//! ```text
//!  OpacityModel ──► grid::merge_frequency_grid ──► Emissivities::set_lte
//!                                                        │
//!                                  normalize / hash ◄────┤
//!                                                        ▼
//!                                     Emissivities::to_table_set ⇄ TableSet
//! ```
//!
//! [`Emissivities`] only accepts well-formed arrays: both axes strictly
//! increasing and positive, `jnu` non-negative and shaped `(nu, var)`.

pub mod color;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod grid;
pub mod numeric;
pub mod plot;

pub use config::LteConfig;
pub use data::model::{Emissivities, EmissivityVariable, IntoNdArray};
pub use data::opacity::{OpacityModel, TabulatedOpacity};
pub use data::table_set::{Column, Table, TableSet};
pub use error::EmissivityError;
