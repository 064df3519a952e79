/// Data layer: the emissivity table, how it is filled, and how it is stored.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TabulatedOpacity
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   lte     │  kappa · B_nu(T) → Emissivities
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ Emissivities  │  validated nu, var, jnu
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  codec    │  Emissivities ⇄ TableSet (parquet directory)
///   └──────────┘
/// ```

pub mod codec;
pub mod loader;
pub mod lte;
pub mod model;
pub mod opacity;
pub mod table_set;
