//! Data layer: core types and loading.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / uploaded bytes
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse rows → typed cells
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  Vec<Column>, one inferred dtype per column
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
