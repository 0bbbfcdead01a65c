/// Data layer: core types, loading, caching, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  coerce fields, drop bad rows → TransactionSet
///   └──────────┘
///        │ (memoized by cache, keyed on path + file signature)
///        ▼
///   ┌────────────────┐
///   │ TransactionSet  │  Vec<Transaction>, unique filter values
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply country/category predicates → filtered indices
///   └──────────┘
/// ```

pub mod cache;
pub mod loader;
pub mod model;
pub mod filter;
