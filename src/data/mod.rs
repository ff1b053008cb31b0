/// Data layer: raw inputs, derived features and the model input row.
///
/// Architecture:
/// ```text
///   entry texts (six fields)
///        │
///        ▼
///   ┌───────────┐
///   │ RawInputs  │  text per field, declaration order
///   └───────────┘
///        │  preview_* (blank = 0 / N/A)   ValidatedInputs::from_raw (blank = error)
///        ▼
///   ┌───────────┐
///   │  derive    │  clay = 100 − (G+S+Si), PI = LL − PL, range checks
///   └───────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ FeatureVector │  [G, S, Si, LL, PL, CE, PI, Clay]
///   └──────────────┘
/// ```

pub mod derive;
pub mod model;
