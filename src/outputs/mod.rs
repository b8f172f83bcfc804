//! Output generation for aggregated facts.
//!
//! # Submodules
//!
//! - [`json`]: Writes a [`FactSheet`](crate::models::FactSheet) to a JSON file
//! - [`plain`]: Renders facts as aligned terminal text
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! ├── 1969-07-20.json
//! └── 2024-07-20.json
//! ```

pub mod json;
pub mod plain;
