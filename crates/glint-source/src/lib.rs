//! Loader for sectioned **`.shader`** files.
//!
//! A `.shader` file carries both stages of a program. Lines containing
//! `#shader vertex` or `#shader fragment` switch the section that following
//! lines are appended to; everything else is passed through unchanged.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`source`] | `ShaderSourcePair` |
//! | [`error`] | `LoadError` |
//! | [`parser`] | `parse_str`, `parse_file`, `ParseReport` |
//!
//! # Quick start
//!
//! ```rust
//! use glint_source::parse_str;
//!
//! let src = "#shader vertex\nvoid main(){}\n#shader fragment\nvoid main(){}\n";
//!
//! let pair = parse_str(src);
//! assert_eq!(pair.vertex, "void main(){}\n");
//! assert_eq!(pair.fragment, "void main(){}\n");
//! ```

pub mod error;
pub mod parser;
pub mod source;

pub use error::LoadError;
pub use parser::{parse_file, parse_str, parse_str_with_report, ParseReport};
pub use source::ShaderSourcePair;
