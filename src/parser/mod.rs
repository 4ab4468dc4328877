//! Asset declaration parsing.
//!
//! A layer name holds zero or more comma-separated declarations. Each
//! declaration is a file name decorated with optional tokens:
//!
//! ```text
//! [dimension ]name[-breakpoint][-density].ext[quality]
//! 200x100 hero-large-@2x.jpg80
//! ```
//!
//! Tokens are peeled off by an ordered rule table (see [`rules`]); what is
//! left over is the asset's name.
//!
//! # Usage
//!
//! ```
//! use resimg::parser::parse_declaration;
//!
//! let decl = parse_declaration("hero-l-@2x.png").unwrap();
//! assert_eq!(decl.name, "hero");
//! assert_eq!(decl.breakpoint.as_deref(), Some("l"));
//! assert_eq!(decl.density.as_deref(), Some("@2x"));
//! ```

mod declaration;
mod grammar;

pub use declaration::{parse_declaration, split_declarations, AssetDeclaration, DeclarationError};
pub use grammar::{has_asset_extension, rules, Anchor, Field, Rule};
