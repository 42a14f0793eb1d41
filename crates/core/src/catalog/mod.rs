//! Card catalog: synchronized lookup indices built from canonical cards.
//!
//! Every index is derived from the same stream of `add_card_to_catalog`
//! calls, so a catalog is only ever built whole and replaced whole.

mod builder;
mod tree;
mod types;

pub use builder::{add_card_to_catalog, CatalogShard};
pub use tree::{PrefixTree, TreeNode};
pub use types::{CardImages, Catalog, CatalogStats, ImageEntry};
