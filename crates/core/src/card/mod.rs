//! Card records: the upstream shape, the canonical shape, and the conversion between them.

mod convert;
mod raw;
mod types;

pub use convert::{
    convert_card, convert_cmc, convert_colors, convert_legalities, convert_name,
    convert_oracle_text, convert_parsed_cost, convert_type, has_separate_back_face,
    tokenize_mana_cost, ConvertError,
};
pub use raw::{ImageUris, RawCard, RawCardFace};
pub use types::{
    Card, CardDetails, ColorCategory, Legalities, MISSING_IMAGE_URL, PLACEHOLDER_NAME,
    SUPPORTED_FORMATS,
};
