pub mod card;
pub mod catalog;
pub mod config;
pub mod ingest;
pub mod normalize;
pub mod service;
pub mod snapshot;
pub mod testing;
pub mod upstream;

pub use card::{convert_card, Card, CardDetails, ColorCategory, ConvertError, Legalities, RawCard};
pub use catalog::{
    add_card_to_catalog, CardImages, Catalog, CatalogShard, CatalogStats, ImageEntry, PrefixTree,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    UpstreamConfig, UpstreamSource,
};
pub use ingest::{build_catalog, build_catalog_parallel, run_update, BuildReport, IngestError};
pub use normalize::{normalize, normalized_name};
pub use service::{CardDetailsQuery, CatalogService, NameQuery, Printing, ServiceError};
pub use snapshot::{Artifact, ArtifactData, Manifest, SnapshotError};
pub use upstream::{
    feed_from_config, FeedBatch, FeedError, FileFeed, ScryfallBulkFeed, UpstreamFeed,
};
