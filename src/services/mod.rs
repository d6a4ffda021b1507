pub mod enrichment;
pub mod providers;

pub use enrichment::{enrich_data_dir, EnrichmentSummary};
pub use providers::{MetadataProvider, TmdbProvider};
