pub mod dataset;
pub mod derive;
pub mod metadata;
pub mod movie;
pub mod trace;
pub mod user_preferences;

pub use dataset::{Capabilities, DatasetContext, DatasetKind};
pub use metadata::MovieMetadata;
pub use movie::{DisplayMetadata, Movie, PopularityBand, QualityBand, RuntimeCategory};
pub use trace::{Evidence, Firing, ScoringTrace};
pub use user_preferences::{PopularityPreference, PreferenceInput, Preferences};
