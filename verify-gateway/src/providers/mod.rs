pub mod reality_defender;
pub mod supadata;
pub mod xai;

pub use reality_defender::RealityDefenderProvider;
pub use supadata::SupadataProvider;
pub use xai::XaiAdapter;
