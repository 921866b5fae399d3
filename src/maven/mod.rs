pub mod nexus;
pub mod version;

pub use nexus::NexusRepository;
pub use version::VersionComparator;
