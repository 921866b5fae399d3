pub mod document;
pub mod scanner;
pub mod version_setter;

pub use document::PomDocument;
pub use scanner::DependencyScanner;
pub use version_setter::PomVersionSetter;
