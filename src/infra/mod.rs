pub mod directory;
pub mod notifier;
pub mod store;
