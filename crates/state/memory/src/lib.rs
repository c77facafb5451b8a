mod store;

pub use store::MemorySettingsStore;
