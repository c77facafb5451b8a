mod store;

pub use store::FileSettingsStore;
