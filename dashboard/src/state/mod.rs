pub mod debounce;
pub mod listing;
pub mod scope;
