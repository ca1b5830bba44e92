pub mod debounce;
pub mod document;
pub mod live;
pub mod translate;
