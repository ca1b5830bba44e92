//! German-to-English translation of text and documents through the Gemini API.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;

#[cfg(test)]
mod test_support;
