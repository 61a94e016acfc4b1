// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod celebration;
pub mod classify;
pub mod config;
pub mod countdown;
pub mod dictionary;
pub mod history;
pub mod ocr;
pub mod runtime;
pub mod session;
pub mod speech;
pub mod wordlist;
