pub mod catalog;
pub mod chat;
pub mod profile;
pub mod repl;
pub mod saved;
pub mod settings;
