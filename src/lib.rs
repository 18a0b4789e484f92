// Library surface for the binary, headless integration tests and reuse.
pub mod bootstrap;
pub mod config;
pub mod debounce;
pub mod presentation;
pub mod responsive;
pub mod runtime;
pub mod typewriter;
pub mod typing_policy;
pub mod words;

pub use bootstrap::{bootstrap, Container, Page};
pub use config::{merge_options, parse_word_list, OptionOverrides, TypewriterOptions};
pub use typewriter::Typewriter;
