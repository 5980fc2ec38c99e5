pub mod document;
pub mod link_parser;
pub mod probe;
pub mod stop_words;
