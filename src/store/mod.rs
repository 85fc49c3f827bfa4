pub mod json_store;
pub mod lexicon;
pub mod pictures;
pub mod schema;
