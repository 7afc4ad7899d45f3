// Core modules: error modeling, timestamps, identifier vocabulary, and the GPML model.
pub mod error;
pub mod gpml;
pub mod timestamp;
pub mod vocab;
