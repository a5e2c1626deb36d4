pub mod aligner;
pub mod diagnostics;
pub mod edge;
pub mod error_guesser;
pub mod layer_builder;
pub mod layer_linker;
pub mod meta_file;
pub mod sentence;
pub mod token;
pub mod utility;
pub mod vert;
