//! Abstract index decoder module
//!
//! # Overview
//!
//! Works carry their abstract as an inverted index, a map from word to the
//! positions where it occurs. This module turns it back into plain text and
//! applies that to fetched records, replacing `abstract_inverted_index` with
//! an `abstract` string.

mod abstract_index;

pub use abstract_index::{decode_abstract, decode_abstracts, decode_record, encode_abstract};
