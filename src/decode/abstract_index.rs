//! Inverted abstract index ↔ plain text

use crate::types::{JsonObject, JsonValue};

const INDEX_FIELD: &str = "abstract_inverted_index";
const TEXT_FIELD: &str = "abstract";

/// Rebuild text from a word → positions index
///
/// Words are ordered by position; words sharing a position keep the order
/// they were found in. Positions that are not non-negative integers are
/// ignored. Formatting and punctuation spacing of the source are not
/// recoverable.
pub fn decode_abstract(index: &JsonObject) -> String {
    let mut positioned: Vec<(u64, &str)> = index
        .iter()
        .filter_map(|(word, positions)| positions.as_array().map(|p| (word, p)))
        .flat_map(|(word, positions)| {
            positions
                .iter()
                .filter_map(JsonValue::as_u64)
                .map(move |pos| (pos, word.as_str()))
        })
        .collect();

    positioned.sort_by_key(|(pos, _)| *pos);

    positioned
        .into_iter()
        .map(|(_, word)| word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build an index from whitespace-separated text
pub fn encode_abstract(text: &str) -> JsonObject {
    let mut index = JsonObject::new();
    for (pos, word) in text.split_whitespace().enumerate() {
        let positions = index
            .entry(word.to_string())
            .or_insert_with(|| JsonValue::Array(Vec::new()));
        if let JsonValue::Array(list) = positions {
            list.push(JsonValue::from(pos));
        }
    }
    index
}

/// Replace a record's inverted index with decoded text
///
/// `abstract` is only set when the index is an object; the index field is
/// removed either way. Records without the field are left untouched.
pub fn decode_record(record: &mut JsonValue) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };
    let Some(index) = fields.shift_remove(INDEX_FIELD) else {
        return;
    };
    if let JsonValue::Object(index) = index {
        fields.insert(TEXT_FIELD.to_string(), JsonValue::String(decode_abstract(&index)));
    }
}

/// [`decode_record`] over a batch
pub fn decode_abstracts(records: &mut [JsonValue]) {
    records.iter_mut().for_each(decode_record);
}
