//! Normalization of list payloads.
//!
//! Depending on the backend and on whether pagination was requested, a list
//! comes back as a bare array, as `{ "data": [...] }` with pagination fields
//! alongside, or as `{ "achievements": [...] }`. Each shape has its own
//! decoder; they are tried in order and an empty list is used only when none
//! of them recognizes the payload. Records inside a recognized shape are
//! decoded one by one, so a single bad record does not hide the page.

use serde_json::{Map, Value};

use crate::types::{Achievement, ListResponse, Pagination};

#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    List(ListResponse),
    NotThisShape,
}

type Decoder = fn(&Value) -> Decoded;

const DECODERS: &[(&str, Decoder)] = &[
    ("bare array", decode_bare_array),
    ("data envelope", decode_data_envelope),
    ("achievements envelope", decode_achievements_envelope),
];

pub fn decode_list_response(raw: &Value) -> ListResponse {
    for (name, decoder) in DECODERS {
        if let Decoded::List(list) = decoder(raw) {
            log::debug!("Decoded {} achievements from {}", list.data.len(), name);
            return list;
        }
    }
    log::warn!("Unrecognized achievements list payload, showing an empty list");
    ListResponse::default()
}

pub fn decode_bare_array(raw: &Value) -> Decoded {
    if !raw.is_array() {
        return Decoded::NotThisShape;
    }
    match decode_items(raw) {
        Some(data) => Decoded::List(ListResponse {
            data,
            pagination: Pagination::default(),
        }),
        None => Decoded::NotThisShape,
    }
}

pub fn decode_data_envelope(raw: &Value) -> Decoded {
    decode_envelope(raw, "data")
}

pub fn decode_achievements_envelope(raw: &Value) -> Decoded {
    decode_envelope(raw, "achievements")
}

fn decode_envelope(raw: &Value, key: &str) -> Decoded {
    let Some(object) = raw.as_object() else {
        return Decoded::NotThisShape;
    };
    let Some(items) = object.get(key).filter(|items| items.is_array()) else {
        return Decoded::NotThisShape;
    };
    let Some(data) = decode_items(items) else {
        return Decoded::NotThisShape;
    };

    Decoded::List(ListResponse {
        data,
        pagination: read_pagination(object),
    })
}

/// Decodes each record on its own; records that do not decode are skipped.
fn decode_items(items: &Value) -> Option<Vec<Achievement>> {
    let items = items.as_array()?;
    let data = items
        .iter()
        .enumerate()
        .filter_map(
            |(index, item)| match serde_json::from_value::<Achievement>(item.clone()) {
                Ok(achievement) => Some(achievement),
                Err(e) => {
                    log::warn!("Skipping achievement at index {}: {}", index, e);
                    None
                }
            },
        )
        .collect();
    Some(data)
}

fn read_pagination(object: &Map<String, Value>) -> Pagination {
    let field = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|value| u32::try_from(value).ok())
    };

    Pagination {
        first: field("first"),
        items: field("items"),
        last: field("last"),
        next: field("next"),
        pages: field("pages"),
        prev: field("prev"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> Value {
        json!({
            "id": id,
            "title": "Title",
            "description": "Description",
            "category": "Award",
            "progress": 0,
            "todos": [],
            "createdAt": 100,
            "updatedAt": 100
        })
    }

    #[test]
    fn test_achievements_envelope_keeps_pagination() {
        let raw = json!({ "achievements": [record("a"), record("b")], "pages": 3 });
        let list = decode_list_response(&raw);
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.pagination.pages, Some(3));
        assert_eq!(list.pagination.items, None);
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            json!({ "data": [record("a"), record("b")], "pages": 3 })
        );
    }

    #[test]
    fn test_bare_array_has_no_pagination() {
        let list = decode_list_response(&json!([record("a")]));
        assert_eq!(list.data[0].id, "a");
        assert!(list.pagination.is_empty());
    }

    #[test]
    fn test_data_envelope_with_null_links() {
        let raw = json!({
            "first": 1, "prev": null, "next": 2, "last": 4, "pages": 4, "items": 31,
            "data": [record("a")]
        });
        let list = decode_list_response(&raw);
        assert_eq!(list.data.len(), 1);
        assert_eq!(
            list.pagination,
            Pagination {
                first: Some(1),
                items: Some(31),
                last: Some(4),
                next: Some(2),
                pages: Some(4),
                prev: None,
            }
        );
    }

    #[test]
    fn test_each_decoder_rejects_other_shapes() {
        let envelope = json!({ "data": [] });
        assert_eq!(decode_bare_array(&envelope), Decoded::NotThisShape);
        assert_eq!(decode_achievements_envelope(&envelope), Decoded::NotThisShape);
        assert_eq!(decode_data_envelope(&json!([])), Decoded::NotThisShape);
    }

    #[test]
    fn test_unrecognized_payload_is_empty() {
        assert_eq!(decode_list_response(&json!({ "rows": [] })), ListResponse::default());
        assert_eq!(decode_list_response(&json!("nope")), ListResponse::default());
        assert_eq!(decode_list_response(&json!({ "data": "nope" })), ListResponse::default());
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let raw = json!({ "data": [record("ok"), { "title": 5 }], "pages": 2 });
        let list = decode_list_response(&raw);
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].id, "ok");
        assert_eq!(list.pagination.pages, Some(2));
    }

    #[test]
    fn test_fractional_progress_keeps_the_page() {
        let mut partial = record("b");
        partial["progress"] = json!(66.7);
        let raw = json!({ "data": [record("a"), partial], "pages": 2, "items": 12 });

        let list = decode_list_response(&raw);
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[1].progress, Some(67));
        assert_eq!(list.pagination.items, Some(12));
    }
}
