use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use shape_json::cli::{TimestampFormat, normalize_buffer};
use shape_json::path_de::from_str_with_path;
use shape_json::{ByteCodec, JsonDataType, JsonSchema, Mapper, Shape, Value};

fn event_shape() -> Shape {
    from_str_with_path(include_str!("../demos/event.shape.json")).unwrap()
}

fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::milliseconds(250)
}

fn timestamp_of(value: &Value) -> DateTime<Utc> {
    *value.get("createdAt").and_then(Value::as_timestamp).unwrap()
}

#[test]
fn definition_file_matches_builder() {
    let built = Shape::record("Event")
        .required("id", Shape::String)
        .required("createdAt", Shape::Timestamp)
        .optional("tags", Shape::array(Shape::String))
        .build()
        .unwrap();
    assert_eq!(event_shape(), built);
}

#[test]
fn event_encodes_under_both_timestamp_conventions() {
    let shape = event_shape();
    // sub-millisecond detail is dropped by both encoders
    let value = Value::record([
        ("id", Value::from("a1")),
        ("createdAt", Value::Timestamp(created_at() + Duration::microseconds(400))),
    ]);

    let default = ByteCodec::new(shape_json::json::mapper(&shape));
    let bytes = default.write(&value).unwrap();
    assert_eq!(bytes, br#"{"id":"a1","createdAt":"2024-03-01T12:00:00.250Z"}"#);
    let back = default.read(&bytes).unwrap();
    assert!(back.get("tags").is_none());
    assert_eq!(back.get("id"), Some(&Value::from("a1")));
    assert_eq!(timestamp_of(&back).timestamp_millis(), created_at().timestamp_millis());

    let catalog = JsonDataType.mapper(&shape);
    let bytes = catalog.write(&value).unwrap();
    assert_eq!(bytes, br#"{"id":"a1","createdAt":"2024-03-01 12:00:00.250"}"#);
    let back = catalog.read(&bytes).unwrap();
    assert!(back.get("tags").is_none());
    assert_eq!(timestamp_of(&back), created_at());
}

#[test]
fn split_and_join_line_records() {
    let buffer = b"{\"a\":1}\n\n{\"a\":2}\n";
    let records: Vec<&[u8]> = JsonDataType.split(buffer).collect();
    assert_eq!(records, [&b"{\"a\":1}"[..], &b"{\"a\":2}"[..]]);
    assert_eq!(JsonDataType.join(records), b"{\"a\":1}\n{\"a\":2}\n");
}

#[test]
fn catalog_records_round_trip_through_split_and_join() {
    let shape = event_shape();
    let codec = JsonDataType.mapper(&shape);
    let values: Vec<Value> = (0..3)
        .map(|i| {
            Value::record([
                ("id", Value::from(format!("e{i}"))),
                ("createdAt", Value::Timestamp(created_at() + Duration::hours(i))),
                ("tags", Value::Array(vec![Value::from("t"); i as usize])),
            ])
        })
        .collect();
    let encoded: Vec<Vec<u8>> = values.iter().map(|v| codec.write(v).unwrap()).collect();
    let buffer = JsonDataType.join(&encoded);
    let decoded: Vec<Value> = JsonDataType
        .split(&buffer)
        .map(|line| codec.decode(line).unwrap())
        .collect();
    assert_eq!(decoded, values);
}

#[test]
fn schema_of_the_event_definition() {
    let schema = JsonSchema::of(&event_shape());
    assert_eq!(schema, JsonSchema::of(&event_shape()));
    assert_eq!(serde_json::to_value(&schema).unwrap(), json!({
        "type": "object",
        "title": "Event",
        "properties": {
            "id": { "type": "string" },
            "createdAt": { "type": "string", "format": "date-time" },
            "tags": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["createdAt", "id"]
    }));
}

#[test]
fn demo_events_normalize() {
    let buffer = include_bytes!("../demos/events.ndjson");
    let normalized = normalize_buffer(&event_shape(), buffer, TimestampFormat::Iso, false).unwrap();
    assert_eq!(normalized.written, 2);
    assert_eq!(
        String::from_utf8(normalized.output).unwrap(),
        "{\"id\":\"a1\",\"createdAt\":\"2024-03-01 12:00:00.250\"}\n\
         {\"id\":\"b2\",\"createdAt\":\"2024-03-01 12:30:00.000\",\"tags\":[\"beta\",\"ops\"]}\n"
    );
}
