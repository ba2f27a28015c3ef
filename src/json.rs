//! JSON mappers generated from shapes.
//!
//! [`MapperVisitor`] builds one [`JsonMapper`] per shape, composing element,
//! value and member mappers bottom-up. Wire objects keep member declaration
//! order (serde_json is built with `preserve_order`).
pub mod collection;
pub mod record;
pub mod scalar;

use crate::mapper::JsonMapper;
use crate::shape::{DynamicKind, RecordShape, Shape};
use crate::visitor::{Root, ShapeVisitor};

use collection::{ArrayMapper, MapMapper, SetMapper};
use record::{MemberMapper, RecordMapper};
use scalar::*;

/// Default JSON mapping. Timestamps use RFC 3339 (`2024-03-01T12:00:00.250Z`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MapperVisitor;

impl ShapeVisitor for MapperVisitor {
    type Output = JsonMapper;

    fn dynamic_shape(&self, _kind: DynamicKind) -> JsonMapper {
        Box::new(DynamicMapper)
    }
    fn binary_shape(&self) -> JsonMapper {
        Box::new(BinaryMapper)
    }
    fn bool_shape(&self) -> JsonMapper {
        Box::new(BoolMapper)
    }
    fn number_shape(&self) -> JsonMapper {
        Box::new(NumberMapper)
    }
    fn nothing_shape(&self) -> JsonMapper {
        Box::new(NothingMapper)
    }
    fn string_shape(&self) -> JsonMapper {
        Box::new(StringMapper)
    }
    fn timestamp_shape(&self) -> JsonMapper {
        Box::new(IsoTimestampMapper)
    }
    fn array_shape(&self, element: &Shape, root: &Root<'_, JsonMapper>) -> JsonMapper {
        Box::new(ArrayMapper { element: element.visit(root) })
    }
    fn set_shape(&self, element: &Shape, root: &Root<'_, JsonMapper>) -> JsonMapper {
        Box::new(SetMapper { element: element.visit(root) })
    }
    fn map_shape(&self, value: &Shape, root: &Root<'_, JsonMapper>) -> JsonMapper {
        Box::new(MapMapper { value: value.visit(root) })
    }
    fn record_shape(&self, record: &RecordShape, root: &Root<'_, JsonMapper>) -> JsonMapper {
        let members = record
            .members()
            .map(|(name, member)| MemberMapper {
                name: name.to_string(),
                required: member.required,
                mapper: member.shape.visit(root),
            })
            .collect();
        Box::new(RecordMapper { members })
    }
}

/// Mapper for `shape` with the default visitor.
pub fn mapper(shape: &Shape) -> JsonMapper {
    shape.visit(&MapperVisitor)
}

/// Mapper for `shape` with a custom visitor, typically a decorator over
/// [`MapperVisitor`].
pub fn mapper_with(shape: &Shape, visitor: &Root<'_, JsonMapper>) -> JsonMapper {
    shape.visit(visitor)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeErrorKind, EncodeErrorKind};
    use crate::mapper::Mapper;
    use crate::shape::ShapeKind;
    use crate::value::Value;
    use chrono::{TimeZone, Utc};
    use indexmap::IndexMap;
    use serde_json::json;

    fn event() -> Shape {
        Shape::record("Event")
            .required("id", Shape::String)
            .required("createdAt", Shape::Timestamp)
            .optional("tags", Shape::array(Shape::String))
            .build()
            .unwrap()
    }

    fn created_at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::milliseconds(250)
    }

    #[test]
    fn scalars_map_to_their_json_forms() {
        let cases = [
            (Shape::Bool, Value::Bool(true), json!(true)),
            (Shape::Number, Value::Number(42.0), json!(42)),
            (Shape::Number, Value::Number(-1.5), json!(-1.5)),
            (Shape::Nothing, Value::Nothing, json!(null)),
            (Shape::String, Value::from("héllo"), json!("héllo")),
            (Shape::Binary, Value::Binary(vec![0xde, 0xad, 0x01]), json!("dead01")),
            (Shape::dynamic(), Value::Dynamic(json!({"any": [1, "x"]})), json!({"any": [1, "x"]})),
        ];
        for (shape, value, wire) in cases {
            let m = mapper(&shape);
            assert_eq!(m.write(&value).unwrap(), wire, "{shape:?}");
            assert_eq!(m.read(&wire).unwrap(), value, "{shape:?}");
        }
    }

    #[test]
    fn large_and_non_finite_numbers() {
        let m = mapper(&Shape::Number);
        assert_eq!(m.write(&Value::Number(1e300)).unwrap(), json!(1e300));
        let err = m.write(&Value::Number(f64::NAN)).unwrap_err();
        assert!(matches!(err.kind, EncodeErrorKind::NonFiniteNumber(_)));
        let err = m.write(&Value::Number(f64::INFINITY)).unwrap_err();
        assert!(matches!(err.kind, EncodeErrorKind::NonFiniteNumber(_)));
    }

    #[test]
    fn timestamps_are_rfc3339_utc_millis() {
        let m = mapper(&Shape::Timestamp);
        let t = created_at() + chrono::Duration::microseconds(999);
        assert_eq!(m.write(&Value::Timestamp(t)).unwrap(), json!("2024-03-01T12:00:00.250Z"));

        // offsets are normalized to UTC on read
        let back = m.read(&json!("2024-03-01T14:00:00.250+02:00")).unwrap();
        assert_eq!(back, Value::Timestamp(created_at()));

        let err = m.read(&json!("yesterday")).unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::InvalidTimestamp { .. }));
    }

    #[test]
    fn timestamps_outside_four_digit_years_fail_to_encode() {
        let m = mapper(&Shape::Timestamp);
        for year in [10000, -5] {
            let t = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
            let err = m.write(&Value::Timestamp(t)).unwrap_err();
            assert!(matches!(err.kind, EncodeErrorKind::TimestampOutOfRange(at) if at == t), "{err}");
        }

        for (year, text) in [(0, "0000-01-01T00:00:00.000Z"), (9999, "9999-01-01T00:00:00.000Z")] {
            let t = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
            let wire = m.write(&Value::Timestamp(t)).unwrap();
            assert_eq!(wire, json!(text));
            assert_eq!(m.read(&wire).unwrap(), Value::Timestamp(t));
        }
    }

    #[test]
    fn record_omits_absent_optional_members() {
        let m = mapper(&event());
        let value = Value::record([
            ("id", Value::from("a1")),
            ("createdAt", Value::Timestamp(created_at())),
        ]);
        let wire = m.write(&value).unwrap();
        assert_eq!(
            serde_json::to_string(&wire).unwrap(),
            r#"{"id":"a1","createdAt":"2024-03-01T12:00:00.250Z"}"#
        );
        let back = m.read(&wire).unwrap();
        assert_eq!(back, value);
        assert!(back.get("tags").is_none());
    }

    #[test]
    fn record_read_tolerates_any_key_order_and_extra_keys() {
        let m = mapper(&event());
        let wire = json!({
            "tags": ["x", "y"],
            "unrelated": 7,
            "createdAt": "2024-03-01T12:00:00.250Z",
            "id": "a1"
        });
        let value = m.read(&wire).unwrap();
        let Value::Record(fields) = &value else { panic!("not a record") };
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, ["id", "createdAt", "tags"]);
        assert_eq!(
            value.get("tags"),
            Some(&Value::Array(vec![Value::from("x"), Value::from("y")]))
        );
    }

    #[test]
    fn missing_required_member_fails_both_ways() {
        let m = mapper(&event());
        let err = m.write(&Value::record([("id", Value::from("a1"))])).unwrap_err();
        assert!(matches!(&err.kind, EncodeErrorKind::MissingMember(name) if name == "createdAt"));

        let err = m.read(&json!({ "createdAt": "2024-03-01T12:00:00.250Z" })).unwrap_err();
        assert!(matches!(&err.kind, DecodeErrorKind::MissingMember(name) if name == "id"));
    }

    #[test]
    fn null_is_not_an_absent_optional_member() {
        let m = mapper(&event());
        let err = m
            .read(&json!({ "id": "a1", "createdAt": "2024-03-01T12:00:00.250Z", "tags": null }))
            .unwrap_err();
        assert_eq!(err.path.to_string(), "$.tags");
        assert!(matches!(
            err.kind,
            DecodeErrorKind::UnexpectedType { expected: ShapeKind::Array, found: "null" }
        ));
    }

    #[test]
    fn decode_errors_carry_the_path() {
        let inner = Shape::record("Line").required("qty", Shape::Number).build().unwrap();
        let shape = Shape::record("Order")
            .required("lines", Shape::array(inner))
            .build()
            .unwrap();
        let err = mapper(&shape)
            .read(&json!({ "lines": [{ "qty": 1 }, { "qty": "two" }] }))
            .unwrap_err();
        assert_eq!(err.path.to_string(), "$.lines[1].qty");
        assert!(err.to_string().contains("expected number, found string"), "{err}");

        let err = mapper(&shape).read(&json!([1, 2])).unwrap_err();
        assert_eq!(err.path.to_string(), "$");
    }

    #[test]
    fn wrong_domain_kind_fails_to_encode() {
        let m = mapper(&Shape::array(Shape::String));
        let err = m
            .write(&Value::Array(vec![Value::from("a"), Value::Bool(false)]))
            .unwrap_err();
        assert_eq!(err.path.to_string(), "$[1]");
        // an array mapper does not accept a set
        assert!(m.write(&Value::Set(vec![])).is_err());
    }

    #[test]
    fn arrays_map_element_wise_in_order() {
        let m = mapper(&Shape::array(Shape::Timestamp));
        let times: Vec<_> = (0..3).map(|i| created_at() + chrono::Duration::days(i)).collect();
        let value = Value::Array(times.iter().copied().map(Value::Timestamp).collect());
        let element = mapper(&Shape::Timestamp);
        let expected: Vec<_> = times
            .iter()
            .map(|t| element.write(&Value::Timestamp(*t)).unwrap())
            .collect();
        assert_eq!(m.write(&value).unwrap(), serde_json::Value::Array(expected));
    }

    // Sets are plain arrays on the wire; decoding does not de-duplicate.
    #[test]
    fn set_decode_keeps_duplicates() {
        let m = mapper(&Shape::set(Shape::String));
        let value = m.read(&json!(["a", "b", "a"])).unwrap();
        assert_eq!(value, Value::Set(vec!["a".into(), "b".into(), "a".into()]));
        assert_eq!(m.write(&value).unwrap(), json!(["a", "b", "a"]));
    }

    #[test]
    fn maps_keep_keys_and_convert_values() {
        let m = mapper(&Shape::map(Shape::Binary));
        let mut entries = IndexMap::new();
        entries.insert("z".to_string(), Value::Binary(vec![1]));
        entries.insert("a key".to_string(), Value::Binary(vec![]));
        let value = Value::Map(entries);
        let wire = m.write(&value).unwrap();
        assert_eq!(serde_json::to_string(&wire).unwrap(), r#"{"z":"01","a key":""}"#);
        assert_eq!(m.read(&wire).unwrap(), value);

        let err = m.read(&json!({ "z": "not hex" })).unwrap_err();
        assert_eq!(err.path.to_string(), "$.z");
        assert!(matches!(err.kind, DecodeErrorKind::InvalidBinary(_)));
    }

    #[test]
    fn nested_records_round_trip() {
        let address = Shape::record("Address")
            .required("city", Shape::String)
            .optional("zip", Shape::String)
            .build()
            .unwrap();
        let person = Shape::record("Person")
            .required("name", Shape::String)
            .optional("home", address)
            .required("scores", Shape::map(Shape::set(Shape::Number)))
            .build()
            .unwrap();
        let mut scores = IndexMap::new();
        scores.insert("math".to_string(), Value::Set(vec![Value::Number(3.0), Value::Number(2.5)]));
        let value = Value::record([
            ("name", Value::from("Ada")),
            ("home", Value::record([("city", Value::from("London"))])),
            ("scores", Value::Map(scores)),
        ]);
        let m = mapper(&person);
        let wire = m.write(&value).unwrap();
        assert_eq!(wire, json!({
            "name": "Ada",
            "home": { "city": "London" },
            "scores": { "math": [3, 2.5] }
        }));
        assert_eq!(m.read(&wire).unwrap(), value);
    }

    #[test]
    fn mappers_are_shareable_across_threads() {
        let m = std::sync::Arc::new(mapper(&event()));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let m = m.clone();
                std::thread::spawn(move || {
                    let id = format!("id-{i}");
                    let value = Value::record([
                        ("id", Value::from(id.as_str())),
                        ("createdAt", Value::Timestamp(created_at())),
                    ]);
                    m.read(&m.write(&value).unwrap()).unwrap() == value
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
    }
}
