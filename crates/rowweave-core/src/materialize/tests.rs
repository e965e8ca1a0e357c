use crate::{
    descriptor::{FieldSelector, MappingDescriptor},
    engine::ingest,
    materialize::{
        DecimalMode, FromGroup, FromGroupMaterializer, GroupView, JsonMaterializer,
        MaterializeError, MaterializedGroup, MaterializedValue, Materializer, SerdeMaterializer,
        value_to_json,
    },
    test_support::{order_line, vehicle_rows},
    value::{ConversionError, Value, ValueType},
};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

fn orders() -> Vec<MaterializedGroup> {
    let descriptor = MappingDescriptor::builder("Order")
        .key("order_id")
        .field("customer", "customer")
        .sum("total_qty", "qty")
        .nested(
            "lines",
            MappingDescriptor::builder("Line")
                .key("line_id")
                .skip_null(true)
                .field("qty", "qty")
                .build()
                .expect("line descriptor"),
        )
        .build()
        .expect("order descriptor");

    ingest(
        &descriptor,
        vec![
            order_line(1, "ada", Some(10), 2),
            order_line(1, "ada", Some(11), 3),
            order_line(2, "bob", None, 0),
        ],
    )
    .expect("ingest")
}

// ---- json --------------------------------------------------------------

#[test]
fn json_objects_keep_layout_order_and_nest_arrays() {
    let json = JsonMaterializer::new()
        .materialize_all(&orders())
        .expect("json");

    assert_eq!(
        json,
        vec![
            json!({
                "order_id": 1,
                "customer": "ada",
                "total_qty": 5,
                "lines": [{ "line_id": 10, "qty": 2 }, { "line_id": 11, "qty": 3 }],
            }),
            json!({ "order_id": 2, "customer": "bob", "total_qty": 0, "lines": [] }),
        ]
    );

    let keys = json[0]
        .as_object()
        .expect("object")
        .keys()
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(keys, ["order_id", "customer", "total_qty", "lines"]);
}

#[test]
fn decimal_mode_controls_decimal_rendering() {
    let whole = Value::Decimal(Decimal::new(2_500_000, 2));
    let fraction = Value::Decimal(Decimal::new(1_234, 2));

    assert_eq!(value_to_json(&whole, DecimalMode::Number), json!(25_000));
    assert_eq!(value_to_json(&fraction, DecimalMode::Number), json!(12.34));
    assert_eq!(value_to_json(&fraction, DecimalMode::String), json!("12.34"));
}

#[test]
fn scalar_values_render_in_their_canonical_json_form() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).single().expect("timestamp");
    let id = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);

    assert_eq!(value_to_json(&Value::Null, DecimalMode::Number), json!(null));
    assert_eq!(value_to_json(&Value::Bool(true), DecimalMode::Number), json!(true));
    assert_eq!(value_to_json(&Value::Float64(f64::NAN), DecimalMode::Number), json!(null));
    assert_eq!(
        value_to_json(&Value::Timestamp(at), DecimalMode::Number),
        json!("2024-05-01T12:30:00Z")
    );
    assert_eq!(
        value_to_json(&Value::Uuid(id), DecimalMode::Number),
        json!("01234567-89ab-cdef-0123-456789abcdef")
    );
    assert_eq!(
        value_to_json(&Value::Blob(vec![1, 2]), DecimalMode::Number),
        json!([1, 2])
    );
}

// ---- serde -------------------------------------------------------------

#[derive(Debug, Deserialize, PartialEq)]
struct Order {
    order_id: i64,
    customer: String,
    total_qty: i64,
    lines: Vec<Line>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Line {
    line_id: i64,
    qty: i64,
}

#[test]
fn serde_materializer_builds_nested_structs() {
    let out = SerdeMaterializer::<Order>::new()
        .materialize_all(&orders())
        .expect("deserialize");

    assert_eq!(
        out,
        vec![
            Order {
                order_id: 1,
                customer: "ada".to_string(),
                total_qty: 5,
                lines: vec![Line { line_id: 10, qty: 2 }, Line { line_id: 11, qty: 3 }],
            },
            Order {
                order_id: 2,
                customer: "bob".to_string(),
                total_qty: 0,
                lines: Vec::new(),
            },
        ]
    );
}

#[derive(Debug, Deserialize)]
struct MakeSummary {
    make: String,
    avg: Decimal,
}

#[test]
fn lossless_decimals_keep_exact_scale() {
    let descriptor = MappingDescriptor::builder("Vehicle")
        .key("make")
        .avg(
            "avg",
            FieldSelector::new("price").cast(ValueType::Decimal),
        )
        .build()
        .expect("descriptor");
    let groups = ingest(&descriptor, vehicle_rows()).expect("ingest");

    let out = SerdeMaterializer::<MakeSummary>::new()
        .lossless_decimals()
        .materialize_all(&groups)
        .expect("deserialize");

    assert_eq!(out[0].make, "Toyota");
    assert_eq!(out[0].avg, Decimal::from(25_000));
}

#[test]
fn serde_failures_name_the_shape() {
    #[derive(Debug, Deserialize)]
    #[expect(dead_code)]
    struct Wrong {
        missing: String,
    }

    let err = SerdeMaterializer::<Wrong>::new()
        .materialize(&orders()[0])
        .expect_err("missing field");

    assert!(matches!(err, MaterializeError::Deserialize { ref shape_id, .. } if shape_id == "Order"));
}

// ---- from_group --------------------------------------------------------

#[derive(Debug, PartialEq)]
struct OrderView {
    id: i64,
    customer: String,
    line_ids: Vec<i64>,
}

impl FromGroup for OrderView {
    fn from_group(group: &GroupView<'_>) -> Result<Self, MaterializeError> {
        Ok(Self {
            id: group.i64("order_id")?,
            customer: group.text("customer")?,
            line_ids: group
                .nested::<LineId>("lines")?
                .into_iter()
                .map(|line| line.0)
                .collect(),
        })
    }
}

struct LineId(i64);

impl FromGroup for LineId {
    fn from_group(group: &GroupView<'_>) -> Result<Self, MaterializeError> {
        Ok(Self(group.i64("line_id")?))
    }
}

#[test]
fn from_group_reads_typed_entries_and_children() {
    let out = FromGroupMaterializer::<OrderView>::new()
        .materialize_all(&orders())
        .expect("materialize");

    assert_eq!(
        out[0],
        OrderView {
            id: 1,
            customer: "ada".to_string(),
            line_ids: vec![10, 11],
        }
    );
    assert!(out[1].line_ids.is_empty());
}

#[test]
fn group_view_reports_entry_errors() {
    let groups = orders();
    let view = GroupView::new(&groups[0]);

    assert!(matches!(
        view.text("nope"),
        Err(MaterializeError::MissingEntry { ref field }) if field == "nope"
    ));
    assert!(matches!(
        view.i64("lines"),
        Err(MaterializeError::ExpectedScalar { .. })
    ));
    assert!(matches!(
        view.groups("customer"),
        Err(MaterializeError::ExpectedCollection { .. })
    ));

    let err = view.uuid("customer").expect_err("not a uuid");
    assert_eq!(err.field(), Some("customer"));
    assert!(matches!(
        err,
        MaterializeError::Conversion {
            source: ConversionError::Unparseable { .. },
            ..
        }
    ));
}

#[test]
fn group_view_nullable_accessors_pass_null_through() {
    let group = MaterializedGroup::new(
        "Probe",
        vec![Value::Int(1)],
        vec![("note".to_string(), MaterializedValue::Scalar(Value::Null))],
    );
    let view = GroupView::new(&group);

    assert_eq!(view.nullable_text("note").expect("nullable"), None);
    assert_eq!(view.text("note").expect("zero value"), String::new());
    assert_eq!(view.key(), &[Value::Int(1)]);
    assert_eq!(view.shape_id(), "Probe");
}
