use crate::{
    naming::NamingConvention,
    row::{FieldSource, ResolvedRow, Row},
    value::Value,
};

fn vehicle_row() -> Row {
    Row::new()
        .with("vehicle_id", 7)
        .with("Make", "Toyota")
        .with("price", 20_000)
}

#[test]
fn lookups_are_case_insensitive() {
    let row = vehicle_row();

    assert_eq!(row.get("make"), &Value::text("Toyota"));
    assert_eq!(row.get("MAKE"), &Value::text("Toyota"));
    assert!(row.contains("Vehicle_Id"));
}

#[test]
fn missing_field_resolves_to_null() {
    let row = vehicle_row();

    assert_eq!(row.get("mileage"), &Value::Null);
    assert_eq!(row.try_get("mileage"), None);
}

#[test]
fn field_names_keep_insertion_order() {
    let row = vehicle_row();

    assert_eq!(
        row.field_names().collect::<Vec<_>>(),
        vec!["vehicle_id", "Make", "price"]
    );
    assert_eq!(row.len(), 3);
}

#[test]
fn duplicate_names_keep_first_position_and_last_value() {
    let row: Row = vec![("a", 1), ("b", 2), ("A", 3)].into_iter().collect();

    assert_eq!(row.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(row.get("a"), &Value::Int(3));
}

#[test]
fn json_object_rows_preserve_column_order() {
    let json = serde_json::json!({ "id": 1, "make": "Honda", "price": null });
    let row = Row::from_json_object(json.as_object().expect("object"));

    assert_eq!(row.field_names().collect::<Vec<_>>(), vec!["id", "make", "price"]);
    assert_eq!(row.get("price"), &Value::Null);
    assert!(row.contains("price"));
}

#[test]
fn resolved_row_tries_verbatim_then_translated_column() {
    let row = vehicle_row();
    let resolved = ResolvedRow::new(&row, NamingConvention::SnakeCase);

    assert_eq!(resolved.field("VehicleId"), &Value::Int(7));
    assert_eq!(resolved.field("Make"), &Value::text("Toyota"));
    assert_eq!(resolved.field("Mileage"), &Value::Null);
}

#[test]
fn snake_case_resolves_columns_with_digits() {
    let row = Row::new().with("line1_total", 42).with("address2", "Suite 4");
    let resolved = ResolvedRow::new(&row, NamingConvention::SnakeCase);

    assert_eq!(resolved.field("Line1Total"), &Value::Int(42));
    assert_eq!(resolved.field("Address2"), &Value::text("Suite 4"));
}

#[test]
fn exact_match_does_not_translate() {
    let row = vehicle_row();
    let resolved = ResolvedRow::new(&row, NamingConvention::ExactMatch);

    assert_eq!(resolved.field("VehicleId"), &Value::Null);
    assert_eq!(resolved.field("vehicle_id"), &Value::Int(7));
}
