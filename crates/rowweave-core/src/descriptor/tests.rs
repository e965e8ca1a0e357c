use crate::{
    descriptor::{
        AggregateKind, AggregateSpec, DescriptorError, FieldMapping, FieldSelector, KeyComponent,
        KeySpec, LayoutSlot, MappingDescriptor,
    },
    predicate::Predicate,
    row::Row,
    value::{ConversionError, Value, ValueType},
};

fn line_descriptor() -> MappingDescriptor {
    MappingDescriptor::builder("Line")
        .key("line_id")
        .field("sku", "sku")
        .build()
        .expect("line descriptor")
}

#[test]
fn builder_lays_out_entries_in_call_order() {
    let descriptor = MappingDescriptor::builder("Order")
        .field("customer", "customer_name")
        .key("order_id")
        .sum("total", "amount")
        .nested("lines", line_descriptor())
        .count("line_count")
        .build()
        .expect("order descriptor");

    assert_eq!(
        descriptor.targets().collect::<Vec<_>>(),
        vec!["customer", "order_id", "total", "lines", "line_count"]
    );
    assert_eq!(
        descriptor.layout(),
        &[
            LayoutSlot::Field(0),
            LayoutSlot::Key(0),
            LayoutSlot::Aggregate(0),
            LayoutSlot::Nested(0),
            LayoutSlot::Aggregate(1),
        ]
    );
    assert_eq!(descriptor.depth(), 1);
}

#[test]
fn one_key_call_is_simple_and_several_are_composite() {
    let simple = MappingDescriptor::builder("A").key("a").build_unchecked();
    let composite = MappingDescriptor::builder("AB")
        .key("a")
        .key(KeyComponent::hidden("b"))
        .build()
        .expect("composite descriptor");

    assert!(!simple.key().is_composite());
    assert!(composite.key().is_composite());
    assert_eq!(composite.key().arity(), 2);
    assert_eq!(composite.targets().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn from_parts_uses_default_layout() {
    let descriptor = MappingDescriptor::from_parts(
        "Vehicle",
        KeySpec::simple("make").skip_null(true),
        vec![FieldMapping::new("model", "model")],
        vec![AggregateSpec::count("count")],
        Vec::new(),
    );

    assert!(descriptor.key().skips_null());
    assert_eq!(
        descriptor.targets().collect::<Vec<_>>(),
        vec!["make", "model", "count"]
    );
    assert_eq!(descriptor.validate(), Ok(()));
}

#[test]
fn descriptor_without_key_is_rejected() {
    let err = MappingDescriptor::builder("Vehicle")
        .count("count")
        .build()
        .expect_err("key is required");

    assert_eq!(err, DescriptorError::EmptyKey);
}

#[test]
fn single_component_composite_is_rejected() {
    let descriptor = MappingDescriptor::from_parts(
        "Vehicle",
        KeySpec::composite(["make"]),
        Vec::new(),
        Vec::new(),
        Vec::new(),
    );

    assert_eq!(
        descriptor.validate(),
        Err(DescriptorError::CompositeKeyTooShort { found: 1 })
    );
}

#[test]
fn non_count_aggregate_requires_a_source() {
    let err = MappingDescriptor::builder("Vehicle")
        .key("make")
        .aggregate(AggregateSpec::new(AggregateKind::Sum, "total", None))
        .build()
        .expect_err("sum without source");

    assert_eq!(
        err,
        DescriptorError::MissingAggregateSource {
            field: "total".to_string(),
            kind: "sum".to_string(),
        }
    );
    assert_eq!(err.field(), Some("total"));
}

#[test]
fn count_with_source_is_rejected() {
    let err = MappingDescriptor::builder("Vehicle")
        .key("make")
        .aggregate(AggregateSpec::new(
            AggregateKind::Count,
            "count",
            Some(FieldSelector::new("id")),
        ))
        .build()
        .expect_err("count with source");

    assert!(matches!(err, DescriptorError::CountWithSource { .. }));
}

#[test]
fn duplicate_targets_are_rejected() {
    let err = MappingDescriptor::builder("Vehicle")
        .key("make")
        .field("make", "brand")
        .build()
        .expect_err("duplicate target");

    assert_eq!(
        err,
        DescriptorError::DuplicateTarget {
            field: "make".to_string()
        }
    );
}

#[test]
fn empty_names_are_rejected() {
    assert_eq!(
        MappingDescriptor::builder(" ").key("a").build(),
        Err(DescriptorError::EmptyShapeId)
    );
    assert_eq!(
        MappingDescriptor::builder("A").key("a").field("", "b").build(),
        Err(DescriptorError::EmptyTarget)
    );
    assert!(matches!(
        MappingDescriptor::builder("A").key("a").sum("total", "").build(),
        Err(DescriptorError::EmptyColumn { .. })
    ));
}

#[test]
fn nested_failures_keep_their_path() {
    let broken_line = MappingDescriptor::builder("Line")
        .field("sku", "sku")
        .build_unchecked();
    let err = MappingDescriptor::builder("Order")
        .key("order_id")
        .nested(
            "shipments",
            MappingDescriptor::builder("Shipment")
                .key("shipment_id")
                .nested("lines", broken_line)
                .build_unchecked(),
        )
        .build()
        .expect_err("nested key missing");

    assert_eq!(err.leaf(), &DescriptorError::EmptyKey);

    let (path, shape) = err.location("Order");
    assert_eq!(path, vec!["shipments".to_string(), "lines".to_string()]);
    assert_eq!(shape, "Line");
}

#[test]
fn selector_applies_cast_after_reading_the_column() {
    let row = Row::new().with("price", "12.50").with("note", Value::Null);

    assert_eq!(
        FieldSelector::new("price").resolve(&row),
        Ok(Value::text("12.50"))
    );
    assert_eq!(
        FieldSelector::new("price").cast(ValueType::Float64).resolve(&row),
        Ok(Value::Float64(12.5))
    );
    assert_eq!(
        FieldSelector::new("note").cast(ValueType::Int64).resolve(&row),
        Ok(Value::Int(0))
    );
    assert_eq!(
        FieldSelector::new("note")
            .nullable(ValueType::Int64)
            .resolve(&row),
        Ok(Value::Null)
    );
    assert!(matches!(
        FieldSelector::new("price").cast(ValueType::Uuid).resolve(&row),
        Err(ConversionError::Unparseable { .. })
    ));
}

#[test]
fn aggregate_spec_carries_filter_and_output_cast() {
    let spec = AggregateSpec::sum("recent", "amount")
        .filter(Predicate::gt("year", 2020))
        .output(ValueType::Decimal);

    assert_eq!(spec.kind(), AggregateKind::Sum);
    assert_eq!(spec.source().map(FieldSelector::column), Some("amount"));
    assert!(spec.filter_predicate().is_some());
    assert_eq!(spec.output_cast().map(|cast| cast.to_string()).as_deref(), Some("decimal"));
}
