//! Integration tests for huesight-common library.

use huesight_common::{
    ErrorReport, ErrorType, FieldValue, Fields, Format, KeyExprBuilder, MetricRecord, Tags,
    decode, encode,
};

#[test]
fn test_record_publish_workflow() {
    let tags: Tags = [
        ("huebridge_url", "https://192.168.1.2"),
        ("huebridge_device", "Motion sensor"),
        ("huebridge_room", "<unassigned>"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let fields = Fields::from([("temperature".to_string(), FieldValue::from(20.45))]);
    let record = MetricRecord::new("huebridge_temperature", fields, tags);

    let key = KeyExprBuilder::new("huesight/hue").build(
        "192.168.1.2",
        &record.measurement,
        record.tag("huebridge_device").unwrap_or_default(),
    );
    assert_eq!(
        key,
        "huesight/hue/192.168.1.2/huebridge_temperature/Motion_sensor"
    );

    let bytes = encode(&record, Format::Json).expect("JSON encode failed");
    let decoded: MetricRecord = decode(&bytes, Format::Json).expect("JSON decode failed");
    assert_eq!(decoded.measurement, "huebridge_temperature");
    assert_eq!(decoded.tag("huebridge_room"), Some("<unassigned>"));
    assert_eq!(decoded.field("temperature"), Some(&FieldValue::Float(20.45)));
}

#[test]
fn test_error_report_workflow() {
    let report = ErrorReport::new(ErrorType::Timeout, "request timed out")
        .with_device("https://192.168.1.2");

    let bytes = encode(&report, Format::Cbor).expect("CBOR encode failed");
    let decoded: ErrorReport = decode(&bytes, Format::Cbor).expect("CBOR decode failed");

    assert_eq!(decoded.error_type, ErrorType::Timeout);
    assert!(decoded.retryable);
    assert_eq!(decoded.device.as_deref(), Some("https://192.168.1.2"));
}
