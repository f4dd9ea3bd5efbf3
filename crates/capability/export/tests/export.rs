use csms_export::{
    PAYMENT_HEADERS, REPORT_HEADERS, encode_csv, encode_line, payment_rows, report_rows,
};
use csms_storage::{
    PaymentMap, PaymentRecord, ReportPriority, ReportStatus, SeizureDetails, SeizureReportRecord,
    VehicleInfo,
};
use std::collections::BTreeMap;

fn report() -> SeizureReportRecord {
    SeizureReportRecord {
        id: "SR1700000000123".to_string(),
        submitted_by: "Asha Kumari".to_string(),
        submitted_by_id: 7,
        submitted_at: "2026-03-01T09:30:00.000Z".to_string(),
        status: ReportStatus::Reviewed,
        priority: ReportPriority::Medium,
        assigned_to: None,
        due_date: None,
        coordinates: None,
        vehicle_info: VehicleInfo {
            number: "KA01AB1234".to_string(),
            vehicle_type: "car".to_string(),
            make: "Maruti".to_string(),
            color: "white".to_string(),
        },
        seizure_details: SeizureDetails {
            location: "MG Road, Bengaluru".to_string(),
            reason: "no-documents".to_string(),
            notes: Some("owner said \"come tomorrow\"".to_string()),
        },
        photo: None,
        documents: BTreeMap::new(),
        updated_at: None,
    }
}

fn payment(vehicle: &str, amount: f64) -> PaymentRecord {
    PaymentRecord {
        id: "PAY1700000000456".to_string(),
        vehicle_number: vehicle.to_string(),
        mobile_number: "9876543210".to_string(),
        owner_name: None,
        amount,
        payment_type: "fine".to_string(),
        payment_method: "upi".to_string(),
        screenshot: "data:image/png;base64,xxxx".to_string(),
        date: "2026-03-02T10:00:00.000Z".to_string(),
        recorded_by: "Admin User".to_string(),
        recorded_at: "2026-03-02T10:00:00.000Z".to_string(),
    }
}

#[test]
fn report_rows_match_headers() {
    let rows = report_rows(&[report()]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), REPORT_HEADERS.len());
    assert_eq!(rows[0][0], "SR1700000000123");
    assert_eq!(rows[0][1], "KA01AB1234");
    assert_eq!(rows[0][7], "reviewed");
    assert_eq!(rows[0][9], "2026-03-01");
}

#[test]
fn missing_notes_render_empty() {
    let mut record = report();
    record.seizure_details.notes = None;
    let rows = report_rows(&[record]);
    assert_eq!(rows[0][10], "");
}

#[test]
fn payment_rows_flatten_map_in_order() {
    let mut map = PaymentMap::new();
    map.insert(
        "KA05XY9999".to_string(),
        vec![payment("KA05XY9999", 500.0), payment("KA05XY9999", 750.5)],
    );
    map.insert("KA01AB1234".to_string(), vec![payment("KA01AB1234", 200.0)]);

    let rows = payment_rows(&map);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].len(), PAYMENT_HEADERS.len());
    // 车牌号字典序在前，单车内保持录入顺序
    assert_eq!(rows[0][0], "KA01AB1234");
    assert_eq!(rows[1][0], "KA05XY9999");
    assert_eq!(rows[1][2], "500");
    assert_eq!(rows[2][2], "750.5");
}

#[test]
fn encode_line_quotes_embedded_delimiters() {
    let line = encode_line(&[
        "plain".to_string(),
        "has,comma".to_string(),
        "has \"quotes\"".to_string(),
        "has\nnewline".to_string(),
    ]);
    assert_eq!(
        line,
        "plain,\"has,comma\",\"has \"\"quotes\"\"\",\"has\nnewline\""
    );
}

#[test]
fn encode_csv_round_trips_field_count() {
    let rows = report_rows(&[report()]);
    let csv = encode_csv(&REPORT_HEADERS, &rows);
    let mut lines = csv.lines();
    let header = lines.next().expect("header");
    assert_eq!(header.split(',').count(), REPORT_HEADERS.len());
    // 地点含逗号、备注含引号：数据行必须被正确转义
    let body = csv.split('\n').nth(1).expect("row");
    assert!(body.contains("\"MG Road, Bengaluru\""));
    assert!(body.contains("\"owner said \"\"come tomorrow\"\"\""));
}
