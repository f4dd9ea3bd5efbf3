use api_contract::{LoginRequest, PaymentSubmission, ReportSubmission, UiNotice};

#[test]
fn login_request_accepts_camel_case() {
    let payload = r#"{"identifier":"admin","password":"admin123","rememberMe":true}"#;
    let req: LoginRequest = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.identifier, "admin");
    assert!(req.remember_me);
}

#[test]
fn remember_me_defaults_false() {
    let payload = r#"{"identifier":"admin","password":"admin123"}"#;
    let req: LoginRequest = serde_json::from_str(payload).expect("parse");
    assert!(!req.remember_me);
}

#[test]
fn report_submission_parses_nested_payload() {
    let payload = r#"{
        "vehicleNumber": "ka01ab1234",
        "vehicleType": "car",
        "vehicleMake": "Maruti",
        "vehicleColor": "white",
        "location": "MG Road",
        "reason": "no-documents",
        "coordinates": {"lat": 12.97, "lng": 77.59, "accuracy": 8.5},
        "photo": "data:image/jpeg;base64,xxxx",
        "documents": {
            "rcDocument": {"name": "RC Document", "data": "data:image/jpeg;base64,yyyy", "type": "image/jpeg"}
        }
    }"#;
    let req: ReportSubmission = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.vehicle_number, "ka01ab1234");
    let coords = req.coordinates.expect("coords");
    assert_eq!(coords.lat, 12.97);
    assert_eq!(coords.accuracy, Some(8.5));
    let doc = req.documents.get("rcDocument").expect("doc");
    assert_eq!(doc.mime_type, "image/jpeg");
    assert!(req.notes.is_none());
}

#[test]
fn payment_submission_parses() {
    let payload = r#"{
        "vehicleNumber": "KA05XY9999",
        "mobileNumber": "9876543210",
        "amount": 500,
        "paymentType": "fine",
        "paymentMethod": "upi",
        "screenshot": "data:image/png;base64,xxxx"
    }"#;
    let req: PaymentSubmission = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.amount, 500.0);
    assert!(req.owner_name.is_none());
}

#[test]
fn notice_serializes_camel_case() {
    let notice = UiNotice::success("Report submitted successfully");
    let value = serde_json::to_value(notice).expect("serialize");
    assert_eq!(value.get("success").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(value.get("level").and_then(|v| v.as_str()), Some("success"));
}
