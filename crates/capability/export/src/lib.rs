//! 导出能力：集合扁平化为 CSV 就绪的表格行。
//!
//! 纯转换：集合 → 表头 + 字符串行，嵌套对象按列拆平；
//! 文件写出/下载由调用方的文件写入协作方完成。
//! [`encode_line`] 对含分隔符、引号、换行的字段加引号转义。

use csms_storage::clock::parse_iso;
use csms_storage::{PaymentMap, ReportStatus, SeizureReportRecord};

/// 报告导出列。
pub const REPORT_HEADERS: [&str; 11] = [
    "Report ID",
    "Vehicle Number",
    "Type",
    "Make",
    "Color",
    "Location",
    "Reason",
    "Status",
    "Submitted By",
    "Date",
    "Notes",
];

/// 缴费导出列。
pub const PAYMENT_HEADERS: [&str; 8] = [
    "Vehicle Number",
    "Date",
    "Amount",
    "Payment Type",
    "Payment Method",
    "Mobile Number",
    "Owner Name",
    "Recorded By",
];

/// 报告集合 → 表格行（列序同 [`REPORT_HEADERS`]）。
pub fn report_rows(reports: &[SeizureReportRecord]) -> Vec<Vec<String>> {
    reports
        .iter()
        .map(|report| {
            vec![
                report.id.clone(),
                report.vehicle_info.number.clone(),
                report.vehicle_info.vehicle_type.clone(),
                report.vehicle_info.make.clone(),
                report.vehicle_info.color.clone(),
                report.seizure_details.location.clone(),
                report.seizure_details.reason.clone(),
                status_label(report.status),
                report.submitted_by.clone(),
                date_part(&report.submitted_at),
                report.seizure_details.notes.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

/// 缴费映射 → 表格行（车牌号字典序，单车内录入顺序）。
pub fn payment_rows(payments: &PaymentMap) -> Vec<Vec<String>> {
    payments
        .iter()
        .flat_map(|(vehicle_number, records)| {
            records.iter().map(move |payment| {
                vec![
                    vehicle_number.clone(),
                    date_part(&payment.date),
                    format_amount(payment.amount),
                    payment.payment_type.clone(),
                    payment.payment_method.clone(),
                    payment.mobile_number.clone(),
                    payment.owner_name.clone().unwrap_or_default(),
                    payment.recorded_by.clone(),
                ]
            })
        })
        .collect()
}

/// 把一行字段编码为 CSV 文本行。
///
/// 含逗号、双引号或换行的字段加双引号包裹，内部引号翻倍。
pub fn encode_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| encode_field(field))
        .collect::<Vec<String>>()
        .join(",")
}

/// 表头 + 行 → 完整 CSV 文本。
pub fn encode_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let header_fields: Vec<String> = headers.iter().map(|header| header.to_string()).collect();
    let mut lines = vec![encode_line(&header_fields)];
    lines.extend(rows.iter().map(|row| encode_line(row)));
    lines.join("\n")
}

fn encode_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn status_label(status: ReportStatus) -> String {
    match status {
        ReportStatus::Pending => "pending".to_string(),
        ReportStatus::Reviewed => "reviewed".to_string(),
        ReportStatus::Resolved => "resolved".to_string(),
    }
}

/// 时间戳的日期部分（YYYY-MM-DD）；解析失败时原样输出。
fn date_part(timestamp: &str) -> String {
    match parse_iso(timestamp) {
        Some(dt) => dt.date_naive().to_string(),
        None => timestamp.to_string(),
    }
}

/// 金额列：整数金额不带小数位。
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{amount}")
    }
}
