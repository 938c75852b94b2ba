//! Demo dataset for an empty store: five functions and a spread of normal,
//! replay and shadow executions over the last hour.

use crate::error::Result;
use crate::models::{ExecutionRecord, ExecutionStatus, ExecutionType, FunctionDef};
use crate::repository::{ExecutionRepository, FunctionRepository};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

use crate::models::ExecutionStatus::{Failed, Success};
use crate::models::ExecutionType::{Normal, Replay, Shadow};

/// Inserts the demo dataset unless executions already exist.
/// Returns whether anything was written. Either the whole dataset lands or
/// nothing does.
pub async fn seed_if_empty(executions: &ExecutionRepository, now: DateTime<Utc>) -> Result<bool> {
    if executions.count().await? > 0 {
        tracing::debug!("Execution store not empty, skipping demo data");
        return Ok(false);
    }

    let mut tx = executions.begin().await?;
    for function in demo_functions(now) {
        if !FunctionRepository::exists_by_name_with(&mut tx, &function.name).await? {
            FunctionRepository::create_with(&mut tx, &function).await?;
        }
    }
    let records = demo_executions(now);
    for record in &records {
        ExecutionRepository::insert_with(&mut tx, record).await?;
    }
    tx.commit().await?;

    tracing::info!("Seeded {} demo executions", records.len());
    Ok(true)
}

fn demo_functions(now: DateTime<Utc>) -> Vec<FunctionDef> {
    [
        ("fn-1", "resizeImage", "node20", "v1.2.3", 1247, 3, true),
        ("fn-2", "processPayment", "python312", "v2.0.1", 892, 0, true),
        ("fn-3", "sendNotification", "node20", "v1.5.0", 2103, 5, true),
        ("fn-4", "generateReport", "python312", "v3.1.2", 456, 1, true),
        ("fn-5", "transcodeVideo", "go121", "v1.0.8", 234, 0, false),
    ]
    .into_iter()
    .enumerate()
    .map(
        |(i, (id, name, runtime, version, executions, failures, active))| FunctionDef {
            id: id.to_string(),
            name: name.to_string(),
            runtime: runtime.to_string(),
            current_version: version.to_string(),
            executions_24h: executions,
            failures_24h: failures,
            active,
            code: String::new(),
            env_vars: None,
            memory: None,
            timeout: None,
            created_at: now + Duration::milliseconds(i as i64),
        },
    )
    .collect()
}

struct Seed {
    id: i64,
    function: &'static str,
    status: ExecutionStatus,
    execution_type: ExecutionType,
    parent: Option<i64>,
    duration: u64,
    minutes_ago: i64,
    worker: &'static str,
    lamport: i64,
    input: Value,
    output: Value,
    logs: &'static [&'static str],
}

impl Seed {
    fn into_record(self, now: DateTime<Utc>) -> ExecutionRecord {
        ExecutionRecord {
            id: self.id,
            function: self.function.to_string(),
            status: self.status,
            execution_type: self.execution_type,
            parent_execution_id: self.parent,
            duration: self.duration,
            timestamp: now - Duration::minutes(self.minutes_ago),
            worker: self.worker.to_string(),
            lamport: self.lamport,
            input: object(self.input),
            output: object(self.output),
            logs: self.logs.iter().map(|line| line.to_string()).collect(),
        }
    }
}

fn object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

const RESIZE_LOGS: &[&str] = &[
    "[INFO] Starting image resize operation",
    "[INFO] Downloading image from source",
    "[INFO] Uploading to CDN",
    "[INFO] Operation completed successfully",
];
const PAYMENT_LOGS: &[&str] = &[
    "[INFO] Processing payment request",
    "[INFO] Contacting payment gateway",
    "[INFO] Transaction completed",
];
const NOTIFY_OK_LOGS: &[&str] = &[
    "[INFO] Starting notification send",
    "[INFO] Message sent successfully",
];

fn demo_executions(now: DateTime<Utc>) -> Vec<ExecutionRecord> {
    vec![
        Seed {
            id: 1001, function: "resizeImage", status: Success, execution_type: Normal,
            parent: None, duration: 142, minutes_ago: 5, worker: "worker-a3f2", lamport: 1523,
            input: json!({"imageUrl": "https://example.com/photo.jpg", "width": 800, "height": 600}),
            output: json!({"success": true, "url": "https://cdn.example.com/resized.jpg"}),
            logs: RESIZE_LOGS,
        },
        Seed {
            id: 1002, function: "processPayment", status: Success, execution_type: Normal,
            parent: None, duration: 287, minutes_ago: 8, worker: "worker-b7e1", lamport: 1524,
            input: json!({"amount": 49.99, "currency": "USD", "customerId": "cust_123"}),
            output: json!({"success": true, "transactionId": "txn_abc123", "status": "completed"}),
            logs: PAYMENT_LOGS,
        },
        Seed {
            id: 1003, function: "sendNotification", status: Failed, execution_type: Normal,
            parent: None, duration: 523, minutes_ago: 12, worker: "worker-c4d9", lamport: 1525,
            input: json!({"userId": "user_456", "message": "Your order has shipped", "channel": "email"}),
            output: json!({"error": "SMTP connection timeout", "code": "TIMEOUT_ERROR"}),
            logs: &[
                "[INFO] Starting notification send",
                "[WARN] Connection taking longer than expected",
                "[ERROR] SMTP connection timeout after 500ms",
            ],
        },
        Seed {
            id: 1013, function: "sendNotification", status: Success, execution_type: Replay,
            parent: Some(1003), duration: 98, minutes_ago: 10, worker: "worker-c4d9", lamport: 1535,
            input: json!({"userId": "user_456", "message": "Your order has shipped", "channel": "email"}),
            output: json!({"success": true, "messageId": "msg_retry_001"}),
            logs: &["[INFO] Starting notification send (REPLAY)", "[INFO] Notification delivered"],
        },
        Seed {
            id: 1004, function: "resizeImage", status: Success, execution_type: Normal,
            parent: None, duration: 156, minutes_ago: 15, worker: "worker-a3f2", lamport: 1526,
            input: json!({"imageUrl": "https://example.com/banner.png", "width": 1920, "height": 1080}),
            output: json!({"success": true, "url": "https://cdn.example.com/banner-hd.png"}),
            logs: RESIZE_LOGS,
        },
        Seed {
            id: 1005, function: "generateReport", status: Failed, execution_type: Normal,
            parent: None, duration: 2341, minutes_ago: 18, worker: "worker-e8k2", lamport: 1527,
            input: json!({"reportType": "monthly", "format": "pdf", "userId": "admin_001"}),
            output: json!({"error": "Database query timeout", "code": "DB_TIMEOUT"}),
            logs: &["[INFO] Starting report generation", "[ERROR] Query exceeded 2000ms timeout"],
        },
        Seed {
            id: 1015, function: "generateReport", status: Failed, execution_type: Shadow,
            parent: Some(1005), duration: 2456, minutes_ago: 17, worker: "worker-f9k3", lamport: 1537,
            input: json!({"reportType": "monthly", "format": "pdf", "userId": "admin_001"}),
            output: json!({"error": "Database query timeout", "code": "DB_TIMEOUT"}),
            logs: &["[INFO] Starting report generation (SHADOW)", "[ERROR] Query exceeded 2000ms timeout"],
        },
        Seed {
            id: 1006, function: "processPayment", status: Success, execution_type: Normal,
            parent: None, duration: 195, minutes_ago: 22, worker: "worker-b7e1", lamport: 1528,
            input: json!({"amount": 129.99, "currency": "EUR", "customerId": "cust_789"}),
            output: json!({"success": true, "transactionId": "txn_xyz789", "status": "completed"}),
            logs: PAYMENT_LOGS,
        },
        Seed {
            id: 1016, function: "processPayment", status: Success, execution_type: Shadow,
            parent: Some(1006), duration: 203, minutes_ago: 21, worker: "worker-b7e2", lamport: 1538,
            input: json!({"amount": 129.99, "currency": "EUR", "customerId": "cust_789"}),
            output: json!({"success": true, "transactionId": "txn_xyz790", "status": "completed"}),
            logs: PAYMENT_LOGS,
        },
        Seed {
            id: 1007, function: "sendNotification", status: Success, execution_type: Normal,
            parent: None, duration: 98, minutes_ago: 25, worker: "worker-c4d9", lamport: 1529,
            input: json!({"userId": "user_789", "message": "Welcome to our platform!", "channel": "sms"}),
            output: json!({"success": true, "messageId": "msg_def456"}),
            logs: NOTIFY_OK_LOGS,
        },
        Seed {
            id: 1008, function: "resizeImage", status: Success, execution_type: Normal,
            parent: None, duration: 134, minutes_ago: 30, worker: "worker-a3f2", lamport: 1530,
            input: json!({"imageUrl": "https://example.com/profile.jpg", "width": 256, "height": 256}),
            output: json!({"success": true, "url": "https://cdn.example.com/profile-thumb.jpg"}),
            logs: RESIZE_LOGS,
        },
        Seed {
            id: 1018, function: "resizeImage", status: Success, execution_type: Replay,
            parent: Some(1008), duration: 128, minutes_ago: 28, worker: "worker-a3f2", lamport: 1540,
            input: json!({"imageUrl": "https://example.com/profile.jpg", "width": 256, "height": 256}),
            output: json!({"success": true, "url": "https://cdn.example.com/profile-thumb.jpg"}),
            logs: RESIZE_LOGS,
        },
        Seed {
            id: 1009, function: "generateReport", status: Success, execution_type: Normal,
            parent: None, duration: 1876, minutes_ago: 35, worker: "worker-e8k2", lamport: 1531,
            input: json!({"reportType": "weekly", "format": "csv", "userId": "admin_002"}),
            output: json!({"success": true, "fileUrl": "https://storage.example.com/reports/week-48.csv"}),
            logs: &["[INFO] Starting report generation", "[INFO] Report generated successfully"],
        },
        Seed {
            id: 1010, function: "sendNotification", status: Failed, execution_type: Normal,
            parent: None, duration: 412, minutes_ago: 40, worker: "worker-c4d9", lamport: 1532,
            input: json!({"userId": "user_321", "message": "Password reset requested", "channel": "push"}),
            output: json!({"error": "Invalid device token", "code": "INVALID_TOKEN"}),
            logs: &["[INFO] Starting notification send", "[ERROR] Invalid device token for user"],
        },
        Seed {
            id: 1020, function: "sendNotification", status: Failed, execution_type: Replay,
            parent: Some(1010), duration: 398, minutes_ago: 38, worker: "worker-c4d9", lamport: 1542,
            input: json!({"userId": "user_321", "message": "Password reset requested", "channel": "push"}),
            output: json!({"error": "Invalid device token", "code": "INVALID_TOKEN"}),
            logs: &["[INFO] Starting notification send (REPLAY)", "[ERROR] Invalid device token for user"],
        },
        Seed {
            id: 1011, function: "processPayment", status: Success, execution_type: Normal,
            parent: None, duration: 223, minutes_ago: 45, worker: "worker-b7e1", lamport: 1533,
            input: json!({"amount": 9.99, "currency": "GBP", "customerId": "cust_456"}),
            output: json!({"success": true, "transactionId": "txn_ghi789", "status": "completed"}),
            logs: PAYMENT_LOGS,
        },
        Seed {
            id: 1012, function: "resizeImage", status: Success, execution_type: Normal,
            parent: None, duration: 167, minutes_ago: 50, worker: "worker-a3f2", lamport: 1534,
            input: json!({"imageUrl": "https://example.com/product.jpg", "width": 600, "height": 600}),
            output: json!({"success": true, "url": "https://cdn.example.com/product-med.jpg"}),
            logs: RESIZE_LOGS,
        },
    ]
    .into_iter()
    .map(|seed| seed.into_record(now))
    .collect()
}
