//! Structured (JSON) renderer
//!
//! Keys are a stable machine contract mirroring the text labels. Every
//! field visible in the text form is visible here under its snake_case key,
//! including the status breakdown and trailing-payload dump.

use serde_json::{json, Map, Value};

use super::text::visible_fields;
use super::{hexdump_rows, Mode};
use crate::noload::{Accelerator, CtrlRecord, FormatVersion, NsRecord};

/// Controller vendor-specific record as a JSON document
pub fn ctrl_json(record: &CtrlRecord, mode: Mode) -> Value {
    let mut root = Map::new();
    if mode.is_verbose() {
        root.insert("hw_build_date".into(), json!(record.hw_build_str()));
        root.insert("fw_build_date".into(), json!(record.fw_build_str()));
        root.insert("hw_system_version".into(), json!(record.board_name()));
    } else {
        root.insert("hw_build_date".into(), json!(record.hw_build_date));
        root.insert("fw_build_date".into(), json!(record.fw_build_date));
        root.insert("hw_system_version".into(), json!(record.hw_system_ver));
    }
    root.insert("system_version".into(), json!(record.system_version()));
    root.insert("work_item".into(), json!(record.work_item));
    root.insert("fw_commit_sha".into(), json!(record.fw_commit_str()));
    root.insert("hw_commit_sha".into(), json!(record.hw_commit_str()));
    root.insert(
        "compiled_fw_commit_sha".into(),
        json!(record.compiled_fw_commit_str()),
    );
    root.insert("job_id_count".into(), json!(record.job_id_count));
    Value::Object(root)
}

/// Namespace vendor-specific record as a JSON document
pub fn ns_json(record: &NsRecord, mode: Mode) -> Value {
    match record {
        NsRecord::V4(v4) => {
            let mut root = Map::new();
            root.insert("acc_name".into(), json!(v4.acc_name));
            root.insert("acc_status".into(), json!(v4.acc_status));
            if mode.is_verbose() {
                root.insert(
                    "status_fields".into(),
                    status_fields_json(v4.acc_status, FormatVersion::V4),
                );
            }
            root.insert("acc_lock".into(), json!(v4.acc_lock));
            root.insert("acc_version".into(), json!(v4.acc_ver));
            root.insert("acc_cfg".into(), json!(v4.acc_cfg));
            root.insert("acc_spec_bytes".into(), json!(v4.acc_spec_len));
            if v4.acc_spec_len != 0 {
                root.insert("acc_user_space".into(), dump_json(&v4.acc_spec));
            }
            Value::Object(root)
        }
        NsRecord::V6(v6) => {
            let mut root = Map::new();
            root.insert("ns_type".into(), json!(v6.ns_type));
            root.insert("ns_name".into(), json!(v6.ns_name));
            root.insert("ns_ver".into(), json!(v6.ns_ver));
            root.insert("ns_features".into(), json!(v6.ns_features));
            root.insert("ns_num_accels".into(), json!(v6.accels.len() as u32));
            // Each element reads its own descriptor, in array order.
            let accels: Vec<Value> = v6
                .accels
                .iter()
                .map(|accel| accel_json(accel, mode))
                .collect();
            root.insert("accel_info".into(), Value::Array(accels));
            Value::Object(root)
        }
    }
}

fn accel_json(accel: &Accelerator, mode: Mode) -> Value {
    let mut info = Map::new();
    info.insert("accel_status".into(), json!(accel.acc_status));
    if mode.is_verbose() {
        info.insert(
            "status_fields".into(),
            status_fields_json(accel.acc_status, FormatVersion::V6),
        );
    }
    info.insert("accel_job_state".into(), json!(accel.acc_job_state));
    info.insert("accel_handshake".into(), json!(accel.acc_handshake));
    info.insert("accel_spec_len".into(), json!(accel.acc_spec_len));
    if accel.acc_spec_len != 0 {
        info.insert("accel_user_space".into(), dump_json(&accel.acc_spec));
    }
    Value::Object(info)
}

fn status_fields_json(word: u32, version: FormatVersion) -> Value {
    let fields: Vec<Value> = visible_fields(word, version)
        .iter()
        .map(|field| {
            json!({
                "bits": field.bits_label(),
                "value": field.value,
                "description": field.note,
            })
        })
        .collect();
    Value::Array(fields)
}

fn dump_json(data: &[u8]) -> Value {
    let rows: Vec<String> = hexdump_rows(data).iter().map(|row| row.line()).collect();
    Value::Array(rows.into_iter().map(Value::String).collect())
}
