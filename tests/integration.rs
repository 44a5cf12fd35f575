//! End-to-end decode and render tests over synthetic Identify buffers
//!
//! No hardware is touched: buffers are built the way the firmware would
//! fill them, then run through the overlay and both renderers.

use pretty_assertions::assert_eq;

use noload::identify::{IdCtrl, IdNs, IDENTIFY_BUFFER_SIZE, NS_VS_OFFSET};
use noload::noload::{CtrlRecord, NsRecord};
use noload::render::{json, text, Mode};
use noload::{detect_version, FormatVersion, NoloadError};

fn put32(buffer: &mut [u8], offset: usize, value: u32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Synthetic Identify Namespace buffer carrying a V4 vendor region
fn v4_identify_ns() -> Box<[u8; IDENTIFY_BUFFER_SIZE]> {
    let mut raw = Box::new([0u8; IDENTIFY_BUFFER_SIZE]);
    let vs = NS_VS_OFFSET;
    put32(&mut raw[..], vs, 0x0000_0003); // acc_status
    raw[vs + 16..vs + 25].copy_from_slice(b"TestAccel");
    put32(&mut raw[..], vs + 80, 7); // acc_ver
    put32(&mut raw[..], vs + 108, 0); // acc_priv_len
    raw
}

/// Synthetic Identify Namespace buffer carrying a V6 vendor region
fn v6_identify_ns(count: u32) -> Box<[u8; IDENTIFY_BUFFER_SIZE]> {
    let mut raw = Box::new([0u8; IDENTIFY_BUFFER_SIZE]);
    let vs = NS_VS_OFFSET;
    put32(&mut raw[..], vs, 2); // ns_type
    raw[vs + 4..vs + 14].copy_from_slice(b"CompressNs");
    put32(&mut raw[..], vs + 52, 0x0006_0001); // ns_ver
    put32(&mut raw[..], vs + 56, 0x0000_00f1); // ns_features
    put32(&mut raw[..], vs + 252, count);
    for index in 0..count.min(27) as usize {
        let base = vs + 256 + index * 128;
        put32(&mut raw[..], base, 0x0002_0001 + index as u32);
        put32(&mut raw[..], base + 4, 0x10 + index as u32);
        put32(&mut raw[..], base + 8, 0x20 + index as u32);
        put32(&mut raw[..], base + 20, 4); // acc_spec_len
        raw[base + 24..base + 28].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    }
    raw
}

#[test]
fn v4_round_trip_through_both_renderers() {
    let ns = IdNs::from_raw(v4_identify_ns());
    let record = NsRecord::overlay(ns.vs(), FormatVersion::V4).unwrap();

    let plain = text::render_ns(&record, 1, Mode::Plain);
    assert!(plain.starts_with("NVME Identify Namespace 1:"));
    assert!(plain.contains("acc_name\t: TestAccel"));
    assert!(plain.contains("acc_status\t: 0x00000003"));
    assert!(plain.contains("acc_version\t: 0x00000007"));
    assert!(plain.contains("acc_spec_bytes\t: 0"));
    // Zero declared length suppresses the dump section entirely.
    assert!(!plain.contains("acc_user_space"));

    let doc = json::ns_json(&record, Mode::Plain);
    assert_eq!(doc["acc_name"], "TestAccel");
    assert_eq!(doc["acc_status"], 3);
    assert_eq!(doc["acc_version"], 7);
    assert_eq!(doc["acc_spec_bytes"], 0);
    assert!(doc.get("acc_user_space").is_none());
}

#[test]
fn v6_text_and_json_stay_field_for_field_equivalent() {
    let ns = IdNs::from_raw(v6_identify_ns(3));
    let record = NsRecord::overlay(ns.vs(), FormatVersion::V6).unwrap();

    let plain = text::render_ns(&record, 2, Mode::Plain);
    let doc = json::ns_json(&record, Mode::Plain);

    assert_eq!(doc["ns_num_accels"], 3);
    let accels = doc["accel_info"].as_array().unwrap();
    assert_eq!(accels.len(), 3);

    // Every per-accelerator value in the JSON array appears at the same
    // index in the text output, proving both paths index correctly.
    for (i, accel) in accels.iter().enumerate() {
        let status = accel["accel_status"].as_u64().unwrap() as u32;
        assert_eq!(status, 0x0002_0001 + i as u32);

        let section = plain
            .split(&format!("Accelerator {i}:\n"))
            .nth(1)
            .unwrap_or_else(|| panic!("missing section {i}"));
        assert!(section.contains(&format!("accel_status\t: 0x{status:08x}")));
        assert!(section.contains(&format!(
            "accel_job_state\t: 0x{:08x}",
            accel["accel_job_state"].as_u64().unwrap()
        )));
        assert!(section.contains(&format!(
            "accel_spec_len\t: {}",
            accel["accel_spec_len"].as_u64().unwrap()
        )));
    }

    // Non-zero payload dumps the declared bytes in both forms.
    assert!(plain.contains("de ad be ef"));
    assert!(accels[0]["accel_user_space"][0]
        .as_str()
        .unwrap()
        .contains("de ad be ef"));
}

#[test]
fn v6_count_out_of_range_never_reaches_a_renderer() {
    for count in [0u32, 9, 28] {
        let ns = IdNs::from_raw(v6_identify_ns(count));
        let err = NsRecord::overlay(ns.vs(), FormatVersion::V6).unwrap_err();
        match err {
            NoloadError::CountOutOfRange { count: reported } => assert_eq!(reported, count),
            other => panic!("unexpected error for count {count}: {other}"),
        }
    }
}

#[test]
fn firmware_revision_scenarios() {
    assert_eq!(detect_version("4.2.1"), Some(FormatVersion::V4));
    assert_eq!(detect_version("6.0.0-rc1"), Some(FormatVersion::V6));
    assert_eq!(detect_version("notanumber"), None);
}

#[test]
fn controller_record_round_trip() {
    let mut raw = Box::new([0u8; IDENTIFY_BUFFER_SIZE]);
    raw[24..44].copy_from_slice(b"Eideticom NoLoad U.2");
    raw[64..69].copy_from_slice(b"6.0.0");

    let vs = 3072;
    put32(&mut raw[..], vs, 0x54a1_4000); // hw_build_date
    put32(&mut raw[..], vs + 4, 0x54a1_4001); // fw_build_date
    put32(&mut raw[..], vs + 8, 0x0000_1203); // board 3, version 1.2
    put32(&mut raw[..], vs + 12, 17); // work_item
    put32(&mut raw[..], vs + 76, 99); // job_id_count

    let ctrl = IdCtrl::from_raw(raw);
    assert_eq!(ctrl.model_number(), "Eideticom NoLoad U.2");
    assert_eq!(detect_version(&ctrl.firmware_rev()), Some(FormatVersion::V6));

    let record = CtrlRecord::overlay(ctrl.vs());
    let verbose = text::render_ctrl(&record, Mode::Verbose);
    assert!(verbose.contains("hw_build_date\t\t\t: 2016-09-10 20:00:00"));
    assert!(verbose.contains("hw_system_version\t\t: Bittware U2 Series 1"));
    assert!(verbose.contains("system_version\t\t\t: 1.2"));
    assert!(verbose.contains("work_item\t\t\t: 17"));
    assert!(verbose.contains("job_id_count\t\t\t: 99"));

    let doc = json::ctrl_json(&record, Mode::Verbose);
    assert_eq!(doc["hw_build_date"], "2016-09-10 20:00:00");
    assert_eq!(doc["work_item"], 17);
    assert_eq!(doc["job_id_count"], 99);
}

#[test]
fn verbose_namespace_render_includes_register_breakdown() {
    let mut raw = v6_identify_ns(1);
    // enable + blocking enable + interface version 2
    put32(&mut raw[..], NS_VS_OFFSET + 256, (1 << 17) | (2 << 19) | 1);
    let ns = IdNs::from_raw(raw);
    let record = NsRecord::overlay(ns.vs(), FormatVersion::V6).unwrap();

    let verbose = text::render_ns(&record, 1, Mode::Verbose);
    assert!(verbose.contains("Blocking functionality is enabled (AS.BE)"));
    assert!(verbose.contains("[22:19]\t: 2\tAccelerator Interface Version"));
    assert!(verbose.contains("Accelerator is enabled (AS.EN)"));

    let doc = json::ns_json(&record, Mode::Verbose);
    let fields = doc["accel_info"][0]["status_fields"].as_array().unwrap();
    let labels: Vec<&str> = fields
        .iter()
        .map(|f| f["bits"].as_str().unwrap())
        .collect();
    assert!(labels.contains(&"[22:19]"));
    assert!(labels.contains(&"[0:0]"));
}
