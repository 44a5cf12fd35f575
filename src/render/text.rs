//! Line-oriented text renderer
//!
//! Field order and labels are an external contract; operators script
//! against them. Any change here must be mirrored in the JSON renderer.

use std::fmt::Write;

use super::{hexdump_rows, Mode};
use crate::api::ListEntry;
use crate::noload::status::RegisterField;
use crate::noload::{decode_status, Accelerator, CtrlRecord, FormatVersion, NsRecord};

/// Render the controller vendor-specific record
pub fn render_ctrl(record: &CtrlRecord, mode: Mode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Eideticom NVME Identify Controller:");

    if mode.is_verbose() {
        let _ = writeln!(out, "hw_build_date\t\t\t: {}", record.hw_build_str());
        let _ = writeln!(out, "fw_build_date\t\t\t: {}", record.fw_build_str());
        let _ = writeln!(out, "hw_system_version\t\t: {}", record.board_name());
    } else {
        let _ = writeln!(out, "hw_build_date\t\t\t: 0x{:08x}", record.hw_build_date);
        let _ = writeln!(out, "fw_build_date\t\t\t: 0x{:08x}", record.fw_build_date);
        let _ = writeln!(out, "hw_system_version\t\t: 0x{:08x}", record.hw_system_ver);
    }

    let _ = writeln!(out, "system_version\t\t\t: {}", record.system_version());
    let _ = writeln!(out, "work_item\t\t\t: {}", record.work_item);
    let _ = writeln!(out, "fw_commit_sha\t\t\t: {}", record.fw_commit_str());
    let _ = writeln!(out, "hw_commit_sha\t\t\t: {}", record.hw_commit_str());
    let _ = writeln!(
        out,
        "compiled_fw_commit_sha\t\t: {}",
        record.compiled_fw_commit_str()
    );
    let _ = writeln!(out, "job_id_count\t\t\t: {}", record.job_id_count);
    out
}

/// Render the namespace vendor-specific record
pub fn render_ns(record: &NsRecord, nsid: u32, mode: Mode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "NVME Identify Namespace {nsid}:");
    match record {
        NsRecord::V4(v4) => {
            let _ = writeln!(out, "acc_name\t: {}", v4.acc_name);
            let _ = writeln!(out, "acc_status\t: 0x{:08x}", v4.acc_status);
            if mode.is_verbose() {
                push_status_fields(&mut out, v4.acc_status, FormatVersion::V4);
            }
            if mode.is_verbose() {
                if v4.acc_lock != 0 {
                    let _ = writeln!(
                        out,
                        "acc_lock\t: 0x{:08x}\tAccelerator is locked with lock 0x{:x}",
                        v4.acc_lock, v4.acc_lock
                    );
                } else {
                    let _ = writeln!(
                        out,
                        "acc_lock\t: 0x{:08x}\tAccelerator is NOT locked",
                        v4.acc_lock
                    );
                }
            } else {
                let _ = writeln!(out, "acc_lock\t: 0x{:08x}", v4.acc_lock);
            }
            let _ = writeln!(out, "acc_version\t: 0x{:08x}", v4.acc_ver);
            for (i, cfg) in v4.acc_cfg.iter().enumerate() {
                let _ = writeln!(out, "acc_cfg[{i}]\t: 0x{cfg:08x}");
            }
            let _ = writeln!(out, "acc_spec_bytes\t: {}", v4.acc_spec_len);
            if v4.acc_spec_len != 0 {
                let _ = writeln!(out, "acc_user_space\t:");
                for row in hexdump_rows(&v4.acc_spec) {
                    let _ = writeln!(out, "{}", row.line());
                }
            }
        }
        NsRecord::V6(v6) => {
            let _ = writeln!(out, "ns_type\t\t: 0x{:08x}", v6.ns_type);
            let _ = writeln!(out, "ns_name\t\t: {}", v6.ns_name);
            let _ = writeln!(out, "ns_ver\t\t: 0x{:08x}", v6.ns_ver);
            let _ = writeln!(out, "ns_features\t: 0x{:08x}", v6.ns_features);
            let _ = writeln!(out, "ns_num_accels\t: {}", v6.accels.len());
            for (i, accel) in v6.accels.iter().enumerate() {
                let _ = writeln!(out, "Accelerator {i}:");
                push_accel(&mut out, accel, mode);
            }
        }
    }
    out
}

fn push_accel(out: &mut String, accel: &Accelerator, mode: Mode) {
    let _ = writeln!(out, "\taccel_status\t: 0x{:08x}", accel.acc_status);
    if mode.is_verbose() {
        push_status_fields(out, accel.acc_status, FormatVersion::V6);
    }
    let _ = writeln!(out, "\taccel_job_state\t: 0x{:08x}", accel.acc_job_state);
    let _ = writeln!(out, "\taccel_handshake\t: 0x{:08x}", accel.acc_handshake);
    let _ = writeln!(out, "\taccel_spec_len\t: {}", accel.acc_spec_len);
    if accel.acc_spec_len != 0 {
        for row in hexdump_rows(&accel.acc_spec) {
            let _ = writeln!(out, "\t{}", row.line());
        }
    }
}

fn push_status_fields(out: &mut String, word: u32, version: FormatVersion) {
    for field in visible_fields(word, version) {
        let _ = writeln!(
            out,
            "\t\t{}\t: {}\t{}",
            field.bits_label(),
            field.value_label(),
            field.note
        );
    }
    out.push('\n');
}

/// Decoded register fields with the reserved-and-zero ranges suppressed
pub(crate) fn visible_fields(word: u32, version: FormatVersion) -> Vec<RegisterField> {
    decode_status(word, version)
        .into_iter()
        .filter(|field| field.visible())
        .collect()
}

/// Render the vendor listing, grouped by format version
///
/// Entries of a version are omitted entirely, header included, when none of
/// that version is present.
pub fn render_list(entries: &[ListEntry]) -> String {
    let mut out = String::new();

    let v4: Vec<_> = entries
        .iter()
        .filter(|e| matches!(e, ListEntry::V4 { .. }))
        .collect();
    let v6: Vec<_> = entries
        .iter()
        .filter(|e| matches!(e, ListEntry::V6 { .. }))
        .collect();

    if !v4.is_empty() {
        let _ = writeln!(out, "NoLoad Version 4 Cards:");
        push_list_header(&mut out, "Status");
        for entry in v4 {
            if let ListEntry::V4 {
                node,
                acc_name,
                acc_ver,
                acc_status,
            } = entry
            {
                let _ = writeln!(
                    out,
                    "{:<16} {:<64.64} 0x{:08x} 0x{:08x}",
                    node, acc_name, acc_ver, acc_status
                );
            }
        }
    }

    if !v6.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "NoLoad Version 6 Cards:");
        push_list_header(&mut out, "Number of Accelerators");
        for entry in v6 {
            if let ListEntry::V6 {
                node,
                ns_name,
                ns_ver,
                num_accels,
            } = entry
            {
                let _ = writeln!(
                    out,
                    "{:<16} {:<64.64} 0x{:08x} {}",
                    node, ns_name, ns_ver, num_accels
                );
            }
        }
    }

    out
}

fn push_list_header(out: &mut String, last_column: &str) {
    let _ = writeln!(
        out,
        "{:<16} {:<64} {:<10} {:<10}",
        "Node", "Accelerator Name", "Version", last_column
    );
    let _ = writeln!(
        out,
        "{:<16} {:<64} {:<10} {:<10}",
        "-".repeat(16),
        "-".repeat(64),
        "-".repeat(10),
        "-".repeat(10)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noload::{NsRecordV4, NsRecordV6};
    use pretty_assertions::assert_eq;

    fn v4_record(spec: &[u8]) -> NsRecord {
        NsRecord::V4(NsRecordV4 {
            acc_status: 0x0000_0003,
            acc_name: "TestAccel".to_string(),
            acc_lock: 0,
            acc_ver: 7,
            acc_cfg: [0, 1, 2, 3, 4, 5],
            acc_spec_len: spec.len() as u32,
            acc_spec: spec.to_vec(),
        })
    }

    #[test]
    fn v4_plain_text_field_order() {
        let text = render_ns(&v4_record(&[]), 1, Mode::Plain);
        let labels: Vec<&str> = text
            .lines()
            .skip(1)
            .filter_map(|l| l.split('\t').next())
            .collect();
        assert_eq!(
            labels,
            [
                "acc_name",
                "acc_status",
                "acc_lock",
                "acc_version",
                "acc_cfg[0]",
                "acc_cfg[1]",
                "acc_cfg[2]",
                "acc_cfg[3]",
                "acc_cfg[4]",
                "acc_cfg[5]",
                "acc_spec_bytes",
            ]
        );
    }

    #[test]
    fn zero_length_payload_suppresses_dump_section() {
        let text = render_ns(&v4_record(&[]), 1, Mode::Plain);
        assert!(!text.contains("acc_user_space"));

        let text = render_ns(&v4_record(b"abc"), 1, Mode::Plain);
        assert!(text.contains("acc_user_space\t:"));
        assert!(text.contains("61 62 63"));
    }

    #[test]
    fn verbose_mode_inlines_the_status_breakdown() {
        let text = render_ns(&v4_record(&[]), 1, Mode::Verbose);
        assert!(text.contains("[0:0]\t: 1\tAccelerator is enabled (AS.EN)"));
        assert!(text.contains("[1:1]\t: 1\tAccelerator is ready for the next read command"));
        // Reserved ranges are zero here and must not appear.
        assert!(!text.contains("Reserved"));

        let text = render_ns(&v4_record(&[]), 1, Mode::Plain);
        assert!(!text.contains("[0:0]"));
    }

    #[test]
    fn v6_sections_are_emitted_in_array_order() {
        let record = NsRecord::V6(NsRecordV6 {
            ns_type: 2,
            ns_name: "CompressNs".to_string(),
            ns_ver: 0x60001,
            ns_features: 0xf1,
            accels: (0..3)
                .map(|i| Accelerator {
                    acc_status: 0x100 + i,
                    acc_job_state: i,
                    acc_handshake: 0,
                    acc_spec_len: 0,
                    acc_spec: Vec::new(),
                })
                .collect(),
        });
        let text = render_ns(&record, 2, Mode::Plain);
        let a0 = text.find("Accelerator 0:").unwrap();
        let a1 = text.find("Accelerator 1:").unwrap();
        let a2 = text.find("Accelerator 2:").unwrap();
        assert!(a0 < a1 && a1 < a2);
        assert!(text.contains("accel_status\t: 0x00000102"));
        assert!(text.contains("ns_num_accels\t: 3"));
    }

    #[test]
    fn list_groups_by_version_with_headers() {
        let entries = vec![
            ListEntry::V4 {
                node: "nvme0n1".to_string(),
                acc_name: "EidComp".to_string(),
                acc_ver: 7,
                acc_status: 3,
            },
            ListEntry::V6 {
                node: "nvme1n1".to_string(),
                ns_name: "CompressNs".to_string(),
                ns_ver: 0x60001,
                num_accels: 2,
            },
        ];
        let text = render_list(&entries);
        let v4_pos = text.find("NoLoad Version 4 Cards:").unwrap();
        let v6_pos = text.find("NoLoad Version 6 Cards:").unwrap();
        assert!(v4_pos < v6_pos);
        assert!(text.contains("nvme0n1"));
        assert!(text.contains("Number of Accelerators"));
    }

    #[test]
    fn ctrl_verbose_uses_decoded_strings() {
        let mut vs = vec![0u8; 80];
        vs[0..4].copy_from_slice(&0x54a1_4000u32.to_le_bytes());
        vs[8..12].copy_from_slice(&0x1203u32.to_le_bytes());
        let record = CtrlRecord::overlay(&vs);

        let text = render_ctrl(&record, Mode::Verbose);
        assert!(text.contains("hw_build_date\t\t\t: 2016-09-10 20:00:00"));
        assert!(text.contains("hw_system_version\t\t: Bittware U2 Series 1"));
        assert!(text.contains("system_version\t\t\t: 1.2"));

        let text = render_ctrl(&record, Mode::Plain);
        assert!(text.contains("hw_build_date\t\t\t: 0x54a14000"));
    }
}
