//! Accelerator status register decoders
//!
//! Every accelerator descriptor carries one dense 32-bit status word. The
//! bit-to-meaning mapping drifted between firmware generations: bits 17 and
//! 18 were separate blocking-read/blocking-write enables in the version 4
//! era and collapsed into one blocking enable later, while bits 23 and 24
//! changed from In-Order Enable plus reserved to Single Job Enable plus
//! Allow Overprovisioned Writes. The two eras are decoded by separate named
//! functions because the drift is real behavior, not a renaming.

use serde::Serialize;

use super::FormatVersion;

/// One decoded sub-range of the status register
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterField {
    /// High bit of the range (inclusive)
    pub hi: u8,
    /// Low bit of the range (inclusive)
    pub lo: u8,
    /// Extracted value, shifted down to bit 0
    pub value: u32,
    /// Whether this range is reserved in the layout
    pub reserved: bool,
    /// Human interpretation of the extracted value
    pub note: String,
}

impl RegisterField {
    fn defined(hi: u8, lo: u8, value: u32, note: String) -> Self {
        Self {
            hi,
            lo,
            value,
            reserved: false,
            note,
        }
    }

    fn rsvd(hi: u8, lo: u8, value: u32) -> Self {
        Self {
            hi,
            lo,
            value,
            reserved: true,
            note: "Reserved".to_string(),
        }
    }

    /// Bit-range label as rendered, e.g. `[22:19]`
    pub fn bits_label(&self) -> String {
        format!("[{}:{}]", self.hi, self.lo)
    }

    /// Value as rendered: decimal for defined ranges, hex for reserved ones
    pub fn value_label(&self) -> String {
        if self.reserved {
            format!("{:#x}", self.value)
        } else {
            format!("{}", self.value)
        }
    }

    /// Reserved ranges are shown only when non-zero; defined ranges always
    pub fn visible(&self) -> bool {
        !self.reserved || self.value != 0
    }
}

fn bits(word: u32, hi: u8, lo: u8) -> u32 {
    let width = hi - lo + 1;
    let mask = if width == 32 { u32::MAX } else { (1 << width) - 1 };
    (word >> lo) & mask
}

fn enabled_note(on: bool, what: &str, tag: &str) -> String {
    if on {
        format!("{what} is enabled ({tag})")
    } else {
        format!("{what} is NOT enabled ({tag})")
    }
}

fn ready_note(on: bool, what: &str, tag: &str) -> String {
    if on {
        format!("Accelerator is ready for the next {what} command ({tag})")
    } else {
        format!("Accelerator is NOT ready for the next {what} command ({tag})")
    }
}

fn status_code_note(sc: u32, sen: bool) -> String {
    if !sen {
        "Status code reporting is disabled (AS.SC)".to_string()
    } else if sc != 0 {
        format!("Status code {sc:#x} occurred (AS.SC)")
    } else {
        "No status code has been reported (AS.SC)".to_string()
    }
}

/// Handshake flags in the top nibble, identical in both eras
fn push_upper_common(out: &mut Vec<RegisterField>, word: u32) {
    out.push(RegisterField::defined(
        31,
        31,
        bits(word, 31, 31),
        "Write acknowledge clear".to_string(),
    ));
    out.push(RegisterField::defined(
        30,
        30,
        bits(word, 30, 30),
        "Read acknowledge clear".to_string(),
    ));
    out.push(RegisterField::defined(
        29,
        29,
        bits(word, 29, 29),
        "Status Ready".to_string(),
    ));
    out.push(RegisterField::defined(
        28,
        28,
        bits(word, 28, 28),
        "Read Done".to_string(),
    ));
}

/// Fields shared by both eras below bit 17
fn push_lower_common(out: &mut Vec<RegisterField>, word: u32) {
    let sen = bits(word, 16, 16);
    out.push(RegisterField::defined(
        16,
        16,
        sen,
        if sen != 0 {
            "Status code field is enabled (AS.SEN)".to_string()
        } else {
            "Status code field is disabled (AS.SEN)".to_string()
        },
    ));
    out.push(RegisterField::defined(
        15,
        8,
        bits(word, 15, 8),
        status_code_note(bits(word, 15, 8), sen != 0),
    ));
    out.push(RegisterField::rsvd(7, 3, bits(word, 7, 3)));
    out.push(RegisterField::defined(
        2,
        2,
        bits(word, 2, 2),
        ready_note(bits(word, 2, 2) != 0, "write", "AS.WRRDY"),
    ));
    out.push(RegisterField::defined(
        1,
        1,
        bits(word, 1, 1),
        ready_note(bits(word, 1, 1) != 0, "read", "AS.RDRDY"),
    ));
    let en = bits(word, 0, 0);
    out.push(RegisterField::defined(
        0,
        0,
        en,
        if en != 0 {
            "Accelerator is enabled (AS.EN)".to_string()
        } else {
            "Accelerator is NOT enabled (AS.EN)".to_string()
        },
    ));
}

/// Decode a status word under version 4 era semantics
///
/// Total over all 32-bit inputs; the returned ranges partition the word
/// exactly, ordered from bit 31 down to bit 0.
pub fn decode_status_v4(word: u32) -> Vec<RegisterField> {
    let mut out = Vec::with_capacity(16);
    push_upper_common(&mut out, word);
    out.push(RegisterField::rsvd(27, 24, bits(word, 27, 24)));
    out.push(RegisterField::defined(
        23,
        23,
        bits(word, 23, 23),
        "In-Order Enable (AS.IOE)".to_string(),
    ));
    out.push(RegisterField::defined(
        22,
        19,
        bits(word, 22, 19),
        "Accelerator Interface Version".to_string(),
    ));
    out.push(RegisterField::defined(
        18,
        18,
        bits(word, 18, 18),
        enabled_note(bits(word, 18, 18) != 0, "Blocking write functionality", "AS.BWE"),
    ));
    out.push(RegisterField::defined(
        17,
        17,
        bits(word, 17, 17),
        enabled_note(bits(word, 17, 17) != 0, "Blocking read functionality", "AS.BRE"),
    ));
    push_lower_common(&mut out, word);
    out
}

/// Decode a status word under version 6 era semantics
pub fn decode_status_v6(word: u32) -> Vec<RegisterField> {
    let mut out = Vec::with_capacity(16);
    push_upper_common(&mut out, word);
    out.push(RegisterField::rsvd(27, 25, bits(word, 27, 25)));
    out.push(RegisterField::defined(
        24,
        24,
        bits(word, 24, 24),
        "Allow Overprovisioned Writes (AS.AOW)".to_string(),
    ));
    out.push(RegisterField::defined(
        23,
        23,
        bits(word, 23, 23),
        "Single Job Enable (AS.SJOB)".to_string(),
    ));
    out.push(RegisterField::defined(
        22,
        19,
        bits(word, 22, 19),
        "Accelerator Interface Version".to_string(),
    ));
    out.push(RegisterField::rsvd(18, 18, bits(word, 18, 18)));
    out.push(RegisterField::defined(
        17,
        17,
        bits(word, 17, 17),
        enabled_note(bits(word, 17, 17) != 0, "Blocking functionality", "AS.BE"),
    ));
    push_lower_common(&mut out, word);
    out
}

/// Decode a status word under the semantics of `version`
pub fn decode_status(word: u32, version: FormatVersion) -> Vec<RegisterField> {
    match version {
        FormatVersion::V4 => decode_status_v4(word),
        FormatVersion::V6 => decode_status_v6(word),
    }
}
