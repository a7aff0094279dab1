// Copyright 2026 driedpampas@proton.me
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stringified NBT (SNBT) rendering.
//!
//! SNBT is the human-readable form Minecraft's `/data get` and
//! command-block syntax use. This module only renders SNBT; parsing SNBT
//! back into an [`NbtTag`] is not something the Anvil pipeline needs (a
//! region file never stores SNBT), so there's no corresponding reader.

use crate::nbt::NbtTag;
use std::fmt::Write as _;

/// Returns `true` if `key` can be written unquoted in a compound.
fn is_unquoted_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn write_key(out: &mut String, key: &str) {
    if is_unquoted_key(key) {
        out.push_str(key);
    } else {
        out.push_str(&escape_string(key));
    }
}

/// Renders an [`NbtTag`] as SNBT.
///
/// `TAG_End` has no SNBT representation of its own; it only legitimately
/// appears as a placeholder element-kind for an empty list, where it
/// renders as an empty array `[]`. Encountering a bare, named `End` tag
/// (which should never happen outside of that context) renders as an
/// empty string, matching how the format has no token for it.
pub fn to_snbt(tag: &NbtTag) -> String {
    let mut out = String::new();
    write_snbt(&mut out, tag);
    out
}

fn write_snbt(out: &mut String, tag: &NbtTag) {
    match tag {
        NbtTag::End => {}
        NbtTag::Byte(v) => {
            let _ = write!(out, "{v}b");
        }
        NbtTag::Short(v) => {
            let _ = write!(out, "{v}s");
        }
        NbtTag::Int(v) => {
            let _ = write!(out, "{v}");
        }
        NbtTag::Long(v) => {
            let _ = write!(out, "{v}L");
        }
        NbtTag::Float(v) => {
            let _ = write!(out, "{v}f");
        }
        NbtTag::Double(v) => {
            let _ = write!(out, "{v}d");
        }
        NbtTag::ByteArray(v) => {
            out.push_str("[B;");
            for (i, b) in v.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{b}B");
            }
            out.push(']');
        }
        NbtTag::String(s) => out.push_str(&escape_string(s)),
        NbtTag::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_snbt(out, item);
            }
            out.push(']');
        }
        NbtTag::Compound(map) => {
            out.push('{');
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_key(out, key);
                out.push(':');
                write_snbt(out, value);
            }
            out.push('}');
        }
        NbtTag::IntArray(v) => {
            out.push_str("[I;");
            for (i, n) in v.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{n}");
            }
            out.push(']');
        }
        NbtTag::LongArray(v) => {
            out.push_str("[L;");
            for (i, n) in v.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{n}L");
            }
            out.push(']');
        }
    }
}

/// Renders an [`NbtTag`] in the `<TAG_End>`-sentinel debug form used by
/// human-readable dumps rather than machine-readable SNBT. Only the `End`
/// variant differs from [`to_snbt`].
pub fn to_debug_string(tag: &NbtTag) -> String {
    if matches!(tag, NbtTag::End) {
        "<TAG_End>".to_string()
    } else {
        to_snbt(tag)
    }
}
