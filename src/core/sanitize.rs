// src/core/sanitize.rs

/// Collapse whitespace runs (including newlines and NBSP) to single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Normalized text, or `None` when nothing but whitespace is left.
pub fn non_empty(s: &str) -> Option<String> {
    let t = normalize_ws(s);
    (!t.is_empty()).then_some(t)
}

/// Case-insensitive prefix strip; returns the trimmed remainder.
pub fn strip_label<'a>(s: &'a str, label: &str) -> &'a str {
    let t = s.trim_start();
    match t.get(..label.len()) {
        Some(head) if head.eq_ignore_ascii_case(label) => t[label.len()..].trim(),
        _ => t.trim(),
    }
}

/// File-name safe stem for a hotel tag (`"Boulan South Beach"` → `Boulan_South_Beach`).
pub fn sanitize_file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch=='-' || ch=='_' { if !(last_us && ch=='_') { out.push(ch); } last_us = ch=='_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!("hotel") } else { out }
}
