//! Title escaping.
//!
//! Legacy titles use `;` to separate the histogram title from axis titles, so
//! a free-form title must have each `;` written as `#;`.

/// Insert `#` before every `;`.
pub fn escape(title: &str) -> String {
    let extra = title.matches(';').count();
    if extra == 0 {
        return title.to_string();
    }
    let mut out = String::with_capacity(title.len() + extra);
    for c in title.chars() {
        if c == ';' {
            out.push('#');
        }
        out.push(c);
    }
    out
}
