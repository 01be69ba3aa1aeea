//! Defensive parsing of LLM output: fenced, prose-wrapped, or trailing-comma JSON.
//! No teacher analogue — the teacher never consumes untrusted model output — grounded on
//! the defensive re-parse pattern used by LLM-backed repos in the retrieval pack.

#[derive(Debug)]
pub struct DecodeError(pub String);

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strips markdown code fences, tries a strict parse, then falls back to slicing the
/// outermost `{...}` and stripping trailing commas before trying again.
pub fn decode(raw_text: &str) -> Result<serde_json::Value, DecodeError> {
    let trimmed = strip_fences(raw_text.trim());

    if let Ok(v) = serde_json::from_str::<serde_json::Value>(&trimmed) {
        return Ok(v);
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) if s <= e => (s, e),
        _ => return Err(DecodeError("no JSON object found in response".to_string())),
    };

    let candidate = strip_trailing_commas(&trimmed[start..=end]);

    serde_json::from_str::<serde_json::Value>(&candidate)
        .map_err(|e| DecodeError(format!("failed to parse salvaged JSON: {e}")))
}

fn strip_fences(text: &str) -> String {
    let mut out = text.to_string();
    while let Some(pos) = out.find("```") {
        let after_ticks = pos + 3;
        let rest = &out[after_ticks..];
        let lang_len = rest
            .char_indices()
            .take_while(|(_, c)| c.is_alphanumeric())
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        out.replace_range(pos..after_ticks + lang_len, "");
    }
    out
}

fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                i += 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}
