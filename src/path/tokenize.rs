//! Path `d` attribute tokenizer.
//!
//! Splits path data into single-letter command tokens and numeric parameter
//! strings. Commas and whitespace separate tokens; command letters need no
//! separator (`M10,20L30,40`), a sign starts a new number (`10-5`), and a
//! second decimal point starts a new number (`0.5.5`), as does a
//! decimal point after an exponent (`1e3.5`). Exponents stay intact
//! (`1e-3`).
//!
//! Anything else is kept inside the current token so the interpreter can
//! reject it as malformed instead of silently dropping it.

/// Tokenize a path `d` string into commands and numbers.
pub fn tokenize(d: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in d.chars() {
        if (ch == 'e' || ch == 'E') && is_mantissa(&current) {
            current.push(ch);
        } else if ch.is_alphabetic() {
            flush(&mut tokens, &mut current);
            tokens.push(ch.to_string());
        } else if (ch == '-' || ch == '+') && !current.is_empty() && !ends_with_exponent(&current)
        {
            // Sign starts a new number (unless after exponent)
            flush(&mut tokens, &mut current);
            current.push(ch);
        } else if ch == '.' && is_complete_mantissa(&current) {
            flush(&mut tokens, &mut current);
            current.push(ch);
        } else if ch == ',' || ch.is_whitespace() {
            flush(&mut tokens, &mut current);
        } else {
            current.push(ch);
        }
    }
    flush(&mut tokens, &mut current);

    tokens
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// `current` is a number that may still take an exponent.
fn is_mantissa(current: &str) -> bool {
    current.chars().any(|c| c.is_ascii_digit())
        && !current.contains(['e', 'E'])
}

fn ends_with_exponent(current: &str) -> bool {
    current.ends_with('e') || current.ends_with('E')
}

/// A `.` cannot extend a number that already has a fraction or an exponent.
fn is_complete_mantissa(current: &str) -> bool {
    current.contains(['.', 'e', 'E'])
}
