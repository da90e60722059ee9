//! American Soundex, used to group spelling variants of city names.

/// Soundex code of `word`, e.g. `Robert` → `R163`.
///
/// Non-ASCII-alphabetic characters are ignored. Returns `None` when nothing
/// alphabetic remains.
pub fn soundex(word: &str) -> Option<String> {
    let mut letters = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase());

    let first = letters.next()?;
    let mut code = String::with_capacity(4);
    code.push(first);

    let mut last_digit = digit(first);
    for c in letters {
        match c {
            // H and W do not separate letters with the same code.
            'H' | 'W' => continue,
            _ => {}
        }
        let d = digit(c);
        if d != '0' && d != last_digit {
            code.push(d);
            if code.len() == 4 {
                break;
            }
        }
        last_digit = d;
    }

    while code.len() < 4 {
        code.push('0');
    }
    Some(code)
}

fn digit(c: char) -> char {
    match c {
        'B' | 'F' | 'P' | 'V' => '1',
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => '2',
        'D' | 'T' => '3',
        'L' => '4',
        'M' | 'N' => '5',
        'R' => '6',
        _ => '0',
    }
}
