/// Normalize a CSV header for synonym lookup: trim, lowercase, and fold
/// Latin-1 accented characters to their ASCII base so that e.g.
/// "Temperatura" and "TEMPERATURA" and "temperatúra" all compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(fold_accent)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
