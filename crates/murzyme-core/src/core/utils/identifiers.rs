use phf::{Set, phf_set};

pub const IDENTIFIER_LEN: usize = 4;

static STRUCTURE_FILE_EXTENSIONS: Set<&'static str> = phf_set! {
    "PDB", "ENT", "CIF", "MMCIF", "TXT", "GZ", "BZ2", "ZST", "XZ",
};

/// Normalizes an identifier for registry comparison.
///
/// The value is trimmed and uppercased, and trailing structure-file
/// extensions are removed (`"3hmx.pdb"` becomes `"3HMX"`, `"pdb1rub.ent.gz"`
/// becomes `"PDB1RUB"`). Other dotted suffixes are kept, so `"E.coli"`
/// stays `"E.COLI"`. Returns `None` when nothing is left.
pub fn normalize_identifier(raw: &str) -> Option<String> {
    let mut value = raw.trim().to_uppercase();
    while let Some((stem, extension)) = value.rsplit_once('.') {
        if stem.is_empty() || !STRUCTURE_FILE_EXTENSIONS.contains(extension) {
            break;
        }
        value.truncate(stem.len());
    }
    let value = value.trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

/// Returns `true` for bare 4-character tokens that start with a digit and
/// continue with ASCII letters or digits, the shape of a PDB accession code.
pub fn is_accession_like(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    token.chars().count() == IDENTIFIER_LEN
        && first.is_ascii_digit()
        && chars.all(|c| c.is_ascii_alphanumeric())
}

pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .to_ascii_uppercase()
        .contains(&needle.to_ascii_uppercase())
}
