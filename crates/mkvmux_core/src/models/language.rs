//! Language code validation.
//!
//! mkvmerge accepts ISO 639-2 codes for `--language` and `--chapter-language`
//! and, since the switch to IETF tags, BCP-47 tags as well. Callers can plug
//! in their own tables through [`LanguageLookup`]; [`StaticLanguages`] is the
//! built-in table.

use std::sync::LazyLock;

use regex::Regex;

/// Three-letter ISO 639-2 codes accepted by mkvmerge.
const ISO639_2: &[&str] = &[
    "und", "aar", "abk", "ave", "afr", "aka", "amh", "arg", "ara", "asm", "ava", "aym", "aze",
    "azb", "bak", "bel", "bul", "bih", "bis", "bam", "ben", "bod", "bre", "bos", "cat", "che",
    "cha", "cos", "cre", "ces", "chu", "chv", "cym", "dan", "deu", "div", "dzo", "ewe", "ell",
    "eng", "epo", "spa", "est", "eus", "fas", "ful", "fin", "fij", "fao", "fra", "fry", "gle",
    "gla", "glg", "grn", "guj", "glv", "hau", "heb", "hin", "hmo", "hrv", "hat", "hun", "hye",
    "her", "ina", "ind", "ile", "ibo", "iii", "ipk", "ido", "isl", "ita", "iku", "jpn", "jav",
    "kat", "kon", "kik", "kua", "kaz", "kal", "khm", "kan", "kor", "kau", "kas", "kur", "kom",
    "cor", "kir", "lat", "ltz", "lug", "lim", "lin", "lao", "lit", "lub", "lav", "mlg", "mah",
    "mri", "mkd", "mal", "mon", "mar", "msa", "mlt", "mya", "nau", "nob", "nde", "nep", "ndo",
    "nld", "nno", "nor", "nbl", "nav", "nya", "oci", "oji", "orm", "ori", "oss", "pan", "pli",
    "pol", "pus", "por", "que", "roh", "run", "ron", "rus", "kin", "san", "srd", "snd", "sme",
    "sag", "sin", "slk", "slv", "smo", "sna", "som", "sqi", "srp", "ssw", "sot", "sun", "swe",
    "swa", "tam", "tel", "tgk", "tha", "tir", "tuk", "tgl", "tsn", "ton", "tur", "tso", "tat",
    "twi", "tah", "uig", "ukr", "urd", "uzb", "ven", "vie", "vol", "wln", "wol", "xho", "yid",
    "yor", "zha", "zho", "zul",
];

// language[-script][-region](-variant)*
static BCP47_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<lang>[A-Za-z]{2,3})(?:-[A-Za-z]{4})?(?:-(?:[A-Za-z]{2}|[0-9]{3}))?(?:-(?:[A-Za-z0-9]{5,8}|[0-9][A-Za-z0-9]{3}))*$",
    )
    .unwrap()
});

/// Source of truth for which language tags are acceptable.
pub trait LanguageLookup {
    /// Is `code` a recognized ISO 639-2 code?
    fn is_iso639_2(&self, code: &str) -> bool;

    /// Is `tag` a recognized BCP-47 tag?
    fn is_bcp47(&self, tag: &str) -> bool;
}

/// Built-in lookup backed by an embedded ISO 639-2 table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLanguages;

impl LanguageLookup for StaticLanguages {
    fn is_iso639_2(&self, code: &str) -> bool {
        ISO639_2.contains(&code)
    }

    fn is_bcp47(&self, tag: &str) -> bool {
        if tag == "und" {
            return true;
        }
        let Some(caps) = BCP47_REGEX.captures(tag) else {
            return false;
        };
        let primary = caps["lang"].to_ascii_lowercase();
        primary.len() == 2 || self.is_iso639_2(&primary)
    }
}

/// Check an ISO 639-2 code against the built-in table.
pub fn is_iso639_2(code: &str) -> bool {
    StaticLanguages.is_iso639_2(code)
}

/// Check a BCP-47 tag against the built-in table.
pub fn is_bcp47(tag: &str) -> bool {
    StaticLanguages.is_bcp47(tag)
}
