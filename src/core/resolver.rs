use crate::utils::html;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Winter Games committees, used when the configuration brings no table.
const DEFAULT_ENTITIES: &[(&str, &str)] = &[
    ("Australia", "AUS"),
    ("Austria", "AUT"),
    ("Belgium", "BEL"),
    ("Bulgaria", "BUL"),
    ("Canada", "CAN"),
    ("China", "CHN"),
    ("Croatia", "CRO"),
    ("Czech Republic", "CZE"),
    ("Czechia", "CZE"),
    ("Denmark", "DEN"),
    ("Estonia", "EST"),
    ("Finland", "FIN"),
    ("France", "FRA"),
    ("Georgia", "GEO"),
    ("Germany", "GER"),
    ("Great Britain", "GBR"),
    ("Hungary", "HUN"),
    ("Italy", "ITA"),
    ("Japan", "JPN"),
    ("Kazakhstan", "KAZ"),
    ("Latvia", "LAT"),
    ("Liechtenstein", "LIE"),
    ("Netherlands", "NED"),
    ("New Zealand", "NZL"),
    ("Norway", "NOR"),
    ("Poland", "POL"),
    ("Slovakia", "SVK"),
    ("Slovenia", "SLO"),
    ("South Korea", "KOR"),
    ("Korea", "KOR"),
    ("Spain", "ESP"),
    ("Sweden", "SWE"),
    ("Switzerland", "SUI"),
    ("Ukraine", "UKR"),
    ("United States", "USA"),
    ("USA", "USA"),
    ("Individual Neutral Athletes", "AIN"),
];

fn decoration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // footnote brackets like [a] or [12], host markers and daggers
    PATTERN.get_or_init(|| Regex::new(r"\[[^\]]*\]|[*†‡]").expect("static pattern"))
}

/// Strips footnote markers, asterisks and extra whitespace from a raw label.
pub fn normalize_label(raw: &str) -> String {
    let decoded = html::decode_entities(raw);
    let stripped = decoration_pattern().replace_all(&decoded, "");
    html::normalize_ws(&stripped)
}

fn lookup_key(label: &str) -> String {
    label.to_lowercase()
}

/// Maps labels from the standings page onto the short codes the roster uses.
#[derive(Debug, Clone)]
pub struct EntityResolver {
    codes: HashMap<String, String>,
}

impl EntityResolver {
    pub fn new<I, K, V>(table: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut codes = HashMap::new();
        for (name, code) in table {
            let code = code.as_ref().trim().to_string();
            codes.insert(lookup_key(&normalize_label(name.as_ref())), code.clone());
            // a code always resolves to itself
            codes.entry(lookup_key(&code)).or_insert(code);
        }
        Self { codes }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_ENTITIES.iter().copied())
    }

    /// Canonical code for `raw`, or `None` when the label is outside the table.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        let label = normalize_label(raw);
        if label.is_empty() {
            return None;
        }
        self.codes.get(&lookup_key(&label)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}
