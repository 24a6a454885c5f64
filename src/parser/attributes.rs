//! GTF attribute column parsing.

use indexmap::IndexMap;

/// Attribute key/value pairs of one GTF record.
///
/// Keys may repeat (`tag` usually does). Every value is kept in file order,
/// and [`get`](Self::get) answers with the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
    entries: IndexMap<String, Vec<String>>,
}

impl AttributeBag {
    /// Parse an attribute column such as `gene_id "G1"; exon_number 2;`.
    ///
    /// Each `;`-separated part is split on its first space into key and value.
    /// Parts without a space are skipped. Surrounding quotes are stripped from
    /// values, which may also be unquoted.
    pub fn parse(attributes: &str) -> Self {
        let mut entries: IndexMap<String, Vec<String>> = IndexMap::new();

        for part in attributes.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let Some((key, value)) = part.split_once(' ') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim();
            entries
                .entry(key.to_string())
                .or_default()
                .push(value.to_string());
        }

        AttributeBag { entries }
    }

    /// Last value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.last())
            .map(|v| v.as_str())
    }

    /// All values recorded for `key`.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// True when any value of `key` contains `marker` as a substring.
    pub fn any_contains(&self, key: &str, marker: &str) -> bool {
        self.get_all(key).iter().any(|v| v.contains(marker))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
