use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Filler term counts, kept in insertion order
///
/// Serialized as a JSON object. Order matters for tie-breaking when ranking
/// the most frequent terms, so this is not a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillerWordCounts {
    entries: Vec<(String, usize)>,
}

impl FillerWordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `term`, inserting it at the end if new
    pub fn add(&mut self, term: &str, count: usize) {
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| t == term) {
            entry.1 += count;
        } else {
            self.entries.push((term.to_string(), count));
        }
    }

    pub fn get(&self, term: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all occurrences
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// The `n` most frequent terms; ties keep insertion order
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.iter().collect();
        // sort_by is stable, so equal counts stay in insertion order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for FillerWordCounts {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (term, count) in iter {
            counts.add(&term.into(), count);
        }
        counts
    }
}

impl Serialize for FillerWordCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (term, count) in &self.entries {
            map.serialize_entry(term, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FillerWordCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = FillerWordCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of filler term to count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut counts = FillerWordCounts::new();
                while let Some((term, count)) = access.next_entry::<String, usize>()? {
                    counts.add(&term, count);
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

/// Call-shape statistics computed once per analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkMetrics {
    /// Percentage of words spoken by the rep
    pub talk_ratio_me: u32,
    /// Percentage of words spoken by everyone else
    pub talk_ratio_prospect: u32,
    pub total_words_me: usize,
    pub total_words_prospect: usize,
    /// Filler term occurrences in the rep's speech
    pub filler_words: FillerWordCounts,
    /// Filler occurrences as a percentage of the rep's words
    pub filler_word_rate: u32,
    pub turn_count: usize,
}

impl TalkMetrics {
    pub fn total_words(&self) -> usize {
        self.total_words_me + self.total_words_prospect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_breaks_ties_by_insertion_order() {
        let counts: FillerWordCounts = vec![("ehm", 3), ("jako", 10), ("no", 3), ("tak", 1)]
            .into_iter()
            .collect();

        let top = counts.top(3);
        assert_eq!(top, vec![("jako", 10), ("ehm", 3), ("no", 3)]);
        assert_eq!(counts.total(), 17);
    }

    #[test]
    fn test_add_accumulates_existing_term() {
        let mut counts = FillerWordCounts::new();
        counts.add("um", 1);
        counts.add("uh", 2);
        counts.add("um", 4);
        assert_eq!(counts.get("um"), Some(5));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_counts_serialize_as_ordered_object() {
        let counts: FillerWordCounts = vec![("jako", 10), ("ehm", 3)].into_iter().collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"jako":10,"ehm":3}"#);

        let back: FillerWordCounts = serde_json::from_str(r#"{"z":1,"a":2}"#).unwrap();
        let order: Vec<&str> = back.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["z", "a"]);
    }

    #[test]
    fn test_metrics_json_field_names() {
        let metrics = TalkMetrics {
            talk_ratio_me: 60,
            talk_ratio_prospect: 40,
            ..Default::default()
        };
        let value = serde_json::to_value(&metrics).unwrap();
        assert_eq!(value["talkRatioMe"], 60);
        assert_eq!(value["fillerWordRate"], 0);
        assert!(value["fillerWords"].as_object().unwrap().is_empty());
    }
}
