use super::rings_table::RiskBand;
use crate::model::{PatternTag, Suspect};
use serde::{Deserialize, Serialize};

pub const NO_SUSPECTS: &str = "No suspicious activity detected yet.";
pub const UNKNOWN_CLUSTER: &str = "Unknown Cluster";

/// Search box plus one toggle per tracked pattern tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspectFilter {
    pub search: String,
    pub circular: bool,
    pub smurfing: bool,
}

impl Default for SuspectFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            circular: true,
            smurfing: true,
        }
    }
}

impl SuspectFilter {
    pub fn enabled(&self, tag: PatternTag) -> bool {
        match tag {
            PatternTag::Circular => self.circular,
            PatternTag::Smurfing => self.smurfing,
        }
    }

    pub fn set(&mut self, tag: PatternTag, enabled: bool) {
        match tag {
            PatternTag::Circular => self.circular = enabled,
            PatternTag::Smurfing => self.smurfing = enabled,
        }
    }

    pub fn admits(&self, suspect: &Suspect) -> bool {
        if suspect.id.is_empty() {
            return false;
        }
        if !self.search.is_empty()
            && !suspect
                .id
                .to_lowercase()
                .contains(&self.search.to_lowercase())
        {
            return false;
        }
        // Suspects carrying neither tag cannot be hidden by the toggles.
        if suspect.is_uncategorized() {
            return true;
        }
        PatternTag::ALL
            .iter()
            .any(|&tag| suspect.has_pattern(tag) && self.enabled(tag))
    }
}

pub fn filter_suspects<'a>(suspects: &'a [Suspect], filter: &SuspectFilter) -> Vec<&'a Suspect> {
    suspects.iter().filter(|s| filter.admits(s)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspectRow {
    pub id: String,
    pub score: i64,
    pub band: RiskBand,
    pub cluster: String,
    pub nodes: u64,
    /// Display labels of the tracked tags this suspect carries.
    pub patterns: Vec<&'static str>,
    pub selected: bool,
}

pub fn suspect_rows(
    suspects: &[Suspect],
    filter: &SuspectFilter,
    selected: Option<&str>,
) -> Vec<SuspectRow> {
    filter_suspects(suspects, filter)
        .into_iter()
        .map(|s| SuspectRow {
            id: s.id.clone(),
            score: s.score.round() as i64,
            band: RiskBand::for_suspect(s.score),
            cluster: s
                .cluster
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| UNKNOWN_CLUSTER.to_string()),
            nodes: s.nodes,
            patterns: PatternTag::ALL
                .into_iter()
                .filter(|&tag| s.has_pattern(tag))
                .map(PatternTag::label)
                .collect(),
            selected: selected == Some(s.id.as_str()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&Suspect]) -> Vec<String> {
        list.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let list = vec![Suspect::new("0x1299C4"), Suspect::new("0xBB24F1")];
        let filter = SuspectFilter {
            search: "0x12".into(),
            ..SuspectFilter::default()
        };
        assert_eq!(ids(&filter_suspects(&list, &filter)), ["0x1299C4"]);

        let filter = SuspectFilter {
            search: "bb24".into(),
            ..SuspectFilter::default()
        };
        assert_eq!(ids(&filter_suspects(&list, &filter)), ["0xBB24F1"]);
    }

    #[test]
    fn test_pattern_toggles_are_or() {
        let list = vec![
            Suspect::new("c").with_patterns(&[PatternTag::Circular]),
            Suspect::new("s").with_patterns(&[PatternTag::Smurfing]),
            Suspect::new("cs").with_patterns(&[PatternTag::Circular, PatternTag::Smurfing]),
            Suspect::new("none"),
        ];
        let mut filter = SuspectFilter::default();
        filter.set(PatternTag::Circular, false);
        assert_eq!(ids(&filter_suspects(&list, &filter)), ["s", "cs", "none"]);

        filter.set(PatternTag::Smurfing, false);
        assert_eq!(ids(&filter_suspects(&list, &filter)), ["none"]);
    }

    #[test]
    fn test_missing_id_never_shown() {
        let list = vec![Suspect::new("")];
        assert!(filter_suspects(&list, &SuspectFilter::default()).is_empty());
    }

    #[test]
    fn test_rows() {
        let mut s = Suspect::new("0xAA");
        s.score = 92.4;
        s.nodes = 12;
        let rows = suspect_rows(&[s], &SuspectFilter::default(), Some("0xAA"));
        assert_eq!(rows[0].score, 92);
        assert_eq!(rows[0].band, RiskBand::Critical);
        assert_eq!(rows[0].cluster, UNKNOWN_CLUSTER);
        assert!(rows[0].selected);
    }

    #[test]
    fn test_rows_carry_pattern_labels() {
        let list = vec![
            Suspect::new("cs").with_patterns(&[PatternTag::Smurfing, PatternTag::Circular]),
            Suspect::new("none"),
        ];
        let rows = suspect_rows(&list, &SuspectFilter::default(), None);
        assert_eq!(rows[0].patterns, ["Circular Routing", "Smurfing Patterns"]);
        assert!(rows[1].patterns.is_empty());
    }
}
