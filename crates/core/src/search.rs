//! Multi-term catalog filtering.
//!
//! Queries are split on whitespace; a record matches only when every term
//! appears as a case-insensitive substring somewhere across its tool name,
//! tags, title, command and description. Matching is binary and preserves
//! catalog order; there is no ranking.

use crate::catalog::CommandRecord;

/// Returns the indices of the records matching `query`, in catalog order.
///
/// An empty query matches everything.
pub fn filter_indices(records: &[CommandRecord], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..records.len()).collect();
    }

    let query = query.to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_all_terms(record, &terms))
        .map(|(i, _)| i)
        .collect()
}

/// Returns the records matching `query`, in catalog order.
pub fn filter<'a>(records: &'a [CommandRecord], query: &str) -> Vec<&'a CommandRecord> {
    filter_indices(records, query)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

fn matches_all_terms(record: &CommandRecord, terms: &[&str]) -> bool {
    let haystack = search_text(record);
    terms.iter().all(|term| haystack.contains(term))
}

/// Builds one searchable lower-cased string from all record fields.
fn search_text(record: &CommandRecord) -> String {
    format!(
        "{} {} {} {} {}",
        record.tool,
        record.tags.join(" "),
        record.title,
        record.command,
        record.description.as_deref().unwrap_or_default()
    )
    .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tool: &str, title: &str, command: &str, description: Option<&str>) -> CommandRecord {
        CommandRecord {
            tool: tool.to_string(),
            tags: vec!["recon".to_string()],
            title: title.to_string(),
            description: description.map(ToString::to_string),
            command: command.to_string(),
            source: "test.yml".to_string(),
        }
    }

    fn sample_records() -> Vec<CommandRecord> {
        vec![
            record("nmap", "Service scan", "nmap -sV {{ip}}", Some("Version scan")),
            record("nmap", "Ping sweep", "nmap -sn {{range}}", None),
            record("ffuf", "Dir fuzzing", "ffuf -u {{url}}/FUZZ", Some("Path brute force")),
        ]
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let records = sample_records();
        assert_eq!(filter_indices(&records, ""), vec![0, 1, 2]);
    }

    #[test]
    fn test_single_term_matches_any_field() {
        let records = sample_records();
        // Matches the tool name
        assert_eq!(filter_indices(&records, "ffuf"), vec![2]);
        // Matches the command template
        assert_eq!(filter_indices(&records, "-sn"), vec![1]);
        // Matches the description
        assert_eq!(filter_indices(&records, "version"), vec![0]);
        // Matches the shared tag
        assert_eq!(filter_indices(&records, "recon"), vec![0, 1, 2]);
    }

    #[test]
    fn test_all_terms_must_match() {
        let records = sample_records();
        assert_eq!(filter_indices(&records, "nmap scan"), vec![0]);
        assert!(filter_indices(&records, "nmap fuzz").is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let records = sample_records();
        assert_eq!(filter_indices(&records, "NMAP Sweep"), vec![1]);
    }

    #[test]
    fn test_order_is_preserved_not_ranked() {
        let records = sample_records();
        // "nmap" matches records 0 and 1; a better title match on 1 must not
        // reorder the result.
        assert_eq!(filter_indices(&records, "nmap"), vec![0, 1]);
    }

    #[test]
    fn test_filter_returns_same_records_as_indices() {
        let records = sample_records();
        let by_ref = filter(&records, "nmap");
        assert_eq!(by_ref.len(), 2);
        assert_eq!(by_ref[0].title, "Service scan");
        assert_eq!(by_ref[1].title, "Ping sweep");
    }
}
