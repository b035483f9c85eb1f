use std::fmt::{Display, Formatter};

use serde::Deserialize;

/// One command entry inside a catalog sheet.
#[derive(Deserialize, Debug, Clone)]
pub struct ActionEntry {
    pub title: String,
    #[serde(alias = "desc")]
    pub description: Option<String>,
    pub command: String,
}

/// On-disk structure of a catalog sheet: one tool with multiple actions.
#[derive(Deserialize, Debug, Clone)]
pub struct CatalogSheet {
    pub tool: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionEntry>,
}

impl CatalogSheet {
    /// Flattens the sheet into one record per action. The records inherit the
    /// sheet's tool name and tags, and carry the sheet path for diagnostics.
    pub fn into_records(self, source: &str) -> Vec<CommandRecord> {
        let CatalogSheet {
            tool,
            tags,
            actions,
        } = self;

        actions
            .into_iter()
            .map(|action| CommandRecord {
                tool: tool.clone(),
                tags: tags.clone(),
                title: action.title,
                description: action.description,
                command: action.command,
                source: source.to_string(),
            })
            .collect()
    }
}

/// Runtime representation of one selectable command. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub tool: String,
    pub tags: Vec<String>,
    pub title: String,
    pub description: Option<String>,
    pub command: String,
    pub source: String,
}

impl Display for CommandRecord {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if self.title.is_empty() {
            // Fall back to the command itself
            formatter.write_str(&self.command)
        } else {
            formatter.write_str(&self.title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_records_inherits_tool_and_tags() {
        let sheet = CatalogSheet {
            tool: "nmap".to_string(),
            tags: vec!["scan".to_string(), "recon".to_string()],
            actions: vec![
                ActionEntry {
                    title: "Service scan".to_string(),
                    description: Some("Version detection".to_string()),
                    command: "nmap -sV {{ip}}".to_string(),
                },
                ActionEntry {
                    title: "Ping sweep".to_string(),
                    description: None,
                    command: "nmap -sn {{range}}".to_string(),
                },
            ],
        };

        let records = sheet.into_records("sheets/nmap.yml");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tool, "nmap");
        assert_eq!(records[0].tags, vec!["scan", "recon"]);
        assert_eq!(records[0].title, "Service scan");
        assert_eq!(records[1].command, "nmap -sn {{range}}");
        assert_eq!(records[1].source, "sheets/nmap.yml");
    }

    #[test]
    fn test_sheet_deserializes_desc_alias() {
        let yaml = r#"
tool: ffuf
tags: [fuzz]
actions:
  - title: Directory fuzzing
    desc: Brute force paths
    command: ffuf -u {{url}}/FUZZ -w {{wordlist}}
"#;
        let sheet: CatalogSheet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            sheet.actions[0].description,
            Some("Brute force paths".to_string())
        );
    }

    #[test]
    fn test_display_falls_back_to_command() {
        let record = CommandRecord {
            tool: "nc".to_string(),
            tags: vec![],
            title: String::new(),
            description: None,
            command: "nc -lvnp {{lport}}".to_string(),
            source: "sheets/nc.yml".to_string(),
        };
        assert_eq!(format!("{record}"), "nc -lvnp {{lport}}");
    }
}
