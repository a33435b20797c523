//! Server settings sections, exchanged as free-form JSON objects.

use serde_json::{Map, Value};

use propdesk_core::{Desk, SettingsSection};

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand, SettingsSectionArg};
use crate::error::CliError;
use crate::output;

use super::util;

fn section(arg: SettingsSectionArg) -> SettingsSection {
    match arg {
        SettingsSectionArg::System => SettingsSection::System,
        SettingsSectionArg::Security => SettingsSection::Security,
        SettingsSectionArg::General => SettingsSection::General,
        SettingsSectionArg::Sms => SettingsSection::Sms,
    }
}

/// Parse `KEY=VALUE`; VALUE is JSON when it parses, else a string.
fn parse_pair(raw: &str) -> Result<(String, Value), CliError> {
    let (key, value) = raw.split_once('=').ok_or_else(|| CliError::Validation {
        field: "setting".into(),
        reason: format!("expected KEY=VALUE, got '{raw}'"),
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "setting".into(),
            reason: format!("missing key in '{raw}'"),
        });
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

fn detail(values: &Value) -> String {
    match values.as_object() {
        Some(map) if !map.is_empty() => {
            let fields: Vec<(&str, String)> = map
                .iter()
                .map(|(k, v)| {
                    let shown = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.as_str(), shown)
                })
                .collect();
            output::detail_lines(&fields)
        }
        _ => "(no settings)".into(),
    }
}

pub async fn handle(desk: &Desk, args: SettingsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::Get { section: arg } => {
            let values = desk.settings(section(arg)).await?;
            let out = output::render_single(global.output, &values, detail, |v| {
                v.as_object()
                    .map(|m| m.keys().cloned().collect::<Vec<_>>().join("\n"))
                    .unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Set {
            section: arg,
            pairs,
            from_file,
        } => {
            let section = section(arg);
            let values: Value = if let Some(path) = from_file {
                util::read_json_file(&path)?
            } else {
                let current = desk.settings(section).await?;
                let mut map = match current {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                for raw in &pairs {
                    let (key, value) = parse_pair(raw)?;
                    map.insert(key, value);
                }
                Value::Object(map)
            };
            desk.update_settings(section, &values).await?;
            output::notice(&format!("✓ {section} settings saved"), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_values_parse_as_json_when_possible() {
        let (k, v) = parse_pair("max_attempts=5").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(k, "max_attempts");
        assert_eq!(v, Value::from(5));

        let (_, v) = parse_pair("sender=Front Desk").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(v, Value::from("Front Desk"));

        let (_, v) = parse_pair("enabled=true").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(v, Value::Bool(true));
    }

    #[test]
    fn pair_without_equals_is_rejected() {
        assert!(parse_pair("enabled").is_err());
        assert!(parse_pair("=1").is_err());
    }
}
