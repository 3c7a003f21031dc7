//! Rendering of check results.

use std::io::{self, Write};

use permission_sdk::{AuthorizeResponse, AuthorizeResult};
use serde::Serialize;

use crate::check::Check;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Row<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_ref: Option<&'a str>,
    #[serde(flatten)]
    response: &'a AuthorizeResponse,
}

/// Write one line per check (text) or a JSON array (json).
///
/// # Errors
///
/// Returns any error from `out`.
pub fn render(
    format: OutputFormat,
    checks: &[Check],
    responses: &[AuthorizeResponse],
    out: &mut impl Write,
) -> io::Result<()> {
    let rows = checks.iter().zip(responses).map(|(check, response)| Row {
        key: &check.key,
        resource_ref: check.resource_ref.as_deref(),
        response,
    });

    match format {
        OutputFormat::Text => {
            for row in rows {
                write!(out, "{}", row.key)?;
                if let Some(r) = row.resource_ref {
                    write!(out, " [{r}]")?;
                }
                write!(out, ": {}", label(row.response.result()))?;
                if let Some(decision) = row.response.conditions() {
                    let criteria = serde_json::to_string(&decision.criteria)?;
                    write!(out, " {}/{} {criteria}", decision.plugin_id, decision.resource_type)?;
                }
                writeln!(out)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &rows.collect::<Vec<_>>())?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn label(result: AuthorizeResult) -> &'static str {
    match result {
        AuthorizeResult::Allow => "ALLOW",
        AuthorizeResult::Deny => "DENY",
        AuthorizeResult::Maybe => "MAYBE",
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use permission_sdk::{AuthorizationCriteria, ConditionalDecision, PermissionCondition};
    use serde_json::{Value, json};

    fn fixtures() -> (Vec<Check>, Vec<AuthorizeResponse>) {
        let checks = vec![
            "TEST=foo".parse().unwrap(),
            "ENTITY_DELETE".parse().unwrap(),
            "ENTITY_READ".parse().unwrap(),
        ];
        let responses = vec![
            AuthorizeResponse::Allow,
            AuthorizeResponse::Maybe {
                conditions: ConditionalDecision {
                    plugin_id: "catalog".to_owned(),
                    resource_type: "catalog-entity".to_owned(),
                    criteria: AuthorizationCriteria::condition(PermissionCondition::new(
                        "isEntityOwner",
                        "catalog-entity",
                        [],
                    )),
                },
            },
            AuthorizeResponse::Deny,
        ];
        (checks, responses)
    }

    fn rendered(format: OutputFormat) -> String {
        let (checks, responses) = fixtures();
        let mut out = Vec::new();
        render(format, &checks, &responses, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_has_one_line_per_check() {
        let text = rendered(OutputFormat::Text);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "TEST [foo]: ALLOW");
        assert!(lines[1].starts_with("ENTITY_DELETE: MAYBE catalog/catalog-entity {"));
        assert!(lines[1].contains("isEntityOwner"));
        assert_eq!(lines[2], "ENTITY_READ: DENY");
    }

    #[test]
    fn json_rows_carry_result_and_conditions() {
        let value: Value = serde_json::from_str(&rendered(OutputFormat::Json)).unwrap();

        assert_eq!(value[0], json!({ "key": "TEST", "resourceRef": "foo", "result": "ALLOW" }));
        assert_eq!(value[1]["result"], "MAYBE");
        assert_eq!(value[1]["conditions"]["pluginId"], "catalog");
        assert_eq!(value[2], json!({ "key": "ENTITY_READ", "result": "DENY" }));
    }
}
