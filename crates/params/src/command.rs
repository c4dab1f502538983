use crate::color::{parse_hex_color, unpack_rgb};
use crate::registry::{ParamKind, ParamSpec, ParamValue};
use crate::ParamError;

/// Usage text printed by the `help` console command.
pub const CONSOLE_HELP: &str = "\
commands:
  set <id> <value>   store a value (also `<id>=<value>` or `<id> <value>`)
  reset              restore every default
  dump               print the current values as JSON
  list               print identifiers, kinds, and ranges
  help               show this text
values: numbers, or #rrggbb / 0xrrggbb / r,g,b for colors";

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    Set { id: &'static str, value: ParamValue },
    Reset,
    Dump,
    List,
    Help,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("missing value for '{0}'")]
    MissingValue(String),
    #[error("'{raw}' is not a valid {expected} value for '{id}'")]
    InvalidValue {
        id: String,
        raw: String,
        expected: ParamKind,
    },
    #[error("'{0}' follows the window size and cannot be set from the console")]
    ReadOnly(String),
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// Parses one console line against a parameter table.
pub fn parse_command(line: &str, specs: &'static [ParamSpec]) -> Result<ConsoleCommand, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CommandError::Empty);
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "reset" => return Ok(ConsoleCommand::Reset),
        "dump" => return Ok(ConsoleCommand::Dump),
        "list" => return Ok(ConsoleCommand::List),
        "help" | "?" => return Ok(ConsoleCommand::Help),
        _ => {}
    }

    let assignment = trimmed
        .strip_prefix("set ")
        .map(str::trim)
        .unwrap_or(trimmed);
    let (name, raw) = match assignment.split_once('=') {
        Some((name, raw)) => (name.trim(), raw.trim()),
        None => match assignment.split_once(char::is_whitespace) {
            Some((name, raw)) => (name.trim(), raw.trim()),
            None => (assignment, ""),
        },
    };

    let spec = specs
        .iter()
        .find(|spec| spec.id == name)
        .ok_or_else(|| ParamError::Unknown(name.to_string()))?;
    if spec.section.is_none() {
        return Err(CommandError::ReadOnly(spec.id.to_string()));
    }
    if raw.is_empty() {
        return Err(CommandError::MissingValue(spec.id.to_string()));
    }

    let value = parse_value(spec.kind, raw).ok_or_else(|| CommandError::InvalidValue {
        id: spec.id.to_string(),
        raw: raw.to_string(),
        expected: spec.kind,
    })?;
    Ok(ConsoleCommand::Set { id: spec.id, value })
}

/// Plain-text table of identifiers, sections, kinds, defaults, and ranges.
pub fn describe_parameters(specs: &[ParamSpec]) -> String {
    let mut out = format!(
        "{:<22} {:<20} {:<8} {:<16} {}\n",
        "id", "section", "kind", "default", "range"
    );
    for spec in specs {
        let section = spec.section.map_or("-", |section| section.title());
        let range = spec.range.map_or_else(
            || "-".to_string(),
            |range| format!("[{:.4}, {:.4}]", range.min, range.max),
        );
        out.push_str(&format!(
            "{:<22} {:<20} {:<8} {:<16} {}\n",
            spec.id,
            section,
            spec.kind.to_string(),
            spec.default.to_string(),
            range
        ));
    }
    out
}

fn parse_components<const N: usize>(raw: &str) -> Option<[f32; N]> {
    let mut components = [0.0; N];
    let mut parts = raw.split(',');
    for slot in &mut components {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(components)
}

fn parse_value(kind: ParamKind, raw: &str) -> Option<ParamValue> {
    match kind {
        ParamKind::Scalar => raw.parse().ok().map(ParamValue::Scalar),
        ParamKind::Vector2 => parse_components::<2>(raw).map(ParamValue::Vector2),
        ParamKind::Vector3 => parse_components::<3>(raw).map(ParamValue::Vector3),
        ParamKind::Color => parse_hex_color(raw)
            .map(unpack_rgb)
            .or_else(|| parse_components::<3>(raw))
            .map(ParamValue::Color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::aurora_parameters;

    fn parse(line: &str) -> Result<ConsoleCommand, CommandError> {
        parse_command(line, aurora_parameters())
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse("RESET").unwrap(), ConsoleCommand::Reset);
        assert_eq!(parse(" dump ").unwrap(), ConsoleCommand::Dump);
        assert_eq!(parse("list").unwrap(), ConsoleCommand::List);
        assert_eq!(parse("?").unwrap(), ConsoleCommand::Help);
    }

    #[test]
    fn assignment_forms_are_equivalent() {
        let expected = ConsoleCommand::Set {
            id: "swirlIntensity",
            value: ParamValue::Scalar(12.5),
        };
        assert_eq!(parse("set swirlIntensity 12.5").unwrap(), expected);
        assert_eq!(parse("swirlIntensity=12.5").unwrap(), expected);
        assert_eq!(parse("swirlIntensity   12.5").unwrap(), expected);
    }

    #[test]
    fn colors_accept_hex_and_components() {
        assert_eq!(
            parse("auroraGreen #ff0000").unwrap(),
            ConsoleCommand::Set {
                id: "auroraGreen",
                value: ParamValue::Color([1.0, 0.0, 0.0]),
            }
        );
        assert_eq!(
            parse("auroraBlue=0.1, 0.2, 0.3").unwrap(),
            ConsoleCommand::Set {
                id: "auroraBlue",
                value: ParamValue::Color([0.1, 0.2, 0.3]),
            }
        );
    }

    #[test]
    fn resolution_is_not_writable() {
        for line in ["resolution 1,1", "set resolution 800,600", "resolution"] {
            assert!(
                matches!(parse(line), Err(CommandError::ReadOnly(id)) if id == "resolution"),
                "{line}"
            );
        }
    }

    #[test]
    fn colors_require_exact_component_count() {
        assert!(matches!(
            parse("auroraTeal 0.1,0.2"),
            Err(CommandError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse("auroraTeal 0.1,0.2,0.3,0.4"),
            Err(CommandError::InvalidValue { .. })
        ));
    }

    #[test]
    fn console_values_are_not_clamped() {
        assert_eq!(
            parse("waveScale 40").unwrap(),
            ConsoleCommand::Set {
                id: "waveScale",
                value: ParamValue::Scalar(40.0),
            }
        );
    }

    #[test]
    fn description_lists_every_parameter() {
        let table = describe_parameters(aurora_parameters());
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), aurora_parameters().len() + 1);
        assert!(lines[0].starts_with("id"));
        let speed = lines
            .iter()
            .find(|line| line.starts_with("waveSpeed"))
            .unwrap();
        assert!(speed.contains("Movement Controls"));
        assert!(speed.contains("0.25"));
        assert!(speed.ends_with("[0.0100, 0.2000]"));
        let green = lines
            .iter()
            .find(|line| line.starts_with("auroraGreen"))
            .unwrap();
        assert!(green.contains("#00e566"));
        assert!(lines.iter().any(|line| line.starts_with("resolution") && line.contains(" - ")));
    }

    #[test]
    fn errors_name_the_problem() {
        assert!(matches!(parse(""), Err(CommandError::Empty)));
        assert!(matches!(
            parse("glow 1"),
            Err(CommandError::Param(ParamError::Unknown(name))) if name == "glow"
        ));
        assert!(matches!(
            parse("set waveSpeed"),
            Err(CommandError::MissingValue(name)) if name == "waveSpeed"
        ));
        let err = parse("waveSpeed fast").unwrap_err();
        assert_eq!(
            err.to_string(),
            "'fast' is not a valid scalar value for 'waveSpeed'"
        );
    }
}
