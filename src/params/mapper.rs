use crate::params::definitions::{
    CategoryDefinition, ParameterCategory, ParameterDefinition, CATEGORY_DEFINITIONS,
    PARAMETER_DEFINITIONS,
};
use crate::params::mapping::{DISPLAY_NAMES, FIELD_PROJECTIONS, RAW_PARAMETER_ALIASES};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

#[cfg(feature = "serde")]
use serde::Serialize;

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Runs of '.', '_', '-' or whitespace collapse into one underscore
        Regex::new(r"[._\-\s]+").expect("separator pattern is valid")
    })
}

/// Lower-case a name and unify separators: `"GPS.Lat"`, `"gps-lat"` and
/// `"GPS_Lat"` all become `"gps_lat"`.
pub fn normalize_parameter_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    separator_pattern()
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

struct ParameterIndex {
    raw_to_internal: HashMap<String, &'static str>,
    internal_to_raw: HashMap<&'static str, Vec<String>>,
    display: HashMap<&'static str, &'static str>,
    definitions: HashMap<&'static str, &'static ParameterDefinition>,
}

fn index() -> &'static ParameterIndex {
    static INDEX: OnceLock<ParameterIndex> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut raw_to_internal = HashMap::new();
        let mut internal_to_raw: HashMap<&'static str, Vec<String>> = HashMap::new();

        let projection_aliases = FIELD_PROJECTIONS
            .iter()
            .map(|row| (format!("{}.{}", row.message_type, row.field), row.parameter));
        let explicit_aliases = RAW_PARAMETER_ALIASES
            .iter()
            .map(|(raw, internal)| (raw.to_string(), *internal));

        for (raw, internal) in projection_aliases.chain(explicit_aliases) {
            raw_to_internal
                .entry(normalize_parameter_name(&raw))
                .or_insert(internal);
            internal_to_raw.entry(internal).or_default().push(raw);
        }

        ParameterIndex {
            raw_to_internal,
            internal_to_raw,
            display: DISPLAY_NAMES.iter().copied().collect(),
            definitions: PARAMETER_DEFINITIONS.iter().map(|d| (d.name, d)).collect(),
        }
    })
}

/// Resolve any raw name to its canonical internal name.
///
/// Known aliases map through the table; anything else is normalized and used
/// as-is, so a parameter is never dropped for having an unfamiliar name.
pub fn map_raw_to_internal(raw_name: &str) -> String {
    let normalized = normalize_parameter_name(raw_name);
    match index().raw_to_internal.get(&normalized) {
        Some(internal) => internal.to_string(),
        None => normalized,
    }
}

/// Human-readable label for a canonical name, title-casing unknown names
pub fn map_internal_to_display(internal_name: &str) -> String {
    let normalized = normalize_parameter_name(internal_name);
    if let Some(display) = index().display.get(normalized.as_str()) {
        return display.to_string();
    }
    normalized
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reference definition for a name, resolving raw aliases first
pub fn get_parameter_definition(name: &str) -> Option<&'static ParameterDefinition> {
    let internal = map_raw_to_internal(name);
    index().definitions.get(internal.as_str()).copied()
}

/// Every raw alias known to resolve to this canonical name
pub fn raw_aliases_for(internal_name: &str) -> Vec<String> {
    let normalized = normalize_parameter_name(internal_name);
    index()
        .internal_to_raw
        .get(normalized.as_str())
        .cloned()
        .unwrap_or_default()
}

pub fn category_definition(category: ParameterCategory) -> Option<&'static CategoryDefinition> {
    CATEGORY_DEFINITIONS.iter().find(|c| c.category == category)
}

/// Definitions in a category, most important first
pub fn parameters_in_category(category: ParameterCategory) -> Vec<&'static ParameterDefinition> {
    let mut defs: Vec<_> = PARAMETER_DEFINITIONS
        .iter()
        .filter(|d| d.category == category)
        .collect();
    defs.sort_by_key(|d| d.priority);
    defs
}

pub fn core_parameters() -> Vec<&'static ParameterDefinition> {
    PARAMETER_DEFINITIONS.iter().filter(|d| d.is_core).collect()
}

/// Range check against the definition; unknown parameters always pass
pub fn is_value_in_range(name: &str, value: f64) -> bool {
    get_parameter_definition(name).map_or(true, |d| d.in_range(value))
}

/// Format a value with the definition's decimal places (2 when unknown)
pub fn format_parameter_value(name: &str, value: f64) -> String {
    let decimals = get_parameter_definition(name).map_or(2, |d| d.decimals as usize);
    format!("{:.*}", decimals, value)
}

/// Outcome of resolving a batch of parameter names
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParameterValidationReport {
    pub total: usize,
    /// Names resolving to a reference definition
    pub known: Vec<String>,
    /// Names that were only normalized, with their normalized form
    pub normalized_only: Vec<(String, String)>,
    /// Fraction of `total` that is known, 0..=1
    pub known_fraction: f64,
}

/// Check how much of a parameter set the reference tables understand
pub fn validate_parameter_set<S: AsRef<str>>(names: &[S]) -> ParameterValidationReport {
    let mut report = ParameterValidationReport {
        total: names.len(),
        ..Default::default()
    };
    for name in names {
        let name = name.as_ref();
        if get_parameter_definition(name).is_some() {
            report.known.push(name.to_string());
        } else {
            report
                .normalized_only
                .push((name.to_string(), map_raw_to_internal(name)));
        }
    }
    if report.total > 0 {
        report.known_fraction = report.known.len() as f64 / report.total as f64;
    }
    report
}
