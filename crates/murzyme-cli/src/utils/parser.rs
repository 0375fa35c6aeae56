use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    MissingSeparator(String),

    #[error("Component '{component}' cannot be empty in '{input}'.")]
    EmptyComponent {
        component: &'static str,
        input: String,
    },

    #[error("Invalid {expected} value for '{key}': '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Splits `KEY=VALUE` at the first `=`. Both sides are trimmed; the key must
/// not be empty, the value may be.
pub fn parse_key_value(input: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(input.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "key",
            input: input.to_string(),
        });
    }
    Ok((key, value.trim()))
}

pub fn parse_float(key: &str, value: &str) -> Result<f64, ParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "float",
        })
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ParseError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "boolean",
        }),
    }
}

/// Comma-separated terms, trimmed, empty items dropped.
pub fn parse_term_list(key: &str, value: &str) -> Result<Vec<String>, ParseError> {
    let terms: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect();
    if terms.is_empty() {
        return Err(ParseError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "comma-separated list",
        });
    }
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_splits_at_first_equals_sign() {
        assert_eq!(
            parse_key_value("registry.path = a=b.csv"),
            Ok(("registry.path", "a=b.csv"))
        );
        assert_eq!(parse_key_value("model.enabled="), Ok(("model.enabled", "")));
    }

    #[test]
    fn key_value_errors() {
        assert_eq!(
            parse_key_value("registry.path"),
            Err(ParseError::MissingSeparator("registry.path".to_string()))
        );
        assert!(matches!(
            parse_key_value(" =1"),
            Err(ParseError::EmptyComponent { component: "key", .. })
        ));
    }

    #[test]
    fn scalar_values_parse_or_report_the_key() {
        assert_eq!(parse_float("registry.confidence", "90"), Ok(90.0));
        assert!(matches!(
            parse_float("registry.confidence", "NaN"),
            Err(ParseError::InvalidValue { expected: "float", .. })
        ));
        assert_eq!(parse_bool("model.enabled", "Off"), Ok(false));
        assert!(parse_bool("model.enabled", "maybe").is_err());
    }

    #[test]
    fn term_lists_drop_blank_items() {
        assert_eq!(
            parse_term_list("keywords.vocabulary", "ENZYME, ,OXIDASE,").unwrap(),
            vec!["ENZYME", "OXIDASE"]
        );
        assert!(parse_term_list("keywords.vocabulary", " , ").is_err());
    }
}
