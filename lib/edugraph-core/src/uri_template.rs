//! URL template expansion (RFC 6570, level 4).
//!
//! Templates such as `{+baseurl}/education/users/{educationUser%2Did}{?%24select,%24expand}`
//! are parsed once into literal and expression parts, then expanded against a
//! [`ParameterMap`]. Expansion is a pure function of the template and the parameters.
//!
//! Query expressions (`{?…}` and `{&…}`) skip empty strings and empty lists, so unset
//! OData options never produce dangling `name=` pairs.
//!
//! # Example
//!
//! ```
//! use edugraph_core::{ParameterMap, UriTemplate};
//!
//! let template = UriTemplate::parse("{+baseurl}/users/{id}{?%24top}").expect("valid template");
//! let mut params = ParameterMap::new();
//! params.insert("baseurl".to_string(), "https://g.example".into());
//! params.insert("id".to_string(), "a/b".into());
//! params.insert("%24top".to_string(), 5_i64.into());
//!
//! assert_eq!(template.expand(&params), "https://g.example/users/a%2Fb?%24top=5");
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::{percent_decode_str, percent_encode_byte};

use crate::{Error, Result};

/// Path parameter holding the service root.
pub const BASE_URL_KEY: &str = "baseurl";

/// Path parameter that replaces template expansion with a literal URL.
pub const RAW_URL_KEY: &str = "request-raw-url";

// ============================================================================
// Parameter Values
// ============================================================================

/// A value substituted into a URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    /// A string value.
    String(String),
    /// An integer, rendered in decimal.
    Int(i64),
    /// A boolean, rendered as `true` or `false`.
    Bool(bool),
    /// A list of values, comma-joined unless exploded.
    List(Vec<String>),
}

impl ParameterValue {
    fn is_empty(&self) -> bool {
        match self {
            Self::String(value) => value.is_empty(),
            Self::List(values) => values.is_empty(),
            Self::Int(_) | Self::Bool(_) => false,
        }
    }

    fn scalar(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::String(value) => Some(Cow::Borrowed(value)),
            Self::Int(value) => Some(Cow::Owned(value.to_string())),
            Self::Bool(value) => Some(Cow::Borrowed(if *value { "true" } else { "false" })),
            Self::List(_) => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::List(values) => f.write_str(&values.join(",")),
        }
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<&String> for ParameterValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for ParameterValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<&[&str]> for ParameterValue {
    fn from(values: &[&str]) -> Self {
        Self::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Template parameters, ordered by name.
pub type ParameterMap = BTreeMap<String, ParameterValue>;

// ============================================================================
// Parsed Template
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Simple,
    Reserved,
    Fragment,
    Label,
    PathSegment,
    PathParameter,
    Query,
    QueryContinuation,
}

impl Operator {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Self::Reserved),
            '#' => Some(Self::Fragment),
            '.' => Some(Self::Label),
            '/' => Some(Self::PathSegment),
            ';' => Some(Self::PathParameter),
            '?' => Some(Self::Query),
            '&' => Some(Self::QueryContinuation),
            _ => None,
        }
    }

    const fn first(self) -> &'static str {
        match self {
            Self::Simple | Self::Reserved => "",
            Self::Fragment => "#",
            Self::Label => ".",
            Self::PathSegment => "/",
            Self::PathParameter => ";",
            Self::Query => "?",
            Self::QueryContinuation => "&",
        }
    }

    const fn separator(self) -> &'static str {
        match self {
            Self::Simple | Self::Reserved | Self::Fragment => ",",
            Self::Label => ".",
            Self::PathSegment => "/",
            Self::PathParameter => ";",
            Self::Query | Self::QueryContinuation => "&",
        }
    }

    const fn named(self) -> bool {
        matches!(
            self,
            Self::PathParameter | Self::Query | Self::QueryContinuation
        )
    }

    const fn if_empty(self) -> &'static str {
        match self {
            Self::Query | Self::QueryContinuation => "=",
            _ => "",
        }
    }

    const fn allows_reserved(self) -> bool {
        matches!(self, Self::Reserved | Self::Fragment)
    }

    const fn skips_empty(self) -> bool {
        matches!(self, Self::Query | Self::QueryContinuation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct VarSpec {
    name: String,
    explode: bool,
    prefix: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Expression {
        operator: Operator,
        variables: Vec<VarSpec>,
    },
}

/// A parsed URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    source: String,
    parts: Vec<Part>,
}

impl UriTemplate {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTemplate`] for unclosed or stray braces, empty expressions,
    /// reserved operators (`=`, `,`, `!`, `@`, `|`), invalid variable names and bad
    /// prefix modifiers.
    pub fn parse(template: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = template.char_indices();

        while let Some((position, ch)) = rest.next() {
            match ch {
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for (_, inner) in rest.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => {
                                return Err(Error::invalid_template(
                                    position,
                                    "nested '{' in expression",
                                ));
                            }
                            other => body.push(other),
                        }
                    }
                    if !closed {
                        return Err(Error::invalid_template(position, "unclosed expression"));
                    }
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(parse_expression(&body, position)?);
                }
                '}' => {
                    return Err(Error::invalid_template(position, "unmatched '}'"));
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            parts,
        })
    }

    /// The template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of every variable the template references, in order of appearance.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Expression { variables, .. } => Some(variables),
                Part::Literal(_) => None,
            })
            .flatten()
            .map(|var| var.name.as_str())
            .collect()
    }

    /// Expand the template.
    ///
    /// When `params` holds [`RAW_URL_KEY`], that value is returned verbatim and the
    /// template is ignored.
    #[must_use]
    pub fn expand(&self, params: &ParameterMap) -> String {
        if let Some(raw) = params.get(RAW_URL_KEY) {
            return raw.to_string();
        }

        let mut out = String::with_capacity(self.source.len());
        for part in &self.parts {
            match part {
                Part::Literal(text) => encode_into(&mut out, text, true),
                Part::Expression {
                    operator,
                    variables,
                } => expand_expression(&mut out, *operator, variables, params),
            }
        }
        out
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse and expand `template` in one step.
///
/// # Errors
///
/// Returns [`Error::InvalidTemplate`] when the template is malformed. A template is not
/// parsed at all when `params` holds [`RAW_URL_KEY`].
pub fn expand_template(template: &str, params: &ParameterMap) -> Result<String> {
    if let Some(raw) = params.get(RAW_URL_KEY) {
        return Ok(raw.to_string());
    }
    Ok(UriTemplate::parse(template)?.expand(params))
}

// ============================================================================
// Parsing
// ============================================================================

fn parse_expression(body: &str, position: usize) -> Result<Part> {
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return Err(Error::invalid_template(position, "empty expression"));
    };
    if matches!(first, '=' | ',' | '!' | '@' | '|') {
        return Err(Error::invalid_template(
            position,
            format!("reserved operator '{first}'"),
        ));
    }
    let (operator, list) = match Operator::from_char(first) {
        Some(operator) => (operator, chars.as_str()),
        None => (Operator::Simple, body),
    };
    if list.is_empty() {
        return Err(Error::invalid_template(position, "expression has no variables"));
    }

    let variables = list
        .split(',')
        .map(|spec| parse_varspec(spec, position))
        .collect::<Result<Vec<_>>>()?;

    Ok(Part::Expression {
        operator,
        variables,
    })
}

fn parse_varspec(spec: &str, position: usize) -> Result<VarSpec> {
    if let Some(name) = spec.strip_suffix('*') {
        validate_name(name, position)?;
        return Ok(VarSpec {
            name: name.to_string(),
            explode: true,
            prefix: None,
        });
    }

    if let Some((name, length)) = spec.split_once(':') {
        validate_name(name, position)?;
        let prefix = length
            .parse::<usize>()
            .ok()
            .filter(|len| (1..10_000).contains(len) && !length.starts_with('0'))
            .ok_or_else(|| {
                Error::invalid_template(position, format!("invalid prefix length '{length}'"))
            })?;
        return Ok(VarSpec {
            name: name.to_string(),
            explode: false,
            prefix: Some(prefix),
        });
    }

    validate_name(spec, position)?;
    Ok(VarSpec {
        name: spec.to_string(),
        explode: false,
        prefix: None,
    })
}

fn validate_name(name: &str, position: usize) -> Result<()> {
    let invalid = || Error::invalid_template(position, format!("invalid variable name '{name}'"));

    if name.is_empty() || name.starts_with('.') || name.ends_with('.') {
        return Err(invalid());
    }
    let bytes = name.as_bytes();
    let mut index = 0;
    while let Some(&byte) = bytes.get(index) {
        match byte {
            b'%' => {
                let hex = bytes.get(index + 1..index + 3).ok_or_else(invalid)?;
                if !hex.iter().all(u8::is_ascii_hexdigit) {
                    return Err(invalid());
                }
                index += 3;
            }
            b'.' if bytes.get(index + 1) == Some(&b'.') => return Err(invalid()),
            b'_' | b'.' => index += 1,
            other if other.is_ascii_alphanumeric() => index += 1,
            _ => return Err(invalid()),
        }
    }
    Ok(())
}

// ============================================================================
// Expansion
// ============================================================================

fn lookup<'a>(params: &'a ParameterMap, name: &str) -> Option<&'a ParameterValue> {
    params.get(name).or_else(|| {
        let decoded = percent_decode_str(name).decode_utf8().ok()?;
        if decoded == name {
            None
        } else {
            params.get(decoded.as_ref())
        }
    })
}

fn expand_expression(
    out: &mut String,
    operator: Operator,
    variables: &[VarSpec],
    params: &ParameterMap,
) {
    let allow_reserved = operator.allows_reserved();
    let mut first = true;

    for var in variables {
        let Some(value) = lookup(params, &var.name) else {
            continue;
        };
        if matches!(value, ParameterValue::List(values) if values.is_empty())
            || (operator.skips_empty() && value.is_empty())
        {
            continue;
        }

        out.push_str(if first {
            operator.first()
        } else {
            operator.separator()
        });
        first = false;

        match value.scalar() {
            Some(text) => {
                if operator.named() {
                    out.push_str(&var.name);
                    if text.is_empty() {
                        out.push_str(operator.if_empty());
                        continue;
                    }
                    out.push('=');
                }
                let text = match var.prefix {
                    Some(length) => Cow::Owned(text.chars().take(length).collect()),
                    None => text,
                };
                encode_into(out, &text, allow_reserved);
            }
            None => {
                let ParameterValue::List(items) = value else {
                    continue;
                };
                expand_list(out, operator, var, items, allow_reserved);
            }
        }
    }
}

fn expand_list(
    out: &mut String,
    operator: Operator,
    var: &VarSpec,
    items: &[String],
    allow_reserved: bool,
) {
    if var.explode {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                out.push_str(operator.separator());
            }
            if operator.named() {
                out.push_str(&var.name);
                if item.is_empty() {
                    out.push_str(operator.if_empty());
                    continue;
                }
                out.push('=');
            }
            encode_into(out, item, allow_reserved);
        }
    } else {
        if operator.named() {
            out.push_str(&var.name);
            out.push('=');
        }
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            encode_into(out, item, allow_reserved);
        }
    }
}

const fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

const fn is_reserved(byte: u8) -> bool {
    matches!(
        byte,
        b':' | b'/'
            | b'?'
            | b'#'
            | b'['
            | b']'
            | b'@'
            | b'!'
            | b'$'
            | b'&'
            | b'\''
            | b'('
            | b')'
            | b'*'
            | b'+'
            | b','
            | b';'
            | b'='
    )
}

fn is_pct_triplet(bytes: &[u8], index: usize) -> bool {
    bytes
        .get(index + 1..index + 3)
        .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
}

fn encode_into(out: &mut String, value: &str, allow_reserved: bool) {
    let bytes = value.as_bytes();
    for (index, &byte) in bytes.iter().enumerate() {
        let keep = is_unreserved(byte)
            || (allow_reserved
                && (is_reserved(byte) || (byte == b'%' && is_pct_triplet(bytes, index))));
        if keep {
            out.push(char::from(byte));
        } else {
            out.push_str(percent_encode_byte(byte));
        }
    }
}
