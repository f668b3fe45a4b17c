//! Overpass QL composition.
//!
//! Profiles mix three clause styles. Typed entries such as
//! `way["leisure"="park"]` apply to one element type; bracketed entries such
//! as `["shop"]` expand to nodes, ways and relations; bare `key` or
//! `key=value` entries are normalised to the bracketed form first. Every
//! clause shares one `around` filter so the query selects features inside
//! the request radius.

use geo::Coord;

use crate::feature::ElementType;
use crate::profile::TagProfile;

/// Server-side timeout, in seconds, written into the query envelope.
pub const DEFAULT_SERVER_TIMEOUT_SECS: u32 = 60;

/// A composed feature query.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitewise_core::FeatureQuery;
///
/// let query = FeatureQuery::single("amenity=cafe", Coord { x: 2.0, y: 1.0 }, 500.0);
/// assert_eq!(
///     query.render(),
///     concat!(
///         r#"[out:json][timeout:60];("#,
///         r#"node["amenity"="cafe"](around:500,1,2);"#,
///         r#"way["amenity"="cafe"](around:500,1,2);"#,
///         r#"relation["amenity"="cafe"](around:500,1,2);"#,
///         ");out center;",
///     ),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureQuery {
    clauses: String,
    server_timeout_secs: u32,
}

impl FeatureQuery {
    /// Compose a query from every clause of `profile`.
    pub fn from_profile(profile: &TagProfile, centre: Coord<f64>, radius_meters: f64) -> Self {
        Self {
            clauses: build_clauses(profile.clauses(), centre, radius_meters),
            server_timeout_secs: DEFAULT_SERVER_TIMEOUT_SECS,
        }
    }

    /// Compose a query from a single clause.
    pub fn single(clause: &str, centre: Coord<f64>, radius_meters: f64) -> Self {
        Self {
            clauses: build_clauses([clause], centre, radius_meters),
            server_timeout_secs: DEFAULT_SERVER_TIMEOUT_SECS,
        }
    }

    /// Replace the server-side timeout in the envelope.
    #[must_use]
    pub fn with_server_timeout(mut self, secs: u32) -> Self {
        self.server_timeout_secs = secs;
        self
    }

    /// Server-side timeout in seconds.
    pub fn server_timeout_secs(&self) -> u32 {
        self.server_timeout_secs
    }

    /// The union body without the envelope.
    pub fn clauses(&self) -> &str {
        &self.clauses
    }

    /// Report whether no clause survived composition.
    ///
    /// Empty queries match nothing and must not be sent.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Full Overpass QL text, ready to POST.
    pub fn render(&self) -> String {
        format!(
            "[out:json][timeout:{}];({});out center;",
            self.server_timeout_secs, self.clauses
        )
    }
}

impl std::fmt::Display for FeatureQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Expand profile entries into `;`-terminated Overpass statements.
///
/// Blank entries and bare entries without a key contribute nothing.
pub fn build_clauses<I, S>(entries: I, centre: Coord<f64>, radius_meters: f64) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let around = format!("(around:{radius_meters},{},{})", centre.y, centre.x);
    let mut out = String::new();
    for entry in entries {
        match Selector::parse(entry.as_ref()) {
            Some(Selector::Typed(element_type, expr)) => {
                push_statement(&mut out, element_type, &expr, &around);
            }
            Some(Selector::Any(expr)) => {
                for element_type in ElementType::ALL {
                    push_statement(&mut out, element_type, &expr, &around);
                }
            }
            None => {}
        }
    }
    out
}

fn push_statement(out: &mut String, element_type: ElementType, expr: &str, around: &str) {
    out.push_str(element_type.as_str());
    out.push_str(expr);
    out.push_str(around);
    out.push(';');
}

#[derive(Debug, PartialEq, Eq)]
enum Selector {
    Typed(ElementType, String),
    Any(String),
}

impl Selector {
    fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }
        if let Some(typed) = parse_typed(entry) {
            return Some(typed);
        }
        if is_bracketed(entry) {
            return Some(Self::Any(entry.to_owned()));
        }
        bare_to_bracketed(entry).map(Self::Any)
    }
}

fn is_bracketed(expr: &str) -> bool {
    expr.starts_with('[') && expr.ends_with(']')
}

fn parse_typed(entry: &str) -> Option<Selector> {
    ElementType::ALL.into_iter().find_map(|element_type| {
        let name = element_type.as_str();
        let prefix = entry.get(..name.len())?;
        let rest = entry.get(name.len()..)?;
        (prefix.eq_ignore_ascii_case(name) && is_bracketed(rest))
            .then(|| Selector::Typed(element_type, rest.to_owned()))
    })
}

fn bare_to_bracketed(entry: &str) -> Option<String> {
    let (key, value) = match entry.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (entry, None),
    };
    let key = unquote(key.trim());
    if key.is_empty() {
        return None;
    }
    let value = value.map(|value| unquote(value.trim())).filter(|v| !v.is_empty());
    Some(match value {
        Some(value) => format!(r#"["{}"="{}"]"#, escape(key), escape(value)),
        None => format!(r#"["{}"]"#, escape(key)),
    })
}

fn unquote(text: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            text.strip_prefix(quote)
                .and_then(|inner| inner.strip_suffix(quote))
        })
        .unwrap_or(text)
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
