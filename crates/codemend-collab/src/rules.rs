//! Remediation rule table
//!
//! One shared table drives both detection and fix generation, so an issue
//! the analyzer reports and the fix the fixer proposes for it can never
//! drift apart. Patterns are matched per line to recover 1-based line
//! numbers; fixable rules carry the literal snippet to find and its
//! replacement.

use codemend_state::Severity;
use once_cell::sync::Lazy;
use regex::Regex;

/// One detection rule, optionally with a machine-applicable replacement.
pub struct RemediationRule {
    /// Compiled detection pattern.
    pub pattern: &'static Lazy<Regex>,
    /// What the problem is.
    pub description: &'static str,
    /// How bad it is.
    pub severity: Severity,
    /// Literal snippet to replace and its replacement, when the rule is
    /// mechanically fixable.
    pub replacement: Option<(&'static str, &'static str)>,
}

static INSECURE_VERIFY: Lazy<Regex> = Lazy::new(|| Regex::new(r"verify=False").unwrap());
static FILLNA_FFILL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.fillna\(method='ffill'\)").unwrap());
static FILLNA_BFILL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.fillna\(method='bfill'\)").unwrap());
static DATAFRAME_APPEND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.append\(\s*pd\.|pd\.DataFrame\.append").unwrap());
static BARE_EXCEPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*except\s*:").unwrap());

/// The built-in rule table, in reporting order.
pub static RULES: &[RemediationRule] = &[
    RemediationRule {
        pattern: &INSECURE_VERIFY,
        description: "insecure request: TLS certificate verification disabled",
        severity: Severity::High,
        replacement: Some(("verify=False", "verify=True")),
    },
    RemediationRule {
        pattern: &FILLNA_FFILL,
        description: "deprecated pandas fillna(method='ffill'), use .ffill()",
        severity: Severity::Medium,
        replacement: Some((".fillna(method='ffill')", ".ffill()")),
    },
    RemediationRule {
        pattern: &FILLNA_BFILL,
        description: "deprecated pandas fillna(method='bfill'), use .bfill()",
        severity: Severity::Medium,
        replacement: Some((".fillna(method='bfill')", ".bfill()")),
    },
    RemediationRule {
        pattern: &DATAFRAME_APPEND,
        description: "deprecated DataFrame.append, use pd.concat",
        severity: Severity::Medium,
        replacement: None,
    },
    RemediationRule {
        pattern: &BARE_EXCEPT,
        description: "bare except clause swallows every exception",
        severity: Severity::Low,
        replacement: None,
    },
];
