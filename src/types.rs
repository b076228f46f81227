use std::fmt;

/// Rule kind understood by suffix-matching proxy engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    /// Exact host match
    Domain,
    /// Host equal to the value or ending with `.` + value
    DomainSuffix,
    /// Address inside the network
    IpCidr,
}

impl RuleType {
    /// Keyword written in front of each rule line
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Domain => "DOMAIN",
            RuleType::DomainSuffix => "DOMAIN_SUFFIX",
            RuleType::IpCidr => "IP-CIDR",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rules produced by a single source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rules {
    /// Exact domains
    pub domains: Vec<String>,
    /// Minimal suffix rules
    pub domain_suffixes: Vec<String>,
    /// Networks in CIDR notation
    pub ip_nets: Vec<String>,
}

impl Rules {
    /// Items of the given rule type
    pub fn items(&self, rule_type: RuleType) -> &[String] {
        match rule_type {
            RuleType::Domain => &self.domains,
            RuleType::DomainSuffix => &self.domain_suffixes,
            RuleType::IpCidr => &self.ip_nets,
        }
    }

    /// Check if no rule of any type was produced
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.domain_suffixes.is_empty() && self.ip_nets.is_empty()
    }
}

/// Suffix-rule semantics: `domain` equals `suffix` or ends with `.` + `suffix`.
pub fn suffix_covers(suffix: &str, domain: &str) -> bool {
    match domain.strip_suffix(suffix) {
        Some("") => true,
        Some(rest) => rest.ends_with('.'),
        None => false,
    }
}
