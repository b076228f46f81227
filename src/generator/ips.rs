use std::net::IpAddr;

use ipnet::IpNet;

use crate::error::{Result, RulesError};
use crate::fetch::Fetcher;
use crate::types::Rules;

use super::{for_each_line, list_entry, Generator};

/// Generator for newline-delimited IP and CIDR lists
#[derive(Debug, Clone)]
pub struct IpListGenerator {
    name: String,
    url: String,
}

impl IpListGenerator {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Parse a CIDR, or a bare address as a host prefix (`/32`, `/128`)
pub fn parse_network(entry: &str) -> Option<IpNet> {
    entry
        .parse::<IpNet>()
        .ok()
        .or_else(|| entry.parse::<IpAddr>().ok().map(IpNet::from))
}

impl Generator for IpListGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, fetcher: &dyn Fetcher) -> Result<Rules> {
        let mut ip_nets = Vec::new();
        for_each_line(fetcher.fetch(&self.url)?, &self.url, |line_num, line| {
            let Some(entry) = list_entry(line) else {
                return Ok(());
            };
            let net = parse_network(entry).ok_or_else(|| RulesError::ParseErrorAtLine {
                resource: self.url.clone(),
                line: line_num,
                message: format!("invalid IP or CIDR: {}", entry),
            })?;
            ip_nets.push(net.to_string());
            Ok(())
        })?;

        log::info!("{}: {} networks", self.name, ip_nets.len());

        Ok(Rules {
            ip_nets,
            ..Rules::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;

    #[test]
    fn test_parse_network() {
        assert_eq!(parse_network("10.0.0.0/8").unwrap().to_string(), "10.0.0.0/8");
        assert_eq!(parse_network("1.2.3.4").unwrap().to_string(), "1.2.3.4/32");
        assert_eq!(parse_network("2001:db8::1").unwrap().to_string(), "2001:db8::1/128");
        assert!(parse_network("example.com").is_none());
    }

    #[test]
    fn test_generate_ip_list() {
        let list = "# networks\n10.0.0.0/8\n\n  1.2.3.4 \n2001:db8::/32\n";
        let fetcher = MemoryFetcher::new().with_file("mem://ips.txt", list);
        let rules = IpListGenerator::new("ips", "mem://ips.txt")
            .generate(&fetcher)
            .unwrap();
        assert_eq!(rules.ip_nets, vec!["10.0.0.0/8", "1.2.3.4/32", "2001:db8::/32"]);
        assert!(rules.domain_suffixes.is_empty());
    }

    #[test]
    fn test_generate_rejects_garbage_with_line() {
        let fetcher = MemoryFetcher::new().with_file("mem://ips.txt", "10.0.0.0/8\nnot-an-ip\n");
        let err = IpListGenerator::new("ips", "mem://ips.txt")
            .generate(&fetcher)
            .unwrap_err();
        assert!(matches!(err, RulesError::ParseErrorAtLine { line: 2, .. }));
    }
}
