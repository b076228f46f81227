//! End-to-end runs over in-memory sources.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;

use proxy_rules::{run, Config, MemoryFetcher, RuleType, RulesError, SourceConfig};

const DUMP_URL: &str = "mem://dump.csv.gz";
const NXDOMAIN_URL: &str = "mem://nxdomain.txt";
const HOSTS_URL: &str = "mem://hosts.txt";
const IPS_URL: &str = "mem://ips.txt";

fn temp_output(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("proxy_rules_test_{}", name));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Registry dump as published: Windows-1251 text with a header line
fn dump_fixture() -> Vec<u8> {
    let mut dump = Vec::new();
    // "Обновлено: 2024-05-01 12:00:00"
    dump.extend_from_slice(&[0xCE, 0xE1, 0xED, 0xEE, 0xE2, 0xEB, 0xE5, 0xED, 0xEE]);
    dump.extend_from_slice(b": 2024-05-01 12:00:00\n");
    let rows: &[&[u8]] = &[
        b"1.1.1.1;*.ads.tracker.example.com;https://ads.tracker.example.com/;",
        b"1.1.1.2;mail.example.com;;",
        b"1.1.1.3;example.org;;",
        b"1.1.1.4;;;",
        b"1.1.1.5;www.gone.net;;",
        b"1.1.1.6;casino-bonus.win;;",
        b"1.1.1.7;123.456;;",
        b"1.1.1.8;mybet.com;;",
        b"1.1.1.9;news.site.ru;;",
        b"1.1.1.10;*.media.example.io;;",
    ];
    for row in rows {
        dump.extend_from_slice(row);
        // "Суд" (court) in Windows-1251
        dump.extend_from_slice(&[0xD1, 0xF3, 0xE4]);
        dump.extend_from_slice(b";2-1234/2024;2024-01-01\n");
    }
    dump
}

fn fetcher() -> MemoryFetcher {
    MemoryFetcher::new()
        .with_file(DUMP_URL, gzip(&dump_fixture()))
        .with_file(NXDOMAIN_URL, "gone.net\nother.com\n")
        .with_file(HOSTS_URL, "# extra\nfoo.com\nwww.foo.com\nbar.org\n")
        .with_file(IPS_URL, "10.0.0.0/8\n192.0.2.1\n")
}

fn config(output_dir: PathBuf) -> Config {
    Config {
        output_dir,
        sources: vec![
            SourceConfig::Dump {
                name: "registry".to_string(),
                dump_url: DUMP_URL.to_string(),
                nxdomain_url: NXDOMAIN_URL.to_string(),
                output: "registry_domain_suffixes.lst".to_string(),
                domains_output: Some("registry_domains.lst".to_string()),
            },
            SourceConfig::Domains {
                name: "hosts".to_string(),
                url: HOSTS_URL.to_string(),
                output: "hosts_domain_suffixes.lst".to_string(),
            },
            SourceConfig::Ips {
                name: "ips".to_string(),
                url: IPS_URL.to_string(),
                output: "ips.lst".to_string(),
            },
        ],
        ..Config::default()
    }
}

#[test]
fn test_run_writes_every_output() {
    let dir = temp_output("run_all");
    let written = run(&config(dir.clone()), &fetcher()).unwrap();

    assert_eq!(written.len(), 4);
    assert_eq!(written[0].rule_type, RuleType::DomainSuffix);
    assert_eq!(written[0].rules, 3);
    assert_eq!(written[1].rule_type, RuleType::Domain);

    assert_eq!(
        fs::read_to_string(dir.join("registry_domain_suffixes.lst")).unwrap(),
        "DOMAIN_SUFFIX,example.com\nDOMAIN_SUFFIX,example.io\nDOMAIN_SUFFIX,example.org\n"
    );
    assert_eq!(
        fs::read_to_string(dir.join("registry_domains.lst")).unwrap(),
        "DOMAIN,example.com\nDOMAIN,example.io\nDOMAIN,example.org\n"
    );
    assert_eq!(
        fs::read_to_string(dir.join("hosts_domain_suffixes.lst")).unwrap(),
        "DOMAIN_SUFFIX,bar.org\nDOMAIN_SUFFIX,foo.com\n"
    );
    assert_eq!(
        fs::read_to_string(dir.join("ips.lst")).unwrap(),
        "IP-CIDR,10.0.0.0/8\nIP-CIDR,192.0.2.1/32\n"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_run_is_repeatable() {
    let dir = temp_output("repeat");
    let cfg = config(dir.clone());

    run(&cfg, &fetcher()).unwrap();
    let first = fs::read_to_string(dir.join("registry_domain_suffixes.lst")).unwrap();
    run(&cfg, &fetcher()).unwrap();
    let second = fs::read_to_string(dir.join("registry_domain_suffixes.lst")).unwrap();
    assert_eq!(first, second);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_malformed_record_aborts_without_output() {
    let dir = temp_output("malformed");
    let mut dump = dump_fixture();
    dump.extend_from_slice(b"no-separator-here\n");
    let fetcher = fetcher().with_file(DUMP_URL, gzip(&dump));

    let err = run(&config(dir.clone()), &fetcher).unwrap_err();
    match err {
        RulesError::MalformedRecord { line, fields } => {
            // header + 10 rows, then the broken one
            assert_eq!(line, 12);
            assert_eq!(fields, 1);
        }
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
    assert!(!dir.exists(), "nothing may be written on failure");
}

#[test]
fn test_failed_later_source_writes_nothing() {
    let dir = temp_output("late_failure");
    let fetcher = fetcher().with_file(IPS_URL, "10.0.0.0/8\nbogus\n");

    let err = run(&config(dir.clone()), &fetcher).unwrap_err();
    assert_eq!(err.line(), Some(2));
    assert!(!dir.join("registry_domain_suffixes.lst").exists());
}

#[test]
fn test_missing_source_is_fetch_error() {
    let dir = temp_output("missing");
    let fetcher = MemoryFetcher::new().with_file(NXDOMAIN_URL, "");

    let err = run(&config(dir.clone()), &fetcher).unwrap_err();
    assert!(matches!(err, RulesError::FetchError { .. }), "got {:?}", err);
    assert!(!dir.exists());
}

#[test]
fn test_invalid_config_is_rejected_before_fetching() {
    let cfg = Config {
        sources: Vec::new(),
        ..Config::default()
    };
    let err = run(&cfg, &MemoryFetcher::new()).unwrap_err();
    assert!(matches!(err, RulesError::ConfigError(_)));
}

#[test]
fn test_unwritable_output_keeps_existing_lists() {
    let dir = temp_output("unwritable");
    fs::create_dir_all(dir.join("b.lst").join("occupied")).unwrap();
    fs::write(dir.join("a.lst"), "OLD\n").unwrap();

    let cfg = Config {
        output_dir: dir.clone(),
        sources: vec![
            SourceConfig::Domains {
                name: "a".to_string(),
                url: HOSTS_URL.to_string(),
                output: "a.lst".to_string(),
            },
            SourceConfig::Domains {
                name: "b".to_string(),
                url: HOSTS_URL.to_string(),
                output: "b.lst".to_string(),
            },
        ],
        ..Config::default()
    };

    let err = run(&cfg, &fetcher()).unwrap_err();
    assert!(matches!(err, RulesError::IoError(_)), "got {:?}", err);
    assert_eq!(fs::read_to_string(dir.join("a.lst")).unwrap(), "OLD\n");
    assert!(!dir.join("a.lst.tmp").exists());
    assert!(!dir.join("b.lst.tmp").exists());

    let _ = fs::remove_dir_all(&dir);
}
