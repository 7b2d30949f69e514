use drone_bbot_common::TOOL;
use drone_bbot_common::config::MalformedPolicy;
use drone_bbot_common::lair::Host;
use drone_bbot_core::import::{ImportService, Submission};
use serde_json::json;

use crate::fake::{FakeLair, bbot_file, host, settings};

const B_COM: &str = r#"{"type":"DNS_NAME","host":"b.com","resolved_hosts":["10.0.0.1","10.0.0.2"]}"#;
const SCAN: &str = r#"{"type":"SCAN","name":"bbot","data":{"id":"SCAN:1"}}"#;

fn service(lair: &FakeLair) -> ImportService {
    ImportService::new(Box::new(lair.clone()))
}

#[tokio::test]
async fn known_host_is_updated_and_unknown_is_reported() -> anyhow::Result<()> {
    let lair = FakeLair::with_hosts("proj1", vec![host("10.0.0.1", &["a.com"])]);
    let input = bbot_file(&[SCAN, B_COM]);

    let outcome = service(&lair)
        .run(&settings(input.path().to_path_buf(), false, &["x", "y"]))
        .await?;

    assert_eq!(outcome.submission, Submission::Imported { hosts: 1 });
    assert_eq!(outcome.unmatched.len(), 1);
    assert_eq!(outcome.unmatched["10.0.0.2"], vec!["b.com"]);
    assert_eq!(outcome.stats.dns_records, 1);
    assert_eq!(outcome.stats.ignored_records, 1);

    let submissions = lair.submissions();
    assert_eq!(submissions.len(), 1);
    let project = &submissions[0];
    assert_eq!(project.id, "proj1");
    assert_eq!(project.tool, TOOL);
    assert_eq!(project.commands.len(), 1);
    assert_eq!(project.commands[0].tool, TOOL);

    assert_eq!(project.hosts.len(), 1);
    let updated = &project.hosts[0];
    assert_eq!(updated.ipv4, "10.0.0.1");
    assert_eq!(updated.hostnames, vec!["a.com", "b.com"]);
    assert_eq!(updated.tags, vec!["x", "y"]);
    assert_eq!(updated.last_modified_by, TOOL);
    Ok(())
}

#[tokio::test]
async fn force_hosts_creates_the_unknown_address() -> anyhow::Result<()> {
    let lair = FakeLair::with_hosts("proj1", vec![host("10.0.0.1", &["a.com"])]);
    let input = bbot_file(&[B_COM]);

    let outcome = service(&lair)
        .run(&settings(input.path().to_path_buf(), true, &["x", "y"]))
        .await?;

    assert_eq!(outcome.submission, Submission::Imported { hosts: 2 });
    assert!(outcome.unmatched.is_empty());
    assert_eq!(outcome.stats.hosts_created, 1);

    let hosts = lair.hosts();
    assert_eq!(hosts.len(), 2);
    assert_eq!(hosts[0].ipv4, "10.0.0.1");
    assert_eq!(hosts[0].hostnames, vec!["a.com", "b.com"]);

    let created = &hosts[1];
    assert_eq!(created.ipv4, "10.0.0.2");
    assert_eq!(created.hostnames, vec!["b.com"]);
    assert_eq!(created.tags, vec!["x", "y"]);
    assert_eq!(created.last_modified_by, TOOL);
    Ok(())
}

#[tokio::test]
async fn empty_project_without_dns_records_is_not_submitted() -> anyhow::Result<()> {
    let lair = FakeLair::with_hosts("proj1", Vec::new());
    let input = bbot_file(&[SCAN, r#"{"type":"IP_ADDRESS","data":"10.0.0.9"}"#]);

    let outcome = service(&lair)
        .run(&settings(input.path().to_path_buf(), true, &[]))
        .await?;

    assert_eq!(outcome.submission, Submission::NothingToImport);
    assert_eq!(outcome.stats.ignored_records, 2);
    assert!(lair.submissions().is_empty());
    assert_eq!(lair.fetches(), 1);
    Ok(())
}

#[tokio::test]
async fn all_addresses_unmatched_is_not_submitted() -> anyhow::Result<()> {
    let lair = FakeLair::with_hosts("proj1", Vec::new());
    let input = bbot_file(&[
        B_COM,
        r#"{"type":"DNS_NAME","host":"c.com","resolved_hosts":["10.0.0.2"]}"#,
    ]);

    let outcome = service(&lair)
        .run(&settings(input.path().to_path_buf(), false, &["x"]))
        .await?;

    assert_eq!(outcome.submission, Submission::NothingToImport);
    assert_eq!(outcome.unmatched["10.0.0.1"], vec!["b.com"]);
    assert_eq!(outcome.unmatched["10.0.0.2"], vec!["b.com", "c.com"]);
    assert!(lair.submissions().is_empty());
    Ok(())
}

#[tokio::test]
async fn untouched_snapshot_hosts_are_still_submitted() -> anyhow::Result<()> {
    let lair = FakeLair::with_hosts(
        "proj1",
        vec![host("10.0.0.7", &["seven.com"]), host("10.0.0.8", &[])],
    );
    let input = bbot_file(&[SCAN]);

    let outcome = service(&lair)
        .run(&settings(input.path().to_path_buf(), false, &["x"]))
        .await?;

    assert_eq!(outcome.submission, Submission::Imported { hosts: 2 });
    let hosts = lair.hosts();
    assert_eq!(hosts[0].hostnames, vec!["seven.com"]);
    assert!(hosts[0].tags.is_empty());
    assert_eq!(hosts[0].last_modified_by, "nmap");
    Ok(())
}

#[tokio::test]
async fn importing_twice_accumulates_duplicates() -> anyhow::Result<()> {
    let lair = FakeLair::with_hosts("proj1", vec![host("10.0.0.1", &["a.com"])]);
    let input = bbot_file(&[r#"{"type":"DNS_NAME","host":"b.com","resolved_hosts":["10.0.0.1"]}"#]);
    let settings = settings(input.path().to_path_buf(), false, &["x"]);

    service(&lair).run(&settings).await?;
    service(&lair).run(&settings).await?;

    let hosts = lair.hosts();
    assert_eq!(hosts[0].hostnames, vec!["a.com", "b.com", "b.com"]);
    assert_eq!(hosts[0].tags, vec!["x", "x"]);
    assert_eq!(lair.submissions().len(), 2);
    Ok(())
}

#[tokio::test]
async fn extra_host_fields_survive_the_round_trip() -> anyhow::Result<()> {
    let known: Host = serde_json::from_value(json!({
        "ipv4": "10.0.0.1",
        "hostnames": ["a.com"],
        "tags": null,
        "lastModifiedBy": "nmap",
        "os": {"fingerprint": "Linux 5.x", "weight": 90},
        "services": [{"port": 443, "protocol": "tcp", "service": "https"}]
    }))?;
    let lair = FakeLair::with_hosts("proj1", vec![known]);
    let input = bbot_file(&[B_COM]);

    service(&lair)
        .run(&settings(input.path().to_path_buf(), false, &[]))
        .await?;

    let submitted = serde_json::to_value(&lair.submissions()[0].hosts[0])?;
    assert_eq!(submitted["hostnames"], json!(["a.com", "b.com"]));
    assert_eq!(submitted["lastModifiedBy"], json!(TOOL));
    assert_eq!(submitted["os"]["fingerprint"], json!("Linux 5.x"));
    assert_eq!(submitted["services"][0]["port"], json!(443));
    Ok(())
}

#[tokio::test]
async fn skip_policy_imports_around_malformed_lines() -> anyhow::Result<()> {
    let lair = FakeLair::with_hosts("proj1", vec![host("10.0.0.1", &["a.com"])]);
    let input = bbot_file(&[
        "{not json",
        r#"{"type":"DNS_NAME","host":7,"resolved_hosts":["10.0.0.1"]}"#,
        B_COM,
    ]);
    let mut settings = settings(input.path().to_path_buf(), false, &[]);
    settings.malformed = MalformedPolicy::Skip;

    let outcome = service(&lair).run(&settings).await?;

    assert_eq!(outcome.stats.malformed_records, 2);
    assert_eq!(outcome.stats.dns_records, 1);
    assert_eq!(lair.hosts()[0].hostnames, vec!["a.com", "b.com"]);
    Ok(())
}
