//! Disclosure-only classification against listing overviews and page text

use crate::common::{harvest, read_results};
use bounty_harvest::{Amount, ProgramResult, RunOutcome};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/researchers/bug-bounty-programs";

const DISCLOSURE_PAGE: &str = r#"<html><body>
    <p class="responsible-disclosure">This is a Responsible Disclosure program without bounties.</p>
</body></html>"#;

const BOUNTY_PAGE: &str = r#"<html><body>
    <div class="detail-header">Bounties</div>
    <div class="detail-content">Rewards are paid per severity.</div>
</body></html>"#;

/// Wraps hits in the script assignment the search page ships
fn listing_page(hits: Value) -> String {
    let state = json!({ "programs_prod": { "results": [ { "hits": hits } ] } });
    format!(
        "<html><body><script>window[Symbol.for(\"InstantSearchInitialResults\")] = {};</script></body></html>",
        state
    )
}

fn hit(handle: &str, program_type: Option<&str>, min: Value, max: Value) -> Value {
    json!({
        "name": handle.to_uppercase(),
        "handle": handle,
        "companyHandle": "acme",
        "programType": program_type,
        "minBounty": min,
        "maxBounty": max,
    })
}

fn eur(value: i64) -> Value {
    json!({ "value": value, "currency": "EUR" })
}

async fn mount_detail(server: &MockServer, handle: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/programs/acme/{}/detail", handle)))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

fn find<'a>(results: &'a [ProgramResult], handle: &str) -> &'a ProgramResult {
    let name = handle.to_uppercase();
    results
        .iter()
        .find(|r| r.program_name == name)
        .unwrap_or_else(|| panic!("no result for {}", handle))
}

#[tokio::test]
async fn test_overview_classification() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let hits = json!([
        hit("alpha", Some("Bug bounty"), eur(0), eur(0)),
        hit("beta", Some("Responsible disclosure"), Value::Null, Value::Null),
        hit("gamma", None, eur(100), Value::Null),
        hit("delta", Some("Bug bounty"), eur(250), eur(5000)),
        hit("epsilon", None, Value::Null, eur(0)),
    ]);

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(hits)))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Bounty-labelled with a zero maximum is still confirmed against the page
    mount_detail(
        &mock_server,
        "alpha",
        ResponseTemplate::new(200).set_body_string(BOUNTY_PAGE),
        1,
    )
    .await;
    // Explicit disclosure type needs no page
    mount_detail(
        &mock_server,
        "beta",
        ResponseTemplate::new(200).set_body_string(DISCLOSURE_PAGE),
        0,
    )
    .await;
    mount_detail(
        &mock_server,
        "gamma",
        ResponseTemplate::new(200).set_body_string(DISCLOSURE_PAGE),
        1,
    )
    .await;
    // Positive maximum needs no page
    mount_detail(
        &mock_server,
        "delta",
        ResponseTemplate::new(200).set_body_string(DISCLOSURE_PAGE),
        0,
    )
    .await;
    mount_detail(&mock_server, "epsilon", ResponseTemplate::new(503), 1).await;

    let output = TempDir::new().expect("Failed to create temp dir");
    let run = harvest(
        "intigriti-overview",
        &base_url,
        1,
        &output,
        CancellationToken::new(),
    )
    .await;

    assert_eq!(run.report.outcome, RunOutcome::CompletedNormally);
    assert_eq!(run.report.results, 5);

    let results = read_results(&run.sink.artifact_path(RunOutcome::CompletedNormally));
    assert_eq!(results.len(), 5);

    let alpha = find(&results, "alpha");
    assert_eq!(
        alpha.program_url,
        format!("{}/programs/acme/alpha/detail", base_url)
    );
    assert!(!alpha.disclosure_only);
    assert!(!alpha.offers_bounties);
    assert_eq!(alpha.max_bounty, Some(Amount::Integer(0)));
    assert_eq!(alpha.currency.as_deref(), Some("EUR"));

    let beta = find(&results, "beta");
    assert!(beta.disclosure_only);
    assert!(!beta.offers_bounties);
    assert_eq!(beta.min_bounty, Some(Amount::Integer(0)));
    assert_eq!(beta.max_bounty, Some(Amount::Integer(0)));

    let gamma = find(&results, "gamma");
    assert!(gamma.disclosure_only);
    assert!(!gamma.offers_bounties);
    assert_eq!(gamma.min_bounty, Some(Amount::Integer(0)));
    assert_eq!(gamma.max_bounty, Some(Amount::Integer(0)));
    assert!(gamma.program_type.is_none());

    let delta = find(&results, "delta");
    assert!(!delta.disclosure_only);
    assert!(delta.offers_bounties);
    assert_eq!(delta.min_bounty, Some(Amount::Integer(250)));
    assert_eq!(delta.max_bounty, Some(Amount::Integer(5000)));

    // A failed confirmation leaves the program unclassified, not failed
    let epsilon = find(&results, "epsilon");
    assert!(!epsilon.disclosure_only);
    assert!(!epsilon.no_data_found);
    assert!(epsilon
        .fetch_error
        .as_deref()
        .is_some_and(|e| e.contains("503")));
}

#[tokio::test]
async fn test_tier_table_notice_wins_over_overview() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let hits = json!([hit("zeta", Some("Bug bounty"), eur(100), eur(2000))]);

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(hits)))
        .mount(&mock_server)
        .await;

    mount_detail(
        &mock_server,
        "zeta",
        ResponseTemplate::new(200).set_body_string(DISCLOSURE_PAGE),
        1,
    )
    .await;

    let output = TempDir::new().expect("Failed to create temp dir");
    let run = harvest("intigriti", &base_url, 1, &output, CancellationToken::new()).await;

    let results = read_results(&run.sink.artifact_path(RunOutcome::CompletedNormally));
    assert_eq!(results.len(), 1);

    let zeta = &results[0];
    assert!(zeta.disclosure_only);
    assert!(!zeta.offers_bounties);
    assert_eq!(zeta.max_bounty, Some(Amount::Integer(0)));
    assert!(zeta.rewards.is_empty());
}
