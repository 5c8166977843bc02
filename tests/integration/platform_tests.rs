//! End-to-end runs of the link-listing, tier-table and query-API platforms

use crate::common::{harvest, read_results};
use bounty_harvest::{Amount, RunOutcome};
use serde_json::json;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_yeswehack_links_and_reward_grid() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/programs"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <a href="/programs">All programs</a>
                <a href="/programs/acme-bug-bounty">Acme</a>
                <a href="/programs/acme-bug-bounty">Acme again</a>
                <a href="/programs/quiet-vdp">Quiet</a>
                <a href="/about">About</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/programs/acme-bug-bounty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <div class="d-flex flex-wrap mt-3 gap-3">
                    <span class="tag-content">Bounty</span>
                </div>
                <ywh-reward-grid>
                    <span class="reward-grid-title">Low</span>
                    <span class="reward-grid-title">Critical</span>
                    <span class="reward-grid-value"><span class="tag-content">€100</span></span>
                    <span class="reward-grid-value"><span class="tag-content">€10,000</span></span>
                </ywh-reward-grid>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/programs/quiet-vdp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <div class="d-flex flex-wrap mt-3 gap-3">
                    <span class="tag-content">VDP</span>
                </div>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = TempDir::new().expect("Failed to create temp dir");
    let run = harvest("yeswehack", &base_url, 1, &output, CancellationToken::new()).await;

    assert_eq!(run.report.outcome, RunOutcome::CompletedNormally);
    assert_eq!(run.report.stats.items_seen, 2);

    let results = read_results(&run.sink.artifact_path(RunOutcome::CompletedNormally));
    assert_eq!(results.len(), 2);

    let acme = &results[0];
    assert_eq!(acme.program_name, "acme-bug-bounty");
    assert_eq!(acme.program_url, format!("{}/programs/acme-bug-bounty", base_url));
    assert!(acme.offers_bounties);
    assert_eq!(acme.tags, vec!["bounty".to_string()]);
    assert_eq!(acme.rewards.len(), 1);

    let amounts = &acme.rewards[0].amounts;
    assert_eq!(amounts.len(), 2);
    assert_eq!(amounts[1].severity, "Critical");
    assert_eq!(amounts[1].amount, Some(Amount::Integer(10000)));

    let quiet = &results[1];
    assert_eq!(quiet.program_name, "quiet-vdp");
    assert!(!quiet.offers_bounties);
    assert!(quiet.rewards.is_empty());
    assert!(!quiet.no_data_found);
}

#[tokio::test]
async fn test_intigriti_tier_table() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let state = json!({ "programs_prod": { "results": [ { "hits": [
        {
            "name": "Acme",
            "handle": "acme-web",
            "companyHandle": "acme",
            "programType": "Bug bounty",
            "minBounty": {"value": 50, "currency": "EUR"},
            "maxBounty": {"value": 7500, "currency": "EUR"}
        }
    ] } ] } });

    Mock::given(method("GET"))
        .and(path("/researchers/bug-bounty-programs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<script>window[Symbol.for(\"InstantSearchInitialResults\")] = {};</script>",
            state
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/programs/acme/acme-web/detail"))
        .and(header(
            "referer",
            format!("{}/researchers/bug-bounty-programs", base_url).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <div class="detail-header">Bounties</div>
                <div class="detail-content">
                    <lib-bounty-table-row>
                        <div class="row-label">
                            <lib-bounty-tier-label><div class="copy">Tier 1</div></lib-bounty-tier-label>
                            <div class="currency">EUR</div>
                        </div>
                        <div class="column-container">
                            <div class="column"><div class="range-container"><div>€50</div></div></div>
                            <div class="column"><div class="range-container"><div>€250</div></div></div>
                            <div class="column"><div class="range-container"><div>€1,000</div></div></div>
                            <div class="column"><div class="range-container"><div>€7,500</div></div></div>
                        </div>
                    </lib-bounty-table-row>
                </div>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = TempDir::new().expect("Failed to create temp dir");
    let run = harvest("intigriti", &base_url, 1, &output, CancellationToken::new()).await;

    let results = read_results(&run.sink.artifact_path(RunOutcome::CompletedNormally));
    assert_eq!(results.len(), 1);

    let acme = &results[0];
    assert!(acme.offers_bounties);
    assert!(!acme.disclosure_only);
    assert_eq!(acme.rewards.len(), 1);

    let tier = &acme.rewards[0];
    assert_eq!(tier.tier, "Tier 1");
    assert_eq!(tier.currency.as_deref(), Some("EUR"));
    let labels: Vec<_> = tier.amounts.iter().map(|a| a.severity.as_str()).collect();
    assert_eq!(labels, vec!["Low", "Medium", "High", "Critical"]);
    assert_eq!(tier.amounts[3].amount, Some(Amount::Integer(7500)));
}

#[tokio::test]
async fn test_hackerone_graphql_bounty_table() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/programs/search"))
        .and(query_param("query", "bounties:yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"handle": "acme", "url": "/acme"},
                {"handle": "ghost", "url": "/ghost"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "operationName": "TeamProfile",
            "variables": {"handle": "acme"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"team": {
                "handle": "acme",
                "offers_bounties": true,
                "bounty_table": {
                    "low_label": "Low",
                    "medium_label": "Medium",
                    "high_label": "High",
                    "critical_label": "Critical",
                    "description": "Per asset",
                    "bounty_table_rows": {"nodes": [{
                        "low": 150, "medium": 600, "high": 2000, "critical": 8000,
                        "critical_minimum": 5000,
                        "structured_scope": {"asset_identifier": "api.acme.com"},
                        "updated_at": "2024-03-01T00:00:00Z"
                    }]}
                }
            }}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"handle": "ghost"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"team": null}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = TempDir::new().expect("Failed to create temp dir");
    let run = harvest("hackerone", &base_url, 1, &output, CancellationToken::new()).await;

    assert_eq!(run.report.stats.items_included, 2);
    assert_eq!(run.report.stats.item_failures, 1);

    let results = read_results(&run.sink.artifact_path(RunOutcome::CompletedNormally));
    assert_eq!(results.len(), 2);

    let acme = &results[0];
    assert_eq!(acme.platform, "HackerOne");
    assert_eq!(acme.program_url, format!("{}/acme", base_url));
    assert!(acme.offers_bounties);
    assert_eq!(acme.rewards.len(), 1);

    let row = &acme.rewards[0];
    assert_eq!(row.tier, "api.acme.com");
    assert_eq!(row.description.as_deref(), Some("Per asset"));
    assert_eq!(row.amounts[3].severity, "Critical");
    assert_eq!(row.amounts[3].amount, Some(Amount::Integer(8000)));
    assert_eq!(row.amounts[3].minimum, Some(Amount::Integer(5000)));
    assert_eq!(row.amounts[0].minimum, None);

    let ghost = &results[1];
    assert!(ghost.no_data_found);
    assert!(!ghost.offers_bounties);
    assert!(ghost.rewards.is_empty());
}
