//! Crawl cycle tests: bootstrap, pagination, item failures, interruption

use crate::common::{harvest, read_results};
use bounty_harvest::output::SinkReport;
use bounty_harvest::{Amount, RunOutcome};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn engagements(names: &[String]) -> serde_json::Value {
    let engagements: Vec<_> = names
        .iter()
        .map(|name| json!({"name": name, "briefUrl": format!("/{}", name)}))
        .collect();
    json!({ "engagements": engagements })
}

#[tokio::test]
async fn test_bugcrowd_two_hop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Bootstrap page carrying the CSRF token
    Mock::given(method("GET"))
        .and(path("/engagements"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><meta name="csrf-token" content="tok-123"></head></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Listing only answers requests echoing the token
    Mock::given(method("GET"))
        .and(path("/engagements.json"))
        .and(query_param("page", "1"))
        .and(header("x-csrf-token", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "engagements": [
                {"name": "Acme", "briefUrl": "/engagements/acme", "rewardSummary": {"maxReward": "$4,000"}},
                {"name": "No Brief"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/engagements/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><div data-react-class="ResearcherEngagementBrief"
                data-api-endpoints='{"engagementBriefApi":{"getBriefVersionDocument":"/engagements/acme/changelog/7"}}'></div></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/engagements/acme/changelog/7.json"))
        .and(header("referer", format!("{}/engagements/acme", base_url).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"scope": [
                {"name": "Web", "inScope": true, "rewardRangeData": {"P1": {"min": 1000, "max": 4000}}},
                {"name": "Out", "inScope": false, "rewardRangeData": {"P1": {"min": 1, "max": 2}}}
            ]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = TempDir::new().expect("Failed to create temp dir");
    let run = harvest("bugcrowd", &base_url, 1, &output, CancellationToken::new()).await;

    assert_eq!(run.report.outcome, RunOutcome::CompletedNormally);
    assert_eq!(run.report.stats.items_seen, 2);
    assert_eq!(run.report.stats.items_skipped, 1);
    assert_eq!(run.report.stats.items_included, 1);
    assert!(run.report.stats.is_balanced());

    let path = run.sink.artifact_path(RunOutcome::CompletedNormally);
    assert_eq!(
        run.report.sink,
        SinkReport::Written {
            path: path.clone(),
            count: 1
        }
    );

    let results = read_results(&path);
    assert_eq!(results.len(), 1);
    let acme = &results[0];
    assert_eq!(acme.platform, "Bugcrowd");
    assert_eq!(acme.program_url, format!("{}/engagements/acme", base_url));
    assert_eq!(acme.reward_summary, Some(json!({"maxReward": "$4,000"})));
    assert!(acme.offers_bounties);
    assert!(!acme.no_data_found);
    assert_eq!(acme.rewards.len(), 1);
    assert_eq!(acme.rewards[0].tier, "Web");
    assert_eq!(acme.rewards[0].amounts[0].amount, Some(Amount::Integer(4000)));
}

#[tokio::test]
async fn test_failed_listing_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for page in 1..=6u32 {
        let response = if page == 2 {
            ResponseTemplate::new(500)
        } else {
            let names = vec![format!("p{}-a", page), format!("p{}-b", page)];
            ResponseTemplate::new(200).set_body_json(engagements(&names))
        };

        Mock::given(method("GET"))
            .and(path("/engagements.json"))
            .and(query_param("page", page.to_string().as_str()))
            .respond_with(response)
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    // Detail pages are unreadable; each item still yields a degraded result
    Mock::given(method("GET"))
        .and(path_regex(r"^/p\d-[ab]$"))
        .respond_with(ResponseTemplate::new(404))
        .expect(10)
        .mount(&mock_server)
        .await;

    let output = TempDir::new().expect("Failed to create temp dir");
    let run = harvest("bugcrowd", &base_url, 6, &output, CancellationToken::new()).await;

    assert_eq!(run.report.outcome, RunOutcome::CompletedNormally);
    assert_eq!(run.report.stats.pages_attempted, 6);
    assert_eq!(run.report.stats.pages_failed, 1);
    assert_eq!(run.report.stats.pages_empty, 1);
    assert_eq!(run.report.stats.items_seen, 10);
    assert!(run.report.stats.is_balanced());

    let results = read_results(&run.sink.artifact_path(RunOutcome::CompletedNormally));
    let names: Vec<_> = results.iter().map(|r| r.program_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["p1-a", "p1-b", "p3-a", "p3-b", "p4-a", "p4-b", "p5-a", "p5-b", "p6-a", "p6-b"]
    );

    for result in &results {
        assert!(result.no_data_found);
        assert!(result.rewards.is_empty());
        assert!(result
            .fetch_error
            .as_deref()
            .is_some_and(|e| e.contains("404")));
    }
}

/// Answers detail requests and cancels the run on the Nth one
struct CancelOnNth {
    seen: AtomicUsize,
    nth: usize,
    cancel: CancellationToken,
}

impl Respond for CancelOnNth {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let count = self.seen.fetch_add(1, Ordering::SeqCst) + 1;
        if count == self.nth {
            self.cancel.cancel();
        }
        ResponseTemplate::new(200).set_body_string("<html><body>No brief</body></html>")
    }
}

#[tokio::test]
async fn test_interrupt_saves_partial_results() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let cancel = CancellationToken::new();

    let names: Vec<String> = (1..=10).map(|i| format!("prog-{}", i)).collect();
    Mock::given(method("GET"))
        .and(path("/engagements.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(engagements(&names)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/prog-\d+$"))
        .respond_with(CancelOnNth {
            seen: AtomicUsize::new(0),
            nth: 3,
            cancel: cancel.clone(),
        })
        .expect(3)
        .mount(&mock_server)
        .await;

    let output = TempDir::new().expect("Failed to create temp dir");
    let run = harvest("bugcrowd", &base_url, 4, &output, cancel).await;

    assert_eq!(run.report.outcome, RunOutcome::InterruptedByUser);
    assert_eq!(run.report.results, 3);
    assert_eq!(run.report.stats.pages_attempted, 1);
    assert!(run.report.stats.is_balanced());

    let partial = read_results(&run.sink.artifact_path(RunOutcome::InterruptedByUser));
    let names: Vec<_> = partial.iter().map(|r| r.program_name.as_str()).collect();
    assert_eq!(names, vec!["prog-1", "prog-2", "prog-3"]);

    assert!(!run.sink.artifact_path(RunOutcome::CompletedNormally).exists());
    assert!(!run.sink.artifact_path(RunOutcome::AbortedOnError).exists());
}

#[tokio::test]
async fn test_cancelled_before_start_writes_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/engagements.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(engagements(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let output = TempDir::new().expect("Failed to create temp dir");
    let run = harvest("bugcrowd", &mock_server.uri(), 3, &output, cancel).await;

    assert_eq!(run.report.outcome, RunOutcome::InterruptedByUser);
    assert_eq!(run.report.sink, SinkReport::NothingToWrite);
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_zero_results_write_no_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/programs/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = TempDir::new().expect("Failed to create temp dir");
    let run = harvest("hackerone", &mock_server.uri(), 1, &output, CancellationToken::new()).await;

    assert_eq!(run.report.outcome, RunOutcome::CompletedNormally);
    assert_eq!(run.report.sink, SinkReport::NothingToWrite);
    assert_eq!(run.report.stats.pages_empty, 1);
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}
