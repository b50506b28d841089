use httpmock::prelude::*;
use serde_json::json;

use pubmed_mcp_gateway::clients::entrez::EntrezClient;
use pubmed_mcp_gateway::smoke::{self, SmokeOptions};
use pubmed_mcp_gateway::tools::pubmed::PubmedService;

fn mock_entrez(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/esearch.fcgi")
            .query_param("term", "COVID-19 vaccine")
            .query_param("sort", "pub_date");
        then.status(200)
            .json_body(json!({"esearchresult": {"idlist": ["33301246", "32887691"]}}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/esummary.fcgi");
        then.status(200).json_body(json!({
            "result": {
                "uids": ["33301246", "32887691"],
                "33301246": {
                    "uid": "33301246",
                    "title": "Safety and Efficacy of the BNT162b2 mRNA Covid-19 Vaccine",
                    "fulljournalname": "The New England Journal of Medicine",
                    "pubdate": "2020 Dec 31",
                    "authors": [{"name": "Polack FP"}, {"name": "Thomas SJ"}]
                },
                "32887691": {
                    "uid": "32887691",
                    "title": "A second vaccine trial",
                    "source": "Lancet",
                    "pubdate": "2020 Sep"
                }
            }
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/elink.fcgi")
            .query_param("id", "33301246");
        then.status(200).json_body(json!({
            "linksets": [{
                "linksetdbs": [
                    {"linkname": "pubmed_pubmed", "links": ["33301246", "32887691"]}
                ]
            }]
        }));
    });
}

#[tokio::test]
async fn smoke_run_succeeds_end_to_end_against_mocked_entrez() {
    let server = MockServer::start();
    mock_entrez(&server);

    let service = PubmedService::with_client(EntrezClient::new(server.base_url()));
    let outcomes = smoke::run(&service, &SmokeOptions::default()).await;

    assert_eq!(outcomes.len(), 3);
    for outcome in &outcomes {
        let preview = outcome.result.as_ref().unwrap();
        assert!(!preview.is_empty(), "{} had an empty preview", outcome.label);
        assert!(preview.chars().count() <= smoke::PREVIEW_LIMIT + 3);
    }

    let text = smoke::render(&outcomes);
    assert!(text.contains("1. Testing PubMed search..."));
    assert!(text.contains("2. Testing Publication details..."));
    assert!(text.contains("3. Testing Similar articles..."));
    assert!(text.contains("ready to use with your MCP host"));
}

#[tokio::test]
async fn smoke_run_isolates_failures_per_operation() {
    // esearch works, esummary breaks: the search and details tests fail on
    // the summary call, but the similar test still reports independently.
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/esearch.fcgi");
        then.status(200)
            .json_body(json!({"esearchresult": {"idlist": []}}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/esummary.fcgi");
        then.status(400).body("bad request");
    });
    server.mock(|when, then| {
        when.method(GET).path("/elink.fcgi");
        then.status(200).json_body(json!({"linksets": []}));
    });

    let service = PubmedService::with_client(EntrezClient::new(server.base_url()));
    let outcomes = smoke::run(&service, &SmokeOptions::default()).await;

    assert!(outcomes[0].result.is_ok(), "empty search renders as text");
    assert!(outcomes[1].result.is_err(), "details should fail");
    assert!(outcomes[2].result.is_ok(), "similar renders empty-set text");

    let text = smoke::render(&outcomes);
    assert!(text.contains("❌ Publication details failed"));
    assert!(text.contains("Testing complete!"));
}
