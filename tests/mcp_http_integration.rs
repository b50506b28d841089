use std::sync::Arc;

use axum::{routing::any_service, Router};
use http_body_util::BodyExt; // for .collect
use hyper::{header, Request, StatusCode};
use serde_json::{json, Value};
use tokio::time::{timeout, Duration};
use tower::ServiceExt; // for .oneshot

use pubmed_mcp_gateway::clients::entrez::EntrezClient;
use pubmed_mcp_gateway::infra::runtime::mcp_transport;
use pubmed_mcp_gateway::tools::pubmed::PubmedService;
use pubmed_mcp_gateway::tools::router::factory_with_service;

static MCP_PROTOCOL_VERSION: &str = "0.5";

#[tokio::test]
async fn initialize_list_and_call_over_streamable_http() {
    let server = httpmock::MockServer::start();
    server.mock(|when, then| {
        when.method(httpmock::Method::GET)
            .path("/esearch.fcgi")
            .query_param("term", "COVID-19 vaccine");
        then.status(200)
            .json_body(json!({"esearchresult": {"idlist": ["33301246"]}}));
    });
    server.mock(|when, then| {
        when.method(httpmock::Method::GET).path("/esummary.fcgi");
        then.status(200).json_body(json!({
            "result": {
                "uids": ["33301246"],
                "33301246": {
                    "uid": "33301246",
                    "title": "Safety and Efficacy of the BNT162b2 mRNA Covid-19 Vaccine",
                    "fulljournalname": "The New England Journal of Medicine",
                    "pubdate": "2020 Dec 31",
                    "authors": [{"name": "Polack FP"}]
                }
            }
        }));
    });

    let factory = {
        let service = Arc::new(PubmedService::with_client(EntrezClient::new(
            server.base_url(),
        )));
        move || factory_with_service(service.clone())
    };

    let session_mgr = Arc::new(mcp_transport::LocalSessionManager::default());
    let app = mcp_transport::make_streamable_http_service(factory, session_mgr);
    let app = Router::new().route_service("/mcp", any_service(app));

    // Initialize
    let init = json!({
        "jsonrpc":"2.0","id":1,"method":"initialize",
        "params":{ "protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"test","version":"0.1"} }
    });
    let init_req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json")
        .header("MCP-Protocol-Version", MCP_PROTOCOL_VERSION)
        .body(axum::body::Body::from(init.to_string()))
        .unwrap();
    let init_res = app.clone().oneshot(init_req).await.unwrap();
    assert!(init_res.status().is_success());
    let session_id = init_res
        .headers()
        .get("MCP-Session-Id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();

    // notifications/initialized
    let initialized_notif =
        json!({"jsonrpc":"2.0","method":"notifications/initialized","params":{}});
    let initialized_req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json")
        .header("MCP-Session-Id", session_id.clone())
        .body(axum::body::Body::from(initialized_notif.to_string()))
        .unwrap();
    let initialized_res = app.clone().oneshot(initialized_req).await.unwrap();
    assert_eq!(initialized_res.status(), StatusCode::ACCEPTED);

    // tools/list
    let list = json!({"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}});
    let list_req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json")
        .header("MCP-Session-Id", session_id.clone())
        .body(axum::body::Body::from(list.to_string()))
        .unwrap();
    let list_res = timeout(Duration::from_secs(20), app.clone().oneshot(list_req))
        .await
        .unwrap()
        .unwrap();
    assert!(list_res.status().is_success());

    // tools/call
    let call = json!({
        "jsonrpc":"2.0","id":3,"method":"tools/call",
        "params": {"name":"pubmed.search","arguments":{"query":"COVID-19 vaccine","max_results":3,"sort":"date"}}
    });
    let call_req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json")
        .header("MCP-Session-Id", session_id.clone())
        .body(axum::body::Body::from(call.to_string()))
        .unwrap();
    let call_res = app.clone().oneshot(call_req).await.unwrap();
    assert!(call_res.status().is_success());
    let bytes = call_res.into_body().collect().await.unwrap().to_bytes();
    let s = String::from_utf8_lossy(&bytes);
    let v: Value = s
        .lines()
        .find_map(|line| line.strip_prefix("data: ").map(|d| d.to_string()))
        .and_then(|d| serde_json::from_str::<Value>(&d).ok())
        .expect("Did not find an rpcResponse for tools/call");
    let results = v["result"]["structuredContent"]["results"]
        .as_array()
        .expect("results array");
    assert!(results[0]["text"]
        .as_str()
        .unwrap()
        .contains("BNT162b2"));
}
