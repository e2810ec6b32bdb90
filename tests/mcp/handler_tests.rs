//! MCP handler tests driven through the server's line processing

use crate::common::{create_test_services, TestRepo};
use ragdex::mcp::protocol::*;
use ragdex::mcp::McpServer;
use serde_json::{json, Value};

fn request(id: u64, method: &str, params: Value) -> String {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string()
}

fn call(id: u64, tool: &str, arguments: Value) -> String {
    request(id, "tools/call", json!({"name": tool, "arguments": arguments}))
}

fn text_of(response: &JsonRpcResponse) -> String {
    let result = response.result.as_ref().expect("tool result");
    result["content"][0]["text"]
        .as_str()
        .expect("text content")
        .to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_session() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();
    let server = McpServer::new(services);

    let init = server
        .process_line(&request(
            1,
            "initialize",
            json!({"protocolVersion": "2024-11-05", "clientInfo": {"name": "test"}}),
        ))
        .await;
    assert_eq!(init.result.as_ref().unwrap()["protocolVersion"], PROTOCOL_VERSION);

    let ack = server
        .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(ack.is_empty());

    let indexed = server
        .process_line(&call(
            2,
            "index_directory",
            json!({"directory": repo.path().to_string_lossy(), "collection": "session"}),
        ))
        .await;
    let text = text_of(&indexed);
    assert!(text.starts_with("Indexing complete!"), "{text}");
    assert!(text.contains("Collection: session"));
    assert!(text.contains("Files indexed: 5"));

    let listed = server.process_line(&call(3, "list_collections", json!({}))).await;
    let text = text_of(&listed);
    assert!(text.starts_with("Found 1 collections:"), "{text}");
    assert!(text.contains("  - session ("));

    let found = server
        .process_line(&call(
            4,
            "search_documents",
            json!({
                "query": "helper function returning 42",
                "collection": "session",
                "n_results": 2
            }),
        ))
        .await;
    let text = text_of(&found);
    assert!(text.starts_with("Result 1 (distance: "), "{text}");
    assert!(text.contains("Metadata: "));

    let stats = server
        .process_line(&call(5, "collection_stats", json!({"collection": "session"})))
        .await;
    assert!(text_of(&stats).contains("Total chunks:"));

    let deleted = server
        .process_line(&call(6, "delete_collection", json!({"collection": "session"})))
        .await;
    assert_eq!(
        text_of(&deleted),
        "Successfully deleted collection 'session'"
    );

    let empty = server.process_line(&call(7, "list_collections", json!({}))).await;
    assert_eq!(text_of(&empty), "No collections found");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_documents_then_search() {
    let (services, _db) = create_test_services();
    let server = McpServer::new(services);

    let added = server
        .process_line(&call(
            1,
            "add_documents",
            json!({
                "documents": ["tantivy stores inverted indexes", "tokio drives async io"],
                "collection": "notes",
                "metadatas": [{"topic": "search"}, {"topic": "runtime"}]
            }),
        ))
        .await;
    assert_eq!(
        text_of(&added),
        "Successfully added 2 documents to collection 'notes'"
    );

    let found = server
        .process_line(&call(
            2,
            "search_documents",
            json!({"query": "tokio async io", "collection": "notes", "n_results": 1}),
        ))
        .await;
    let text = text_of(&found);
    assert!(text.contains("tokio drives async io"), "{text}");
    assert!(text.contains("runtime"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tool_errors_map_to_json_rpc_codes() {
    let (services, db) = create_test_services();
    let server = McpServer::new(services);

    let missing = server
        .process_line(&call(1, "search_documents", json!({"query": "q", "collection": "ghost"})))
        .await;
    assert_eq!(missing.error.unwrap().code, COLLECTION_NOT_FOUND);

    let relative = server
        .process_line(&call(2, "index_directory", json!({"directory": "relative/path"})))
        .await;
    assert_eq!(relative.error.unwrap().code, INVALID_PARAMS);

    let absent = server
        .process_line(&call(
            3,
            "index_directory",
            json!({"directory": db.path().join("absent").to_string_lossy()}),
        ))
        .await;
    assert_eq!(absent.error.unwrap().code, INVALID_PARAMS);

    let bad_strategy = server
        .process_line(&call(
            4,
            "index_directory",
            json!({"directory": db.path().to_string_lossy(), "chunking_strategy": "recursive"}),
        ))
        .await;
    assert_eq!(bad_strategy.error.unwrap().code, INVALID_PARAMS);

    let unknown = server.process_line(&call(5, "no_such_tool", json!({}))).await;
    assert!(unknown.error.is_some());

    let mismatch = server
        .process_line(&call(
            6,
            "add_documents",
            json!({"documents": ["a", "b"], "collection": "c", "metadatas": [{}]}),
        ))
        .await;
    assert_eq!(mismatch.error.unwrap().code, INVALID_PARAMS);
}

#[tokio::test]
async fn test_serve_over_byte_streams() {
    let (services, _db) = create_test_services();
    let mut server = McpServer::new(services);
    let input = [
        request(1, "initialize", json!({})),
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#.to_string(),
        "not json".to_string(),
        request(2, "tools/list", json!({})),
        request(3, "ping", json!({})),
    ]
    .join("\n");
    let mut output = Vec::new();

    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[1]["error"]["code"], PARSE_ERROR);
    assert_eq!(responses[1]["id"], Value::Null);

    let names: Vec<&str> = responses[2]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "add_documents",
            "collection_stats",
            "delete_collection",
            "index_directory",
            "list_collections",
            "search_documents"
        ]
    );
    assert_eq!(responses[3]["id"], 3);
}
