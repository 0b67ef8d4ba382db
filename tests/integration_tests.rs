//! 集成测试

mod common;

use common::{server_with, MockFetcher, MockReply};
use osrs_wiki_mcp::cache::Cache;
use osrs_wiki_mcp::error::NO_PLAYER_DATA_MESSAGE;
use rust_mcp_sdk::schema::ContentBlock;
use serde_json::json;
use std::time::Duration;

fn text_of(result: &rust_mcp_sdk::schema::CallToolResult) -> String {
    match result.content.first() {
        Some(ContentBlock::TextContent(text_content)) => text_content.text.clone(),
        other => panic!("期望文本内容，实际: {other:?}"),
    }
}

fn search_body(titles: &[&str]) -> serde_json::Value {
    let items: Vec<_> = titles
        .iter()
        .map(|t| json!({"title": t, "snippet": format!("The <span class=\"searchmatch\">{t}</span>")}))
        .collect();
    json!({"query": {"search": items}})
}

// ============================================================================
// search
// ============================================================================

/// 测试搜索场景：两条结果
#[tokio::test]
async fn test_search_dragon_two_results() {
    let mock = MockFetcher::new();
    mock.reply_json(json!({
        "query": {"search": [
            {"title": "Dragon sword", "snippet": "A <span class=\"searchmatch\">dragon</span> &quot;sword&quot;"},
            {"title": "Dragon shield", "snippet": "   "}
        ]}
    }));
    let server = server_with(&mock);

    let output = server.wiki().search("dragon", 2).await;

    assert_eq!(
        output,
        "📊 Results: 2 (showing up to 2)\n\
         \n\
         1. Dragon sword\n   \
         - A dragon \"sword\"\n   \
         - https://oldschool.runescape.wiki/w/Dragon_sword\n\
         2. Dragon shield\n   \
         - https://oldschool.runescape.wiki/w/Dragon_shield"
    );

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path(), "/api.php");
    assert_eq!(mock.last_param("action").as_deref(), Some("query"));
    assert_eq!(mock.last_param("format").as_deref(), Some("json"));
    assert_eq!(mock.last_param("list").as_deref(), Some("search"));
    assert_eq!(mock.last_param("srsearch").as_deref(), Some("dragon"));
    assert_eq!(mock.last_param("srlimit").as_deref(), Some("2"));
}

/// 测试 N 条结果对应 N 个序号和 N 个链接
#[tokio::test]
async fn test_search_entry_per_result() {
    let titles = ["Zulrah", "Zulrah's scales", "Zul-Andra", "Zulrah/Strategies"];
    let mock = MockFetcher::new();
    mock.reply_json(search_body(&titles));
    let server = server_with(&mock);

    let output = server.wiki().search("zulrah", 10).await;
    let lines: Vec<&str> = output.lines().collect();

    for (i, title) in titles.iter().enumerate() {
        let entry = format!("{}. {title}", i + 1);
        let pos = lines
            .iter()
            .position(|l| *l == entry)
            .unwrap_or_else(|| panic!("缺少条目 {entry}"));
        let url_line = lines[pos + 2];
        assert!(url_line.starts_with("   - https://oldschool.runescape.wiki/w/"));
    }
    assert!(output.contains("/w/Zulrah's_scales"));
    assert!(output.contains("/w/Zulrah%2FStrategies"));
    assert!(!output.contains(&format!("{}. ", titles.len() + 1)));
}

/// 测试空白查询不发请求
#[tokio::test]
async fn test_search_blank_query() {
    let mock = MockFetcher::new();
    let server = server_with(&mock);

    for query in ["", "   ", "\t\n"] {
        assert_eq!(
            server.wiki().search(query, 10).await,
            "❌ Error: query is required"
        );
    }
    assert_eq!(mock.request_count(), 0);
}

/// 测试 limit 被限制在 [1, 50]
#[tokio::test]
async fn test_search_limit_clamped() {
    let cases = [(-7, "1"), (0, "1"), (1, "1"), (10, "10"), (50, "50"), (51, "50"), (10_000, "50")];
    let mock = MockFetcher::new();
    let server = server_with(&mock);

    for (limit, expected) in cases {
        mock.reply_json(search_body(&["Bones"]));
        let output = server.wiki().search("bones", limit).await;
        assert_eq!(mock.last_param("srlimit").as_deref(), Some(expected));
        assert!(output.starts_with(&format!("📊 Results: 1 (showing up to {expected})")));
    }
}

/// 测试上游错误状态、空结果和传输失败
#[tokio::test]
async fn test_search_failures() {
    let mock = MockFetcher::new();
    mock.reply(MockReply::Status(503))
        .reply_json(json!({"query": {"search": []}}))
        .reply_json(json!({"batchcomplete": ""}))
        .reply(MockReply::Fail("connection refused".to_string()));
    let server = server_with(&mock);

    assert_eq!(server.wiki().search("x", 10).await, "❌ API Error: 503");
    assert_eq!(server.wiki().search("x", 10).await, "🔎 No results found");
    assert_eq!(server.wiki().search("x", 10).await, "🔎 No results found");
    assert_eq!(
        server.wiki().search("x", 10).await,
        "❌ Error: HTTP request failed: connection refused"
    );
}

// ============================================================================
// summary
// ============================================================================

/// 测试摘要场景
#[tokio::test]
async fn test_summary_abyssal_whip() {
    let mock = MockFetcher::new();
    mock.reply_json(json!({
        "batchcomplete": true,
        "query": {"pages": [{"pageid": 1, "ns": 0, "title": "Abyssal whip", "extract": "A whip...\n"}]}
    }));
    let server = server_with(&mock);

    let output = server.wiki().summary("Abyssal whip").await;
    assert_eq!(
        output,
        "📄 Abyssal whip\n\nA whip...\n\n🔗 https://oldschool.runescape.wiki/w/Abyssal_whip"
    );

    assert_eq!(mock.last_param("prop").as_deref(), Some("extracts"));
    assert_eq!(mock.last_param("exintro").as_deref(), Some("1"));
    assert_eq!(mock.last_param("explaintext").as_deref(), Some("1"));
    assert_eq!(mock.last_param("formatversion").as_deref(), Some("2"));
    assert_eq!(mock.last_param("titles").as_deref(), Some("Abyssal whip"));
}

/// 测试摘要的各种失败情况
#[tokio::test]
async fn test_summary_failures() {
    let mock = MockFetcher::new();
    let server = server_with(&mock);

    assert_eq!(server.wiki().summary("  ").await, "❌ Error: title is required");
    assert_eq!(mock.request_count(), 0);

    mock.reply(MockReply::Status(404))
        .reply_json(json!({"query": {"pages": []}}))
        .reply_json(json!({"query": {"pages": [{"title": "Fake page", "missing": true}]}}))
        .reply_json(json!({"query": {"pages": [{"title": "Bones", "extract": "   "}]}}))
        .reply(MockReply::Fail("timed out".to_string()));

    assert_eq!(server.wiki().summary("Bones").await, "❌ API Error: 404");
    assert_eq!(server.wiki().summary("Bones").await, "🔎 Page not found");
    assert_eq!(
        server.wiki().summary("fake page").await,
        "⚠️ No summary available for 'Fake page'"
    );
    assert_eq!(
        server.wiki().summary("Bones").await,
        "⚠️ No summary available for 'Bones'"
    );
    assert_eq!(
        server.wiki().summary("Bones").await,
        "❌ Error: HTTP request failed: timed out"
    );
}

// ============================================================================
// player data cache
// ============================================================================

/// 测试 TTL 边界：3599999ms 内命中缓存，3600001ms 重新请求
#[tokio::test(start_paused = true)]
async fn test_player_cache_ttl_boundary() {
    let mock = MockFetcher::new();
    mock.reply_json(json!({"username": "Zezima", "levels": {"Attack": 99}}))
        .reply_json(json!({"username": "Zezima", "levels": {"Attack": 99, "Magic": 99}}));
    let server = server_with(&mock);
    let player = server.player();

    let first = player.get_player_data("Zezima", false).await;
    assert_eq!(first.data, Some(json!({"username": "Zezima", "levels": {"Attack": 99}})));
    assert!(first.message.is_none());
    assert_eq!(mock.request_count(), 1);
    assert_eq!(
        mock.requests()[0].as_str(),
        "https://sync.runescape.wiki/runelite/player/Zezima/STANDARD"
    );

    tokio::time::advance(Duration::from_millis(3_599_999)).await;
    let cached = player.get_player_data("Zezima", false).await;
    assert_eq!(cached.data, first.data);
    assert_eq!(mock.request_count(), 1);

    tokio::time::advance(Duration::from_millis(2)).await;
    let refreshed = player.get_player_data("Zezima", false).await;
    assert_eq!(mock.request_count(), 2);
    assert_eq!(
        refreshed.data,
        Some(json!({"username": "Zezima", "levels": {"Attack": 99, "Magic": 99}}))
    );
}

/// 测试 forceRefresh 总是发请求
#[tokio::test(start_paused = true)]
async fn test_player_force_refresh() {
    let mock = MockFetcher::new();
    mock.reply_json(json!({"v": 1}))
        .reply_json(json!({"v": 2}))
        .reply_json(json!({"v": 3}));
    let server = server_with(&mock);
    let player = server.player();

    player.get_player_data("Lynx Titan", false).await;
    let second = player.get_player_data("Lynx Titan", true).await;
    let third = player.get_player_data("Lynx Titan", true).await;

    assert_eq!(mock.request_count(), 3);
    assert_eq!(second.data, Some(json!({"v": 2})));
    assert_eq!(third.data, Some(json!({"v": 3})));
    assert!(mock.requests()[0].as_str().contains("/Lynx%20Titan/STANDARD"));

    // 强制刷新后的数据会写回缓存
    let cached = player.get_player_data("Lynx Titan", false).await;
    assert_eq!(cached.data, Some(json!({"v": 3})));
    assert_eq!(mock.request_count(), 3);
}

/// 测试空对象不写入缓存并返回提示
#[tokio::test]
async fn test_player_empty_payload_not_cached() {
    let mock = MockFetcher::new();
    mock.reply_json(json!({})).reply_json(json!({}));
    let server = server_with(&mock);
    let player = server.player();

    for _ in 0..2 {
        let lookup = player.get_player_data("Nobody", false).await;
        assert!(lookup.data.is_none());
        assert_eq!(lookup.message.as_deref(), Some(NO_PLAYER_DATA_MESSAGE));
    }
    assert_eq!(mock.request_count(), 2);
    assert!(player.cache().is_empty().await);
}

/// 测试失败时保留旧缓存条目
#[tokio::test(start_paused = true)]
async fn test_player_failure_keeps_stale_entry() {
    let mock = MockFetcher::new();
    mock.reply_json(json!({"v": "old"}))
        .reply(MockReply::Status(500))
        .reply(MockReply::Fail("dns error".to_string()))
        .reply_json(json!({"v": "new"}));
    let server = server_with(&mock);
    let player = server.player();

    player.get_player_data("Woox", false).await;
    tokio::time::advance(Duration::from_secs(3601)).await;

    let failed = player.get_player_data("Woox", false).await;
    assert!(failed.data.is_none());
    assert_eq!(failed.message.as_deref(), Some("❌ API Error: 500"));
    assert_eq!(
        player.cache().get("Woox").await.map(|e| e.data),
        Some(json!({"v": "old"}))
    );

    let failed = player.get_player_data("Woox", false).await;
    assert_eq!(
        failed.message.as_deref(),
        Some("❌ Error: HTTP request failed: dns error")
    );

    let recovered = player.get_player_data("Woox", false).await;
    assert_eq!(recovered.data, Some(json!({"v": "new"})));
    assert_eq!(player.cache().len().await, 1);
    assert_eq!(mock.request_count(), 4);
}

/// 测试不同用户名互不影响
#[tokio::test]
async fn test_player_cache_per_username() {
    let mock = MockFetcher::new();
    mock.reply_json(json!({"who": "a"})).reply_json(json!({"who": "b"}));
    let server = server_with(&mock);
    let player = server.player();

    assert_eq!(player.get_player_data("a", false).await.data, Some(json!({"who": "a"})));
    assert_eq!(player.get_player_data("b", false).await.data, Some(json!({"who": "b"})));
    assert_eq!(player.get_player_data("a", false).await.data, Some(json!({"who": "a"})));
    assert_eq!(mock.request_count(), 2);
    assert_eq!(player.cache().len().await, 2);
}

// ============================================================================
// tool registry / server
// ============================================================================

/// 测试工具列表
#[test]
fn test_registered_tools() {
    let server = server_with(&MockFetcher::new());
    let names: Vec<String> = server
        .tool_registry()
        .get_tools()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["search", "summary", "getPlayerData"]);
}

/// 测试通过注册表调用 search / summary
#[tokio::test]
async fn test_registry_wiki_tools() {
    let mock = MockFetcher::new();
    mock.reply_json(search_body(&["Rune scimitar"]));
    let server = server_with(&mock);
    let registry = server.tool_registry();

    let result = registry
        .execute_tool("search", json!({"query": "rune scimitar"}))
        .await
        .expect("search 调用失败");
    assert!(text_of(&result).starts_with("📊 Results: 1 (showing up to 10)"));
    assert_eq!(mock.last_param("srlimit").as_deref(), Some("10"));

    // 错误以文本形式返回，而不是工具调用失败
    let result = registry
        .execute_tool("summary", json!({"title": ""}))
        .await
        .expect("summary 调用失败");
    assert_eq!(text_of(&result), "❌ Error: title is required");

    // 缺少必填参数属于协议层错误
    assert!(registry.execute_tool("search", json!({})).await.is_err());
}

/// 测试通过注册表调用 getPlayerData
#[tokio::test]
async fn test_registry_get_player_data() {
    let mock = MockFetcher::new();
    mock.reply_json(json!({"username": "Zezima"}))
        .reply_json(json!({}));
    let server = server_with(&mock);
    let registry = server.tool_registry();

    for arguments in [serde_json::Value::Null, json!({}), json!({"username": "  "})] {
        let result = registry.execute_tool("getPlayerData", arguments).await.unwrap();
        assert_eq!(
            text_of(&result),
            "Please provide your RuneLite username to fetch player data."
        );
    }
    assert_eq!(mock.request_count(), 0);

    let result = registry
        .execute_tool("getPlayerData", json!({"username": "Zezima", "forceRefresh": false}))
        .await
        .unwrap();
    assert_eq!(
        text_of(&result),
        "Player data fetched from WikiSync. This feature is only available for RuneLite client users.\n\n{\n  \"username\": \"Zezima\"\n}"
    );

    let result = registry
        .execute_tool("getPlayerData", json!({"username": "Nobody"}))
        .await
        .unwrap();
    assert_eq!(text_of(&result), NO_PLAYER_DATA_MESSAGE);
}

/// 测试未知工具
#[tokio::test]
async fn test_registry_unknown_tool() {
    let server = server_with(&MockFetcher::new());
    let result = server.tool_registry().execute_tool("lookup_crate", json!({})).await;
    assert!(result.is_err());
}

/// 测试服务器信息
#[test]
fn test_server_info() {
    let server = server_with(&MockFetcher::new());
    let info = server.server_info();
    assert_eq!(info.server_info.name, "osrs-wiki-mcp");
    assert_eq!(info.server_info.version, osrs_wiki_mcp::VERSION);
    assert!(info.capabilities.tools.is_some());
}
