mod common;

use chrono::NaiveDate;
use common::{ACCOUNT_PAGE, PREAMBLE, ebank, portal};
use futures_util::StreamExt;
use kbank_portal::StatementRow;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn collect(stream: kbank_portal::StatementStream) -> Vec<StatementRow> {
    stream.map(|row| row.unwrap()).collect().await
}

async fn mount_account_page(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path(ebank("accountinfo/AccountStatementInquiry.do")))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACCOUNT_PAGE))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_accounts_are_scraped_and_cached() {
    let server = MockServer::start().await;
    mount_account_page(&server, 1).await;

    let mut portal = portal(&server);
    assert!(portal.cached_accounts().is_none());

    let accounts = portal.accounts().await.unwrap().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].id, "7001");
    assert_eq!(accounts[1].number, "222-2-22222-2");
    assert_eq!(portal.cached_accounts().unwrap(), accounts.as_slice());

    // served from cache
    let found = portal.find_account("222-2-22222-2").await.unwrap().unwrap();
    assert_eq!(found.id, "7002");
}

#[tokio::test]
async fn test_accounts_refused_leaves_cache_unset() {
    let server = MockServer::start().await;
    Mock::given(path(ebank("accountinfo/AccountStatementInquiry.do")))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let mut portal = portal(&server);
    assert!(portal.accounts().await.unwrap().is_none());
    assert!(portal.cached_accounts().is_none());
}

#[tokio::test]
async fn test_balances_in_document_order() {
    let server = MockServer::start().await;
    let mut html = String::from("<table>");
    for (number, name, balance) in [
        ("111-1-11111-1", "SAVINGS", "10.00"),
        ("222-2-22222-2", "CURRENT", "2,000.50"),
        ("333-3-33333-3", "FIXED", "300,000.00"),
    ] {
        html.push_str(&format!(
            "<tr>\n<td class=\"inner_table_center\">{number}</td>\n\
<td class=\"inner_table_center\" colspan=\"2\">{name}</td>\n\
<td class=\"inner_table_left\">THB</td>\n\
<td class=\"inner_table_right\">{balance}</td>\n</tr>\n"
        ));
    }
    html.push_str("</table>");

    Mock::given(method("GET"))
        .and(path(ebank("cashmanagement/inquiry/AccountSummary.do")))
        .and(query_param("action", "list_domain2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;

    let balances = portal(&server).balances().await.unwrap().unwrap();
    assert_eq!(balances.len(), 3);
    assert_eq!(balances[0].number, "111-1-11111-1");
    assert_eq!(balances[1].name, "CURRENT");
    assert_eq!(balances[1].balance, "2,000.50");
    assert_eq!(balances[2].balance, "300,000.00");
}

#[tokio::test]
async fn test_balances_refused_is_none() {
    let server = MockServer::start().await;
    let balances = portal(&server).balances().await.unwrap();
    assert!(balances.is_none());
}

#[tokio::test]
async fn test_statement_download_form_and_rows() {
    let server = MockServer::start().await;
    let csv = format!(
        "{PREAMBLE}\
01/03/24 10:00,Transfer Deposit,,500.00,1500.00,K PLUS,From X1234,\n\
05/03/24 18:30,Payment,99.00,,1401.00,K PLUS,,\n\
\n"
    );
    Mock::given(method("POST"))
        .and(path(ebank("accountinfo/AccountStatementInquiry.do")))
        .and(body_string_contains("sa_download"))
        .and(body_string_contains("|1234567890||||||"))
        .and(body_string_contains("2024"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .expect(1)
        .mount(&server)
        .await;

    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    let rows = collect(
        portal(&server)
            .statement("123-4-56789-0", start, end)
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("note"), Some("From X1234"));
    assert_eq!(rows[1].get("withdrawal"), Some("99.00"));
    assert!(rows.iter().all(|r| r.get("ignored").is_none()));
}

#[tokio::test]
async fn test_statement_refused_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ebank("accountinfo/AccountStatementInquiry.do")))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let rows = collect(
        portal(&server)
            .statement("123-4-56789-0", day, day)
            .await
            .unwrap(),
    )
    .await;
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_today_statement_unknown_account_makes_no_requests() {
    let server = MockServer::start().await;
    mount_account_page(&server, 1).await;
    Mock::given(path(ebank("cashmanagement/TodayAccountStatementInquiry.do")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut portal = portal(&server);
    let rows = collect(portal.today_statement("999-9-99999-9").await.unwrap()).await;
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_today_statement_primes_detail_then_downloads() {
    let server = MockServer::start().await;
    mount_account_page(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(ebank("cashmanagement/TodayAccountStatementInquiry.do")))
        .and(body_string_contains("detail"))
        .and(body_string_contains("7001"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>detail</html>"))
        .expect(1)
        .mount(&server)
        .await;
    let csv = format!(
        "{PREAMBLE}\
18/10/26 08:01,ATM,Withdrawal,1000.00,,,\n\
18/10/26 09:12,K PLUS,Transfer Deposit,,250.00,,From X9\n\
Total\n"
    );
    Mock::given(method("POST"))
        .and(path(ebank("cashmanagement/TodayAccountStatementInquiry.do")))
        .and(body_string_contains("download"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .expect(1)
        .mount(&server)
        .await;

    let mut portal = portal(&server);
    let rows = collect(portal.today_statement("123-4-56789-0").await.unwrap()).await;

    assert_eq!(rows.len(), 2);
    let columns: Vec<&str> = rows[1].columns().collect();
    assert_eq!(columns, ["datetime", "channel", "type", "withdrawal", "deposit"]);
    assert_eq!(rows[1].get("deposit"), Some("250.00"));

    // second lookup reuses the cached directory
    let again = collect(portal.today_statement("999-9-99999-9").await.unwrap()).await;
    assert!(again.is_empty());
}

#[tokio::test]
async fn test_today_statement_detail_refused_skips_download() {
    let server = MockServer::start().await;
    mount_account_page(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(ebank("cashmanagement/TodayAccountStatementInquiry.do")))
        .and(body_string_contains("detail"))
        .respond_with(ResponseTemplate::new(302))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ebank("cashmanagement/TodayAccountStatementInquiry.do")))
        .and(body_string_contains("download"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PREAMBLE))
        .expect(0)
        .mount(&server)
        .await;

    let mut portal = portal(&server);
    let rows = collect(portal.today_statement("123-4-56789-0").await.unwrap()).await;
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_today_statement_download_refused_is_empty() {
    let server = MockServer::start().await;
    mount_account_page(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(ebank("cashmanagement/TodayAccountStatementInquiry.do")))
        .and(body_string_contains("detail"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let csv = format!("{PREAMBLE}18/10/26 08:01,ATM,Withdrawal,1000.00,,,\n");
    Mock::given(method("POST"))
        .and(path(ebank("cashmanagement/TodayAccountStatementInquiry.do")))
        .and(body_string_contains("download"))
        .respond_with(ResponseTemplate::new(500).set_body_string(csv))
        .expect(1)
        .mount(&server)
        .await;

    let mut portal = portal(&server);
    let rows = collect(portal.today_statement("123-4-56789-0").await.unwrap()).await;
    assert!(rows.is_empty());
}
