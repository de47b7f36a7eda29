use crate::error::ExtractError;
use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetch a page for extraction. The engine itself never calls this.
pub fn fetch_html(url: &str, timeout: Option<Duration>) -> Result<String, ExtractError> {
    let timeout = timeout.unwrap_or(Duration::from_secs(30));
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;

    debug!("Fetching {}", url);
    let body = client.get(url).send()?.error_for_status()?.text()?;
    debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_html_sends_browser_user_agent() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/recipe")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body>ok</body></html>")
            .create();

        let body = fetch_html(&format!("{}/recipe", server.url()), None).unwrap();
        assert_eq!(body, "<html><body>ok</body></html>");
        mock.assert();
    }

    #[test]
    fn test_fetch_html_rejects_error_status() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/gone").with_status(404).create();

        let result = fetch_html(&format!("{}/gone", server.url()), None);
        assert!(matches!(result, Err(ExtractError::Fetch(_))));
    }
}
