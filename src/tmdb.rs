use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{FeedError, Result};
use crate::source::CatalogSource;
use crate::types::{Movie, Query, ResultBatch, Video};

pub struct Tmdb {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for Tmdb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tmdb")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Tmdb {
    pub fn new(api: &ApiConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.request_timeout_secs))
            .build()
            .map_err(|e| FeedError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn page_url(&self, query: &Query, page: u32) -> String {
        match query.term() {
            Some(term) => format!(
                "{}/search/movie?api_key={}&query={}&page={}",
                self.base_url,
                self.api_key,
                urlencoding::encode(term),
                page
            ),
            None => format!(
                "{}/discover/movie?api_key={}&page={}",
                self.base_url, self.api_key, page
            ),
        }
    }

    fn detail_url(&self, movie_id: u64) -> String {
        format!(
            "{}/movie/{}?api_key={}&append_to_response=videos",
            self.base_url, movie_id, self.api_key
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FeedError::Decode(e.to_string()))
    }
}

// TMDB response types

#[derive(Deserialize)]
struct TmPage {
    #[serde(default)]
    results: Vec<Movie>,
    #[serde(default)]
    total_results: u64,
}

#[derive(Deserialize)]
struct TmDetail {
    #[serde(default)]
    videos: Option<TmVideos>,
}

#[derive(Deserialize)]
struct TmVideos {
    #[serde(default)]
    results: Vec<Video>,
}

#[async_trait]
impl CatalogSource for Tmdb {
    fn name(&self) -> &str {
        "TMDB"
    }

    async fn fetch_page(&self, query: &Query, page: u32) -> Result<ResultBatch> {
        tracing::debug!(%query, page, "fetching catalog page");
        let body: TmPage = self.get_json(&self.page_url(query, page)).await?;
        Ok(ResultBatch {
            items: body.results,
            total_available: body.total_results,
        })
    }

    async fn fetch_videos(&self, movie_id: u64) -> Result<Vec<Video>> {
        tracing::debug!(movie_id, "fetching movie videos");
        let detail: TmDetail = self.get_json(&self.detail_url(movie_id)).await?;
        Ok(detail.videos.map(|v| v.results).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Tmdb {
        let api = ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        };
        Tmdb::new(&api, "k3y".to_string()).unwrap()
    }

    #[test]
    fn search_url_encodes_term() {
        let api = ApiConfig {
            base_url: "https://api.example.com/3/".to_string(),
            ..ApiConfig::default()
        };
        let tmdb = Tmdb::new(&api, "k".to_string()).unwrap();
        assert_eq!(
            tmdb.page_url(&Query::new("star wars"), 2),
            "https://api.example.com/3/search/movie?api_key=k&query=star%20wars&page=2"
        );
        assert_eq!(
            tmdb.page_url(&Query::discover(), 1),
            "https://api.example.com/3/discover/movie?api_key=k&page=1"
        );
    }

    #[tokio::test]
    async fn discover_page_decodes_results_and_total() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .and(query_param("page", "3"))
            .and(query_param("api_key", "k3y"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"page":3,"results":[{"id":1,"title":"A"},{"id":2,"title":"B"}],"total_results":42}"#,
            ))
            .mount(&server)
            .await;

        let batch = client_for(&server)
            .fetch_page(&Query::discover(), 3)
            .await
            .expect("page ok");
        assert_eq!(batch.total_available, 42);
        let ids: Vec<u64> = batch.items.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn search_page_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "the matrix"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"results":[{"id":603,"title":"The Matrix"}],"total_results":1}"#),
            )
            .mount(&server)
            .await;

        let batch = client_for(&server)
            .fetch_page(&Query::new("the matrix"), 1)
            .await
            .expect("search ok");
        assert_eq!(batch.items[0].title, "The Matrix");
    }

    #[tokio::test]
    async fn missing_results_decode_as_empty_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status_code":34}"#))
            .mount(&server)
            .await;

        let batch = client_for(&server)
            .fetch_page(&Query::discover(), 1)
            .await
            .expect("empty ok");
        assert!(batch.items.is_empty());
        assert_eq!(batch.total_available, 0);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_page(&Query::discover(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_videos(7).await.unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }

    #[tokio::test]
    async fn detail_returns_embedded_videos() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/603"))
            .and(query_param("append_to_response", "videos"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"id":603,"videos":{"results":[{"type":"Teaser","key":"t1","site":"YouTube"},{"type":"Trailer","key":"tr","site":"YouTube"}]}}"#,
            ))
            .mount(&server)
            .await;

        let videos = client_for(&server).fetch_videos(603).await.expect("detail ok");
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[1].kind, "Trailer");
    }
}
