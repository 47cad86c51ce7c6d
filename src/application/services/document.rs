//! Document loading service
//!
//! Reads taxonomy and card documents from a [`DataSource`] and turns them
//! into domain values. One read or one HTTP GET per call, no retries.

use std::sync::Arc;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{normalize, CardRecord, DataSource, Hierarchy, TreeNode};
use crate::infrastructure::traits::FileSystem;

/// Normalized taxonomy together with its arena index.
#[derive(Debug)]
pub struct Taxonomy {
    pub tree: TreeNode,
    pub hierarchy: Hierarchy,
}

impl Taxonomy {
    pub fn from_tree(tree: TreeNode) -> Self {
        let hierarchy = Hierarchy::from_tree(&tree);
        Self { tree, hierarchy }
    }
}

/// Service for loading JSON documents.
#[derive(Clone)]
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
    http: Option<Client>,
}

impl DocumentService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, http: None }
    }

    /// Use `client` for URL sources instead of one built on demand.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Read and parse a JSON document.
    #[instrument(level = "debug", skip_all, fields(source = %source))]
    pub fn load_json(&self, source: &DataSource) -> ApplicationResult<Value> {
        match source {
            DataSource::Inline(value) => Ok(value.clone()),
            DataSource::Path(path) => {
                if !self.fs.exists(path) {
                    return Err(ApplicationError::DataLoad {
                        context: path.display().to_string(),
                        source: Box::new(std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "file does not exist",
                        )),
                    });
                }
                let content = self.fs.read_to_string(path).as_load_error(path)?;
                debug!("read {} bytes", content.len());
                parse_json(&content, &path.display().to_string())
            }
            DataSource::Url(url) => {
                let content = self.fetch(url)?;
                debug!("fetched {} bytes", content.len());
                parse_json(&content, url)
            }
        }
    }

    /// One GET, no retry; any non-2xx status is a load failure.
    fn fetch(&self, url: &str) -> ApplicationResult<String> {
        let client = match &self.http {
            Some(client) => client.clone(),
            None => Client::builder().build().map_err(|e| load_error(url, e))?,
        };
        let response = client.get(url).send().map_err(|e| load_error(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(load_error(url, format!("file not found (HTTP {status})")));
        }
        response.text().map_err(|e| load_error(url, e))
    }

    /// Load and normalize a taxonomy under a hub named `root_name`.
    pub fn load_taxonomy(&self, source: &DataSource, root_name: &str) -> ApplicationResult<Taxonomy> {
        let raw = self.load_json(source)?;
        let tree = normalize(&raw, root_name)?;
        Ok(Taxonomy::from_tree(tree))
    }

    pub fn load_card(&self, source: &DataSource) -> ApplicationResult<CardRecord> {
        let raw = self.load_json(source)?;
        serde_json::from_value(raw).map_err(|e| ApplicationError::DataCorrupt {
            context: source.to_string(),
            source: Box::new(e),
        })
    }
}

fn load_error(
    url: &str,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> ApplicationError {
    ApplicationError::DataLoad {
        context: url.to_string(),
        source: source.into(),
    }
}

fn parse_json(content: &str, context: &str) -> ApplicationResult<Value> {
    serde_json::from_str(content).map_err(|e| ApplicationError::DataCorrupt {
        context: context.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn service() -> DocumentService {
        DocumentService::new(Arc::new(RealFileSystem))
    }

    fn http_service() -> DocumentService {
        let client = Client::builder().no_proxy().build().unwrap();
        service().with_http_client(client)
    }

    /// Answer a single request on a local port with `status` and `body`.
    fn serve_once(status: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 4096];
                let _ = stream.read(&mut request);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/skills.json")
    }

    #[test]
    fn given_inline_taxonomy_when_loading_then_hierarchy_built() {
        let source = DataSource::from(json!({"A": {"B": {}}, "C": {}}));

        let taxonomy = service().load_taxonomy(&source, "hub").unwrap();

        assert_eq!(taxonomy.tree.children.len(), 2);
        assert_eq!(taxonomy.hierarchy.depth(), 3);
    }

    #[test]
    fn given_missing_file_when_loading_then_data_load_error() {
        let source = DataSource::from(std::path::PathBuf::from("/nonexistent/skills.json"));

        let err = service().load_json(&source).unwrap_err();

        assert!(matches!(err, ApplicationError::DataLoad { .. }));
        assert!(!err.is_corrupt_data());
    }

    #[test]
    fn given_malformed_taxonomy_when_loading_then_corrupt() {
        let source = DataSource::from(json!({"A": "not a record"}));

        let err = service().load_taxonomy(&source, "hub").unwrap_err();

        assert!(err.is_corrupt_data());
    }

    #[test]
    fn given_url_source_when_server_answers_then_taxonomy_loaded() {
        let url = serve_once("200 OK", r#"{"Deck": {"Bearings": {}}, "Cables": {}}"#);

        let taxonomy = http_service()
            .load_taxonomy(&DataSource::from_path_str(&url), "hub")
            .unwrap();

        assert_eq!(taxonomy.hierarchy.leaf_nodes(), vec!["Bearings", "Cables"]);
    }

    #[test]
    fn given_url_source_when_status_not_ok_then_data_load_error() {
        let url = serve_once("404 Not Found", "");

        let err = http_service()
            .load_json(&DataSource::from_path_str(&url))
            .unwrap_err();

        assert!(matches!(err, ApplicationError::DataLoad { ref context, .. } if *context == url));
        assert!(err.to_string().contains("404"));
        assert!(!err.is_corrupt_data());
    }

    #[test]
    fn given_url_source_when_body_truncated_then_corrupt() {
        let url = serve_once("200 OK", r#"{"Deck": {"#);

        let err = http_service()
            .load_json(&DataSource::Url(url))
            .unwrap_err();

        assert!(matches!(err, ApplicationError::DataCorrupt { .. }));
    }

    #[test]
    fn given_unreachable_url_when_loading_then_data_load_error() {
        // bind and drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let err = http_service()
            .load_json(&DataSource::Url(format!("http://127.0.0.1:{port}/skills.json")))
            .unwrap_err();

        assert!(matches!(err, ApplicationError::DataLoad { .. }));
    }
}
