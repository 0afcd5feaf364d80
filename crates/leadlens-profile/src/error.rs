use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("not a recognizable profile URL: {url}")]
    InvalidProfileUrl { url: String },

    #[error("actor run ended in terminal state {status}")]
    RunFailed { status: String },

    #[error("actor run still not finished after {elapsed_secs}s")]
    RunTimeout { elapsed_secs: u64 },

    #[error("actor run succeeded but dataset {dataset_id} is empty")]
    EmptyDataset { dataset_id: String },
}
