#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod config;
pub use config::{ClientConfig, DEFAULT_TIMEOUT};

mod error;
pub use error::ClientError;

mod point;
pub use point::{BatchPoints, FieldValue, Point};

pub mod line;

mod client;
pub use client::{HttpClient, InfluxClient, Pong};

pub use reqwest::StatusCode;
pub use url::Url;
