pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod utils;

use crate::error::Result;
use crate::services::{
    eval_service::EvalService, gateway_service::ModelGateway,
    question_service::QuestionService,
};
use reqwest::Client;

/// Connected application services sharing one HTTP client and one pinned
/// model gateway. Built once at startup; individual sessions come and go.
#[derive(Clone)]
pub struct AppState {
    pub gateway: ModelGateway,
    pub question_service: QuestionService,
    pub eval_service: EvalService,
}

impl AppState {
    pub async fn connect(api_key: String) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(crate::error::Error::from)?;

        let gateway = ModelGateway::connect(http_client, api_key).await?;
        let question_service = QuestionService::new(gateway.clone());
        let eval_service = EvalService::new(gateway.clone());

        Ok(Self {
            gateway,
            question_service,
            eval_service,
        })
    }
}
