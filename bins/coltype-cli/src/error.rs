#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Engine(#[from] coltype_engine::EngineError),

    #[error("{0}")]
    Adapter(#[from] coltype_api::AdapterError),

    #[error("invalid --value '{value}' for {sql_type} column: {detail}")]
    Value {
        value: String,
        sql_type: coltype_api::SqlType,
        detail: String,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
