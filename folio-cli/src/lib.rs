//! Library side of the `folio` binary: configuration, wiring and error
//! reporting, kept here so they can be tested without spawning the binary.

pub mod config;

use std::sync::Arc;

use folio_model::{CompletionModel, OpenAICompatibleClient, RetryPolicy, RetryingModel};
use folio_pdf::PdfError;
use folio_rag::{DocumentAssistant, RagConfig, RagError, SharedEmbedder};

pub use config::{AppConfig, EmbeddingBackend};

/// Build the completion model, wrapped in retries when more than one
/// attempt is configured.
pub fn completion_model(config: &AppConfig) -> Result<Arc<dyn CompletionModel>, RagError> {
    let client = OpenAICompatibleClient::new(config.completion.clone())?;
    if config.max_retries > 1 {
        let policy = RetryPolicy { max_attempts: config.max_retries, ..RetryPolicy::default() };
        Ok(Arc::new(RetryingModel::new(client, policy)))
    } else {
        Ok(Arc::new(client))
    }
}

/// Build the assistant for `config`, with `rag` overriding its flow settings.
pub fn assistant(config: &AppConfig, rag: RagConfig) -> Result<DocumentAssistant, RagError> {
    DocumentAssistant::builder()
        .config(rag)
        .embedder(SharedEmbedder::global(config.embedder_spec()))
        .model(completion_model(config)?)
        .build()
}

/// Render an error as `kind: message` for the terminal.
pub fn report(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<RagError>() {
        format!("{}: {e}", e.kind())
    } else if let Some(e) = err.downcast_ref::<PdfError>() {
        format!("{}: {e}", e.kind())
    } else {
        format!("Error: {err:#}")
    }
}

#[cfg(test)]
mod tests {
    use folio_model::ModelError;

    use super::*;

    #[test]
    fn reports_error_kind_and_message() {
        let err = anyhow::Error::new(RagError::Validation("document text is empty".into()));
        assert_eq!(report(&err), "ValidationError: Validation error: document text is empty");

        let err = anyhow::Error::new(RagError::from(ModelError::Authentication {
            provider: "together".into(),
            message: "no API key".into(),
        }));
        assert!(report(&err).starts_with("AuthenticationError: "));

        let err = anyhow::Error::new(PdfError::Encrypted);
        assert_eq!(report(&err), "EncryptedError: Document is encrypted");

        let err = anyhow::anyhow!("something else");
        assert_eq!(report(&err), "Error: something else");
    }

    #[test]
    fn retries_wrap_the_client_only_when_asked() {
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(completion_model(&config).unwrap().name(), config.completion.model);

        config.max_retries = 3;
        let model = completion_model(&config).unwrap();
        assert_eq!(model.name(), config.completion.model);
    }
}
